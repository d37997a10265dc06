use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::VolumeError;

/// A set of effect parameters that volumes blend per camera.
pub trait VolumeComponent: Any + Clone + Debug + Default + Serialize + DeserializeOwned {
    /// Unique name, used as the key in serialized profiles.
    const NAME: &'static str;

    /// Whether the effect should run with the current values.
    fn is_active(&self) -> bool;

    /// Moves the overridden parameters of `target` into `self` by `t`.
    fn blend(&mut self, target: &Self, t: f32);

    fn is_tile_compatible(&self) -> bool {
        false
    }
}

/// Object-safe view of a [`VolumeComponent`] used by profiles and stacks.
pub(crate) trait ErasedComponent: Debug {
    fn name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn blend_from(&mut self, target: &dyn ErasedComponent, t: f32);
    fn reset(&mut self);
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
    fn clone_boxed(&self) -> Box<dyn ErasedComponent>;
}

impl<T: VolumeComponent> ErasedComponent for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn blend_from(&mut self, target: &dyn ErasedComponent, t: f32) {
        if let Some(target) = target.as_any().downcast_ref::<T>() {
            self.blend(target, t);
        }
    }

    fn reset(&mut self) {
        *self = T::default();
    }

    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn clone_boxed(&self) -> Box<dyn ErasedComponent> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ErasedComponent> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

type Factory = fn() -> Box<dyn ErasedComponent>;
type Loader = fn(serde_json::Value) -> Result<Box<dyn ErasedComponent>, serde_json::Error>;

#[derive(Clone, Copy)]
struct ComponentEntry {
    create: Factory,
    load: Loader,
}

fn create_component<T: VolumeComponent>() -> Box<dyn ErasedComponent> {
    Box::new(T::default())
}

fn load_component<T: VolumeComponent>(
    value: serde_json::Value,
) -> Result<Box<dyn ErasedComponent>, serde_json::Error> {
    Ok(Box::new(serde_json::from_value::<T>(value)?))
}

/// The component types a host knows about.
///
/// Stacks get one default instance of every registered type, and profiles
/// can only load registered types.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<&'static str, ComponentEntry>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: VolumeComponent>(&mut self) -> &mut Self {
        self.entries.insert(
            T::NAME,
            ComponentEntry {
                create: create_component::<T>,
                load: load_component::<T>,
            },
        );
        self
    }

    #[must_use]
    pub fn with<T: VolumeComponent>(mut self) -> Self {
        self.register::<T>();
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub(crate) fn create_all(&self) -> impl Iterator<Item = Box<dyn ErasedComponent>> + '_ {
        self.entries.values().map(|entry| (entry.create)())
    }

    pub(crate) fn load(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<Box<dyn ErasedComponent>, VolumeError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| VolumeError::UnknownComponent(name.to_string()))?;
        (entry.load)(value).map_err(|source| VolumeError::InvalidComponent {
            name: name.to_string(),
            source,
        })
    }
}

impl Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
