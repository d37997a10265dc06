use std::collections::BTreeMap;

use crate::{ComponentRegistry, ErasedComponent, VolumeComponent, VolumeProfile};

/// The blended parameters for one camera.
///
/// Holds one instance of every registered component. Components that no
/// volume touches keep their defaults.
#[derive(Clone, Debug, Default)]
pub struct VolumeStack {
    components: BTreeMap<&'static str, Box<dyn ErasedComponent>>,
}

impl VolumeStack {
    #[must_use]
    pub fn new(registry: &ComponentRegistry) -> Self {
        let components = registry
            .create_all()
            .map(|component| (component.name(), component))
            .collect();
        Self { components }
    }

    /// `None` when `T` was not registered.
    pub fn component<T: VolumeComponent>(&self) -> Option<&T> {
        self.components
            .get(T::NAME)
            .and_then(|c| c.as_any().downcast_ref())
    }

    pub fn component_mut<T: VolumeComponent>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(T::NAME)
            .and_then(|c| c.as_any_mut().downcast_mut())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Restores every component to its defaults.
    pub fn reset(&mut self) {
        for component in self.components.values_mut() {
            component.reset();
        }
    }

    /// Blends the active components of `profile` into the stack by `t`.
    pub(crate) fn blend(&mut self, profile: &VolumeProfile, t: f32) {
        for source in profile.active_components() {
            if let Some(component) = self.components.get_mut(source.name()) {
                component.blend_from(source, t);
            }
        }
    }
}
