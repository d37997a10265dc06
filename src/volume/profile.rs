use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ComponentRegistry, ConfigError, ErasedComponent, VolumeComponent, VolumeError};

#[derive(Clone, Debug)]
struct ProfileEntry {
    active: bool,
    component: Box<dyn ErasedComponent>,
}

/// Serialized form of one profile entry.
#[derive(Serialize, Deserialize)]
struct EntryData {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    data: serde_json::Value,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
struct ProfileData {
    #[serde(default)]
    components: Vec<EntryData>,
}

/// An authored set of components, at most one per type.
#[derive(Clone, Debug, Default)]
pub struct VolumeProfile {
    components: Vec<ProfileEntry>,
}

impl VolumeProfile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the component of type `T`.
    pub fn add<T: VolumeComponent>(&mut self, component: T) {
        let component: Box<dyn ErasedComponent> = Box::new(component);
        match self.position(T::NAME) {
            Some(index) => self.components[index].component = component,
            None => self.components.push(ProfileEntry {
                active: true,
                component,
            }),
        }
    }

    #[must_use]
    pub fn with<T: VolumeComponent>(mut self, component: T) -> Self {
        self.add(component);
        self
    }

    pub fn get<T: VolumeComponent>(&self) -> Option<&T> {
        self.position(T::NAME)
            .and_then(|i| self.components[i].component.as_any().downcast_ref())
    }

    pub fn get_mut<T: VolumeComponent>(&mut self) -> Option<&mut T> {
        let index = self.position(T::NAME)?;
        self.components[index].component.as_any_mut().downcast_mut()
    }

    pub fn has<T: VolumeComponent>(&self) -> bool {
        self.position(T::NAME).is_some()
    }

    pub fn remove<T: VolumeComponent>(&mut self) -> Option<T> {
        let index = self.position(T::NAME)?;
        let entry = self.components.remove(index);
        entry.component.as_any().downcast_ref::<T>().cloned()
    }

    /// Inactive components are kept but skipped when blending.
    /// Returns false when the profile has no component of type `T`.
    pub fn set_active<T: VolumeComponent>(&mut self, active: bool) -> bool {
        match self.position(T::NAME) {
            Some(index) => {
                self.components[index].active = active;
                true
            }
            None => false,
        }
    }

    pub fn is_active<T: VolumeComponent>(&self) -> bool {
        self.position(T::NAME)
            .map_or(false, |i| self.components[i].active)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|entry| entry.component.name() == name)
    }

    /// Active components in insertion order.
    pub(crate) fn active_components(&self) -> impl Iterator<Item = &dyn ErasedComponent> {
        self.components
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.component.as_ref())
    }

    /// Serializes as `{"components": [{"type": .., "active": .., "data": {..}}]}`.
    /// # Errors
    /// Errors when a component fails to serialize.
    pub fn to_json(&self) -> Result<serde_json::Value, VolumeError> {
        let components = self
            .components
            .iter()
            .map(|entry| {
                Ok(EntryData {
                    ty: entry.component.name().to_string(),
                    active: entry.active,
                    data: entry.component.to_json()?,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        Ok(serde_json::to_value(ProfileData { components })?)
    }

    /// # Errors
    /// Errors when a component fails to serialize.
    pub fn to_json_string_pretty(&self) -> Result<String, VolumeError> {
        Ok(serde_json::to_string_pretty(&self.to_json()?)?)
    }

    /// Builds a profile from JSON. Every component type must be registered.
    /// # Errors
    /// Errors on unknown component types or malformed component data.
    pub fn from_json(
        value: serde_json::Value,
        registry: &ComponentRegistry,
    ) -> Result<Self, VolumeError> {
        let data: ProfileData = serde_json::from_value(value)?;
        let mut profile = Self::new();
        for entry in data.components {
            let value = match entry.data {
                serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
                other => other,
            };
            let component = registry.load(&entry.ty, value)?;
            // Later entries of the same type win
            match profile.position(&entry.ty) {
                Some(index) => {
                    profile.components[index] = ProfileEntry {
                        active: entry.active,
                        component,
                    }
                }
                None => profile.components.push(ProfileEntry {
                    active: entry.active,
                    component,
                }),
            }
        }
        Ok(profile)
    }

    /// # Errors
    /// See [`VolumeProfile::from_json`].
    pub fn from_json_str(json: &str, registry: &ComponentRegistry) -> Result<Self, VolumeError> {
        Self::from_json(serde_json::from_str(json)?, registry)
    }

    /// Reads a profile from a JSON file.
    /// # Errors
    /// Errors when the file cannot be read or does not hold a valid profile.
    pub fn load(path: impl AsRef<Path>, registry: &ComponentRegistry) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let profile = Self::from_json_str(&json, registry)?;
        debug!(
            "loaded volume profile {} with {} components",
            path.display(),
            profile.len()
        );
        Ok(profile)
    }
}
