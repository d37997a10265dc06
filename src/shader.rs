use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use tracing::warn;

use crate::ConfigError;

/// Entry point every blit shader must expose for the full-screen triangle.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every blit shader must expose for the per-pixel program.
pub const FRAGMENT_ENTRY: &str = "fs_main";
/// Number of float properties a material can pack into its uniform block.
pub const MAX_MATERIAL_PROPERTIES: usize = 16;

/// Identifier of a named shader property.
/// Equal names always produce equal ids, so ids can be computed in const context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u32);

impl PropertyId {
    /// FNV-1a hash of the property name.
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u32 = 0x811c_9dc5;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(0x0100_0193);
            i += 1;
        }
        Self(hash)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A WGSL program used by full-screen blits.
#[derive(Clone, Debug, PartialEq)]
pub struct Shader {
    name: String,
    source: String,
    /// Float properties in uniform slot order.
    properties: Vec<(String, PropertyId)>,
    supported: bool,
}

impl Shader {
    /// Wraps WGSL source. The shader is supported when it exposes both blit entry points.
    pub fn from_wgsl(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let supported = has_entry_point(&source, VERTEX_ENTRY)
            && has_entry_point(&source, FRAGMENT_ENTRY);
        Self {
            name: name.into(),
            source,
            properties: Vec::new(),
            supported,
        }
    }

    /// Reads a WGSL file. The shader is named after the file stem.
    /// # Errors
    /// Errors when the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        Ok(Self::from_wgsl(name, source))
    }

    /// Declares the next float property of the material uniform block.
    #[must_use]
    pub fn with_property(mut self, name: &str) -> Self {
        let id = PropertyId::of(name);
        if self.property_slot(id).is_some() {
            return self;
        }
        if self.properties.len() >= MAX_MATERIAL_PROPERTIES {
            warn!(
                "shader {} declares more than {} properties, ignoring {}",
                self.name, MAX_MATERIAL_PROPERTIES, name
            );
            return self;
        }
        self.properties.push((name.to_string(), id));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn property_slot(&self, id: PropertyId) -> Option<usize> {
        self.properties.iter().position(|(_, p)| *p == id)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }
}

/// Looks for `fn <entry>(` outside of line comments.
fn has_entry_point(source: &str, entry: &str) -> bool {
    source
        .lines()
        .map(|line| line.split("//").next().unwrap_or_default())
        .any(|line| {
            line.match_indices("fn").any(|(i, _)| {
                let starts_word = !line[..i]
                    .chars()
                    .next_back()
                    .map_or(false, is_ident_char);
                let rest = &line[i + 2..];
                starts_word
                    && rest.starts_with(char::is_whitespace)
                    && rest
                        .trim_start()
                        .strip_prefix(entry)
                        .map_or(false, |rest| rest.trim_start().starts_with('('))
            })
        })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u64);

/// A shader plus the float properties bound to it.
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    shader: Rc<Shader>,
    floats: BTreeMap<PropertyId, f32>,
}

impl Material {
    #[must_use]
    pub fn new(shader: Rc<Shader>) -> Self {
        Self {
            id: MaterialId(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed)),
            shader,
            floats: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn shader(&self) -> &Rc<Shader> {
        &self.shader
    }

    pub fn set_float(&mut self, id: PropertyId, value: f32) {
        self.floats.insert(id, value);
    }

    pub fn float(&self, id: PropertyId) -> Option<f32> {
        self.floats.get(&id).copied()
    }

    /// Snapshot of the material as it is when a command is recorded.
    pub fn binding(&self) -> MaterialBinding {
        MaterialBinding {
            material: self.id,
            shader: Rc::clone(&self.shader),
            floats: self.floats.iter().map(|(id, v)| (*id, *v)).collect(),
        }
    }
}

/// The state of a material captured into a command buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialBinding {
    pub material: MaterialId,
    pub shader: Rc<Shader>,
    pub floats: Vec<(PropertyId, f32)>,
}

impl MaterialBinding {
    pub fn float(&self, id: PropertyId) -> Option<f32> {
        self.floats.iter().find(|(p, _)| *p == id).map(|(_, v)| *v)
    }

    /// Packs the float properties into the shader's uniform slots.
    /// Properties the shader does not declare are left out.
    pub fn uniforms(&self) -> MaterialUniforms {
        let mut uniforms = MaterialUniforms::default();
        for (id, value) in &self.floats {
            if let Some(slot) = self.shader.property_slot(*id) {
                uniforms.values[slot / 4][slot % 4] = *value;
            }
        }
        uniforms
    }
}

/// Uniform block layout shared by every blit shader: `array<vec4<f32>, 4>`.
#[derive(Pod, Zeroable, Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct MaterialUniforms {
    pub values: [[f32; 4]; MAX_MATERIAL_PROPERTIES / 4],
}
