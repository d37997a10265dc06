use std::rc::Rc;

use prism::{MinFloatParameter, Shader, VolumeComponent};
use serde::{Deserialize, Serialize};

mod feature;
pub use feature::*;

mod pass;
pub use pass::*;

/// WGSL source of the built-in color aberration shader.
pub const SHADER_SOURCE: &str = include_str!("shader/color_aberration.wgsl");

/// Shader property carrying the aberration strength.
pub const INTENSITY_PROPERTY: &str = "_AberrationIntensity";

/// Splits the red and blue channels apart, growing toward the screen edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAberration {
    /// Zero disables the effect.
    pub intensity: MinFloatParameter,
}

impl ColorAberration {
    /// A component that overrides the intensity with `value`.
    #[must_use]
    pub fn with_intensity(value: f32) -> Self {
        Self {
            intensity: MinFloatParameter::default().overriding(value),
        }
    }

    /// The built-in shader, with its material properties declared.
    #[must_use]
    pub fn default_shader() -> Rc<Shader> {
        Rc::new(Shader::from_wgsl("color_aberration", SHADER_SOURCE).with_property(INTENSITY_PROPERTY))
    }
}

impl VolumeComponent for ColorAberration {
    const NAME: &'static str = "InPro/ColorAberration";

    fn is_active(&self) -> bool {
        self.intensity.value() > 0.0
    }

    fn blend(&mut self, target: &Self, t: f32) {
        self.intensity.blend(&target.intensity, t);
    }
}
