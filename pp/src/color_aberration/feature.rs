use std::path::{Path, PathBuf};
use std::rc::Rc;

use prism::{
    ConfigError, PassInput, RenderQueue, RendererFeature, RenderingData, ScriptableRenderPass,
    Shader,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PostProcessRenderPass, INTENSITY_PROPERTY};

/// Serialized settings of [`PostProcessRendererFeature`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessFeatureSettings {
    /// WGSL file of the aberration shader. Without one the pass never draws.
    pub shader: Option<PathBuf>,
}

impl PostProcessFeatureSettings {
    /// # Errors
    /// Errors when `json` is not a valid settings document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    /// Errors when the file cannot be read or is not a valid settings document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json_str(&json)
    }
}

/// Registers a [`PostProcessRenderPass`] with the renderer.
#[derive(Debug, Default)]
pub struct PostProcessRendererFeature {
    shader: Option<Rc<Shader>>,
    render_pass: Option<PostProcessRenderPass>,
}

impl PostProcessRendererFeature {
    #[must_use]
    pub fn new(shader: Option<Rc<Shader>>) -> Self {
        Self {
            shader,
            render_pass: None,
        }
    }

    /// Loads the configured shader file.
    /// # Errors
    /// Errors when the shader file cannot be read.
    pub fn from_settings(settings: &PostProcessFeatureSettings) -> Result<Self, ConfigError> {
        let shader = match &settings.shader {
            Some(path) => Some(Rc::new(
                Shader::load(path)?.with_property(INTENSITY_PROPERTY),
            )),
            None => None,
        };
        Ok(Self::new(shader))
    }

    /// The owned pass. `None` before `create` and after `dispose`.
    pub fn render_pass(&self) -> Option<&PostProcessRenderPass> {
        self.render_pass.as_ref()
    }
}

impl RendererFeature for PostProcessRendererFeature {
    fn name(&self) -> &str {
        "PostProcess"
    }

    fn create(&mut self) {
        if self.render_pass.is_none() {
            self.render_pass = Some(PostProcessRenderPass::new(self.shader.clone()));
        }
    }

    fn setup_render_passes(&mut self, data: &RenderingData<'_>) {
        if let Some(pass) = &mut self.render_pass {
            pass.setup(&data.camera.target_descriptor);
        }
    }

    fn add_render_passes<'a>(&'a mut self, queue: &mut RenderQueue<'a>, _data: &RenderingData<'_>) {
        match &mut self.render_pass {
            Some(pass) => {
                pass.configure_input(PassInput::COLOR);
                queue.enqueue(pass);
            }
            None => debug!("PostProcess feature has no render pass to enqueue"),
        }
    }

    fn dispose(&mut self) {
        if let Some(mut pass) = self.render_pass.take() {
            pass.cleanup();
        }
    }
}
