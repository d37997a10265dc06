use std::rc::Rc;

use prism::{
    blit, Material, PassInput, ProfilingSampler, ProfilingScope, PropertyId, RenderContext,
    RenderPassEvent, RenderTextureDescriptor, RenderingData, ScriptableRenderPass, Shader,
    VolumeComponent,
};
use tracing::{debug, error, trace};

use crate::{ColorAberration, INTENSITY_PROPERTY};

const INTENSITY: PropertyId = PropertyId::of(INTENSITY_PROPERTY);

/// Materials owned by the pass. A slot is `None` when its shader could not be used.
#[derive(Debug)]
struct MaterialLibrary {
    uber: Option<Material>,
}

impl MaterialLibrary {
    fn new(uber: Option<Rc<Shader>>) -> Self {
        Self {
            uber: Self::load(uber),
        }
    }

    fn load(shader: Option<Rc<Shader>>) -> Option<Material> {
        match shader {
            None => {
                error!("Missing shader. PostProcessRenderPass will not execute. Check for a missing shader in the feature settings.");
                None
            }
            Some(shader) if !shader.is_supported() => {
                error!(
                    "Shader {} is not supported. PostProcessRenderPass will not execute.",
                    shader.name()
                );
                None
            }
            Some(shader) => Some(Material::new(shader)),
        }
    }

    fn cleanup(&mut self) {
        self.uber = None;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassState {
    /// Constructed, no camera descriptor yet.
    Uninitialized,
    Configured,
    /// Cleaned up. Every later execute is skipped.
    Disposed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingMaterial,
    EditorCamera,
    Disposed,
}

/// What one call to `execute` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// One blit ran the aberration shader.
    Executed,
    /// A command buffer was submitted with an empty profiling scope.
    Inactive,
    /// Nothing was recorded.
    Skipped(SkipReason),
}

/// Applies [`ColorAberration`] to the camera color right before the
/// built-in post-processing.
#[derive(Debug)]
pub struct PostProcessRenderPass {
    profiling_sampler: ProfilingSampler,
    materials: MaterialLibrary,
    descriptor: RenderTextureDescriptor,
    inputs: PassInput,
    state: PassState,
    last_outcome: Option<FrameOutcome>,
}

impl PostProcessRenderPass {
    /// Creates the pass material from `uber`. A missing or unsupported shader
    /// is logged here, and the pass then never draws.
    #[must_use]
    pub fn new(uber: Option<Rc<Shader>>) -> Self {
        Self {
            profiling_sampler: ProfilingSampler::new("PostProcess"),
            materials: MaterialLibrary::new(uber),
            descriptor: RenderTextureDescriptor::default(),
            inputs: PassInput::empty(),
            state: PassState::Uninitialized,
            last_outcome: None,
        }
    }

    /// Keeps a copy of the camera descriptor for temporary targets, with mip-mapping disabled.
    pub fn setup(&mut self, base_descriptor: &RenderTextureDescriptor) {
        self.descriptor = base_descriptor.without_mips();
        if self.state == PassState::Uninitialized {
            self.state = PassState::Configured;
        }
    }

    /// Declares the inputs the renderer must produce before this pass runs.
    pub fn configure_input(&mut self, inputs: PassInput) {
        self.inputs = inputs;
    }

    pub fn descriptor(&self) -> &RenderTextureDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    pub fn has_material(&self) -> bool {
        self.materials.uber.is_some()
    }

    /// `None` until the first execute.
    pub fn last_outcome(&self) -> Option<FrameOutcome> {
        self.last_outcome
    }

    fn render(&mut self, context: &dyn RenderContext, data: &mut RenderingData<'_>) -> FrameOutcome {
        if self.state == PassState::Disposed {
            return FrameOutcome::Skipped(SkipReason::Disposed);
        }
        let material = match self.materials.uber.as_mut() {
            Some(material) => material,
            None => return FrameOutcome::Skipped(SkipReason::MissingMaterial),
        };
        if data.camera.camera_type.is_editor_only() {
            return FrameOutcome::Skipped(SkipReason::EditorCamera);
        }

        // Unregistered components read as defaults, which are inactive
        let aberration = data
            .volume_stack
            .component::<ColorAberration>()
            .cloned()
            .unwrap_or_default();
        let active = aberration.is_active();

        let mut cmd = context
            .command_buffer_pool()
            .get(self.profiling_sampler.name());
        {
            let mut scope = ProfilingScope::new(&mut cmd, &self.profiling_sampler);
            if active {
                material.set_float(INTENSITY, aberration.intensity.value());
                blit(&mut scope, &mut data.color, &self.descriptor, material, 0);
            }
        }

        context.execute_command_buffer(&cmd);
        cmd.clear();

        if active {
            FrameOutcome::Executed
        } else {
            FrameOutcome::Inactive
        }
    }
}

impl ScriptableRenderPass for PostProcessRenderPass {
    fn name(&self) -> &str {
        "PostProcessRenderPass"
    }

    fn event(&self) -> RenderPassEvent {
        RenderPassEvent::BeforeRenderingPostProcessing
    }

    fn inputs(&self) -> PassInput {
        self.inputs
    }

    // Targets are bound by the blit, so there is nothing to configure here

    fn execute(&mut self, context: &dyn RenderContext, data: &mut RenderingData<'_>) {
        let outcome = self.render(context, data);
        trace!("{} frame outcome: {:?}", self.name(), outcome);
        self.last_outcome = Some(outcome);
    }

    fn cleanup(&mut self) {
        if self.state != PassState::Disposed {
            debug!("cleaning up {}", self.name());
        }
        self.materials.cleanup();
        self.state = PassState::Disposed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_disables_mips() {
        let mut pass = PostProcessRenderPass::new(Some(ColorAberration::default_shader()));
        assert_eq!(pass.state(), PassState::Uninitialized);

        let camera = RenderTextureDescriptor::new(1920, 1080).with_mips();
        pass.setup(&camera);
        pass.setup(&camera);

        assert_eq!(pass.state(), PassState::Configured);
        assert_eq!(*pass.descriptor(), camera.without_mips());
    }

    #[test]
    fn cleanup_releases_the_material() {
        let mut pass = PostProcessRenderPass::new(Some(ColorAberration::default_shader()));
        assert!(pass.has_material());
        pass.cleanup();
        pass.cleanup();
        assert!(!pass.has_material());
        assert_eq!(pass.state(), PassState::Disposed);

        pass.setup(&RenderTextureDescriptor::new(4, 4));
        assert_eq!(pass.state(), PassState::Disposed);
    }

    #[test]
    fn unsupported_shader_leaves_no_material() {
        let shader = Rc::new(Shader::from_wgsl("broken", "fn fs_main() {}"));
        assert!(!PostProcessRenderPass::new(Some(shader)).has_material());
        assert!(!PostProcessRenderPass::new(None).has_material());
    }
}
