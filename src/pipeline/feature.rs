use crate::{PassInput, RenderingData, ScriptableRenderPass};

/// Passes enqueued for a single frame.
#[derive(Default)]
pub struct RenderQueue<'a> {
    passes: Vec<&'a mut dyn ScriptableRenderPass>,
}

impl<'a> RenderQueue<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn enqueue(&mut self, pass: &'a mut dyn ScriptableRenderPass) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Union of every enqueued pass's inputs.
    pub fn inputs(&self) -> PassInput {
        self.passes
            .iter()
            .fold(PassInput::empty(), |acc, pass| acc | pass.inputs())
    }

    /// Orders passes by event. Passes with equal events keep their enqueue order.
    pub(crate) fn sort(&mut self) {
        self.passes.sort_by_key(|pass| pass.event());
    }

    pub(crate) fn passes_mut(&mut self) -> impl Iterator<Item = &mut (dyn ScriptableRenderPass + 'a)> {
        self.passes.iter_mut().map(|pass| &mut **pass)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.passes.iter().map(|pass| pass.name().to_string()).collect()
    }
}

/// Registers render passes with the renderer.
pub trait RendererFeature {
    fn name(&self) -> &str;

    /// Called once before the first frame.
    fn create(&mut self);

    /// Forwards per-camera state to the owned passes before they are enqueued.
    fn setup_render_passes(&mut self, _data: &RenderingData<'_>) {}

    /// Enqueues the passes to run this frame and declares their inputs.
    fn add_render_passes<'a>(&'a mut self, queue: &mut RenderQueue<'a>, data: &RenderingData<'_>);

    /// Tears down owned passes.
    fn dispose(&mut self);
}
