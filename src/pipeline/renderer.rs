use tracing::{debug, warn};

use crate::{PassInput, RenderContext, RenderQueue, RendererFeature, RenderingData};

struct FeatureSlot {
    feature: Box<dyn RendererFeature>,
    active: bool,
}

/// Drives renderer features through the per-frame pass protocol.
///
/// Every frame, each active feature first receives the camera state
/// (`setup_render_passes`) and then enqueues its passes
/// (`add_render_passes`). The queue is ordered by event, and each pass is
/// configured and executed in turn.
#[derive(Default)]
pub struct Renderer {
    features: Vec<FeatureSlot>,
    created: bool,
    disposed: bool,
    last_frame_inputs: PassInput,
    last_frame_passes: Vec<String>,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_feature<F>(mut self, feature: F) -> Self
    where
        F: RendererFeature + 'static,
    {
        self.add_feature(Box::new(feature));
        self
    }

    pub fn add_feature(&mut self, mut feature: Box<dyn RendererFeature>) {
        if self.created {
            feature.create();
        }
        self.features.push(FeatureSlot {
            feature,
            active: true,
        });
    }

    /// Enables or disables a feature by name. Returns false when no feature has that name.
    pub fn set_active(&mut self, name: &str, active: bool) -> bool {
        match self.features.iter_mut().find(|s| s.feature.name() == name) {
            Some(slot) => {
                slot.active = active;
                true
            }
            None => false,
        }
    }

    /// Calls `create` on every feature. Later calls do nothing.
    pub fn create(&mut self) {
        if self.created {
            return;
        }
        for slot in &mut self.features {
            debug!("creating renderer feature {}", slot.feature.name());
            slot.feature.create();
        }
        self.created = true;
    }

    pub fn render_frame(&mut self, context: &dyn RenderContext, data: &mut RenderingData<'_>) {
        if self.disposed {
            warn!("render_frame called on a disposed renderer");
            return;
        }
        self.create();

        for slot in self.features.iter_mut().filter(|s| s.active) {
            slot.feature.setup_render_passes(data);
        }

        let mut queue = RenderQueue::new();
        for slot in self.features.iter_mut().filter(|s| s.active) {
            slot.feature.add_render_passes(&mut queue, data);
        }
        queue.sort();

        let inputs = queue.inputs();
        let names = queue.names();
        let descriptor = data.camera.target_descriptor;
        for pass in queue.passes_mut() {
            pass.configure(&descriptor);
            pass.execute(context, data);
        }
        drop(queue);

        self.last_frame_inputs = inputs;
        self.last_frame_passes = names;
    }

    /// Union of the inputs declared by the passes of the last frame.
    pub fn last_frame_inputs(&self) -> PassInput {
        self.last_frame_inputs
    }

    /// Names of the passes executed last frame, in execution order.
    pub fn last_frame_passes(&self) -> &[String] {
        &self.last_frame_passes
    }

    /// Calls `dispose` on every feature. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for slot in &mut self.features {
            debug!("disposing renderer feature {}", slot.feature.name());
            slot.feature.dispose();
        }
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.dispose();
    }
}
