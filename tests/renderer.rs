use std::cell::RefCell;
use std::rc::Rc;

use prism::{
    CameraData, CameraType, ComponentRegistry, PassInput, RecordingContext, RenderContext,
    RenderPassEvent, RenderQueue, RenderTextureDescriptor, Renderer, RendererFeature,
    RenderingData, ScriptableRenderPass, VolumeStack,
};

type Log = Rc<RefCell<Vec<String>>>;

struct NamedPass {
    name: &'static str,
    event: RenderPassEvent,
    inputs: PassInput,
    log: Log,
}

impl ScriptableRenderPass for NamedPass {
    fn name(&self) -> &str {
        self.name
    }

    fn event(&self) -> RenderPassEvent {
        self.event
    }

    fn inputs(&self) -> PassInput {
        self.inputs
    }

    fn configure(&mut self, _camera_descriptor: &RenderTextureDescriptor) {
        self.log.borrow_mut().push(format!("configure {}", self.name));
    }

    fn execute(&mut self, context: &dyn RenderContext, _data: &mut RenderingData<'_>) {
        self.log.borrow_mut().push(format!("execute {}", self.name));
        let mut cmd = context.command_buffer_pool().get(self.name);
        cmd.begin_sample(self.name);
        cmd.end_sample(self.name);
        context.execute_command_buffer(&cmd);
    }
}

struct SingleFeature {
    pass: NamedPass,
    log: Log,
}

impl SingleFeature {
    fn new(name: &'static str, event: RenderPassEvent, inputs: PassInput, log: &Log) -> Self {
        Self {
            pass: NamedPass {
                name,
                event,
                inputs,
                log: Rc::clone(log),
            },
            log: Rc::clone(log),
        }
    }
}

impl RendererFeature for SingleFeature {
    fn name(&self) -> &str {
        self.pass.name
    }

    fn create(&mut self) {
        self.log.borrow_mut().push(format!("create {}", self.pass.name));
    }

    fn setup_render_passes(&mut self, _data: &RenderingData<'_>) {
        self.log.borrow_mut().push(format!("setup {}", self.pass.name));
    }

    fn add_render_passes<'a>(&'a mut self, queue: &mut RenderQueue<'a>, _data: &RenderingData<'_>) {
        queue.enqueue(&mut self.pass);
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(format!("dispose {}", self.pass.name));
    }
}

fn frame(renderer: &mut Renderer, context: &RecordingContext) {
    let stack = VolumeStack::new(&ComponentRegistry::new());
    let camera = CameraData::new(CameraType::Game, RenderTextureDescriptor::new(64, 64));
    let mut data = RenderingData::new(camera, &stack);
    renderer.render_frame(context, &mut data);
}

#[test]
fn passes_run_in_event_order() {
    let log = Log::default();
    let mut renderer = Renderer::new()
        .with_feature(SingleFeature::new(
            "late",
            RenderPassEvent::AfterRenderingPostProcessing,
            PassInput::empty(),
            &log,
        ))
        .with_feature(SingleFeature::new(
            "early",
            RenderPassEvent::BeforeRenderingPostProcessing,
            PassInput::empty(),
            &log,
        ))
        .with_feature(SingleFeature::new(
            "tie",
            RenderPassEvent::BeforeRenderingPostProcessing,
            PassInput::empty(),
            &log,
        ));
    let context = RecordingContext::new();

    frame(&mut renderer, &context);

    assert_eq!(renderer.last_frame_passes(), ["early", "tie", "late"]);
    let names: Vec<_> = context.submissions().iter().map(|s| s.name.clone()).collect();
    assert_eq!(names, ["early", "tie", "late"]);
    assert_eq!(context.command_buffer_pool().outstanding(), 0);
}

#[test]
fn lifecycle_order_within_a_frame() {
    let log = Log::default();
    let mut renderer = Renderer::new().with_feature(SingleFeature::new(
        "only",
        RenderPassEvent::BeforeRenderingPostProcessing,
        PassInput::COLOR,
        &log,
    ));
    let context = RecordingContext::new();

    frame(&mut renderer, &context);
    frame(&mut renderer, &context);

    assert_eq!(
        *log.borrow(),
        [
            "create only",
            "setup only",
            "configure only",
            "execute only",
            "setup only",
            "configure only",
            "execute only",
        ]
    );
}

#[test]
fn declared_inputs_are_unioned() {
    let log = Log::default();
    let mut renderer = Renderer::new()
        .with_feature(SingleFeature::new(
            "color",
            RenderPassEvent::BeforeRenderingPostProcessing,
            PassInput::COLOR,
            &log,
        ))
        .with_feature(SingleFeature::new(
            "depth",
            RenderPassEvent::AfterRenderingOpaques,
            PassInput::DEPTH | PassInput::NORMAL,
            &log,
        ));
    let context = RecordingContext::new();

    frame(&mut renderer, &context);
    assert_eq!(
        renderer.last_frame_inputs(),
        PassInput::COLOR | PassInput::DEPTH | PassInput::NORMAL
    );

    assert!(renderer.set_active("depth", false));
    assert!(!renderer.set_active("missing", false));
    frame(&mut renderer, &context);
    assert_eq!(renderer.last_frame_inputs(), PassInput::COLOR);
    assert_eq!(renderer.last_frame_passes(), ["color"]);
}

#[test]
fn dispose_runs_once() {
    let log = Log::default();
    let mut renderer = Renderer::new().with_feature(SingleFeature::new(
        "only",
        RenderPassEvent::BeforeRenderingPostProcessing,
        PassInput::empty(),
        &log,
    ));
    let context = RecordingContext::new();
    frame(&mut renderer, &context);

    renderer.dispose();
    renderer.dispose();
    assert!(renderer.is_disposed());

    // Disposed renderers ignore further frames
    frame(&mut renderer, &context);
    drop(renderer);

    let log = log.borrow();
    assert_eq!(log.iter().filter(|l| *l == "dispose only").count(), 1);
    assert_eq!(log.iter().filter(|l| *l == "execute only").count(), 1);
}
