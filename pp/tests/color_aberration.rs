use std::rc::Rc;

use prism::glam::Vec3;
use prism::{
    BlitMode, CameraData, CameraType, Command, ComponentRegistry, PassInput, PropertyId,
    RecordingContext, RenderContext, RenderTargetId, RenderTextureDescriptor, Renderer,
    RenderingData, ScriptableRenderPass, Shader, Volume, VolumeManager, VolumeProfile, VolumeStack,
};
use prism_pp::{
    register_components, ColorAberration, FrameOutcome, PostProcessFeatureSettings,
    PostProcessRenderPass, PostProcessRendererFeature, SkipReason, INTENSITY_PROPERTY,
};

const INTENSITY: PropertyId = PropertyId::of(INTENSITY_PROPERTY);

fn registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    register_components(&mut registry);
    registry
}

fn stack_with(intensity: f32) -> VolumeStack {
    let mut stack = VolumeStack::new(&registry());
    stack.component_mut::<ColorAberration>().unwrap().intensity.set(intensity);
    stack
}

fn camera(camera_type: CameraType) -> CameraData {
    CameraData::new(camera_type, RenderTextureDescriptor::new(320, 180))
}

fn configured_pass() -> PostProcessRenderPass {
    let mut pass = PostProcessRenderPass::new(Some(ColorAberration::default_shader()));
    pass.setup(&camera(CameraType::Game).target_descriptor);
    pass
}

fn run(pass: &mut PostProcessRenderPass, camera: CameraData, stack: &VolumeStack) -> RecordingContext {
    let context = RecordingContext::new();
    let mut data = RenderingData::new(camera, stack);
    pass.execute(&context, &mut data);
    context
}

fn assert_balanced(commands: &[Command]) {
    let mut open = Vec::new();
    for command in commands {
        match command {
            Command::BeginSample(name) => open.push(name.clone()),
            Command::EndSample(name) => assert_eq!(open.pop().as_ref(), Some(name)),
            _ => {}
        }
    }
    assert!(open.is_empty(), "unclosed samples {:?}", open);
}

#[test]
fn active_game_camera_draws_once_with_current_value() {
    let mut pass = configured_pass();
    let context = run(&mut pass, camera(CameraType::Game), &stack_with(0.75));

    let draws = context.draw_calls();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].float(INTENSITY), Some(0.75));
    assert_eq!(draws[0].uniforms().values[0][0], 0.75);
    assert_eq!(pass.last_outcome(), Some(FrameOutcome::Executed));
}

#[test]
fn commands_are_wrapped_in_a_post_process_sample() {
    let mut pass = configured_pass();
    let context = run(&mut pass, camera(CameraType::Game), &stack_with(1.0));

    let commands = context.commands();
    assert_eq!(commands.first(), Some(&Command::BeginSample("PostProcess".into())));
    assert_eq!(commands.last(), Some(&Command::EndSample("PostProcess".into())));
    match &commands[1] {
        Command::Blit {
            source,
            destination,
            pass_index,
            ..
        } => {
            assert_eq!(*source, RenderTargetId::CAMERA_COLOR_A);
            assert_eq!(*destination, RenderTargetId::CAMERA_COLOR_B);
            assert_eq!(*pass_index, 0);
        }
        other => panic!("expected a blit, got {:?}", other),
    }
    assert_balanced(&commands);
}

#[test]
fn zero_intensity_is_inactive_but_still_profiled() {
    let mut pass = configured_pass();
    let context = run(&mut pass, camera(CameraType::Game), &stack_with(0.0));

    assert!(context.draw_calls().is_empty());
    assert_eq!(context.submissions().len(), 1);
    assert_eq!(
        context.commands(),
        [
            Command::BeginSample("PostProcess".into()),
            Command::EndSample("PostProcess".into())
        ]
    );
    assert_eq!(pass.last_outcome(), Some(FrameOutcome::Inactive));
}

#[test]
fn smallest_positive_intensity_is_active() {
    let mut pass = configured_pass();
    let context = run(&mut pass, camera(CameraType::Game), &stack_with(f32::EPSILON));
    assert_eq!(context.draw_calls().len(), 1);
}

#[test]
fn editor_cameras_never_draw() {
    for camera_type in [CameraType::SceneView, CameraType::Preview] {
        for intensity in [0.0, 0.5, 10.0] {
            let mut pass = configured_pass();
            let context = run(&mut pass, camera(camera_type), &stack_with(intensity));
            assert!(context.submissions().is_empty());
            assert_eq!(
                pass.last_outcome(),
                Some(FrameOutcome::Skipped(SkipReason::EditorCamera))
            );
        }
    }
}

#[test]
fn other_cameras_draw() {
    for camera_type in [CameraType::Game, CameraType::Vr, CameraType::Reflection] {
        let mut pass = configured_pass();
        let context = run(&mut pass, camera(camera_type), &stack_with(0.5));
        assert_eq!(context.draw_calls().len(), 1, "{:?}", camera_type);
    }
}

#[test]
fn missing_shader_never_draws() {
    let unsupported = Rc::new(Shader::from_wgsl("broken", "fn vs_main() {}"));
    for shader in [None, Some(unsupported)] {
        let mut pass = PostProcessRenderPass::new(shader);
        pass.setup(&RenderTextureDescriptor::new(8, 8));
        for camera_type in [CameraType::Game, CameraType::SceneView, CameraType::Vr] {
            let context = run(&mut pass, camera(camera_type), &stack_with(1.0));
            assert!(context.submissions().is_empty());
            assert_eq!(
                pass.last_outcome(),
                Some(FrameOutcome::Skipped(SkipReason::MissingMaterial))
            );
        }
    }
}

#[test]
fn execute_after_cleanup_draws_nothing() {
    let mut pass = configured_pass();
    pass.cleanup();
    let context = run(&mut pass, camera(CameraType::Game), &stack_with(1.0));
    assert!(context.submissions().is_empty());
    assert_eq!(
        pass.last_outcome(),
        Some(FrameOutcome::Skipped(SkipReason::Disposed))
    );
}

#[test]
fn unregistered_component_reads_as_inactive() {
    let mut pass = configured_pass();
    let stack = VolumeStack::new(&ComponentRegistry::new());
    let context = run(&mut pass, camera(CameraType::Game), &stack);
    assert!(context.draw_calls().is_empty());
    assert_eq!(pass.last_outcome(), Some(FrameOutcome::Inactive));
}

#[test]
fn setup_is_idempotent() {
    let mut once = configured_pass();
    let mut twice = configured_pass();
    twice.setup(&camera(CameraType::Game).target_descriptor);
    assert_eq!(once.descriptor(), twice.descriptor());

    let a = run(&mut once, camera(CameraType::Game), &stack_with(0.3));
    let b = run(&mut twice, camera(CameraType::Game), &stack_with(0.3));
    assert_eq!(a.draw_calls().len(), b.draw_calls().len());
    assert_eq!(
        a.draw_calls()[0].float(INTENSITY),
        b.draw_calls()[0].float(INTENSITY)
    );
}

#[test]
fn command_buffers_return_to_the_pool() {
    let context = RecordingContext::new();
    let stacks = [stack_with(0.0), stack_with(1.0)];
    let mut pass = configured_pass();
    for stack in &stacks {
        for camera_type in [CameraType::Game, CameraType::Preview] {
            let mut data = RenderingData::new(camera(camera_type), stack);
            pass.execute(&context, &mut data);
            assert_eq!(context.command_buffer_pool().outstanding(), 0);
        }
    }
    assert_eq!(context.command_buffer_pool().allocated(), 1);
    assert_balanced(&context.commands());
}

#[test]
fn temporary_target_mode_draws_once_and_restores_front() {
    let mut pass = PostProcessRenderPass::new(Some(ColorAberration::default_shader()));
    pass.setup(&RenderTextureDescriptor::new(320, 180).with_mips());

    let context = RecordingContext::new();
    let stack = stack_with(0.5);
    let mut data = RenderingData::new(camera(CameraType::Game), &stack)
        .with_blit_mode(BlitMode::TemporaryTarget);
    pass.execute(&context, &mut data);

    assert_eq!(context.draw_calls().len(), 1);
    assert_eq!(data.color.front(), RenderTargetId::CAMERA_COLOR_A);
    let temporary = context
        .commands()
        .into_iter()
        .find_map(|command| match command {
            Command::GetTemporaryRt { descriptor, .. } => Some(descriptor),
            _ => None,
        })
        .unwrap();
    assert!(!temporary.use_mip_map);
    assert!(!temporary.auto_generate_mips);
}

#[test]
fn intensity_ramp_over_ten_frames() {
    // Frame N has no aberration, frame N+10 has a volume at half weight
    let registry = registry();
    let profile = VolumeProfile::new().with(ColorAberration::with_intensity(1.0));
    let mut manager = VolumeManager::new();
    let volume = manager.add(Volume::global(profile).with_weight(0.0));

    let mut renderer = Renderer::new().with_feature(PostProcessRendererFeature::new(Some(
        ColorAberration::default_shader(),
    )));
    let context = RecordingContext::new();
    let mut stack = VolumeStack::new(&registry);

    let mut draws_per_frame = Vec::new();
    for frame in 0..=10 {
        manager.volume_mut(volume).unwrap().weight = frame as f32 * 0.05;
        manager.update(&mut stack, Vec3::ZERO);

        context.clear();
        let mut data = RenderingData::new(camera(CameraType::Game), &stack);
        renderer.render_frame(&context, &mut data);
        draws_per_frame.push(context.draw_calls());
    }

    assert!(draws_per_frame[0].is_empty());
    let last = &draws_per_frame[10];
    assert_eq!(last.len(), 1);
    let value = last[0].float(INTENSITY).unwrap();
    assert!((value - 0.5).abs() < 1e-6, "intensity was {}", value);
    assert_eq!(renderer.last_frame_inputs(), PassInput::COLOR);
}

#[test]
fn feature_lifecycle() {
    let mut renderer = Renderer::new().with_feature(PostProcessRendererFeature::new(Some(
        ColorAberration::default_shader(),
    )));
    let context = RecordingContext::new();
    let stack = stack_with(0.2);

    let mut data = RenderingData::new(camera(CameraType::Game), &stack);
    renderer.render_frame(&context, &mut data);
    assert_eq!(renderer.last_frame_passes(), ["PostProcessRenderPass"]);
    assert_eq!(context.draw_calls().len(), 1);

    renderer.dispose();
    context.clear();
    renderer.render_frame(&context, &mut data);
    assert!(context.submissions().is_empty());
}

#[test]
fn settings_without_shader_disable_the_pass() {
    let settings = PostProcessFeatureSettings::from_json_str("{}").unwrap();
    assert_eq!(settings.shader, None);

    let mut feature = PostProcessRendererFeature::from_settings(&settings).unwrap();
    prism::RendererFeature::create(&mut feature);
    assert!(!feature.render_pass().unwrap().has_material());
}

#[test]
fn settings_with_unreadable_shader_fail() {
    let settings =
        PostProcessFeatureSettings::from_json_str(r#"{ "shader": "does/not/exist.wgsl" }"#).unwrap();
    assert!(PostProcessRendererFeature::from_settings(&settings).is_err());
}
