//! Runs the color aberration pass on a headless device over a gradient and
//! prints a few texels before and after.

use prism::glam::Vec3;
use prism::prelude::*;
use prism::{BoxError, RenderTargetId};
use prism_pp::{register_components, ColorAberration, PostProcessRendererFeature};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;

fn gradient() -> Vec<u8> {
    (0..HEIGHT)
        .flat_map(|y| {
            (0..WIDTH).flat_map(move |x| {
                let r = (x * 255 / (WIDTH - 1)) as u8;
                let b = (y * 255 / (HEIGHT - 1)) as u8;
                [r, 128, b, 255]
            })
        })
        .collect()
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt::init();

    let gpu = prism::Gpu::builder().with_profiler().build_headless()?;
    let camera = RenderTextureDescriptor::new(WIDTH, HEIGHT);
    let context = GpuContext::new(gpu.clone(), camera);
    context.write_target(RenderTargetId::CAMERA_COLOR_A, &gradient());

    let mut registry = ComponentRegistry::new();
    register_components(&mut registry);
    let profile = VolumeProfile::new().with(ColorAberration::with_intensity(8.0));
    let mut volumes = VolumeManager::new();
    volumes.add(Volume::global(profile));
    let mut stack = VolumeStack::new(&registry);
    volumes.update(&mut stack, Vec3::ZERO);

    let mut renderer = Renderer::new().with_feature(PostProcessRendererFeature::new(Some(
        ColorAberration::default_shader(),
    )));
    let mut data = RenderingData::new(CameraData::new(CameraType::Game, camera), &stack);
    renderer.render_frame(&context, &mut data);

    let front = data.color.front();
    let before = context.read_target(RenderTargetId::CAMERA_COLOR_A)?;
    let after = context.read_target(front)?;
    if let (Some(before), Some(after)) = (before, after) {
        for x in [0, WIDTH / 2, WIDTH - 1] {
            let i = ((HEIGHT / 4 * WIDTH + x) * 4) as usize;
            println!(
                "texel ({}, {}): {:?} -> {:?}",
                x,
                HEIGHT / 4,
                &before[i..i + 4],
                &after[i..i + 4]
            );
        }
    }

    for marker in gpu.timestamp_report() {
        println!("{}: {:.3} ms", marker.label, marker.duration);
    }
    Ok(())
}
