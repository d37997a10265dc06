//! Post processing effects for prism.
//!
//! The only effect so far is [`ColorAberration`], which splits the red and
//! blue channels of the camera color away from the screen center.
//! Register its component with [`register_components`] and add a
//! [`PostProcessRendererFeature`] to the renderer.

pub mod color_aberration;
pub use color_aberration::*;

use prism::ComponentRegistry;

/// Registers every volume component this crate defines.
pub fn register_components(registry: &mut ComponentRegistry) {
    registry.register::<ColorAberration>();
}
