use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{RenderTargetId, RenderTextureDescriptor, VolumeStack};

/// What a camera renders for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraType {
    Game,
    SceneView,
    Preview,
    Vr,
    Reflection,
}

impl CameraType {
    /// Editor scene views and asset previews never receive output-only effects.
    pub const fn is_editor_only(self) -> bool {
        matches!(self, Self::SceneView | Self::Preview)
    }
}

impl Default for CameraType {
    fn default() -> Self {
        Self::Game
    }
}

/// Per-camera state for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraData {
    pub camera_type: CameraType,
    pub target_descriptor: RenderTextureDescriptor,
    pub position: Vec3,
}

impl CameraData {
    #[must_use]
    pub fn new(camera_type: CameraType, target_descriptor: RenderTextureDescriptor) -> Self {
        Self {
            camera_type,
            target_descriptor,
            position: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

/// How a blit gets its destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlitMode {
    /// Render from the front buffer into the back buffer, then swap them.
    SwapBuffer,
    /// Render into a temporary target, then copy back into the front buffer.
    TemporaryTarget,
}

impl Default for BlitMode {
    fn default() -> Self {
        Self::SwapBuffer
    }
}

/// The camera color double buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraColorTargets {
    front: RenderTargetId,
    back: RenderTargetId,
    mode: BlitMode,
    next_temporary: u32,
}

impl CameraColorTargets {
    #[must_use]
    pub const fn new(mode: BlitMode) -> Self {
        Self {
            front: RenderTargetId::CAMERA_COLOR_A,
            back: RenderTargetId::CAMERA_COLOR_B,
            mode,
            next_temporary: 0,
        }
    }

    /// The buffer holding the current frame's color.
    pub const fn front(&self) -> RenderTargetId {
        self.front
    }

    pub const fn back(&self) -> RenderTargetId {
        self.back
    }

    pub const fn mode(&self) -> BlitMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BlitMode) {
        self.mode = mode;
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }

    pub(crate) fn allocate_temporary(&mut self) -> RenderTargetId {
        let id = RenderTargetId::temporary(self.next_temporary);
        self.next_temporary += 1;
        id
    }
}

impl Default for CameraColorTargets {
    fn default() -> Self {
        Self::new(BlitMode::default())
    }
}

/// Everything a pass sees while it executes.
/// Valid for a single frame.
pub struct RenderingData<'a> {
    pub camera: CameraData,
    pub color: CameraColorTargets,
    /// The parameters blended for this camera.
    pub volume_stack: &'a VolumeStack,
}

impl<'a> RenderingData<'a> {
    #[must_use]
    pub fn new(camera: CameraData, volume_stack: &'a VolumeStack) -> Self {
        Self {
            camera,
            color: CameraColorTargets::default(),
            volume_stack,
        }
    }

    #[must_use]
    pub fn with_blit_mode(mut self, mode: BlitMode) -> Self {
        self.color.set_mode(mode);
        self
    }
}
