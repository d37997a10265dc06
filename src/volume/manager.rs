use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{VolumeProfile, VolumeStack};

/// Axis-aligned box in world space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    /// Distance from `point` to the box. Zero inside.
    pub fn distance(&self, point: Vec3) -> f32 {
        let outside = (self.min - point).max(point - self.max).max(Vec3::ZERO);
        outside.length()
    }
}

/// Where a volume applies.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VolumeMode {
    /// Everywhere, at the volume's weight.
    Global,
    /// Inside `bounds`, fading out over `blend_distance` around them.
    Local { bounds: Aabb, blend_distance: f32 },
}

/// A profile placed in the scene.
#[derive(Clone, Debug)]
pub struct Volume {
    pub profile: VolumeProfile,
    pub weight: f32,
    /// Higher priorities blend later and win.
    pub priority: f32,
    pub mode: VolumeMode,
    pub enabled: bool,
}

impl Volume {
    #[must_use]
    pub fn global(profile: VolumeProfile) -> Self {
        Self {
            profile,
            weight: 1.0,
            priority: 0.0,
            mode: VolumeMode::Global,
            enabled: true,
        }
    }

    #[must_use]
    pub fn local(profile: VolumeProfile, bounds: Aabb, blend_distance: f32) -> Self {
        Self {
            mode: VolumeMode::Local {
                bounds,
                blend_distance,
            },
            ..Self::global(profile)
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// How strongly this volume applies at `position`, in `[0, 1]`.
    pub fn blend_factor(&self, position: Vec3) -> f32 {
        if !self.enabled || self.weight.is_nan() {
            return 0.0;
        }
        let factor = match self.mode {
            VolumeMode::Global => self.weight,
            VolumeMode::Local {
                bounds,
                blend_distance,
            } => {
                let distance = bounds.distance(position);
                if distance <= 0.0 {
                    self.weight
                } else if distance < blend_distance {
                    self.weight * (1.0 - distance / blend_distance)
                } else {
                    0.0
                }
            }
        };
        factor.clamp(0.0, 1.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(usize);

/// Owns the scene's volumes and blends them for a camera.
#[derive(Clone, Debug, Default)]
pub struct VolumeManager {
    volumes: Vec<Option<Volume>>,
}

impl VolumeManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, volume: Volume) -> VolumeId {
        self.volumes.push(Some(volume));
        VolumeId(self.volumes.len() - 1)
    }

    pub fn volume(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.get(id.0).and_then(Option::as_ref)
    }

    pub fn volume_mut(&mut self, id: VolumeId) -> Option<&mut Volume> {
        self.volumes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: VolumeId) -> Option<Volume> {
        self.volumes.get_mut(id.0).and_then(Option::take)
    }

    pub fn len(&self) -> usize {
        self.volumes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resets `stack`, then blends every volume that reaches `position` in
    /// ascending priority. Volumes with equal priority blend in the order
    /// they were added.
    pub fn update(&self, stack: &mut VolumeStack, position: Vec3) {
        stack.reset();

        let mut volumes: Vec<&Volume> = self.volumes.iter().flatten().collect();
        volumes.sort_by(|a, b| a.priority.total_cmp(&b.priority));

        for volume in volumes {
            let t = volume.blend_factor(position);
            if t <= 0.0 {
                continue;
            }
            trace!("blending volume at priority {} by {}", volume.priority, t);
            stack.blend(&volume.profile, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn distance_is_zero_inside() {
        assert_eq!(unit_box().distance(Vec3::ZERO), 0.0);
        assert_eq!(unit_box().distance(Vec3::new(3.0, 0.0, 0.0)), 2.0);
    }

    #[test]
    fn local_volumes_fade_over_blend_distance() {
        let volume = Volume::local(VolumeProfile::new(), unit_box(), 4.0);
        assert_eq!(volume.blend_factor(Vec3::ZERO), 1.0);
        assert_eq!(volume.blend_factor(Vec3::new(3.0, 0.0, 0.0)), 0.5);
        assert_eq!(volume.blend_factor(Vec3::new(5.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn weight_is_clamped_and_disabled_volumes_do_nothing() {
        let mut volume = Volume::global(VolumeProfile::new()).with_weight(3.0);
        assert_eq!(volume.blend_factor(Vec3::ZERO), 1.0);
        volume.weight = -1.0;
        assert_eq!(volume.blend_factor(Vec3::ZERO), 0.0);
        volume.weight = 1.0;
        volume.enabled = false;
        assert_eq!(volume.blend_factor(Vec3::ZERO), 0.0);
    }

    #[test]
    fn removed_ids_stay_empty() {
        let mut manager = VolumeManager::new();
        let a = manager.add(Volume::global(VolumeProfile::new()));
        let b = manager.add(Volume::global(VolumeProfile::new()));
        assert!(manager.remove(a).is_some());
        assert!(manager.volume(a).is_none());
        assert!(manager.volume(b).is_some());
        assert_eq!(manager.len(), 1);
    }
}
