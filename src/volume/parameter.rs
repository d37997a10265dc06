use serde::{Deserialize, Serialize};

/// A float that never drops below its minimum.
///
/// Only parameters marked as overridden in a profile take part in blending;
/// the rest keep the stack's value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "MinFloatData")]
pub struct MinFloatParameter {
    value: f32,
    /// Fixed by the component, never authored.
    #[serde(skip)]
    min: f32,
    overridden: bool,
}

#[derive(Deserialize)]
struct MinFloatData {
    value: f32,
    #[serde(default)]
    overridden: bool,
}

/// Loaded values clamp against the default minimum.
impl From<MinFloatData> for MinFloatParameter {
    fn from(data: MinFloatData) -> Self {
        let mut parameter = Self::default();
        parameter.set(data.value);
        parameter.overridden = data.overridden;
        parameter
    }
}

impl MinFloatParameter {
    #[must_use]
    pub fn new(value: f32, min: f32) -> Self {
        let mut parameter = Self {
            value: min,
            min,
            overridden: false,
        };
        parameter.set(value);
        parameter
    }

    /// Sets the value and marks it as overridden.
    #[must_use]
    pub fn overriding(mut self, value: f32) -> Self {
        self.set(value);
        self.overridden = true;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    pub fn set_overridden(&mut self, overridden: bool) {
        self.overridden = overridden;
    }

    /// NaN clamps to the minimum.
    pub fn set(&mut self, value: f32) {
        self.value = value.max(self.min);
    }

    /// Linear interpolation from `from` to `to`, clamped to the minimum.
    /// Lands exactly on `to` at `t = 1`.
    pub fn interp(&mut self, from: f32, to: f32, t: f32) {
        self.set(from * (1.0 - t) + to * t);
    }

    /// Moves this value toward `target` by `t` when the target is overridden.
    pub fn blend(&mut self, target: &Self, t: f32) {
        if target.overridden {
            self.interp(self.value, target.value, t);
        }
    }
}

/// Zero, with a minimum of zero.
impl Default for MinFloatParameter {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
