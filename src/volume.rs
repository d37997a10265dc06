//! Per-camera effect parameters blended from authored volumes.
//!
//! A [`VolumeProfile`] holds authored [`VolumeComponent`]s. [`Volume`]s place
//! profiles in the scene, and the [`VolumeManager`] blends them into a
//! [`VolumeStack`] for a camera position once per frame. Passes only read the
//! stack.

mod component;
pub use component::*;

mod manager;
pub use manager::*;

mod parameter;
pub use parameter::*;

mod profile;
pub use profile::*;

mod stack;
pub use stack::*;
