//! Curves engine crate.
//!
//! Owns the platform + GPU runtime pieces the demo is built on: window and
//! event loop, input translation, wgpu device/surface/depth management and
//! logger setup. The point-capture core lives in the `curves` crate and only
//! touches this one through `core::App` and the device handles.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
