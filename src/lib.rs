#![cfg_attr(not(test), no_std)]

//! Motion core for a two-motor (CoreXY) pen plotter. Everything in here is
//! hardware-agnostic: pins, PWM and delays come in through `embedded-hal`
//! traits, so the whole crate runs under host tests. The `pico` crate wires
//! it to an RP2040.

pub mod config;
pub mod controller;
pub mod gcode;
pub mod homing;
pub mod kinematics;
pub mod line;
pub mod motion;
pub mod pen;
pub mod stepper;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::Config;
pub use controller::{Plotter, Position};
