//! CPU particles in a ping-pong pair of flat arrays.

mod emitter;
mod two_arrays;

pub use emitter::{BoxEmitter, XorShift32};
pub use two_arrays::{Particle, ParticleSystemTwoArrays};
