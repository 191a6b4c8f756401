use crate::coords::{Rect, Vec2};

use super::two_arrays::{Particle, ParticleSystemTwoArrays};

/// Small deterministic PRNG (xorshift32).
#[derive(Debug, Clone)]
pub struct XorShift32(u32);

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // zero is a fixed point of xorshift
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// Spawns particles at random points inside a box.
#[derive(Debug, Clone)]
pub struct BoxEmitter {
    pub area: Rect,
    pub particles_per_second: f32,
    /// Velocity is picked per axis between these two.
    pub velocity_min: Vec2,
    pub velocity_max: Vec2,
    /// Energy (life in seconds) range.
    pub energy: (f32, f32),
    carry: f32,
    rng: XorShift32,
}

impl BoxEmitter {
    pub fn new(area: Rect, particles_per_second: f32, seed: u32) -> Self {
        Self {
            area,
            particles_per_second,
            velocity_min: Vec2::new(-20.0, -20.0),
            velocity_max: Vec2::new(20.0, 20.0),
            energy: (1.0, 2.0),
            carry: 0.0,
            rng: XorShift32::new(seed),
        }
    }

    /// Emits the particles due after `dt` seconds. Fractional particles carry
    /// over to the next call; particles that do not fit are discarded.
    /// Returns how many were spawned.
    pub fn emit(&mut self, dt: f32, system: &mut ParticleSystemTwoArrays) -> usize {
        self.carry += self.particles_per_second.max(0.0) * dt.max(0.0);
        let due = self.carry.floor();
        self.carry -= due;

        let count = (due as usize).min(system.remaining());
        for _ in 0..count {
            let particle = Particle {
                position: Vec2::new(
                    self.rng.range(self.area.left, self.area.right),
                    self.rng.range(self.area.top, self.area.bottom),
                ),
                velocity: Vec2::new(
                    self.rng.range(self.velocity_min.x, self.velocity_max.x),
                    self.rng.range(self.velocity_min.y, self.velocity_max.y),
                ),
                energy: self.rng.range(self.energy.0, self.energy.1),
            };
            system.spawn(particle);
        }
        count
    }
}
