use crate::coords::Vec2;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining life in seconds.
    pub energy: f32,
}

/// Particle pool double buffered in two flat arrays.
///
/// `update` reads the current array and writes survivors into the other one,
/// then the two swap roles. Neither array reallocates once warmed up.
#[derive(Debug)]
pub struct ParticleSystemTwoArrays {
    current: Vec<Particle>,
    next: Vec<Particle>,
    capacity: usize,
    gravity: Vec2,
}

impl ParticleSystemTwoArrays {
    pub fn new(capacity: usize) -> Self {
        Self {
            current: Vec::with_capacity(capacity),
            next: Vec::with_capacity(capacity),
            capacity,
            gravity: Vec2::zero(),
        }
    }

    /// Acceleration applied to every particle, in px/s².
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.current.len()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.current
    }

    /// Adds a particle; `false` if the pool is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.current.len() >= self.capacity {
            return false;
        }
        self.current.push(particle);
        true
    }

    /// Advances every particle by `dt` seconds.
    ///
    /// Particles whose energy drops below zero are removed; the live count
    /// never grows here.
    pub fn update(&mut self, dt: f32) {
        self.next.clear();
        let gravity = self.gravity * dt;
        for p in &self.current {
            let energy = p.energy - dt;
            if energy < 0.0 {
                continue;
            }
            let velocity = p.velocity + gravity;
            self.next.push(Particle {
                position: p.position + velocity * dt,
                velocity,
                energy,
            });
        }
        std::mem::swap(&mut self.current, &mut self.next);
    }

    pub fn clear(&mut self) {
        self.current.clear();
    }

    /// Writes each particle's top-left for a `size` sprite centered on it.
    pub fn sprite_positions(&self, size: Vec2, out: &mut Vec<Vec2>) {
        out.clear();
        let half = size * 0.5;
        out.extend(self.current.iter().map(|p| p.position - half));
    }
}
