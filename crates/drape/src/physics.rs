//! Point-mass physics backend.
//!
//! The cloth only talks to [`PhysicsBackend`]; [`ParticleWorld`] is the
//! default implementation, a position-based solver for point masses joined
//! by distance constraints. Zero-mass particles are static, sleeping
//! particles neither integrate nor yield to constraints.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleDesc {
    pub position: Vec3,
    /// Zero makes the particle static.
    pub mass: f32,
    pub linear_damping: f32,
}

impl ParticleDesc {
    pub fn fixed(position: Vec3) -> Self {
        Self {
            position,
            mass: 0.0,
            linear_damping: 0.0,
        }
    }
}

pub trait PhysicsBackend {
    fn add_particle(&mut self, desc: ParticleDesc) -> ParticleHandle;
    /// Joins two particles at their current distance.
    fn add_constraint(&mut self, a: ParticleHandle, b: ParticleHandle) -> ConstraintHandle;
    fn particle_count(&self) -> usize;
    fn constraint_count(&self) -> usize;

    fn step(&mut self, dt: f32);
    /// Force for the next step only; cleared once the step consumes it.
    fn apply_force(&mut self, particle: ParticleHandle, force: Vec3);

    fn sleep(&mut self, particle: ParticleHandle);
    fn wake(&mut self, particle: ParticleHandle);
    fn is_sleeping(&self, particle: ParticleHandle) -> bool;

    fn position(&self, particle: ParticleHandle) -> Vec3;
    fn set_position(&mut self, particle: ParticleHandle, position: Vec3);
    fn velocity(&self, particle: ParticleHandle) -> Vec3;
    fn set_velocity(&mut self, particle: ParticleHandle, velocity: Vec3);

    fn gravity(&self) -> Vec3;
    fn set_gravity(&mut self, gravity: Vec3);
}

#[derive(Debug, Clone)]
struct Particle {
    position: Vec3,
    velocity: Vec3,
    force: Vec3,
    inv_mass: f32,
    linear_damping: f32,
    sleeping: bool,
}

impl Particle {
    fn solver_inv_mass(&self) -> f32 {
        if self.sleeping { 0.0 } else { self.inv_mass }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceConstraint {
    pub a: ParticleHandle,
    pub b: ParticleHandle,
    pub rest_length: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleWorld {
    particles: Vec<Particle>,
    constraints: Vec<DistanceConstraint>,
    gravity: Vec3,
    iterations: usize,
    predicted: Vec<Vec3>,
}

impl ParticleWorld {
    pub fn new(iterations: usize) -> Self {
        Self {
            particles: Vec::new(),
            constraints: Vec::new(),
            gravity: Vec3::ZERO,
            iterations: iterations.max(1),
            predicted: Vec::new(),
        }
    }

    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn mass(&self, particle: ParticleHandle) -> f32 {
        let inv = self.particles[particle.0].inv_mass;
        if inv == 0.0 { 0.0 } else { 1.0 / inv }
    }

    fn solve_constraints(&mut self) {
        for _ in 0..self.iterations {
            for c in &self.constraints {
                let wa = self.particles[c.a.0].solver_inv_mass();
                let wb = self.particles[c.b.0].solver_inv_mass();
                let w = wa + wb;
                if w == 0.0 {
                    continue;
                }
                let delta = self.predicted[c.b.0] - self.predicted[c.a.0];
                let len = delta.length();
                if len <= f32::EPSILON {
                    continue;
                }
                let correction = delta * ((len - c.rest_length) / (len * w));
                self.predicted[c.a.0] += correction * wa;
                self.predicted[c.b.0] -= correction * wb;
            }
        }
    }
}

impl Default for ParticleWorld {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PhysicsBackend for ParticleWorld {
    fn add_particle(&mut self, desc: ParticleDesc) -> ParticleHandle {
        let inv_mass = if desc.mass > 0.0 { 1.0 / desc.mass } else { 0.0 };
        self.particles.push(Particle {
            position: desc.position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            inv_mass,
            linear_damping: desc.linear_damping.clamp(0.0, 1.0),
            sleeping: false,
        });
        ParticleHandle(self.particles.len() - 1)
    }

    fn add_constraint(&mut self, a: ParticleHandle, b: ParticleHandle) -> ConstraintHandle {
        let rest_length = self.particles[a.0]
            .position
            .distance(self.particles[b.0].position);
        self.constraints.push(DistanceConstraint { a, b, rest_length });
        ConstraintHandle(self.constraints.len() - 1)
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.predicted.clear();
        for p in &mut self.particles {
            if p.inv_mass > 0.0 && !p.sleeping {
                p.velocity += (self.gravity + p.force * p.inv_mass) * dt;
                p.velocity *= (1.0 - p.linear_damping).powf(dt);
            }
            p.force = Vec3::ZERO;
            let moves = p.inv_mass > 0.0 && !p.sleeping;
            self.predicted
                .push(if moves { p.position + p.velocity * dt } else { p.position });
        }

        self.solve_constraints();

        for (p, predicted) in self.particles.iter_mut().zip(&self.predicted) {
            if p.inv_mass > 0.0 && !p.sleeping {
                p.velocity = (*predicted - p.position) / dt;
                p.position = *predicted;
            }
        }
    }

    fn apply_force(&mut self, particle: ParticleHandle, force: Vec3) {
        self.particles[particle.0].force += force;
    }

    fn sleep(&mut self, particle: ParticleHandle) {
        let p = &mut self.particles[particle.0];
        p.sleeping = true;
        p.velocity = Vec3::ZERO;
        p.force = Vec3::ZERO;
    }

    fn wake(&mut self, particle: ParticleHandle) {
        self.particles[particle.0].sleeping = false;
    }

    fn is_sleeping(&self, particle: ParticleHandle) -> bool {
        self.particles[particle.0].sleeping
    }

    fn position(&self, particle: ParticleHandle) -> Vec3 {
        self.particles[particle.0].position
    }

    fn set_position(&mut self, particle: ParticleHandle, position: Vec3) {
        self.particles[particle.0].position = position;
    }

    fn velocity(&self, particle: ParticleHandle) -> Vec3 {
        self.particles[particle.0].velocity
    }

    fn set_velocity(&mut self, particle: ParticleHandle, velocity: Vec3) {
        self.particles[particle.0].velocity = velocity;
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }
}
