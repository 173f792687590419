use crate::geometry::Vec2;
use crate::settings::{
    PARTICLE_AREA_PER_PARTICLE, PARTICLE_CONNECTION_RADIUS, PARTICLE_HUE_JITTER,
    PARTICLE_MAX_POPULATION, PARTICLE_VELOCITY_SPAN,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub size: f64,
    pub velocity: Vec2,
    pub hue: f64,
}

impl Particle {
    /// `random` yields samples in `[0, 1)`.
    pub fn spawn(width: f64, height: f64, base_hue: f64, random: &mut impl FnMut() -> f64) -> Self {
        Self {
            position: Vec2::new(random() * width, random() * height),
            size: random() * 2.0 + 0.5,
            velocity: Vec2::new(
                (random() - 0.5) * PARTICLE_VELOCITY_SPAN,
                (random() - 0.5) * PARTICLE_VELOCITY_SPAN,
            ),
            hue: base_hue + random() * PARTICLE_HUE_JITTER * 2.0 - PARTICLE_HUE_JITTER,
        }
    }

    /// Integrates one frame, then points the velocity back inside on any axis
    /// that left `[0, extent]`.
    pub fn step(&mut self, width: f64, height: f64) {
        self.position = self.position + self.velocity;
        self.velocity.x = reflect(self.position.x, self.velocity.x, width);
        self.velocity.y = reflect(self.position.y, self.velocity.y, height);
    }

    pub fn fill_style(&self) -> String {
        format!("hsla({:.1}, 80%, 60%, 0.8)", self.hue)
    }
}

fn reflect(position: f64, velocity: f64, extent: f64) -> f64 {
    if position < 0.0 {
        velocity.abs()
    } else if position > extent {
        -velocity.abs()
    } else {
        velocity
    }
}

pub fn population_for(width: f64, height: f64) -> usize {
    let area = (width.max(0.0) * height.max(0.0) / PARTICLE_AREA_PER_PARTICLE).floor();
    (area as usize).min(PARTICLE_MAX_POPULATION)
}

/// Stroke alpha for a pair at `distance`, or `None` when it is outside the
/// connection radius.
pub fn connection_alpha(distance: f64) -> Option<f64> {
    (distance < PARTICLE_CONNECTION_RADIUS).then(|| 1.0 - distance / PARTICLE_CONNECTION_RADIUS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f64,
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    width: f64,
    height: f64,
    base_hue: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64, base_hue: f64, random: &mut impl FnMut() -> f64) -> Self {
        let particles = (0..population_for(width, height))
            .map(|_| Particle::spawn(width, height, base_hue, random))
            .collect();

        Self {
            width,
            height,
            base_hue,
            particles,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Applies new extents. Existing particles keep their positions and
    /// velocities; the population is trimmed or topped up to the new bound.
    pub fn resize(&mut self, width: f64, height: f64, random: &mut impl FnMut() -> f64) {
        self.width = width;
        self.height = height;

        let population = population_for(width, height);
        if population < self.particles.len() {
            self.particles.truncate(population);
        } else {
            while self.particles.len() < population {
                self.particles
                    .push(Particle::spawn(width, height, self.base_hue, random));
            }
        }
    }

    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.step(self.width, self.height);
        }
    }

    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.particles.iter().enumerate().flat_map(move |(index, first)| {
            self.particles[index + 1..].iter().filter_map(move |second| {
                let distance = (first.position - second.position).length();
                connection_alpha(distance).map(|alpha| Connection {
                    from: first.position,
                    to: second.position,
                    alpha,
                })
            })
        })
    }

    pub fn stroke_style(&self, alpha: f64) -> String {
        format!("hsla({}, 80%, 60%, {:.3})", self.base_hue, alpha)
    }
}
