use crate::{
    flock::perception::{competitors, find_prey, neighbours, predators},
    math_helpers::{bound_position, in_corner, normalize},
    options::Parameters,
    vector::{Position, Velocity, VelocityTag},
};

/// A single flocking entity, either a regular boid or a predator.
///
/// Boids carry no identity, two boids with the same content are equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Position,
    pub velocity: Velocity,
    // set once at construction
    is_predator: bool,
}

impl Boid {
    /// Creates a new regular [`Boid`].
    pub fn new(position: Position, velocity: Velocity) -> Self {
        Boid {
            position,
            velocity,
            is_predator: false,
        }
    }

    /// Creates a new predator [`Boid`].
    pub fn predator(position: Position, velocity: Velocity) -> Self {
        Boid {
            position,
            velocity,
            is_predator: true,
        }
    }

    pub fn is_predator(&self) -> bool {
        self.is_predator
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Sum of position differences towards `others`, scaled by `-factor`.
    ///
    /// `self` may be among `others`, its own term is the null vector.
    fn repel(&self, others: &[&Boid], factor: f64) -> Velocity {
        let sum: Position = others.iter().map(|o| o.position - self.position).sum();
        (sum * -factor).retag()
    }

    /// Predators keep away from competitors. Regular boids keep away from
    /// close neighbours and, more strongly, from predators in sight.
    pub fn separation(&self, flock: &[Boid], pars: &Parameters) -> Velocity {
        if !pars.rules().separation_on {
            return Velocity::ZERO;
        }

        if self.is_predator {
            let comps = competitors(self, flock, pars.angle(), pars.d_s());
            self.repel(&comps, pars.s())
        } else {
            let close = neighbours(self, flock, pars.angle(), pars.d_s());
            let preds = predators(self, flock, pars.angle(), pars.d_s_pred());
            self.repel(&close, pars.s()) + self.repel(&preds, pars.s_pred())
        }
    }

    /// Steers a regular boid towards the mean velocity of its neighbours.
    pub fn alignment(&self, flock: &[Boid], pars: &Parameters) -> Velocity {
        if !pars.rules().alignment_on {
            return Velocity::ZERO;
        }

        let nbrs = neighbours(self, flock, pars.angle(), pars.d());
        // the boid itself is always among its neighbours
        let k = nbrs.len();
        if k <= 1 {
            return Velocity::ZERO;
        }

        // equal to (mean of the others' velocities - own velocity) * a, without
        // having to take the boid out of nbrs
        let sum: Velocity = nbrs.iter().map(|o| o.velocity - self.velocity).sum();
        sum * (pars.a() / (k - 1) as f64)
    }

    /// Steers a regular boid towards the centre of mass of its neighbours.
    pub fn cohesion(&self, flock: &[Boid], pars: &Parameters) -> Velocity {
        if !pars.rules().cohesion_on {
            return Velocity::ZERO;
        }

        let nbrs = neighbours(self, flock, pars.angle(), pars.d());
        let k = nbrs.len();
        if k <= 1 {
            return Velocity::ZERO;
        }

        let sum: Position = nbrs.iter().map(|o| o.position - self.position).sum();
        (sum * (pars.c() / (k - 1) as f64)).retag()
    }

    /// Steers a predator towards where its nearest visible prey is heading.
    pub fn seek(&self, flock: &[Boid], pars: &Parameters) -> Velocity {
        if !pars.rules().seek_on {
            return Velocity::ZERO;
        }

        let prey = find_prey(self, flock, pars.angle());
        if prey.is_predator() {
            // nobody in sight, find_prey handed back the predator itself
            return Velocity::ZERO;
        }
        if in_corner(&prey.position, pars.bounds()) {
            return Velocity::ZERO;
        }

        let pos_diff = prey.position - self.position;
        // look ahead by one step of the prey
        let look_ahead = pos_diff.retag::<VelocityTag>() + prey.velocity;
        let magnitude = pos_diff.norm() * (self.speed() / pars.max_speed());
        if look_ahead.norm() == 0. || magnitude == 0. {
            return Velocity::ZERO;
        }

        look_ahead / look_ahead.norm() * magnitude
    }

    /// Velocity delta from all rules that apply to this kind of boid.
    pub fn steering(&self, flock: &[Boid], pars: &Parameters) -> Velocity {
        if self.is_predator {
            self.separation(flock, pars) + self.seek(flock, pars)
        } else {
            self.separation(flock, pars) + self.alignment(flock, pars) + self.cohesion(flock, pars)
        }
    }

    /// Computes this boid's next state against the snapshot `flock`.
    ///
    /// The position moves with the old velocity, the new velocity is then
    /// kept inside the world and within the speed limits.
    pub fn solve(&self, flock: &[Boid], pars: &Parameters, dt: f64) -> Boid {
        assert!(dt > 0., "time step must be positive, got {dt}");

        let mut next = Boid {
            position: self.position.advanced(self.velocity, dt),
            velocity: self.velocity + self.steering(flock, pars),
            is_predator: self.is_predator,
        };

        next.velocity = bound_position(&next, pars.bounds());
        next.velocity = normalize(next.velocity, pars.min_speed(), pars.max_speed());
        next
    }
}
