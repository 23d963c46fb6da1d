use std::f64::consts::SQRT_2;

use rand::Rng;
use tracing::{debug, info, trace};

use crate::{
    birdwatcher::Birdwatcher,
    boid::Boid,
    math_helpers::normalize,
    options::Parameters,
    vector::{Position, Velocity},
};

pub mod perception;

/// An immutable copy of the flock at one instant.
pub type Snapshot = Vec<Boid>;

/// The ordered population of boids, advanced one generation at a time.
///
/// A flock always holds more than one boid.
#[derive(Debug, Clone, PartialEq)]
pub struct Flock {
    boids: Vec<Boid>,
}

impl Flock {
    pub fn new(boids: Vec<Boid>) -> Self {
        assert!(
            boids.len() > 1,
            "a flock needs more than one boid, got {}",
            boids.len()
        );

        Flock { boids }
    }

    /// A flock of `pars.no_boids()` regular boids scattered over the world.
    pub fn populated<R: Rng + ?Sized>(pars: &Parameters, rng: &mut R) -> Self {
        let mut boids = Vec::with_capacity(pars.no_boids() as usize);
        populate(&mut boids, pars.no_boids() as usize, pars, rng);
        Flock::new(boids)
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn state(&self) -> &[Boid] {
        &self.boids
    }

    pub fn predator_count(&self) -> usize {
        self.boids.iter().filter(|b| b.is_predator()).count()
    }

    /// Appends a boid in between two evolutions.
    pub fn push_back(&mut self, boid: Boid) {
        assert!(!self.is_empty(), "can't add to an empty flock");
        self.boids.push(boid);
    }

    /// Appends a predator at `position` heading in a random direction.
    pub fn spawn_predator<R: Rng + ?Sized>(
        &mut self,
        position: Position,
        pars: &Parameters,
        rng: &mut R,
    ) -> &Boid {
        let velocity = normalize(random_velocity(pars, rng), pars.min_speed(), pars.max_speed());
        self.push_back(Boid::predator(position, velocity));

        info!(
            x = position.x(),
            y = position.y(),
            predators = self.predator_count(),
            "spawned predator"
        );
        &self.boids[self.boids.len() - 1]
    }

    /// Advances every boid by one batch time step, `duration / steps`.
    pub fn evolve(&mut self, pars: &Parameters) {
        self.evolve_with_dt(pars, pars.dt())
    }

    /// Advances every boid by `dt`, e.g. the duration of a rendered frame.
    ///
    /// All boids are solved against the same snapshot, the population is
    /// replaced only once all of them are done.
    pub fn evolve_with_dt(&mut self, pars: &Parameters, dt: f64) {
        assert!(self.len() > 1, "a flock needs more than one boid");

        let next: Vec<Boid> = self
            .boids
            .iter()
            .map(|boid| boid.solve(&self.boids, pars, dt))
            .collect();

        assert_eq!(self.boids.len(), next.len(), "evolution lost boids");
        assert!(
            self.boids
                .iter()
                .zip(next.iter())
                .all(|(before, after)| before.is_predator() == after.is_predator()),
            "evolution changed the kind of a boid"
        );

        trace!(boids = next.len(), dt, "evolved flock");
        self.boids = next;
    }

    /// Evolves the flock `pars.steps()` times, recording a snapshot every
    /// `pars.prescale()` steps, starting with the initial state.
    pub fn run(&mut self, pars: &Parameters) -> Vec<Snapshot> {
        let mut bird_watcher = Birdwatcher::new(pars.prescale() as u64);
        self.run_watched(pars, &mut bird_watcher);
        bird_watcher.pop_data()
    }

    /// Evolves the flock `pars.steps()` times, letting `bird_watcher` look at
    /// it before every evolution.
    pub fn run_watched(&mut self, pars: &Parameters, bird_watcher: &mut Birdwatcher) {
        debug!(
            steps = pars.steps(),
            prescale = pars.prescale(),
            boids = self.len(),
            "starting run"
        );

        (0..pars.steps()).for_each(|_| {
            bird_watcher.watch(self);
            self.evolve(pars);
        });

        debug!(snapshots = bird_watcher.snapshots().len(), "run complete");
    }
}

/// A velocity drawn uniformly from the square inscribed in the circle of
/// radius `max_speed`. Not normalized.
pub fn random_velocity<R: Rng + ?Sized>(pars: &Parameters, rng: &mut R) -> Velocity {
    let v_lim = pars.max_speed() / SQRT_2;
    Velocity::new(rng.gen_range(-v_lim..v_lim), rng.gen_range(-v_lim..v_lim))
}

/// Fills the empty `boids` with `count` regular boids placed uniformly over
/// the world, with speeds brought within limits.
pub fn populate<R: Rng + ?Sized>(
    boids: &mut Vec<Boid>,
    count: usize,
    pars: &Parameters,
    rng: &mut R,
) {
    assert!(boids.is_empty(), "expected an empty vector to fill with boids");
    assert!(count > 1, "a flock needs more than one boid, got {count}");

    let bounds = pars.bounds();
    boids.extend((0..count).map(|_| {
        let position = Position::new(
            rng.gen_range(bounds.x_min..bounds.x_max),
            rng.gen_range(bounds.y_min..bounds.y_max),
        );
        Boid::new(position, random_velocity(pars, rng))
    }));

    // the square above does not keep speeds within limits by itself
    boids
        .iter_mut()
        .for_each(|b| b.velocity = normalize(b.velocity, pars.min_speed(), pars.max_speed()));

    debug!(boids = boids.len(), "populated flock");
}
