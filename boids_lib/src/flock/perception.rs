//! All-pairs perception queries over a snapshot of the flock.
//!
//! Every query scans the whole snapshot, O(N) per boid and O(N^2) per step.
//! The observer is kept in the results whenever it passes its own filter:
//! its position and velocity differences against itself are null vectors,
//! so they leave every sum built from these sets untouched.

use crate::{
    boid::Boid,
    math_helpers::{distance, is_seen},
};

fn assert_populated(flock: &[Boid]) {
    assert!(
        flock.len() > 1,
        "expected a flock with more than one boid, got {}",
        flock.len()
    );
}

/// Regular boids `boid` sees within `d`, including `boid` itself.
///
/// Pass the separation distance instead of `d` to get the close neighbours.
pub fn neighbours<'a>(boid: &Boid, flock: &'a [Boid], angle: f64, d: f64) -> Vec<&'a Boid> {
    assert!(!boid.is_predator(), "flocking does not apply to predators");
    assert_populated(flock);

    flock
        .iter()
        .filter(|other| {
            !other.is_predator() && is_seen(boid, other, angle) && distance(boid, other) < d
        })
        .collect()
}

/// Predators a regular boid sees within `d_s_pred`.
pub fn predators<'a>(boid: &Boid, flock: &'a [Boid], angle: f64, d_s_pred: f64) -> Vec<&'a Boid> {
    assert!(
        !boid.is_predator(),
        "only regular boids keep away from predators"
    );
    assert_populated(flock);

    flock
        .iter()
        .filter(|other| {
            other.is_predator() && is_seen(boid, other, angle) && distance(boid, other) < d_s_pred
        })
        .collect()
}

/// Predators a predator sees within `d_s`, including itself.
pub fn competitors<'a>(boid: &Boid, flock: &'a [Boid], angle: f64, d_s: f64) -> Vec<&'a Boid> {
    assert!(boid.is_predator(), "only predators have competitors");
    assert_populated(flock);

    flock
        .iter()
        .filter(|other| {
            other.is_predator() && is_seen(boid, other, angle) && distance(boid, other) < d_s
        })
        .collect()
}

/// The nearest regular boid in sight of a predator.
///
/// Ties go to the boid that comes first in the flock. When no regular boid is
/// in sight the predator itself is returned, check [`Boid::is_predator`] on
/// the result.
pub fn find_prey<'a>(boid: &'a Boid, flock: &'a [Boid], angle: f64) -> &'a Boid {
    assert!(boid.is_predator(), "only predators hunt");
    assert_populated(flock);

    let mut prey: Option<(&Boid, f64)> = None;
    for other in flock
        .iter()
        .filter(|other| !other.is_predator() && is_seen(boid, other, angle))
    {
        let dist = distance(boid, other);
        match prey {
            Some((_, nearest)) if nearest <= dist => (),
            _ => prey = Some((other, dist)),
        }
    }

    match prey {
        Some((target, _)) => target,
        None => boid,
    }
}

#[cfg(test)]
mod tests {
    use super::{competitors, find_prey, neighbours, predators};
    use crate::{
        boid::Boid,
        vector::{Position, Velocity},
    };

    fn regular(x: f64, y: f64, vx: f64, vy: f64) -> Boid {
        Boid::new(Position::new(x, y), Velocity::new(vx, vy))
    }

    fn predator(x: f64, y: f64, vx: f64, vy: f64) -> Boid {
        Boid::predator(Position::new(x, y), Velocity::new(vx, vy))
    }

    fn mixed_flock() -> Vec<Boid> {
        vec![
            regular(11., 7., 3., 3.),
            predator(11., 7., 3., 3.),
            regular(11., 3., 1., 2.),
            regular(3., -0.5, -2., -1.),
            regular(-1., -1., -1.5, -1.5),
            predator(0., 0., 3., 3.),
            predator(5., 3., 1., 2.),
            regular(-2., 3., -3.5, 0.),
            regular(2., 8., 0., 2.5),
        ]
    }

    #[test]
    fn all_seeing_neighbours_are_all_regular_boids() {
        let flock = mixed_flock();

        for observer in flock.iter().filter(|b| !b.is_predator()) {
            let nbrs = neighbours(observer, &flock, 360., f64::INFINITY);
            let expected: Vec<&Boid> = flock.iter().filter(|b| !b.is_predator()).collect();

            assert_eq!(nbrs, expected);
            assert!(nbrs.contains(&observer));
        }
    }

    #[test]
    fn neighbours_respect_range_and_sight() {
        let flock = mixed_flock();
        // looking up and right from (-1, -1)
        let observer = &flock[4];

        let close = neighbours(observer, &flock, 360., 5.);
        assert_eq!(close, vec![&flock[3], &flock[4], &flock[7]]);

        // (3, -0.5) and (-2, 3) are more than 45 degrees off the heading
        let ahead = neighbours(observer, &flock, 90., 5.);
        assert_eq!(ahead, vec![&flock[4]]);
    }

    #[test]
    fn predators_in_range() {
        let flock = mixed_flock();

        let preds = predators(&flock[2], &flock, 360., 7.);
        assert_eq!(preds, vec![&flock[1], &flock[6]]);

        let none = predators(&flock[8], &flock, 10., 1.);
        assert!(none.is_empty());
    }

    #[test]
    fn competitors_include_self() {
        let flock = mixed_flock();

        let comps = competitors(&flock[5], &flock, 360., 6.);
        assert_eq!(comps, vec![&flock[5], &flock[6]]);
    }

    #[test]
    fn nearest_prey_in_sight() {
        let flock = mixed_flock();

        // a predator sharing its position with a regular boid: distance 0
        assert_eq!(find_prey(&flock[1], &flock, 360.), &flock[0]);
        assert_eq!(find_prey(&flock[6], &flock, 360.), &flock[3]);
    }

    #[test]
    fn prey_ties_go_to_first_in_line() {
        let flock = vec![
            predator(0., 0., 1., 0.),
            regular(0., 5., 1., 0.),
            regular(5., 0., 1., 0.),
            regular(0., -5., 1., 0.),
        ];

        let prey = find_prey(&flock[0], &flock, 359.);
        assert!(std::ptr::eq(prey, &flock[1]));
    }

    #[test]
    fn no_prey_in_sight_returns_the_predator() {
        let flock = vec![
            predator(0., 0., 1., 0.),
            regular(-5., 0., 1., 0.),
            predator(3., 0., -1., 0.),
        ];

        let prey = find_prey(&flock[0], &flock, 90.);
        assert_eq!(prey, &flock[0]);
        assert!(prey.is_predator());
    }

    #[test]
    #[should_panic(expected = "more than one boid")]
    fn queries_need_a_populated_flock() {
        let flock = vec![regular(0., 0., 1., 0.)];
        neighbours(&flock[0], &flock, 360., 10.);
    }

    #[test]
    #[should_panic(expected = "only predators have competitors")]
    fn competitors_need_a_predator() {
        let flock = mixed_flock();
        competitors(&flock[0], &flock, 360., 10.);
    }

    #[test]
    #[should_panic(expected = "only regular boids")]
    fn predators_need_a_regular_observer() {
        let flock = mixed_flock();
        predators(&flock[1], &flock, 360., 10.);
    }
}
