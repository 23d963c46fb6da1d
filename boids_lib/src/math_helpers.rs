use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{
    boid::Boid,
    options::WorldBounds,
    vector::{Position, Velocity},
};

/// Fraction of the world's width and height, measured from the upper right
/// corner, in which regular boids are safe from predators.
pub const REFUGE_FRACTION: f64 = 0.1;

/// Euclidean distance between the positions of two boids.
pub fn distance(b1: &Boid, b2: &Boid) -> f64 {
    (b1.position - b2.position).norm()
}

/// Converts a full field of view in degrees into the cosine of its half angle.
#[inline]
pub fn deg_to_half_cos(angle_of_view: f64) -> f64 {
    (PI * angle_of_view / 360.).cos()
}

/// Returns true if `observer` can see `target`.
///
/// Boids sharing a position always see each other, the angle towards a null
/// vector is undefined.
pub fn is_seen(observer: &Boid, target: &Boid, angle_of_view: f64) -> bool {
    if observer.position == target.position {
        return true;
    }

    let pos_diff = target.position - observer.position;
    // v•u = |v||u|cos(ß)
    let cos = pos_diff.dot(&observer.velocity) / (observer.velocity.norm() * pos_diff.norm());
    // rounding can push the quotient slightly past ±1
    let cos = cos.clamp(-1., 1.);

    cos >= deg_to_half_cos(angle_of_view)
}

/// Keeps speed within `(min_speed, max_speed)` without altering direction,
/// unless the velocity is null, in which case it points along the diagonal.
pub fn normalize(mut v: Velocity, min_speed: f64, max_speed: f64) -> Velocity {
    assert!(
        min_speed < max_speed,
        "minimum speed {min_speed} must be below maximum speed {max_speed}"
    );

    let speed = v.norm();
    if speed >= max_speed {
        // a little below the max
        v *= 0.95 * max_speed / speed;
    } else if speed == 0. {
        v = Velocity::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2) * (1.05 * min_speed);
    } else if speed <= min_speed {
        // a little above the min
        v *= 1.05 * min_speed / speed;
    }

    debug_assert!(
        v.norm() > min_speed && v.norm() < max_speed,
        "speed {} escaped ({min_speed}, {max_speed})",
        v.norm()
    );
    v
}

/// Nudges a boid that left the world back towards it.
///
/// Axes are checked independently, a boid past a corner gets pushed along
/// both of them.
pub fn bound_position(boid: &Boid, bounds: &WorldBounds) -> Velocity {
    let speed = boid.velocity.norm();
    let mut v = boid.velocity;

    if boid.position.x() < bounds.x_min {
        v.set_x(v.x() + speed * 2.);
    }
    if boid.position.x() > bounds.x_max {
        v.set_x(v.x() - speed * 2.);
    }
    if boid.position.y() < bounds.y_min {
        v.set_y(v.y() + speed * 2.);
    }
    if boid.position.y() > bounds.y_max {
        v.set_y(v.y() - speed * 2.);
    }

    v
}

/// Whether a position lies in the refuge by the upper right corner of the world.
pub fn in_corner(position: &Position, bounds: &WorldBounds) -> bool {
    position.x() > bounds.x_max - REFUGE_FRACTION * bounds.width()
        && position.y() > bounds.y_max - REFUGE_FRACTION * bounds.height()
}
