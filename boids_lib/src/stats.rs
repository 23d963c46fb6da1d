use itertools::Itertools;

use crate::{boid::Boid, math_helpers::distance};

/// Mean of a sample together with its sample standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub mean: f64,
    pub std_dev: f64,
}

impl Statistics {
    /// Moments from the sum and the sum of squares of `n` values, using
    /// `var = n/(n-1) * (E[x²] - E[x]²)`.
    ///
    /// With a single value the spread is reported as zero. Rounding may leave
    /// a tiny negative variance, which is read as zero too.
    fn from_sums(sum: f64, sum_sq: f64, n: f64) -> Self {
        let mean = sum / n;
        if n < 2. {
            return Statistics { mean, std_dev: 0. };
        }

        let mean_sq = sum_sq / n;
        let variance = n / (n - 1.) * (mean_sq - mean * mean);

        Statistics {
            mean,
            std_dev: variance.max(0.).sqrt(),
        }
    }
}

/// Mean distance between all unordered pairs of boids, with its standard
/// deviation.
pub fn mean_dist(state: &[Boid]) -> Statistics {
    assert!(
        state.len() > 1,
        "need at least two boids to measure distances, got {}",
        state.len()
    );

    let (sum, sum_sq, n) = state
        .iter()
        .tuple_combinations()
        .map(|(b1, b2)| distance(b1, b2))
        .fold((0., 0., 0_u64), |(sum, sum_sq, n), d| {
            (sum + d, sum_sq + d * d, n + 1)
        });

    Statistics::from_sums(sum, sum_sq, n as f64)
}

/// Mean speed of the boids, with its standard deviation.
pub fn mean_speed(state: &[Boid]) -> Statistics {
    assert!(
        state.len() > 1,
        "need at least two boids to measure speeds, got {}",
        state.len()
    );

    let (sum, sum_sq) = state
        .iter()
        .map(Boid::speed)
        .fold((0., 0.), |(sum, sum_sq), s| (sum + s, sum_sq + s * s));

    Statistics::from_sums(sum, sum_sq, state.len() as f64)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{mean_dist, mean_speed};
    use crate::{
        boid::Boid,
        vector::{Position, Velocity},
    };

    macro_rules! assert_eqf64 {
        ($x:expr, $y:expr) => {
            assert_relative_eq!($x, $y, epsilon = 1e-9_f64)
        };
    }

    fn b(x: f64, y: f64, vx: f64, vy: f64) -> Boid {
        Boid::new(Position::new(x, y), Velocity::new(vx, vy))
    }

    fn state4() -> Vec<Boid> {
        vec![
            b(0., 0., 1., 1.),
            b(0., 3., 5., 2.),
            b(3., 3., 8., 2.),
            b(3., 0., -1., 2.),
        ]
    }

    fn state8() -> Vec<Boid> {
        let mut state = state4();
        state.extend([
            b(6., 6., 1., 1.),
            b(6., 9., 5., 2.),
            b(9., 9., 8., 2.),
            b(9., 6., -1., 2.),
        ]);
        state
    }

    #[test]
    fn mean_dist_of_square() {
        let res = mean_dist(&state4());

        assert_eqf64!(res.mean, 2. + 2_f64.sqrt());
        assert_relative_eq!(res.std_dev, 0.6416968915377015, epsilon = 1e-9);
    }

    #[test]
    fn mean_dist_of_two_squares() {
        let res = mean_dist(&state8());

        assert_relative_eq!(res.mean, 6.462690999659106, epsilon = 1e-9);
        assert_relative_eq!(res.std_dev, 3.1654471406195643, epsilon = 1e-9);
    }

    #[test]
    fn mean_dist_of_pair() {
        let res = mean_dist(&[b(0., 3., 1., 0.), b(3., 3., 1., 0.)]);

        assert_eqf64!(res.mean, 3.);
        assert_eq!(res.std_dev, 0.);
    }

    #[test]
    fn mean_dist_of_coincident_boids() {
        let res = mean_dist(&[b(0., 3., 1., 0.), b(0., 3., 5., 2.), b(0., 3., 1., 1.)]);

        assert_eq!(res.mean, 0.);
        assert_eq!(res.std_dev, 0.);
    }

    #[test]
    fn mean_speed_of_square() {
        let res = mean_speed(&state4());

        assert_relative_eq!(res.mean, 4.320414399560677, epsilon = 1e-9);
        assert_relative_eq!(res.std_dev, 3.127090109791903, epsilon = 1e-9);
    }

    #[test]
    fn equal_speeds_have_no_spread() {
        let res = mean_speed(&[b(0., 0., 3., 4.), b(1., 1., -4., 3.), b(2., 2., 0., 5.)]);

        assert_eqf64!(res.mean, 5.);
        assert_eqf64!(res.std_dev, 0.);
    }

    #[test]
    #[should_panic(expected = "at least two boids")]
    fn statistics_need_two_boids() {
        mean_dist(&[b(0., 0., 1., 1.)]);
    }
}
