use std::{
    fmt::{self, Debug},
    marker::PhantomData,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign},
};

use glam::DVec2;

/// Marker for vectors describing where a boid is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionTag {}

/// Marker for vectors describing how fast and where to a boid moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityTag {}

/// A 2D vector of doubles carrying a compile time tag for its physical meaning.
///
/// All arithmetic is implemented once for every tag, but only between vectors
/// of the same tag, so a [`Position`] can never end up where a [`Velocity`] is
/// expected. Crossing over is explicit through [`Vector2D::retag`].
pub struct Vector2D<T> {
    inner: DVec2,
    tag: PhantomData<T>,
}

pub type Position = Vector2D<PositionTag>;
pub type Velocity = Vector2D<VelocityTag>;

impl<T> Vector2D<T> {
    pub const ZERO: Self = Vector2D {
        inner: DVec2::ZERO,
        tag: PhantomData,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D {
            inner: DVec2::new(x, y),
            tag: PhantomData,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[inline]
    pub fn set_x(&mut self, x: f64) {
        self.inner.x = x;
    }

    #[inline]
    pub fn set_y(&mut self, y: f64) {
        self.inner.y = y;
    }

    /// Euclidean length
    #[inline]
    pub fn norm(&self) -> f64 {
        self.inner.length()
    }

    /// Scalar product, allowed across tags since it yields a plain number
    #[inline]
    pub fn dot<U>(&self, other: &Vector2D<U>) -> f64 {
        self.inner.dot(other.inner)
    }

    /// Reinterprets the components under a different tag, e.g. a sum of
    /// position differences that becomes a velocity delta.
    #[inline]
    pub fn retag<U>(self) -> Vector2D<U> {
        Vector2D {
            inner: self.inner,
            tag: PhantomData,
        }
    }
}

impl Position {
    /// Where this position ends up after moving with `velocity` for `dt`.
    pub fn advanced(self, velocity: Velocity, dt: f64) -> Position {
        Position::new(self.x() + velocity.x() * dt, self.y() + velocity.y() * dt)
    }
}

impl<T> Clone for Vector2D<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Vector2D<T> {}

impl<T> PartialEq for Vector2D<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Default for Vector2D<T> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<T> Debug for Vector2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vector2D")
            .field(&self.inner.x)
            .field(&self.inner.y)
            .finish()
    }
}

impl<T> From<(f64, f64)> for Vector2D<T> {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2D::new(x, y)
    }
}

impl<T> AddAssign for Vector2D<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.inner += rhs.inner;
    }
}

impl<T> SubAssign for Vector2D<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.inner -= rhs.inner;
    }
}

impl<T> MulAssign<f64> for Vector2D<T> {
    fn mul_assign(&mut self, scalar: f64) {
        assert!(scalar != 0., "cannot scale a vector by zero");
        self.inner *= scalar;
    }
}

impl<T> DivAssign<f64> for Vector2D<T> {
    fn div_assign(&mut self, scalar: f64) {
        assert!(scalar != 0., "cannot divide a vector by zero");
        self.inner /= scalar;
    }
}

impl<T> Add for Vector2D<T> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T> Sub for Vector2D<T> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T> Mul<f64> for Vector2D<T> {
    type Output = Self;

    fn mul(mut self, scalar: f64) -> Self {
        self *= scalar;
        self
    }
}

impl<T> Div<f64> for Vector2D<T> {
    type Output = Self;

    fn div(mut self, scalar: f64) -> Self {
        self /= scalar;
        self
    }
}

impl<T> std::iter::Sum for Vector2D<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}
