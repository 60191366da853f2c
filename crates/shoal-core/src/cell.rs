//! The scalar population cell: a count and a mean individual weight.

use std::ops::{Add, AddAssign, Mul, MulAssign};

use crate::numeric::is_zero;

/// Number and mean weight of the individuals in one age/length/area bucket.
///
/// `weight` is an intensive quantity (average weight of one individual), so:
///
/// - accumulating two cells (`+=`) adds counts and takes the count-weighted
///   average of the weights;
/// - scaling by a ratio (`*=`) scales the count only.
///
/// A cell whose count is zero or negative carries no information and is
/// replaced outright when something is added to it.
///
/// ```
/// use shoal_core::PopCell;
///
/// let mut a = PopCell::new(10.0, 2.0);
/// a += PopCell::new(30.0, 4.0);
/// assert_eq!(a.count, 40.0);
/// assert_eq!(a.weight, 3.5);
///
/// a *= 0.5;
/// assert_eq!(a.count, 20.0);
/// assert_eq!(a.weight, 3.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PopCell {
    /// Number of individuals. May be fractional.
    pub count: f64,
    /// Mean weight of one individual. Meaningful only when `count > 0`.
    pub weight: f64,
}

impl PopCell {
    /// The empty cell `(0, 0)`.
    pub const ZERO: PopCell = PopCell {
        count: 0.0,
        weight: 0.0,
    };

    /// Create a cell from a count and a mean weight.
    pub const fn new(count: f64, weight: f64) -> Self {
        Self { count, weight }
    }

    /// Returns `true` if the cell carries no individuals.
    pub fn is_empty(&self) -> bool {
        self.count <= 0.0 || is_zero(self.count)
    }

    /// Force both fields to zero.
    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }

    /// Total weight held by the cell (`count * weight`).
    pub fn biomass(&self) -> f64 {
        self.count * self.weight
    }

    /// Return a copy with the count scaled by `ratio`.
    pub fn scaled(self, ratio: f64) -> Self {
        Self {
            count: self.count * ratio,
            weight: self.weight,
        }
    }
}

impl AddAssign for PopCell {
    fn add_assign(&mut self, other: PopCell) {
        if is_zero(self.count + other.count) {
            self.clear();
        } else if is_zero(other.count) {
            // nothing to add
        } else if self.is_empty() {
            *self = other;
        } else {
            let total = self.count + other.count;
            self.weight = (self.count * self.weight + other.count * other.weight) / total;
            self.count = total;
        }
    }
}

impl Add for PopCell {
    type Output = PopCell;

    fn add(mut self, other: PopCell) -> PopCell {
        self += other;
        self
    }
}

impl MulAssign<f64> for PopCell {
    fn mul_assign(&mut self, ratio: f64) {
        self.count *= ratio;
    }
}

impl Mul<f64> for PopCell {
    type Output = PopCell;

    fn mul(self, ratio: f64) -> PopCell {
        self.scaled(ratio)
    }
}

impl std::iter::Sum for PopCell {
    fn sum<I: Iterator<Item = PopCell>>(iter: I) -> PopCell {
        iter.fold(PopCell::ZERO, |acc, c| acc + c)
    }
}

impl<'a> std::iter::Sum<&'a PopCell> for PopCell {
    fn sum<I: Iterator<Item = &'a PopCell>>(iter: I) -> PopCell {
        iter.fold(PopCell::ZERO, |acc, c| acc + *c)
    }
}
