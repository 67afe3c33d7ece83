//! Numeric edge costs.
//!
//! Any ordered, additive numeric type can weight a [`GraphStore`](crate::GraphStore)
//! edge. Floats are admitted only when finite: a NaN would silently break the
//! cost ordering Dijkstra depends on, so it is rejected at insertion time.
//!
//! Negative weights are accepted here. Shortest-path search assumes they are
//! absent and does not check.
//!
//! Path costs accumulate with [`EdgeWeight::saturating_add`], so a long path
//! over a narrow integer type tops out at the type's maximum instead of
//! wrapping around to a small cost.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// Cost carried by a graph edge.
pub trait EdgeWeight:
    Copy + PartialOrd + Add<Output = Self> + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Additive identity, the cost of the empty path.
    fn zero() -> Self;

    /// Weight used when an edge is declared without one.
    fn one() -> Self;

    /// Whether the value can take part in cost comparisons.
    fn is_well_formed(&self) -> bool {
        true
    }

    /// `self + other`, clamped to the largest representable cost.
    fn saturating_add(self, other: Self) -> Self;

    /// `self + other`, or `None` when the sum is not representable.
    fn checked_add(self, other: Self) -> Option<Self>;

    /// Total order used by the shortest-path frontier.
    fn total_order(&self, other: &Self) -> Ordering;

    /// Lossy conversion for statistics and rendering.
    fn to_f64(self) -> f64;
}

macro_rules! impl_integer_weight {
    ($($type:ty),*) => {
        $(
            impl EdgeWeight for $type {
                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    <$type>::saturating_add(self, other)
                }

                #[inline]
                fn checked_add(self, other: Self) -> Option<Self> {
                    <$type>::checked_add(self, other)
                }

                #[inline]
                fn total_order(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! impl_float_weight {
    ($($type:ty),*) => {
        $(
            impl EdgeWeight for $type {
                #[inline]
                fn zero() -> Self {
                    0.0
                }

                #[inline]
                fn one() -> Self {
                    1.0
                }

                #[inline]
                fn is_well_formed(&self) -> bool {
                    self.is_finite()
                }

                // Float sums overflow to infinity, which still orders last.
                #[inline]
                fn saturating_add(self, other: Self) -> Self {
                    self + other
                }

                #[inline]
                fn checked_add(self, other: Self) -> Option<Self> {
                    Some(self + other).filter(|sum| sum.is_finite())
                }

                #[inline]
                fn total_order(&self, other: &Self) -> Ordering {
                    self.total_cmp(other)
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_integer_weight!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_float_weight!(f32, f64);
