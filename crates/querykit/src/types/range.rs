//! Interval values for range conditions.
//!
//! [`Range<T>`] and [`Bound<T>`] describe an interval with optional, inclusive
//! or exclusive endpoints. A range over [`Value`] renders itself as a set of
//! comparisons against a column, so `in_range` works on any dialect.

use crate::format::{Formatter, SqlWriter};
use crate::value::Value;

/// A bound of a range (inclusive or exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bound<T> {
    /// The bound includes the value: `[value` or `value]`
    Inclusive(T),
    /// The bound excludes the value: `(value` or `value)`
    Exclusive(T),
}

impl<T> Bound<T> {
    /// Returns a reference to the inner value.
    pub fn value(&self) -> &T {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }

    /// Returns `true` if this bound is inclusive.
    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }

    /// Consumes the bound and returns the inner value.
    pub fn into_value(self) -> T {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }

    /// Converts the inner value, keeping inclusivity.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Bound<U> {
        match self {
            Bound::Inclusive(v) => Bound::Inclusive(f(v)),
            Bound::Exclusive(v) => Bound::Exclusive(f(v)),
        }
    }
}

/// An interval of values.
///
/// `None` bounds represent unbounded (infinite) endpoints.
///
/// # Examples
///
/// ```ignore
/// use querykit::types::{Range, Bound};
///
/// // [1, 10] closed range
/// let r = Range::<i32>::inclusive(1, 10);
///
/// // [1, 10) half-open range
/// let r = Range::<i32>::lower_inc(1, 10);
///
/// // created_at >= '2024-01-01'
/// let r = Range::at_least("2024-01-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range<T> {
    /// Lower bound, or `None` for unbounded.
    pub lower: Option<Bound<T>>,
    /// Upper bound, or `None` for unbounded.
    pub upper: Option<Bound<T>>,
    /// Whether this is the empty range.
    empty: bool,
}

impl<T> Range<T> {
    /// Creates a new range with the given bounds.
    pub fn new(lower: Option<Bound<T>>, upper: Option<Bound<T>>) -> Self {
        Self {
            lower,
            upper,
            empty: false,
        }
    }

    /// Creates an empty range (contains no values).
    pub fn empty() -> Self {
        Self {
            lower: None,
            upper: None,
            empty: true,
        }
    }

    /// Creates a closed range `[lower, upper]`.
    pub fn inclusive(lower: T, upper: T) -> Self {
        Self::new(
            Some(Bound::Inclusive(lower)),
            Some(Bound::Inclusive(upper)),
        )
    }

    /// Creates an open range `(lower, upper)`.
    pub fn exclusive(lower: T, upper: T) -> Self {
        Self::new(
            Some(Bound::Exclusive(lower)),
            Some(Bound::Exclusive(upper)),
        )
    }

    /// Creates a half-open range `[lower, upper)`.
    pub fn lower_inc(lower: T, upper: T) -> Self {
        Self::new(
            Some(Bound::Inclusive(lower)),
            Some(Bound::Exclusive(upper)),
        )
    }

    /// Creates a half-open range `(lower, upper]`.
    pub fn upper_inc(lower: T, upper: T) -> Self {
        Self::new(
            Some(Bound::Exclusive(lower)),
            Some(Bound::Inclusive(upper)),
        )
    }

    /// `[lower, +infinity)`
    pub fn at_least(lower: T) -> Self {
        Self::new(Some(Bound::Inclusive(lower)), None)
    }

    /// `(lower, +infinity)`
    pub fn greater_than(lower: T) -> Self {
        Self::new(Some(Bound::Exclusive(lower)), None)
    }

    /// `(-infinity, upper]`
    pub fn at_most(upper: T) -> Self {
        Self::new(None, Some(Bound::Inclusive(upper)))
    }

    /// `(-infinity, upper)`
    pub fn less_than(upper: T) -> Self {
        Self::new(None, Some(Bound::Exclusive(upper)))
    }

    /// Returns `true` if this is the empty range.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Creates an unbounded range `(-infinity, +infinity)`.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Returns `true` if neither endpoint is set (and the range is not empty).
    pub fn is_unbounded(&self) -> bool {
        !self.empty && self.lower.is_none() && self.upper.is_none()
    }

    /// Converts both endpoints.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Range<U> {
        Range {
            lower: self.lower.map(|b| b.map(&mut f)),
            upper: self.upper.map(|b| b.map(&mut f)),
            empty: self.empty,
        }
    }
}

impl Range<Value> {
    /// Values bound by the rendered condition: lower first, then upper.
    pub fn bindings(&self) -> Vec<Value> {
        if self.empty {
            return Vec::new();
        }
        self.lower
            .iter()
            .chain(self.upper.iter())
            .map(|b| b.value().clone())
            .collect()
    }

    /// Writes the comparisons for `column` (already quoted).
    pub(crate) fn write_condition<F: Formatter + ?Sized>(
        &self,
        column: &str,
        negated: bool,
        w: &mut SqlWriter<'_, F>,
    ) {
        if self.empty {
            w.push(if negated { "1 = 1" } else { "1 = 0" });
            return;
        }

        let mut bounds: Vec<(&'static str, &Value)> = Vec::with_capacity(2);
        if let Some(lower) = &self.lower {
            bounds.push((if lower.is_inclusive() { ">=" } else { ">" }, lower.value()));
        }
        if let Some(upper) = &self.upper {
            bounds.push((if upper.is_inclusive() { "<=" } else { "<" }, upper.value()));
        }

        if bounds.is_empty() {
            w.push(if negated { "1 = 0" } else { "1 = 1" });
            return;
        }

        let grouped = negated || bounds.len() > 1;
        if negated {
            w.push("NOT ");
        }
        if grouped {
            w.push("(");
        }
        for (i, (op, value)) in bounds.into_iter().enumerate() {
            if i > 0 {
                w.push(" AND ");
            }
            w.push(column).push(" ").push(op).push(" ");
            w.push_bind(value.clone());
        }
        if grouped {
            w.push(")");
        }
    }
}
