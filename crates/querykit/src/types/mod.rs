//! Value types that go beyond a single scalar.

mod range;

pub use range::{Bound, Range};
