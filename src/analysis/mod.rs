//! Aggregation core.
//!
//! Turns extracted steps into the normalized recommendation list and the
//! summary metrics every presentation adapter reads from.

pub mod recommendations;
pub mod summary;

pub use recommendations::*;
pub use summary::*;
