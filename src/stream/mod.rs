//! Stream combinators used by subscriptions

mod throttle;

pub use throttle::{Throttle, ThrottleExt};
