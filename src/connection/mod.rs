//! Subscriber-facing connection layer
//!
//! A [`Subscription`] owns a running [`Driver`](crate::driver::Driver) and
//! turns its channels into streams of decoded messages and status updates.

mod subscription;

pub use subscription::Subscription;
