//! Invocation gateway: concurrency-bounded, retrying façade over a
//! completion provider

pub mod throttled;

pub use throttled::{RetryPolicy, ThrottledGateway};
