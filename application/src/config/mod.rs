//! Application-level configuration.
//!
//! - [`InvokerParams`]: model request shape and retry/backoff policy

pub mod invoker_params;

pub use invoker_params::InvokerParams;
