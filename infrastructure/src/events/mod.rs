//! Live progress channel

pub mod broadcast;

pub use broadcast::{BroadcastPublisher, relay};
