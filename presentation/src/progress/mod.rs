//! Console progress publishers

pub mod reporter;
