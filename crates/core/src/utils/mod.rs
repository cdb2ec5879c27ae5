//! Helpers shared by command implementations

pub mod results;
