//! Long-running invocation surfaces

pub mod stdio;

pub use stdio::serve;
