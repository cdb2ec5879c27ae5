//! Resource-area service ports
//!
//! Each area command is a thin adapter over one of these services. The
//! infrastructure implementations compose the shared client cache rather than
//! inheriting from a common base.

pub mod ports;
