//! Execution state machine

use std::fmt;

/// States of a single execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    Resolved,
    Validating,
    Invalid,
    Valid,
    Executing,
    Succeeded,
    Failed,
    Mapping,
    Responded,
}

impl ExecutionState {
    /// Whether `next` directly follows `self`
    pub const fn can_advance_to(self, next: Self) -> bool {
        use ExecutionState::{
            Executing, Failed, Invalid, Mapping, Resolved, Responded, Succeeded, Valid, Validating,
        };
        matches!(
            (self, next),
            (Resolved, Validating)
                | (Validating, Invalid | Valid)
                | (Invalid | Succeeded | Mapping, Responded)
                | (Valid, Executing)
                | (Executing, Succeeded | Failed)
                | (Failed, Mapping)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Responded)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
