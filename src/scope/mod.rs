//! Scope Guard
//!
//! Pre-dispatch check that the session holds a scope an operation needs.

use tracing::debug;

use crate::error::{LucidError, LucidResult};
use crate::types::{Scope, ScopeSet};

/// Any-of scope check.
pub struct ScopeGuard;

impl ScopeGuard {
    /// Pass if `granted` holds at least one of `any_of`. An empty requirement always passes.
    pub fn require(granted: &ScopeSet, any_of: &[Scope]) -> LucidResult<()> {
        if any_of.is_empty() || granted.intersects(any_of) {
            return Ok(());
        }

        debug!(
            required = ?any_of,
            granted = %granted.to_space_separated(),
            "Scope check failed"
        );
        Err(LucidError::InsufficientScope {
            required: any_of.iter().map(|s| s.as_str().to_string()).collect(),
            granted: granted.to_strings(),
        })
    }
}
