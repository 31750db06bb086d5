//! Recursion guard
//!
//! Duplicate elimination is not possible here: sendmail compatibility
//! requires that the same name may be delivered to more than once, even
//! recursively (a user aliased to a list that names that user again). The
//! guard recognises the one safe case, an alias that names itself, and
//! otherwise only bounds the nesting depth.

use localmail_core::LocalState;

/// Default nesting ceiling
pub const DEFAULT_MAX_DEPTH: u32 = 100;

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Resolution may continue
    Proceed,
    /// `local` equals its expansion origin; deliver to the user instead
    SelfReference,
    /// Nesting exceeded the ceiling; possible alias database loop
    DepthExceeded,
}

/// Bounds alias expansion depth
#[derive(Debug, Clone, Copy)]
pub struct RecursionGuard {
    max_depth: u32,
}

impl RecursionGuard {
    /// Create a guard with a nesting ceiling
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// The nesting ceiling
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Check a frame whose level has already been incremented for this call
    ///
    /// Self reference is checked first, so a name that maps to itself is
    /// delivered to the user even at the depth limit.
    pub fn check(&self, state: &LocalState) -> GuardVerdict {
        if state.is_self_reference() {
            GuardVerdict::SelfReference
        } else if state.level > self.max_depth {
            GuardVerdict::DepthExceeded
        } else {
            GuardVerdict::Proceed
        }
    }
}

impl Default for RecursionGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
