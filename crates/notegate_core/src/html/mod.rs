//! HTML body gating for user-entered note content.
//!
//! # Responsibility
//! - Accept or reject note bodies against a fixed tag allow-list.
//! - Report exactly one human-readable rejection reason.
//!
//! # Invariants
//! - Validation never rewrites, strips or escapes input.
//! - Validation is pure: no I/O, no shared mutable state.

pub mod gate;
