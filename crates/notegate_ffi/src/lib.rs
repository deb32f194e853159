//! Flutter-facing bindings for notegate core.

pub mod api;
