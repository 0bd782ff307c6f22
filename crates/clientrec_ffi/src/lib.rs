//! Flutter-facing bindings for the client record editor.

pub mod api;
