//! Gateways to the external collaborators and the types they exchange.
//!
//! SYSTEM CONTEXT
//! ==============
//! `identity` wraps the identity provider (with `popup` for Google sign-in
//! and `session_channel` for ordered session broadcasts), `lookup` wraps the
//! hospital backend, and `types`/`error` define what crosses those seams.

pub mod error;
pub mod identity;
pub mod lookup;
pub mod popup;
pub mod session_channel;
pub mod types;
