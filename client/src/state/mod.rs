//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`session`, `auth`, `dashboard`, `notice`) so
//! pages depend on small focused models. Each is a plain struct held in an
//! `RwSignal`; none of them touches the DOM.

pub mod auth;
pub mod dashboard;
pub mod notice;
pub mod session;
