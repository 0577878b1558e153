//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dashboard chrome and shared overlays while reading and
//! writing state from Leptos context providers.

pub mod hospital_results;
pub mod map_modal;
pub mod notices;
