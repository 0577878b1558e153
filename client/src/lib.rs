//! # client
//!
//! Leptos + WASM frontend for Hospital Finder. Users sign in through the
//! identity provider, then look up nearby hospitals by place name or by
//! picking a point on a map.
//!
//! This crate contains pages, components, application state, and the
//! gateways to the identity provider and the hospital lookup backend. The
//! state machines are plain Rust and are tested natively; only the `hydrate`
//! build talks to the browser.

#![recursion_limit = "256"]

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"console logger already installed".into());
    }
    leptos::mount::hydrate_body(app::App);
}
