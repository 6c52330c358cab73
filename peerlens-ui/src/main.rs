//! PeerLens Dashboard
//!
//! Competitor comparison dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Competitor selection (base company excluded)
//! - Free-text comparison queries
//! - Metric table and bar/line chart of the answer
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the PeerLens API over HTTP. Decisions live in
//! `state::controller`, which has no DOM dependencies and is unit tested
//! natively.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
