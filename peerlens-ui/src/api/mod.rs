//! API Module
//!
//! HTTP client for the PeerLens REST API.

mod client;

pub use client::*;
