//! API Routes
//!
//! Route handlers organized by functionality.

pub mod companies;
pub mod compare;
pub mod health;
