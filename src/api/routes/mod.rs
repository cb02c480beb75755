//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod mcp;
pub mod resources;
pub mod tools;
