//! REST API
//!
//! Re-exposes the stored Banguat data as JSON:
//! - Rate and currency routes under `/api`
//! - A JSONPlaceholder-compatible shim (`/api/users`, `/api/posts`)
//! - Health, info and connectivity diagnostics

pub mod compat;
pub mod handlers;
pub mod server;
pub mod types;

pub use server::serve;
