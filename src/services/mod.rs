//! Services Layer
//!
//! Business logic shared by the REST handlers. Handlers stay thin; the
//! fetch-persist-log cycle lives here so it runs the same way no matter
//! which route triggers it.

pub mod refresh;

// Re-export commonly used types and services
pub use refresh::{PersistFailure, PersistReport, RefreshService, RefreshSummary};
