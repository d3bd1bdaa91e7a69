//! city-rights/crates/cr-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the city-rights
//! register.

pub mod banner;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod todo;
pub mod traits;

// Re-exporting for easier access in other crates
pub use banner::*;
pub use eligibility::*;
pub use error::*;
pub use models::*;
pub use todo::*;
pub use traits::*;
