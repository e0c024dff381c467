//! Domain models and types for Ferry.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ResourceType`], [`ResourceId`])
//! - **The opaque resource wrapper** ([`Resource`])
//! - **Error types** ([`FerryError`], [`FhirError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes so a resource type can never be passed where an id
//! is expected:
//!
//! ```rust
//! use ferry::domain::{ResourceId, ResourceType};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resource_type = ResourceType::new("Patient")?;
//! let id = ResourceId::new("example")?;
//! assert_eq!(format!("{resource_type}/{id}"), "Patient/example");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod resource;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FerryError, FhirError};
pub use ids::{ResourceId, ResourceType};
pub use resource::Resource;
pub use result::Result;
