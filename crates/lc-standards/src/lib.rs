#![deny(unsafe_code)]

pub mod csv;
pub mod doctor;
pub mod error;
pub mod handle;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod registry;

pub use crate::doctor::DoctorReport;
pub use crate::error::StandardsError;
pub use crate::handle::RegistryHandle;
pub use crate::paths::standards_root;
pub use crate::registry::{SchemaRegistry, VerifySummary};
