// ── Domain model ──

pub mod application;
pub mod exposure;
pub mod resource_id;
pub mod revision;

pub use application::{ApplicationSnapshot, DEFAULT_CHANNEL, DeclaredApplication, DeclaredCharm};
pub use exposure::{ApplicationExposure, DeclaredExposure, ExposureRule};
pub use resource_id::ApplicationId;
pub use revision::Revision;
