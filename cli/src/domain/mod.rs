//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod profile;
pub mod project;
pub mod remote;

pub use config::{ConnectPolicy, ConnectSettings, InstallerConfig, PathSettings};
pub use error::{ConfigError, ConnectError, InputError, StepError};
pub use profile::{FileKind, ProvisioningProfile, PushSpec, Step, push_header, push_spec};
pub use project::{ConnectTarget, Password, ProjectConfig, ProjectType};
pub use remote::{IGNORABLE_MARKER, RemoteExit, SessionError, SessionOutput};
