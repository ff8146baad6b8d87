//! # nbp-sanitize
//!
//! Strips volatile execution output from notebook artifacts before they are
//! versioned, so that re-running a notebook without touching its source does
//! not produce a diff.
//!
//! The actual rewrite is delegated to an external tool (`nbstripout` by
//! default) behind the [`Sanitizer`] trait. This crate owns everything
//! around it:
//! - [`LocalEnv`] resolves a project-local environment directory into an
//!   explicit executable search path
//! - [`Capability`] is the typed result of probing for the tool, carrying an
//!   [`InstallHook`] when it is missing
//! - [`ArtifactScan`] walks the working tree and classifies files
//! - [`ArtifactSanitizer`] runs the tool over every artifact, best-effort

pub mod artifact;
pub mod capability;
pub mod config;
pub mod env;
pub mod error;
pub mod runner;
pub mod sanitizer;

pub use artifact::{ArtifactKind, ArtifactRef, ArtifactScan, IgnorePatterns};
pub use capability::{Capability, InstallHook};
pub use config::SanitizeConfig;
pub use env::LocalEnv;
pub use error::SanitizeError;
pub use runner::{ArtifactSanitizer, SanitizeFailure, SanitizeSummary, SanitizerStatus};
pub use sanitizer::{CommandSanitizer, Sanitizer};
