//! # nbp-pipeline
//!
//! The publish workflow: sanitize notebook artifacts, detect working-tree
//! changes, stage and commit them, and push with a single bounded retry
//! when the branch has no upstream yet.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use nbp_pipeline::{PipelineOrchestrator, PublishConfig};
//! use nbp_sanitize::CommandSanitizer;
//! use nbp_vcs::GitVcs;
//!
//! let root = std::path::Path::new(".");
//! let config = PublishConfig::load_or_default(&PublishConfig::path_for(root)).unwrap();
//! let vcs = GitVcs::new(root);
//! let sanitizer = CommandSanitizer::new(root, &config.sanitize);
//!
//! let orchestrator = PipelineOrchestrator::new(&vcs, &sanitizer, &config, root);
//! match orchestrator.run("Update EDA notebook") {
//!     Ok(report) => println!("{report}"),
//!     Err(failure) => eprintln!("{}", failure.error),
//! }
//! ```

pub mod committer;
pub mod config;
pub mod detector;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod request;
pub mod retrier;

pub use committer::{CommitReason, CommitResult, StagingCommitter};
pub use config::PublishConfig;
pub use detector::ChangeDetector;
pub use error::{PipelineError, PipelineFailure};
pub use orchestrator::PipelineOrchestrator;
pub use report::{RunReport, RunStatus};
pub use request::{validate_message, CommitRequest};
pub use retrier::{PublishRetrier, PushOutcome, PushStatus};
