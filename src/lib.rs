//! leetwatch - Competitive-Programming Submission Tracker
//!
//! leetwatch follows a small, user-managed set of accounts on a remote
//! submission service and shows per-day activity with fixed-offset display
//! timestamps. The cache is session-scoped and rebuilt each run.
//!
//! ## Core Features
//!
//! - **Batch Synchronization**: Sequential per-username fetches with
//!   skip-if-cached semantics and partial-commit abort handling
//! - **Account Registry**: Ordered username set with trim/duplicate
//!   validation and singleton-batch pruning
//! - **Derived Statistics**: Per-user today counts and +05:30 display times
//! - **Configuration Management**: YAML-based configuration with XDG
//!   compliance
//!
//! ## Modules
//!
//! - [`sync`]: Batch synchronization engine and session state
//! - [`api`]: Submission service client and wire types

pub mod api;
pub mod config;
pub mod registry;
pub mod stats;
pub mod sync;
pub mod tui;

pub use api::{HttpSubmissionSource, Submission, SubmissionSource};
pub use config::Config;
pub use registry::{AccountRegistry, AddOutcome};
pub use sync::{BatchOutcome, SessionState, SyncEngine};
