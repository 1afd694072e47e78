//! Workspace resolution
//!
//! Turns one [`WorkspaceConfig`](crate::config::WorkspaceConfig) into the
//! sequence of configurations the pipeline runs, one per project pairing.

pub mod resolver;

pub use resolver::{ResolveError, ResolvedProjects, WorkspaceMode, WorkspaceResolver};
