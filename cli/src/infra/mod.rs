//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the SSH transport, local
//! process execution, filesystem access, git and config loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod git;
pub mod ssh;
