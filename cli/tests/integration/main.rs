//! Integration tests for k-installer
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They never reach a network: every case fails or finishes before dialing.

mod cli_tests;
mod input_errors;
