//! Unit tests for k-installer
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod property_tests;
