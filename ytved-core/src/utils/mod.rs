//! Utility functions and types used throughout the crate.

pub mod file_system;
