//! Tests for the CLI module
//!
//! Argument parsing, configuration loading and table rendering.
