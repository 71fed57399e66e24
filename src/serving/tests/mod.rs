//! Test suites for the serving core
//!
//! Scenario, property, failure and concurrency tests share the fixtures in
//! `support`.

mod properties;
mod support;
