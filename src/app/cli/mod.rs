//! Command line, configuration and table output for the front desk binary

pub mod args;
pub mod config;
pub mod display;

#[cfg(test)]
mod tests;
