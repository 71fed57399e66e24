//! Front desk application

pub mod cli;
pub mod console;
pub mod observer;
pub mod startup;
