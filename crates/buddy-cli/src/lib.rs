//! Study buddy CLI library.
//!
//! This crate provides the command-line interface for the study buddy
//! matcher.

mod cli;
pub mod commands;
mod config;

pub use cli::{AvailAction, Cli, Commands, CourseAction, ProfileAction};
pub use config::Config;
