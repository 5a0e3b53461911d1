//! sqcmd CLI - generate Sequelize-style migrations from model snapshots.
//!
//! This crate provides the `sqcmd` binary: project initialization, model,
//! migration and seed file generation, and inspection of normalized models.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod templates;
