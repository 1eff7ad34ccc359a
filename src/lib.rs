//! Dotfiles deployment engine.
//!
//! Deploys the files named by a profile's `.dotlink` mapping to a local
//! directory, by symlink or copy, or to a remote host over SSH.  Profiles
//! may be local directories or git repositories and may include each other.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: discover and resolve mapping files into a [`config::Config`] tree
//! - **[`plan`]**: flatten a config into an ordered list of [`actions::Action`]s
//! - **[`actions`]**: two-phase `prepare + execute` deployment steps
//! - **[`source`]** / **[`target`]**: where dotfiles come from and go to
//! - **[`commands`]**: top-level command orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod source;
pub mod target;
