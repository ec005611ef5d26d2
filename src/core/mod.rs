//! Core library components.
//!
//! This module contains the secret resolution pipeline: configuration,
//! authentication, validation, retrieval, and materialization.

pub mod auth;
pub mod client;
pub mod config;
pub mod constants;
pub mod env;
pub mod materialize;
pub mod pipeline;
pub mod retrieve;
pub mod types;
pub mod validation;
