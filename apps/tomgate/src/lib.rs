//! # tomgate
//!
//! Library surface of the tomgate binary: the config loader, the CLI and the
//! HTTP evaluation API. Integration tests reach the router through
//! `tomgate::api`.

pub mod api;
pub mod cli;
pub mod config;
