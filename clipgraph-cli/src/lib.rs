//! Command line front end for clipgraph: argument parsing, layered configuration and logging
//! set-up around the library pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
