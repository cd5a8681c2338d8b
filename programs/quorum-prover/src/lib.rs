//! Command line tool that extracts quorum proofs from CometBFT commits.
#![deny(missing_docs, clippy::nursery, clippy::pedantic)]

pub mod cli;
pub mod config;
pub mod observability;
pub mod runner;
