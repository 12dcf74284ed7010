// Library root: re-exports all modules so integration tests and the binary
// can reach the crate's public API.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod league;
pub mod news;
pub mod report;
pub mod schedule;
pub mod stats;
pub mod store;
