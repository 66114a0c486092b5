// Benchbot - Library root for testing

pub mod config;
pub mod error;
pub mod workload;
pub mod timer;
pub mod report;
pub mod registry;
pub mod command;
pub mod channel;
pub mod surface;
