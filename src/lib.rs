// sparkpath-gateway - caching HTTP gateway for the SparkPath advisor service

pub mod advisor;
pub mod cache;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;
