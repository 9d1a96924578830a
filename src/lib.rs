pub mod cache;
pub mod cli;
pub mod error;
pub mod fetcher;
pub mod functions;
pub mod server;
