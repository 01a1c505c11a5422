pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod job;
pub mod metrics;
pub mod task;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;
