pub mod agents;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod synthesis;
#[cfg(test)]
pub mod test_helpers;
