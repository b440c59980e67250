pub mod aggregate;
pub mod charts;
pub mod cleaner;
pub mod constants;
pub mod error;
pub mod filter;
pub mod join;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod profile;
pub mod types;
