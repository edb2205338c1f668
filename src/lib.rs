pub mod config;
pub mod core;
pub mod scan;
pub mod utils;
pub mod writer;
