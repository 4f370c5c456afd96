pub mod arguments;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logger;
pub mod output;
pub mod pools;
pub mod profiling;
