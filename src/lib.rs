pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod integrity;
pub mod ops;
pub mod retention;
pub mod vault;
