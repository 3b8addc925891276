pub mod api;
pub mod cli;
pub mod config;
mod context;
pub mod executor;
pub mod primitives;
pub mod recipes;

pub use context::AppContext;
