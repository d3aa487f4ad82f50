pub mod cache;
pub mod config;
pub mod delivery;
pub mod error;
pub mod estimator;
pub mod export;
pub mod innings;
pub mod pipeline;
pub mod regression;
pub mod state;
