//! Genetic Network Programming engine for mining inter-transaction
//! association rules from binary multivariate time series.
//!
//! [`Engine`] is the only type a driver needs: build an [`EngineConfig`],
//! load a [`Dataset`], construct the engine, call [`Engine::run`].

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod evolution;
pub mod extractor;
pub mod filter;
pub mod genome;
pub mod kernel;
pub mod pool;
pub mod rule;

pub use config::{EngineConfig, EngineConfigBuilder, SupportDenominatorMode};
pub use dataset::Dataset;
pub use engine::Engine;
pub use error::{EngineError, LoadError};
pub use filter::FilterStats;
pub use pool::{GlobalPool, RulePool};
pub use rule::Rule;
