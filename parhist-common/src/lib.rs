pub mod config;
pub use config::{Config, Topology};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParhistError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("invalid worker count: {0} (need at least 1)")]
    InvalidWorkerCount(usize),
    #[error("collective desync: {0}")]
    CollectiveDesync(String),
    #[error("worker {rank} failed: {reason}")]
    WorkerFailed { rank: usize, reason: String },
    #[error("thread pool error: {0}")]
    ThreadPool(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ParhistError>;
