//! 演示程序的统一错误域，各子模块错误经 `#[from]` 汇入，便于 `?` 直接传播。

use alias_view::ViewError;
use thiserror::Error;

use crate::{config::ConfigError, logging::LoggingError, stream::StreamError};

#[derive(Debug, Error)]
pub enum LabError {
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),
}
