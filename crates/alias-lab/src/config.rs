use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alias_view::GrowthPolicy;
use serde::Deserialize;
use thiserror::Error;

use crate::scenario::ScenarioKind;

/// 覆盖 `log_filter` 的环境变量名。
pub const LOG_ENV: &str = "ALIAS_LAB_LOG";

/// 演示程序的配置。
///
/// ### 设计目的（Why）
/// - 追加的增长系数属于实现选择，放进配置后可以直接对比不同策略下搬迁发生的时机；
/// - 选择要运行的场景、日志过滤级别同样由配置驱动，命令行只做覆盖。
///
/// ### 契约说明（What）
/// - 全部字段都有默认值，空文件等价于 [`LabConfig::default`]；
/// - 出现未知字段或未知场景名时解析失败，避免拼写错误被静默忽略。
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub log_filter: String,
    pub scenarios: Vec<ScenarioKind>,
    pub growth: GrowthPolicy,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_owned(),
            scenarios: ScenarioKind::ALL.to_vec(),
            growth: GrowthPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

impl LabConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// 以 [`LOG_ENV`] 覆盖日志过滤级别。
    pub fn with_env_override(self) -> Self {
        self.with_log_override(std::env::var(LOG_ENV).ok())
    }

    /// 非空的 `filter` 替换 `log_filter`。
    pub fn with_log_override(mut self, filter: Option<String>) -> Self {
        if let Some(filter) = filter.filter(|value| !value.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }
}
