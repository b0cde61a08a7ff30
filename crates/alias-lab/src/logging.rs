use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, filter::ParseError};

/// 安装 tracing 订阅器时可能出现的错误。
#[derive(Debug, Error)]
pub enum LoggingError {
    /// 进程内已存在全局 Subscriber。
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
    #[error("invalid log filter `{directive}`")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to set global tracing subscriber")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 解析 `EnvFilter` 指令。
pub fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::Filter {
        directive: directive.to_owned(),
        source,
    })
}

/// 以 `fmt + EnvFilter` 组装订阅器并设置为全局默认，日志写到 stderr。
///
/// # 契约说明（What）
/// - 过滤指令非法时返回 [`LoggingError::Filter`]，此时不会触碰全局状态；
/// - 外部已设置 Subscriber 时返回 [`LoggingError::AlreadyInstalled`]，不会覆盖。
pub fn install(directive: &str) -> Result<(), LoggingError> {
    let filter = build_filter(directive)?;
    if dispatcher::has_been_set() {
        return Err(LoggingError::AlreadyInstalled);
    }
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_layered_directives() {
        assert!(build_filter("info,alias_view=debug").is_ok());
    }

    #[test]
    fn rejects_unknown_levels_before_touching_global_state() {
        let err = install("alias_view=loudest").expect_err("非法级别");
        assert!(matches!(err, LoggingError::Filter { .. }));
    }
}
