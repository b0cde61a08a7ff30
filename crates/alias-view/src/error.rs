//! 视图操作的错误域。
//!
//! # 设计要求（What）
//! - 错误只有两类处置语义：构造参数非法（`InvalidArgument`）与越界访问（`OutOfRange`），
//!   由 [`ViewError::kind`] 折叠；
//! - 细粒度变体携带触发失败的具体边界，便于断言与排障；
//! - 错误码遵循 `<域>.<语义>` 命名，保持稳定，可直接写入日志字段。

use thiserror::Error;

/// 稳定错误码。
pub mod codes {
    /// 构造参数非法，例如 `length > capacity`。
    pub const INVALID_ARGUMENT: &str = "view.invalid_argument";
    /// 下标或切片边界越界。
    pub const OUT_OF_RANGE: &str = "view.out_of_range";
}

/// 错误的粗粒度分类。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfRange,
}

/// `alias-view` 的错误类型。
///
/// # 教案式说明
/// - **意图 (Why)**：各变体分别对应构造、下标访问、两种重切片的失败路径，
///   调用方既可以精确匹配变体，也可以只关心 [`ErrorKind`]。
/// - **契约 (What)**：所有失败都在调用点同步返回，视图与底层缓冲不会被修改；
///   不存在内部重试或降级路径。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ViewError {
    /// 构造时请求的长度超过容量。
    #[error("view length {length} exceeds capacity {capacity}")]
    InvalidArgument { length: usize, capacity: usize },

    /// 下标不在 `0..length` 范围内。
    ///
    /// 即便下标落在剩余容量中也会返回该错误：容量只对追加可见。
    #[error("index {index} out of range for view of length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// 两参数重切片的边界不满足 `from <= to <= length`。
    #[error("slice bounds [{from}:{to}] out of range for view of length {length}")]
    ResliceOutOfRange {
        from: usize,
        to: usize,
        length: usize,
    },

    /// 带容量上限的重切片边界不满足 `from <= to <= max <= bound`，`bound` 为视图容量。
    #[error("slice bounds [{from}:{to}:{max}] out of range for bound {bound}")]
    SliceOutOfRange {
        from: usize,
        to: usize,
        max: usize,
        bound: usize,
    },
}

impl ViewError {
    /// 返回粗粒度分类。
    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ViewError::IndexOutOfRange { .. }
            | ViewError::ResliceOutOfRange { .. }
            | ViewError::SliceOutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }

    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidArgument => codes::INVALID_ARGUMENT,
            ErrorKind::OutOfRange => codes::OUT_OF_RANGE,
        }
    }
}

/// `alias-view` 统一的结果别名。
pub type Result<T, E = ViewError> = core::result::Result<T, E>;
