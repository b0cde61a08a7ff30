//! `alias-view` 提供共享底层缓冲的可扩容切片视图。
//!
//! # 模块定位（Why）
//! - 精确复现“切片”这一抽象的别名语义：重切片不复制、写入对所有重叠视图可见、
//!   追加在容量足够时覆盖原缓冲而在容量不足时搬迁到新缓冲。
//! - 可作为正确性检查器或教学模拟器的底座，用断言而不是文字说明这些行为。
//!
//! # 设计概要（How）
//! - `buffer` 模块实现 [`Buffer`]：`Arc` 共享、自旋锁保护的定长存储；
//! - `view` 模块实现 [`View`]：偏移、长度、容量三元组加缓冲句柄，以及追加的两条分支；
//! - `growth` 模块实现 [`GrowthPolicy`]：仅在重新分配时决定新缓冲的大小；
//! - `error` 模块定义 [`ViewError`] 与稳定错误码。
//!
//! # 示例
//! ```rust
//! use alias_view::View;
//!
//! let value: View<&str> = View::with_len(1, 10).unwrap();
//! value.set(0, "a").unwrap();
//! let value2 = value.append(["b"]);
//! value2.set(0, "z").unwrap();
//! assert_eq!(value.to_vec(), vec!["z"]);
//! ```

mod buffer;
pub mod error;
mod growth;
mod view;

pub use buffer::Buffer;
pub use error::{ErrorKind, Result, ViewError};
pub use growth::{DEFAULT_AMORTIZED_THRESHOLD, GrowthPolicy};
pub use view::{AppendPath, View};
