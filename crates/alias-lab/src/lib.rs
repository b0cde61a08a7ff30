//! `alias-lab` 把几类语言层面的陷阱写成可执行、可断言的场景。
//!
//! # 模块定位（Why）
//! - `alias-view` 只负责视图与缓冲的契约；本 crate 在其上组合出完整的演示：
//!   切片追加、记录拷贝、流结束信号、多态句柄空值分派。
//! - 配置、日志与命令行入口同样放在这里，核心库因此保持无副作用。
//!
//! # 结构概览（How）
//! - `record`：内联字段与引用字段在拷贝时的不同表现；
//! - `stream`：三态读取结果，结束信号不再混入错误通道；
//! - `dispatch`：说明类型化空指针陷阱在 `Option<Box<dyn Trait>>` 下无法构造；
//! - `scenario`：按名称运行上述演示并输出文本报告；
//! - `config` / `logging`：TOML 配置与 `tracing-subscriber` 安装。

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod record;
pub mod scenario;
pub mod stream;

pub use config::LabConfig;
pub use error::LabError;
pub use scenario::{ScenarioKind, ScenarioReport};
