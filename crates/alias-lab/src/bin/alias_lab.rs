//! 陷阱演示入口：加载配置、安装日志订阅器并依次打印各场景报告。
//!
//! # 使用方法
//! ```bash
//! cargo run --bin alias_lab -- lab.toml --scenario slice-append --scenario nil-handle
//! ```
//! - `lab.toml`：可选，TOML 配置文件；缺省时使用内置默认值；
//! - `--scenario`：可重复，覆盖配置中的场景列表；
//! - 环境变量 `ALIAS_LAB_LOG` 覆盖日志过滤级别。

use std::{env, path::PathBuf, process};

use alias_lab::{LabConfig, ScenarioKind, logging, scenario};
use anyhow::{Context, bail};

fn main() {
    if let Err(error) = run() {
        eprintln!("alias_lab 运行失败: {error:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let mut config_path = None;
    let mut selected = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => {
                let name = args
                    .next()
                    .context("--scenario 之后必须提供场景名")?;
                selected.push(name.parse::<ScenarioKind>()?);
            }
            flag if flag.starts_with("--") => bail!("未知参数: {flag}"),
            path => {
                if config_path.replace(PathBuf::from(path)).is_some() {
                    bail!("只能指定一个配置文件");
                }
            }
        }
    }

    let mut config = match &config_path {
        Some(path) => LabConfig::load(path)
            .with_context(|| format!("加载配置 {} 失败", path.display()))?,
        None => LabConfig::default(),
    }
    .with_env_override();
    if !selected.is_empty() {
        config.scenarios = selected;
    }

    logging::install(&config.log_filter).context("安装 tracing 订阅器失败")?;

    for report in scenario::run_all(&config)? {
        println!("== {}", report.kind);
        for line in &report.lines {
            println!("{line}");
        }
    }
    Ok(())
}
