//! 可执行的陷阱场景。
//!
//! 每个场景都用库内真实的类型重演一遍对应的陷阱，并把可观察到的中间状态记录为文本行，
//! 供命令行打印或测试断言。

use std::{
    fmt,
    io::{self, Cursor, ErrorKind, Read},
    str::FromStr,
};

use alias_view::{AppendPath, GrowthPolicy, View};
use serde::Deserialize;
use tracing::info;

use crate::{
    config::LabConfig,
    dispatch::{self, Bomb, Detonation},
    error::LabError,
    record::{CopyMode, Record, RecordCopyReport},
    stream::{self, ReadOutcome},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    SliceAppend,
    RecordCopy,
    StreamRead,
    NilHandle,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::SliceAppend,
        ScenarioKind::RecordCopy,
        ScenarioKind::StreamRead,
        ScenarioKind::NilHandle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::SliceAppend => "slice-append",
            ScenarioKind::RecordCopy => "record-copy",
            ScenarioKind::StreamRead => "stream-read",
            ScenarioKind::NilHandle => "nil-handle",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = LabError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ScenarioKind::ALL
            .into_iter()
            .find(|kind| kind.name() == raw)
            .ok_or_else(|| LabError::UnknownScenario(raw.to_owned()))
    }
}

/// 单个场景的输出。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScenarioReport {
    pub kind: ScenarioKind,
    pub lines: Vec<String>,
}

/// 按配置顺序运行全部场景，遇到第一个失败即返回。
pub fn run_all(config: &LabConfig) -> Result<Vec<ScenarioReport>, LabError> {
    config
        .scenarios
        .iter()
        .map(|kind| run(*kind, config))
        .collect()
}

pub fn run(kind: ScenarioKind, config: &LabConfig) -> Result<ScenarioReport, LabError> {
    info!(scenario = %kind, "scenario started");
    let lines = match kind {
        ScenarioKind::SliceAppend => slice_append(&config.growth)?,
        ScenarioKind::RecordCopy => record_copy()?,
        ScenarioKind::StreamRead => stream_read()?,
        ScenarioKind::NilHandle => nil_handle(),
    };
    info!(scenario = %kind, lines = lines.len(), "scenario finished");
    Ok(ScenarioReport { kind, lines })
}

/// 以 `[a b]` 形式渲染可见元素。
pub fn render(view: &View<String>) -> String {
    format!("[{}]", view.to_vec().join(" "))
}

/// 对同一函数分别传入容量为 1 与容量为 10 的视图：
/// 前者追加后搬迁，改写不回流；后者原地追加，改写回流到调用方。
fn slice_append(policy: &GrowthPolicy) -> Result<Vec<String>, LabError> {
    let mut lines = Vec::new();

    let slice1 = View::from_vec(vec!["a".to_owned()]);
    lines.push(describe("slice1", &slice1));
    do_stuff(&slice1, policy, &mut lines)?;

    let slice10: View<String> = View::with_len(1, 10)?;
    slice10.set(0, "a".to_owned())?;
    lines.push(describe("slice10", &slice10));
    do_stuff(&slice10, policy, &mut lines)?;

    Ok(lines)
}

fn do_stuff(
    value: &View<String>,
    policy: &GrowthPolicy,
    lines: &mut Vec<String>,
) -> Result<(), LabError> {
    lines.push(format!("value={}", render(value)));

    let value2 = value.reslice(0, value.len())?;
    let (value2, path) = value2.append_with(policy, ["b".to_owned()]);
    let branch = match path {
        AppendPath::InPlace => "in place".to_owned(),
        AppendPath::Reallocated {
            previous_capacity,
            new_capacity,
        } => format!("reallocated {previous_capacity} -> {new_capacity}"),
    };
    lines.push(format!(
        "value={}, value2={} ({branch})",
        render(value),
        render(&value2)
    ));

    value2.set(0, "z".to_owned())?;
    let verdict = if value2.shares_buffer(value) {
        "value changed through value2"
    } else {
        "value unchanged"
    };
    lines.push(format!(
        "value={}, value2={} ({verdict})",
        render(value),
        render(&value2)
    ));
    Ok(())
}

fn describe(name: &str, view: &View<String>) -> String {
    format!("{name}: len={} cap={}", view.len(), view.capacity())
}

fn record_copy() -> Result<Vec<String>, LabError> {
    let mut lines = Vec::new();
    for mode in [CopyMode::Shallow, CopyMode::Deep] {
        let x = Record::new("x-A", ["x-B"]);
        let report = x.demonstrate_copy(mode, "y-A", "y-B")?;
        lines.push(render_record_report(&report));
    }
    Ok(lines)
}

fn render_record_report(report: &RecordCopyReport) -> String {
    let mode = match report.mode {
        CopyMode::Shallow => "clone",
        CopyMode::Deep => "deep_clone",
    };
    format!(
        "{mode}: {{{} [{}]}} {{{} [{}]}}",
        report.original_label,
        report.original_tags.join(" "),
        report.copy_label,
        report.copy_tags.join(" ")
    )
}

/// 读到一半必然失败的读取器。
struct FailAfter {
    inner: Cursor<&'static [u8]>,
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(ErrorKind::ConnectionReset, "connection reset")),
            n => Ok(n),
        }
    }
}

fn stream_read() -> Result<Vec<String>, LabError> {
    let mut lines = Vec::new();
    let mut reader = Cursor::new(b"hello".as_slice());
    let mut chunk = [0u8; 2];
    loop {
        match stream::read_outcome(&mut reader, &mut chunk) {
            ReadOutcome::Data(n) => lines.push(format!(
                "data: {:?}",
                String::from_utf8_lossy(&chunk[..n])
            )),
            ReadOutcome::EndOfStream => {
                lines.push("end of stream: all good".to_owned());
                break;
            }
            ReadOutcome::Failed(err) => {
                lines.push(format!("failed: {err}"));
                break;
            }
        }
    }

    let mut broken = FailAfter {
        inner: Cursor::new(b"hel".as_slice()),
    };
    match stream::drain(&mut broken, 2) {
        Ok(bytes) => lines.push(format!("drained {} bytes", bytes.len())),
        Err(err) => lines.push(format!("drain failed: {err}")),
    }
    Ok(lines)
}

fn nil_handle() -> Vec<String> {
    let mut lines = Vec::new();
    let candidates = [
        None,
        Some(Box::new(Bomb {
            fuse: "short".to_owned(),
        })),
    ];
    for bomb in candidates {
        let handle = dispatch::into_handle(bomb);
        let line = match dispatch::detonate(handle.as_deref()) {
            Detonation::Absent => "handle is None: nothing to dispatch".to_owned(),
            Detonation::Fired { bang, boom } => format!("handle is Some: {bang}, {boom}"),
        };
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.name().parse::<ScenarioKind>().ok(), Some(kind));
        }
        assert!(matches!(
            "goroutine".parse::<ScenarioKind>(),
            Err(LabError::UnknownScenario(name)) if name == "goroutine"
        ));
    }

    #[test]
    fn nil_handle_lists_both_cases() {
        assert_eq!(
            nil_handle(),
            vec![
                "handle is None: nothing to dispatch".to_owned(),
                "handle is Some: bang, boom (short)".to_owned(),
            ]
        );
    }
}
