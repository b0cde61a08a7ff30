//! 读取结果的三态建模。
//!
//! # 设计背景（Why）
//! - 把“流已结束”塞进错误通道会迫使每个调用点先判错、再特判结束信号，
//!   一旦遗漏就会把正常结束当作故障向上传播。
//! - 这里把单次读取的结果拆成三种互斥情形：读到数据、流结束、真实失败；
//!   结束信号不再是错误，调用方用一次 `match` 即可穷尽处理。
//!
//! # 契约说明（What）
//! - [`read_outcome`]：对非空缓冲返回 `Ok(0)` 即视为 [`ReadOutcome::EndOfStream`]；
//!   `Interrupted` 自动重试，其余错误为 [`ReadOutcome::Failed`]；
//! - [`drain`]：反复读取直到流结束，只把真实失败作为 [`StreamError`] 返回。

use std::io::{self, ErrorKind, Read};

use thiserror::Error;

/// 单次读取的三种结果。
#[derive(Debug)]
pub enum ReadOutcome {
    /// 读到 `n` 个字节。
    Data(usize),
    /// 没有更多数据；不是错误。
    EndOfStream,
    /// 真实的读取失败。
    Failed(io::Error),
}

impl ReadOutcome {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReadOutcome::EndOfStream)
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("read failed after {consumed} bytes")]
    Read {
        consumed: usize,
        #[source]
        source: io::Error,
    },
    #[error("chunk size must be greater than zero")]
    ZeroChunk,
}

/// 执行一次读取并归类结果。
///
/// `buf` 为空时无法区分“流结束”与“无处可写”，按约定返回 `Data(0)`。
pub fn read_outcome<R>(reader: &mut R, buf: &mut [u8]) -> ReadOutcome
where
    R: Read + ?Sized,
{
    if buf.is_empty() {
        return ReadOutcome::Data(0);
    }
    loop {
        match reader.read(buf) {
            Ok(0) => return ReadOutcome::EndOfStream,
            Ok(n) => return ReadOutcome::Data(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return ReadOutcome::Failed(err),
        }
    }
}

/// 以 `chunk_size` 为单位读取到流结束，返回全部字节。
pub fn drain<R>(reader: &mut R, chunk_size: usize) -> Result<Vec<u8>, StreamError>
where
    R: Read + ?Sized,
{
    if chunk_size == 0 {
        return Err(StreamError::ZeroChunk);
    }
    let mut chunk = vec![0u8; chunk_size];
    let mut collected = Vec::new();
    loop {
        match read_outcome(reader, &mut chunk) {
            ReadOutcome::Data(n) => collected.extend_from_slice(&chunk[..n]),
            ReadOutcome::EndOfStream => {
                tracing::debug!(bytes = collected.len(), "stream reached end");
                return Ok(collected);
            }
            ReadOutcome::Failed(source) => {
                return Err(StreamError::Read {
                    consumed: collected.len(),
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// 依次回放预设结果的读取器。
    struct Scripted {
        steps: Vec<io::Result<Vec<u8>>>,
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.steps.is_empty() {
                return Ok(0);
            }
            match self.steps.remove(0) {
                Ok(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Err(err) => Err(err),
            }
        }
    }

    #[test]
    fn end_of_stream_is_not_a_failure() {
        let mut reader = Cursor::new(Vec::<u8>::new());
        let mut buf = [0u8; 4];
        assert!(read_outcome(&mut reader, &mut buf).is_end_of_stream());
    }

    #[test]
    fn drain_collects_everything_until_end() {
        let mut reader = Cursor::new(b"hello, stream".to_vec());
        let bytes = drain(&mut reader, 4).expect("正常结束不应报错");
        assert_eq!(bytes, b"hello, stream");
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut reader = Scripted {
            steps: vec![
                Ok(b"ab".to_vec()),
                Err(io::Error::from(ErrorKind::Interrupted)),
                Ok(b"c".to_vec()),
            ],
        };
        assert_eq!(drain(&mut reader, 8).expect("中断应被重试"), b"abc");
    }

    #[test]
    fn real_failures_propagate_with_progress() {
        let mut reader = Scripted {
            steps: vec![
                Ok(b"abc".to_vec()),
                Err(io::Error::new(ErrorKind::BrokenPipe, "peer gone")),
            ],
        };
        match drain(&mut reader, 8) {
            Err(StreamError::Read { consumed, source }) => {
                assert_eq!(consumed, 3);
                assert_eq!(source.kind(), ErrorKind::BrokenPipe);
            }
            other => panic!("预期读取失败，实际为 {other:?}"),
        }
    }

    #[test]
    fn zero_chunk_is_rejected() {
        let mut reader = Cursor::new(b"x".to_vec());
        assert!(matches!(drain(&mut reader, 0), Err(StreamError::ZeroChunk)));
        assert!(matches!(
            read_outcome(&mut reader, &mut []),
            ReadOutcome::Data(0)
        ));
    }
}
