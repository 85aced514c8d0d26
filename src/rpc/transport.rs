//! Framed Transport (C1): newline-delimited JSON over stdio.
//!
//! Reading and writing are split across two halves so the dispatcher can
//! hold a writer handle independent of whoever owns the read loop.

use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// Recommended floor from spec §4.1: reject lines longer than this as
/// `PARSE_ERROR` rather than buffering unboundedly.
pub const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

pub enum ReadOutcome {
    Line(String),
    Oversize,
    Eof,
}

pub struct LineReader<R> {
    inner: BufReader<R>,
}

impl<R: tokio::io::AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    pub async fn read_line(&mut self) -> std::io::Result<ReadOutcome> {
        let mut buf = String::new();
        let bytes_read = self.inner.read_line(&mut buf).await?;
        if bytes_read == 0 {
            return Ok(ReadOutcome::Eof);
        }
        if buf.len() > MAX_LINE_BYTES {
            return Ok(ReadOutcome::Oversize);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']);
        Ok(ReadOutcome::Line(trimmed.to_string()))
    }
}

/// A writer serialized behind a mutex so concurrent response producers
/// never interleave their output (spec §4.1, §5).
#[derive(Clone)]
pub struct LineWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W: tokio::io::AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub async fn write_value(&self, value: &impl Serialize) -> std::io::Result<()> {
        let mut line = serde_json::to_string(value).expect("response envelopes are always serializable");
        line.push('\n');
        let mut guard = self.inner.lock().await;
        guard.write_all(line.as_bytes()).await?;
        guard.flush().await
    }
}
