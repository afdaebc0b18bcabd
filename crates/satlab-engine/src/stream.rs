//! Decoding of server-sent-event chat-completion streams.
//!
//! Each event line looks like `data: {json}` with the text delta at
//! `choices[0].delta.content`. `data: [DONE]` and lines that fail to decode
//! are skipped.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use serde_json::Value;

const DATA_PREFIX: &str = "data: ";
const DONE: &str = "[DONE]";

/// Incrementally appended text built from raw stream chunks.
///
/// Lines may be split across chunks; the unfinished tail is held until the
/// next chunk or [`DeltaBuffer::finish`].
#[derive(Debug, Default)]
pub struct DeltaBuffer {
    partial: Vec<u8>,
    text: String,
    cancelled: bool,
}

impl DeltaBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning the deltas completed by it.
    pub fn push_chunk(&mut self, chunk: impl AsRef<[u8]>) -> Vec<String> {
        if self.cancelled {
            return Vec::new();
        }
        self.partial.extend_from_slice(chunk.as_ref());
        let mut deltas = Vec::new();
        while let Some(pos) = self.partial.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            if let Some(delta) = self.accept_line(&line) {
                deltas.push(delta);
            }
        }
        deltas
    }

    /// Decode whatever is left after the last newline.
    pub fn finish(&mut self) -> Vec<String> {
        if self.cancelled || self.partial.is_empty() {
            return Vec::new();
        }
        let line = std::mem::take(&mut self.partial);
        self.accept_line(&line).into_iter().collect()
    }

    fn accept_line(&mut self, raw: &[u8]) -> Option<String> {
        let line = String::from_utf8_lossy(raw);
        let delta = decode_line(line.trim_end_matches(['\n', '\r']))?;
        self.text.push_str(&delta);
        Some(delta)
    }

    /// Stop appending and drop everything decoded so far.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.partial.clear();
        self.text.clear();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// The text delta carried by one event line, if any.
pub fn decode_line(line: &str) -> Option<String> {
    let data = line.strip_prefix(DATA_PREFIX)?;
    if data.trim() == DONE {
        return None;
    }
    let value: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "skipping undecodable stream line");
            return None;
        }
    };
    value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Lazy sequence of text deltas over a source of raw chunks.
///
/// Finite and single-pass. After [`DeltaStream::cancel`] it yields nothing
/// more and its text is empty.
pub struct DeltaStream<I> {
    source: I,
    buffer: DeltaBuffer,
    ready: VecDeque<String>,
    exhausted: bool,
}

impl<I, C> DeltaStream<I>
where
    I: Iterator<Item = C>,
    C: AsRef<[u8]>,
{
    pub fn new(source: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            source: source.into_iter(),
            buffer: DeltaBuffer::new(),
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn cancel(&mut self) {
        self.buffer.cancel();
        self.ready.clear();
    }

    /// Text decoded so far, including deltas not yet yielded.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Drain the rest of the stream and return the full text.
    pub fn collect_text(mut self) -> String {
        while self.next().is_some() {}
        self.buffer.into_text()
    }
}

impl<I, C> Iterator for DeltaStream<I>
where
    I: Iterator<Item = C>,
    C: AsRef<[u8]>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.buffer.is_cancelled() {
                return None;
            }
            if let Some(delta) = self.ready.pop_front() {
                return Some(delta);
            }
            if self.exhausted {
                return None;
            }
            match self.source.next() {
                Some(chunk) => self.ready.extend(self.buffer.push_chunk(chunk)),
                None => {
                    self.exhausted = true;
                    self.ready.extend(self.buffer.finish());
                }
            }
        }
    }
}

impl<I, C> FusedIterator for DeltaStream<I>
where
    I: Iterator<Item = C>,
    C: AsRef<[u8]>,
{
}
