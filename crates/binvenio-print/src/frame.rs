// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Response framing for the printer's command channel.
//
// The printer answers different commands with incompatible framings and never
// sends a length prefix, so every reader pulls one byte at a time and decides
// on its own where the message ends:
//
//   line    text up to LF                  (status lines, print confirmation)
//   marked  STX payload ETX                (~HI host identification)
//   object  balanced `{ ... }`, JSON-aware (Link-OS JSON queries)
//   quoted  `"value"`, no escapes          (`! U1 getvar` replies)
//
// Readers never fail loudly. A wrong first byte, a truncated frame, or one
// longer than `MAX_FRAME_LEN` is a `FrameError`, which callers treat exactly
// like silence.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// ASCII Start of Text.
pub const STX: u8 = 0x02;
/// ASCII End of Text.
pub const ETX: u8 = 0x03;

/// Longest reply any reader will buffer. Real replies are well under 1 KiB.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Why a reader produced no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The stream ended (or timed out) before the first byte.
    #[error("no data")]
    NoData,
    /// Wrong first byte, the stream ended mid-frame, or the frame outgrew
    /// `MAX_FRAME_LEN`.
    #[error("malformed frame")]
    Malformed,
}

/// A source that yields one byte at a time.
///
/// `None` means the stream is over for this read: EOF, an I/O error, or the
/// read timeout elapsed.
pub trait ByteSource {
    fn next_byte(&mut self) -> impl Future<Output = Option<u8>> + Send;
}

/// Byte-at-a-time view over a buffered async reader with a per-read timeout.
pub struct ByteStream<R> {
    inner: R,
    timeout: Duration,
    timed_out: bool,
}

impl<R: AsyncBufRead + Unpin + Send> ByteStream<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            timed_out: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Whether the last `None` from `next_byte` was a timeout.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Drop whatever input is already waiting without blocking.
    ///
    /// Printers trail some replies with CR LF after the frame proper; those
    /// bytes must not be mistaken for the first byte of the next reply.
    pub async fn discard_pending(&mut self) -> usize {
        let mut dropped = 0;
        loop {
            let n = match tokio::time::timeout(Duration::ZERO, self.inner.fill_buf()).await {
                Ok(Ok(buf)) => buf.len(),
                _ => 0,
            };
            if n == 0 {
                return dropped;
            }
            self.inner.consume(n);
            dropped += n;
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> ByteSource for ByteStream<R> {
    async fn next_byte(&mut self) -> Option<u8> {
        match tokio::time::timeout(self.timeout, self.inner.read_u8()).await {
            Ok(Ok(byte)) => {
                self.timed_out = false;
                Some(byte)
            }
            Ok(Err(_)) => {
                self.timed_out = false;
                None
            }
            Err(_) => {
                self.timed_out = true;
                None
            }
        }
    }
}

/// The four framings, for callers that pick one at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReader {
    Line,
    Marked,
    BalancedObject,
    Quoted,
}

impl FrameReader {
    pub async fn read<S: ByteSource + Send>(self, src: &mut S) -> Result<Vec<u8>, FrameError> {
        match self {
            Self::Line => read_line(src).await,
            Self::Marked => read_marked(src).await,
            Self::BalancedObject => read_balanced_object(src).await,
            Self::Quoted => read_quoted(src).await,
        }
    }
}

/// Read up to LF and return the bytes before it, minus a trailing CR.
pub async fn read_line<S: ByteSource>(src: &mut S) -> Result<Vec<u8>, FrameError> {
    let mut line = Vec::new();
    loop {
        match src.next_byte().await {
            Some(b'\n') => {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(line);
            }
            Some(byte) => push_bounded(&mut line, byte)?,
            None => return Err(FrameError::NoData),
        }
    }
}

/// Read `STX payload ETX` and return the payload.
pub async fn read_marked<S: ByteSource>(src: &mut S) -> Result<Vec<u8>, FrameError> {
    match src.next_byte().await {
        Some(STX) => {}
        Some(_) => return Err(FrameError::Malformed),
        None => return Err(FrameError::NoData),
    }

    let mut payload = Vec::new();
    loop {
        match src.next_byte().await {
            Some(ETX) => return Ok(payload),
            Some(byte) => push_bounded(&mut payload, byte)?,
            None => return Err(FrameError::Malformed),
        }
    }
}

/// Read one balanced `{ ... }` object, outer braces included.
///
/// Braces inside string literals do not count, and the byte after a
/// backslash is never structural. Reading stops the moment depth returns to
/// zero, so bytes after the object stay in the stream.
pub async fn read_balanced_object<S: ByteSource>(src: &mut S) -> Result<Vec<u8>, FrameError> {
    match src.next_byte().await {
        Some(b'{') => {}
        Some(_) => return Err(FrameError::Malformed),
        None => return Err(FrameError::NoData),
    }

    let mut object = vec![b'{'];
    let mut depth: usize = 1;
    let mut in_string = false;
    let mut escaped = false;

    loop {
        let byte = src.next_byte().await.ok_or(FrameError::Malformed)?;
        push_bounded(&mut object, byte)?;

        if escaped {
            escaped = false;
            continue;
        }

        match byte {
            b'\\' => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(object);
                }
            }
            _ => {}
        }
    }
}

/// Read `"value"` and return the value.
///
/// There is no escape handling: the first `"` after the opening one ends the
/// value.
pub async fn read_quoted<S: ByteSource>(src: &mut S) -> Result<Vec<u8>, FrameError> {
    match src.next_byte().await {
        Some(b'"') => {}
        Some(_) => return Err(FrameError::Malformed),
        None => return Err(FrameError::NoData),
    }

    let mut value = Vec::new();
    loop {
        match src.next_byte().await {
            Some(b'"') => return Ok(value),
            Some(byte) => push_bounded(&mut value, byte)?,
            None => return Err(FrameError::Malformed),
        }
    }
}

fn push_bounded(buf: &mut Vec<u8>, byte: u8) -> Result<(), FrameError> {
    if buf.len() >= MAX_FRAME_LEN {
        return Err(FrameError::Malformed);
    }
    buf.push(byte);
    Ok(())
}
