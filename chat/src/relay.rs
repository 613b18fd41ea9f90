//! Forwards generator output to the caller as bytes.
//!
//! The relay is a pull-based [`Stream`]: it polls the generator only when the
//! downstream consumer polls it, so at most one chunk is in flight and the
//! consumer's pace is the generator's pace. Dropping the relay drops the
//! generator stream, which cancels generation.
//!
//! ```text
//! Idle ──start──► Streaming ──end of source──────────► Closed
//!                     │                                  ▲
//!                     └──error──► Errored ──next poll────┘
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{FusedStream, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::generator::ChunkStream;

/// Lifecycle of a [`StreamingRelay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// No generator stream attached yet.
    Idle,
    /// Forwarding chunks.
    Streaming,
    /// An error was emitted; the next poll closes.
    Errored,
    /// Terminal. The source has been released.
    Closed,
}

/// Relays text chunks from a generator to a byte consumer.
pub struct StreamingRelay {
    state: RelayState,
    source: Option<ChunkStream>,
    forwarded: usize,
}

impl StreamingRelay {
    /// Create an idle relay.
    pub fn new() -> Self {
        Self {
            state: RelayState::Idle,
            source: None,
            forwarded: 0,
        }
    }

    /// Create a relay already streaming from `source`.
    pub fn streaming(source: ChunkStream) -> Self {
        let mut relay = Self::new();
        relay.start(source);
        relay
    }

    /// Attach the generator stream. Only an idle relay can start.
    pub fn start(&mut self, source: ChunkStream) {
        if self.state != RelayState::Idle {
            warn!("Ignoring start on relay in state {:?}", self.state);
            return;
        }
        self.source = Some(source);
        self.state = RelayState::Streaming;
        debug!("Relay streaming");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Number of chunks forwarded downstream so far.
    pub fn forwarded(&self) -> usize {
        self.forwarded
    }

    fn close(&mut self) {
        if self.state == RelayState::Closed {
            return;
        }
        self.source = None;
        self.state = RelayState::Closed;
        info!("Relay closed after forwarding {} chunks", self.forwarded);
    }
}

impl Default for StreamingRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for StreamingRelay {
    type Item = Result<Bytes, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        loop {
            match this.state {
                RelayState::Closed => return Poll::Ready(None),
                RelayState::Idle | RelayState::Errored => {
                    this.close();
                    return Poll::Ready(None);
                }
                RelayState::Streaming => {}
            }

            let Some(source) = this.source.as_mut() else {
                this.close();
                return Poll::Ready(None);
            };

            match source.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    // Events without text are skipped; pull the next one.
                    if let Some(text) = chunk.text_content() {
                        this.forwarded += 1;
                        return Poll::Ready(Some(Ok(Bytes::copy_from_slice(text.as_bytes()))));
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    warn!(
                        "Generation failed after {} forwarded chunks: {err}",
                        this.forwarded
                    );
                    this.source = None;
                    this.state = RelayState::Errored;
                    return Poll::Ready(Some(Err(ChatError::Generation(err))));
                }
                Poll::Ready(None) => {
                    this.close();
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl FusedStream for StreamingRelay {
    fn is_terminated(&self) -> bool {
        self.state == RelayState::Closed
    }
}

impl Drop for StreamingRelay {
    fn drop(&mut self) {
        if self.state == RelayState::Streaming {
            info!(
                "Downstream went away after {} chunks; cancelling generation",
                self.forwarded
            );
        }
    }
}
