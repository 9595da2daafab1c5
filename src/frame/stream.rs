//! Incremental, byte-at-a-time frame receiver

use tracing::{debug, trace};

use super::codec::{Frame, validate};
use super::stats::ReceiverStats;
use super::{DEFAULT_MAX_FRAME_LEN, END_BYTE, ESCAPE_BYTE, ESCAPE_XOR, FrameError, START_BYTE};

/// Receiver position relative to frame boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReceiverState {
    /// Waiting for a START marker; other bytes are dropped
    #[default]
    Idle,
    /// Accumulating frame bytes
    InFrame,
    /// Previous byte was ESCAPE; the next one is unmasked
    EscapePending,
}

/// Receiver tuning
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeframerConfig {
    /// Largest unescaped partial frame (START included) the accumulator may
    /// hold while waiting for END
    pub max_frame_len: usize,
}

impl Default for DeframerConfig {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Push-style frame receiver for one channel.
///
/// Feed it bytes in arrival order; each call consumes exactly one byte and
/// yields at most one completed result. Bytes outside a frame are dropped,
/// escapes are removed as they arrive, and the unescaped frame is checked with
/// [`validate`] when END is seen. After any result the receiver is back in
/// [`ReceiverState::Idle`] and resynchronizes on the next START.
///
/// ```rust
/// use serframe::frame::{StreamDeframer, frame};
///
/// let wire = frame(3, b"ping")?;
/// let mut receiver = StreamDeframer::new();
///
/// let results = receiver.push_slice(&wire);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].as_ref().unwrap().payload.as_ref(), b"ping");
/// # Ok::<(), serframe::Error>(())
/// ```
#[derive(Debug)]
pub struct StreamDeframer {
    config: DeframerConfig,
    state: ReceiverState,
    buffer: Vec<u8>,
    stats: ReceiverStats,
}

impl Default for StreamDeframer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDeframer {
    /// Create a receiver with the default accumulator limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DeframerConfig::default())
    }

    /// Create a receiver with the provided configuration
    #[must_use]
    pub fn with_config(config: DeframerConfig) -> Self {
        Self {
            buffer: Vec::with_capacity(config.max_frame_len.min(DEFAULT_MAX_FRAME_LEN)),
            config,
            state: ReceiverState::Idle,
            stats: ReceiverStats::default(),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &DeframerConfig {
        &self.config
    }

    /// Current receiver state
    #[must_use]
    pub const fn state(&self) -> ReceiverState {
        self.state
    }

    /// Unescaped bytes of the partial frame, START included
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Counters since creation
    #[must_use]
    pub const fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Abandon any partial frame and wait for the next START
    pub fn reset(&mut self) {
        if self.state != ReceiverState::Idle {
            trace!(buffered = self.buffer.len(), "abandoning partial frame");
            self.stats.resets += 1;
        }
        self.clear();
    }

    /// Consume one byte.
    ///
    /// Returns `Some` when the byte completes a frame (valid or not) or
    /// overflows the accumulator.
    pub fn push(&mut self, byte: u8) -> Option<Result<Frame, FrameError>> {
        self.stats.bytes_received += 1;

        match self.state {
            ReceiverState::Idle => {
                if byte == START_BYTE {
                    self.buffer.clear();
                    self.buffer.push(START_BYTE);
                    self.state = ReceiverState::InFrame;
                } else {
                    self.stats.bytes_discarded += 1;
                }
                None
            }
            ReceiverState::EscapePending => {
                self.state = ReceiverState::InFrame;
                self.append(byte ^ ESCAPE_XOR)
            }
            ReceiverState::InFrame => match byte {
                ESCAPE_BYTE => {
                    self.state = ReceiverState::EscapePending;
                    None
                }
                END_BYTE => {
                    // END always lands; the limit applies to bytes still
                    // waiting for one
                    self.buffer.push(END_BYTE);
                    Some(self.complete())
                }
                _ => self.append(byte),
            },
        }
    }

    /// Feed a run of bytes, collecting every completed result in order
    pub fn push_slice(&mut self, bytes: &[u8]) -> Vec<Result<Frame, FrameError>> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    fn append(&mut self, byte: u8) -> Option<Result<Frame, FrameError>> {
        if self.buffer.len() >= self.config.max_frame_len {
            let limit = self.config.max_frame_len;
            debug!(limit, "frame exceeded accumulator limit, discarding");
            self.stats.overflows += 1;
            self.clear();
            return Some(Err(FrameError::BufferOverflow { limit }));
        }

        self.buffer.push(byte);
        None
    }

    fn complete(&mut self) -> Result<Frame, FrameError> {
        let result = validate(&self.buffer);
        match &result {
            Ok(frame) => {
                trace!(
                    message_id = frame.message_id,
                    len = frame.payload.len(),
                    "frame accepted"
                );
                self.stats.frames_accepted += 1;
            }
            Err(err) => {
                debug!(reason = err.reason(), len = self.buffer.len(), "frame rejected");
                self.stats.frames_rejected += 1;
            }
        }
        self.clear();
        result
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.state = ReceiverState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{deframe, frame};

    fn feed(receiver: &mut StreamDeframer, bytes: &[u8]) -> Vec<Result<Frame, FrameError>> {
        receiver.push_slice(bytes)
    }

    #[test]
    fn test_single_frame() {
        let wire = frame(5, b"payload").unwrap();
        let mut receiver = StreamDeframer::new();

        for &byte in &wire[..wire.len() - 1] {
            assert!(receiver.push(byte).is_none());
        }
        let frame = receiver.push(END_BYTE).unwrap().unwrap();

        assert_eq!(frame.message_id, 5);
        assert_eq!(frame.payload.as_ref(), b"payload");
        assert_eq!(receiver.state(), ReceiverState::Idle);
    }

    #[test]
    fn test_state_transitions() {
        let mut receiver = StreamDeframer::new();
        assert_eq!(receiver.state(), ReceiverState::Idle);

        receiver.push(0x55);
        assert_eq!(receiver.state(), ReceiverState::Idle);
        assert!(receiver.buffered().is_empty());

        receiver.push(START_BYTE);
        assert_eq!(receiver.state(), ReceiverState::InFrame);
        assert_eq!(receiver.buffered(), &[START_BYTE]);

        receiver.push(ESCAPE_BYTE);
        assert_eq!(receiver.state(), ReceiverState::EscapePending);
        assert_eq!(receiver.buffered(), &[START_BYTE]);

        receiver.push(0x5D);
        assert_eq!(receiver.state(), ReceiverState::InFrame);
        assert_eq!(receiver.buffered(), &[START_BYTE, END_BYTE]);
    }

    #[test]
    fn test_noise_between_frames_is_dropped() {
        let mut stream = vec![0x00, 0xFF, END_BYTE, ESCAPE_BYTE];
        stream.extend(frame(1, b"first").unwrap());
        stream.extend([0x13, 0x37]);
        stream.extend(frame(2, &[START_BYTE, END_BYTE]).unwrap());

        let mut receiver = StreamDeframer::new();
        let results = feed(&mut receiver, &stream);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().payload.as_ref(), b"first");
        assert_eq!(
            results[1].as_ref().unwrap().payload.as_ref(),
            &[START_BYTE, END_BYTE]
        );
        assert_eq!(receiver.stats().bytes_discarded, 6);
        assert_eq!(receiver.stats().frames_accepted, 2);
    }

    #[test]
    fn test_corrupt_frame_then_recovery() {
        let mut corrupted = frame(1, b"abcdef").unwrap();
        corrupted[6] ^= 0x01;

        let mut stream = corrupted;
        stream.extend(frame(2, b"ok").unwrap());

        let mut receiver = StreamDeframer::new();
        let results = feed(&mut receiver, &stream);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap_err().reason(), "CRC mismatch");
        assert_eq!(results[1].as_ref().unwrap().message_id, 2);
        assert_eq!(receiver.stats().frames_rejected, 1);
    }

    #[test]
    fn test_truncated_frame_is_rejected() {
        let mut receiver = StreamDeframer::new();
        let results = feed(&mut receiver, &[START_BYTE, 1, END_BYTE]);
        assert_eq!(results, vec![Err(FrameError::TooSmall { len: 3 })]);
    }

    #[test]
    fn test_overflow_then_fresh_frame() {
        let mut receiver = StreamDeframer::new();
        receiver.push(START_BYTE);

        let mut overflow = None;
        for _ in 0..DEFAULT_MAX_FRAME_LEN + 8 {
            if let Some(result) = receiver.push(0x11) {
                overflow = Some(result);
                break;
            }
        }

        assert_eq!(
            overflow,
            Some(Err(FrameError::BufferOverflow {
                limit: DEFAULT_MAX_FRAME_LEN
            }))
        );
        assert_eq!(
            overflow.unwrap().unwrap_err().to_string(),
            "buffer overflow"
        );
        assert_eq!(receiver.state(), ReceiverState::Idle);
        assert_eq!(receiver.stats().overflows, 1);

        let results = feed(&mut receiver, &frame(9, b"again").unwrap());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().message_id, 9);
    }

    #[test]
    fn test_overflow_fires_on_byte_past_limit() {
        let mut receiver = StreamDeframer::with_config(DeframerConfig { max_frame_len: 8 });
        receiver.push(START_BYTE);
        for _ in 0..7 {
            assert!(receiver.push(0x01).is_none());
        }
        assert_eq!(receiver.buffered().len(), 8);
        assert!(matches!(
            receiver.push(0x01),
            Some(Err(FrameError::BufferOverflow { limit: 8 }))
        ));
        assert!(receiver.buffered().is_empty());
    }

    #[test]
    fn test_frame_at_exact_limit_is_accepted() {
        let payload = vec![0x42; 10];
        let wire = frame(1, &payload).unwrap();
        let limit = payload.len() + crate::frame::FRAME_OVERHEAD;

        let mut receiver = StreamDeframer::with_config(DeframerConfig {
            max_frame_len: limit,
        });
        let results = feed(&mut receiver, &wire);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());

        // END itself is never counted against the limit
        let mut receiver = StreamDeframer::with_config(DeframerConfig {
            max_frame_len: limit - 1,
        });
        let results = feed(&mut receiver, &wire);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());

        let mut receiver = StreamDeframer::with_config(DeframerConfig {
            max_frame_len: limit - 2,
        });
        let results = feed(&mut receiver, &wire);
        assert!(matches!(
            results.as_slice(),
            [Err(FrameError::BufferOverflow { .. })]
        ));
    }

    #[test]
    fn test_end_past_default_limit_is_validated() {
        // 1018-byte payload: 1024 bytes before END, 1025 with it
        let wire = frame(1, &[0x11; 1018]).unwrap();
        assert!(deframe(&wire).is_ok());

        let mut receiver = StreamDeframer::new();
        let results = feed(&mut receiver, &wire);
        assert_eq!(results, vec![deframe(&wire)]);
        assert_eq!(receiver.stats().overflows, 0);

        let mut stalled = vec![START_BYTE];
        stalled.extend(std::iter::repeat_n(0x11, DEFAULT_MAX_FRAME_LEN));
        let results = feed(&mut receiver, &stalled);
        assert_eq!(
            results,
            vec![Err(FrameError::BufferOverflow {
                limit: DEFAULT_MAX_FRAME_LEN
            })]
        );
    }

    #[test]
    fn test_unbounded_limit_does_not_preallocate() {
        let mut receiver = StreamDeframer::with_config(DeframerConfig {
            max_frame_len: usize::MAX,
        });
        assert_eq!(receiver.config().max_frame_len, usize::MAX);

        let payload = vec![0x5A; 4096];
        let results = feed(&mut receiver, &frame(8, &payload).unwrap());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn test_reset_abandons_partial_frame() {
        let wire = frame(4, b"partial").unwrap();
        let mut receiver = StreamDeframer::new();

        assert!(feed(&mut receiver, &wire[..5]).is_empty());
        assert_eq!(receiver.state(), ReceiverState::InFrame);

        receiver.reset();
        assert_eq!(receiver.state(), ReceiverState::Idle);
        assert!(receiver.buffered().is_empty());
        assert_eq!(receiver.stats().resets, 1);

        // Remainder of the old frame is noise until the next START
        assert!(feed(&mut receiver, &wire[5..]).is_empty());
        assert_eq!(feed(&mut receiver, &wire).len(), 1);
    }

    #[test]
    fn test_start_inside_frame_is_data() {
        let mut receiver = StreamDeframer::new();
        receiver.push(START_BYTE);
        receiver.push(START_BYTE);
        assert_eq!(receiver.buffered(), &[START_BYTE, START_BYTE]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: byte-at-a-time receive matches whole-buffer deframe
            #[test]
            fn prop_stream_matches_deframe(
                id in any::<u8>(),
                payload in prop::collection::vec(any::<u8>(), 0..=256),
            ) {
                let wire = frame(id, &payload).unwrap();
                let mut receiver = StreamDeframer::new();
                let results = receiver.push_slice(&wire);

                prop_assert_eq!(results.len(), 1);
                prop_assert_eq!(&results[0], &deframe(&wire));
                prop_assert_eq!(receiver.state(), ReceiverState::Idle);
            }

            /// Property: back-to-back frames are all recovered in order
            #[test]
            fn prop_back_to_back_frames(
                frames in prop::collection::vec(
                    (any::<u8>(), prop::collection::vec(any::<u8>(), 0..64)),
                    1..8,
                ),
            ) {
                let mut stream = Vec::new();
                for (id, payload) in &frames {
                    stream.extend(frame(*id, payload).unwrap());
                }

                let mut receiver = StreamDeframer::new();
                let results = receiver.push_slice(&stream);

                prop_assert_eq!(results.len(), frames.len());
                for (result, (id, payload)) in results.iter().zip(&frames) {
                    let decoded = result.as_ref().unwrap();
                    prop_assert_eq!(decoded.message_id, *id);
                    prop_assert_eq!(decoded.payload.as_ref(), payload.as_slice());
                }
            }

            /// Property: noise never wedges the receiver
            #[test]
            fn prop_recovers_after_noise(
                noise in prop::collection::vec(any::<u8>(), 0..2048),
                payload in prop::collection::vec(any::<u8>(), 0..64),
            ) {
                let mut receiver = StreamDeframer::new();
                let _ = receiver.push_slice(&noise);
                receiver.reset();

                let results = receiver.push_slice(&frame(1, &payload).unwrap());
                prop_assert_eq!(results.len(), 1);
                prop_assert_eq!(results[0].as_ref().unwrap().payload.as_ref(), payload.as_slice());
            }
        }
    }
}
