//! Follow mode: repeated scans that surface newly appended records.
//!
//! The controller polls. Each pass scans everything after the cursor, then
//! the controller sleeps for the poll interval. New records therefore become
//! visible at most one interval after they are appended. The lower bound of
//! each pass is the cursor, which only moves forward, so a record is never
//! delivered twice.

use crate::error::CoreResult;
use crate::scan::{Bound, RangeScanner, RecordSource, ScanCursor, ScanOutcome};
use crate::segment::{SegmentInfo, StoredRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default delay between follow passes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Longest uninterrupted sleep, so cancellation is noticed promptly.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Shared flag that stops a [`TailController`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Polls a [`RangeScanner`] for records past the cursor.
#[derive(Debug)]
pub struct TailController<S> {
    scanner: RangeScanner<S>,
    poll_interval: Duration,
    cancel: Option<CancelToken>,
}

impl<S: RecordSource> TailController<S> {
    /// Creates a controller polling every `poll_interval`.
    pub fn new(scanner: RangeScanner<S>, poll_interval: Duration) -> Self {
        Self {
            scanner,
            poll_interval,
            cancel: None,
        }
    }

    /// Makes the controller stop once `token` is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Follows the log starting after `cursor`.
    ///
    /// Returns the final cursor when the callback returns `Ok(false)` or the
    /// cancel token fires. Without a token and with a callback that never
    /// stops, this runs until an error.
    ///
    /// # Errors
    ///
    /// The first storage or callback error ends the loop and is returned.
    pub fn follow<F>(&self, mut cursor: ScanCursor, mut on_record: F) -> CoreResult<ScanCursor>
    where
        F: FnMut(&SegmentInfo, StoredRecord) -> CoreResult<bool>,
    {
        loop {
            if self.is_cancelled() {
                tracing::debug!(last_index = cursor.last_delivered_index, "follow cancelled");
                return Ok(cursor);
            }

            let start = cursor.last_delivered_index;
            let outcome = self
                .scanner
                .scan(Bound::open_after(start), &mut cursor, &mut on_record)?;
            tracing::trace!(
                after = start,
                last_index = cursor.last_delivered_index,
                "follow pass complete"
            );

            if outcome == ScanOutcome::Stopped {
                return Ok(cursor);
            }
            self.pause();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn pause(&self) {
        if self.cancel.is_none() {
            std::thread::sleep(self.poll_interval);
            return;
        }
        let deadline = Instant::now() + self.poll_interval;
        loop {
            let now = Instant::now();
            if now >= deadline || self.is_cancelled() {
                return;
            }
            std::thread::sleep((deadline - now).min(CANCEL_CHECK_INTERVAL));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::scan::MemoryRecordSource;
    use crate::segment::SegmentId;
    use chrono::Utc;

    fn source(count: u64) -> MemoryRecordSource {
        let source = MemoryRecordSource::new(SegmentInfo::new(SegmentId::new(1), 1, Utc::now()));
        for i in 0..count {
            source.push(vec![i as u8]);
        }
        source
    }

    #[test]
    fn never_redelivers_across_passes() {
        // The source replays from index 1 on every pass.
        let log = source(3);
        let tail = TailController::new(RangeScanner::new(&log), Duration::from_millis(1));

        let mut seen = Vec::new();
        let cursor = tail
            .follow(ScanCursor::default(), |_, record| {
                seen.push(record.index);
                if record.index == 3 {
                    log.push(vec![3u8]);
                    log.push(vec![4u8]);
                }
                Ok(record.index < 5)
            })
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(cursor.last_delivered_index, 5);
    }

    #[test]
    fn starts_after_the_given_cursor() {
        let log = source(4);
        let tail = TailController::new(RangeScanner::new(&log), Duration::from_millis(1));

        let mut seen = Vec::new();
        tail.follow(ScanCursor::new(2), |_, record| {
            seen.push(record.index);
            Ok(record.index < 4)
        })
        .unwrap();
        assert_eq!(seen, vec![3, 4]);
    }

    #[test]
    fn cancellation_stops_an_idle_follow() {
        let log = source(2);
        let token = CancelToken::new();
        let tail = TailController::new(RangeScanner::new(&log), Duration::from_secs(30))
            .with_cancel(token.clone());

        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            token.cancel();
        });

        let started = Instant::now();
        let cursor = tail.follow(ScanCursor::default(), |_, _| Ok(true)).unwrap();
        canceller.join().unwrap();

        assert_eq!(cursor.last_delivered_index, 2);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn already_cancelled_token_delivers_nothing() {
        let log = source(2);
        let token = CancelToken::new();
        token.cancel();
        let tail = TailController::new(RangeScanner::new(&log), Duration::from_millis(1))
            .with_cancel(token);

        let cursor = tail
            .follow(ScanCursor::new(7), |_, _| panic!("nothing should be delivered"))
            .unwrap();
        assert_eq!(cursor.last_delivered_index, 7);
    }

    #[test]
    fn callback_error_ends_follow() {
        let log = source(3);
        let tail = TailController::new(RangeScanner::new(&log), Duration::from_millis(1));
        let err = tail
            .follow(ScanCursor::default(), |_, record| {
                if record.index == 2 {
                    Err(CoreError::invariant_violation("Index should only exist in snapshots"))
                } else {
                    Ok(true)
                }
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::InvariantViolation { .. }));
    }
}
