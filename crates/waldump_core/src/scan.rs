//! Bounded range scans over stored records.

use crate::error::CoreResult;
use crate::segment::{SegmentInfo, StoredRecord};
use bytes::Bytes;
use parking_lot::RwLock;

/// Storage collaborator that yields stored records in index order.
///
/// `after` and `before` are hints: an implementation may skip work outside
/// them but is allowed to yield records it was not asked for. Iteration stops
/// as soon as `visit` returns `Ok(false)` or an error.
pub trait RecordSource {
    /// Calls `visit` for each stored record, together with its segment's info.
    ///
    /// # Errors
    ///
    /// Returns storage errors and any error returned by `visit`.
    fn for_each_stored_record(
        &self,
        after: u64,
        before: u64,
        visit: &mut dyn FnMut(&SegmentInfo, StoredRecord) -> CoreResult<bool>,
    ) -> CoreResult<()>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn for_each_stored_record(
        &self,
        after: u64,
        before: u64,
        visit: &mut dyn FnMut(&SegmentInfo, StoredRecord) -> CoreResult<bool>,
    ) -> CoreResult<()> {
        (**self).for_each_stored_record(after, before, visit)
    }
}

/// Exclusive index range. A zero on either side disables that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bound {
    /// Only indexes strictly greater than this are visited.
    pub after: u64,
    /// Only indexes strictly less than this are visited, unless zero.
    pub before: u64,
}

impl Bound {
    /// Creates a bound.
    #[must_use]
    pub const fn new(after: u64, before: u64) -> Self {
        Self { after, before }
    }

    /// Creates a bound with no upper limit.
    #[must_use]
    pub const fn open_after(after: u64) -> Self {
        Self { after, before: 0 }
    }

    /// Returns true if `index` lies inside the bound.
    #[must_use]
    pub const fn contains(&self, index: u64) -> bool {
        index > self.after && !self.is_past_end(index)
    }

    /// Returns true if `index` is at or beyond the upper limit.
    #[must_use]
    pub const fn is_past_end(&self, index: u64) -> bool {
        self.before > 0 && index >= self.before
    }
}

/// Position of the last record successfully delivered.
///
/// Owned by the caller and threaded from one scan into the next, so a follow
/// pass resumes exactly where the bounded pass stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCursor {
    /// Index of the last delivered record, or the starting bound.
    pub last_delivered_index: u64,
}

impl ScanCursor {
    /// Creates a cursor positioned at `index`.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self {
            last_delivered_index: index,
        }
    }

    /// Moves the cursor forward. Never moves it backwards.
    pub fn advance(&mut self, index: u64) {
        self.last_delivered_index = self.last_delivered_index.max(index);
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every record in the bound was visited.
    Exhausted,
    /// The callback asked to stop.
    Stopped,
}

/// Drives a [`RecordSource`] over a [`Bound`].
#[derive(Debug, Clone)]
pub struct RangeScanner<S> {
    source: S,
}

impl<S: RecordSource> RangeScanner<S> {
    /// Creates a scanner over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Visits every record inside `bound` in index order.
    ///
    /// Records the source yields outside the bound are dropped here. After
    /// each record the callback accepts, `cursor` moves to its index; the
    /// callback returns `Ok(false)` to stop after the current record.
    ///
    /// # Errors
    ///
    /// Storage and callback errors end the scan and are returned unchanged.
    pub fn scan<F>(&self, bound: Bound, cursor: &mut ScanCursor, mut on_record: F) -> CoreResult<ScanOutcome>
    where
        F: FnMut(&SegmentInfo, StoredRecord) -> CoreResult<bool>,
    {
        let mut outcome = ScanOutcome::Exhausted;
        self.source
            .for_each_stored_record(bound.after, bound.before, &mut |info, record| {
                if record.index <= bound.after {
                    return Ok(true);
                }
                if bound.is_past_end(record.index) {
                    return Ok(false);
                }
                let index = record.index;
                tracing::trace!(index, "delivering record");
                let keep_going = on_record(info, record)?;
                cursor.advance(index);
                if !keep_going {
                    outcome = ScanOutcome::Stopped;
                }
                Ok(keep_going)
            })?;
        Ok(outcome)
    }
}

/// In-memory [`RecordSource`] holding a single segment.
///
/// Ignores the bounds it is given and yields everything, so callers cannot
/// rely on the source for filtering. Records may be appended while a scan is
/// running; they show up on the next scan.
#[derive(Debug)]
pub struct MemoryRecordSource {
    info: SegmentInfo,
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryRecordSource {
    /// Creates an empty source whose first record gets `info.base_index`.
    #[must_use]
    pub fn new(info: SegmentInfo) -> Self {
        Self {
            info,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Appends a record and returns its index.
    pub fn push(&self, data: impl Into<Bytes>) -> u64 {
        let mut records = self.records.write();
        let index = self.info.base_index + records.len() as u64;
        records.push(StoredRecord {
            index,
            data: data.into(),
        });
        index
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordSource for MemoryRecordSource {
    fn for_each_stored_record(
        &self,
        _after: u64,
        _before: u64,
        visit: &mut dyn FnMut(&SegmentInfo, StoredRecord) -> CoreResult<bool>,
    ) -> CoreResult<()> {
        let snapshot = self.records.read().clone();
        for record in snapshot {
            if !visit(&self.info, record)? {
                break;
            }
        }
        Ok(())
    }
}
