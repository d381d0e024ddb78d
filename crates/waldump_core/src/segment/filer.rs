//! Segment directory listing and ordered iteration.

use crate::error::{CoreError, CoreResult};
use crate::scan::RecordSource;
use crate::segment::header::{parse_file_name, SegmentId, SegmentInfo};
use crate::segment::reader::SegmentReader;
use crate::segment::StoredRecord;
use std::io;
use std::path::{Path, PathBuf};
use waldump_storage::{FileBackend, StorageBackend};

/// A segment file found in a log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// Base index parsed from the file name.
    pub base_index: u64,
    /// Segment ID parsed from the file name.
    pub id: SegmentId,
}

impl SegmentFile {
    /// Returns the bare file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Read-only access to every segment in a log directory.
///
/// The directory is re-listed on every scan, so segments created by a live
/// writer between scans are picked up.
#[derive(Debug, Clone)]
pub struct SegmentFiler {
    dir: PathBuf,
}

impl SegmentFiler {
    /// Opens a log directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` does not exist or is not a directory.
    pub fn open(dir: &Path) -> CoreResult<Self> {
        let meta = std::fs::metadata(dir).map_err(|e| {
            CoreError::Io(io::Error::new(
                e.kind(),
                format!("cannot open log directory {}: {e}", dir.display()),
            ))
        })?;
        if !meta.is_dir() {
            return Err(CoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", dir.display()),
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Returns the log directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lists segment files ordered by base index.
    ///
    /// Files whose names do not follow the segment naming scheme are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list_segments(&self) -> CoreResult<Vec<SegmentFile>> {
        let mut segments = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some((base_index, id)) = name.to_str().and_then(parse_file_name) else {
                continue;
            };
            segments.push(SegmentFile {
                path: entry.path(),
                base_index,
                id,
            });
        }
        segments.sort_by_key(|s| (s.base_index, s.id));
        Ok(segments)
    }

    /// Opens one segment for reading and checks its header against its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header disagrees
    /// with its file name.
    pub fn open_segment(&self, segment: &SegmentFile) -> CoreResult<SegmentReader<FileBackend>> {
        let name = segment.file_name();
        let backend = FileBackend::open_read_only(&segment.path)?;
        let reader = SegmentReader::open(backend, name.clone())?;
        let info: &SegmentInfo = reader.info();
        if info.base_index != segment.base_index || info.id != segment.id {
            return Err(CoreError::segment_corruption(format!(
                "{name}: header says base index {} id {}",
                info.base_index, info.id
            )));
        }
        Ok(reader)
    }

    /// Returns the size in bytes of a segment file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn segment_size(&self, segment: &SegmentFile) -> CoreResult<u64> {
        Ok(FileBackend::open_read_only(&segment.path)?.size()?)
    }
}

impl RecordSource for SegmentFiler {
    fn for_each_stored_record(
        &self,
        after: u64,
        before: u64,
        visit: &mut dyn FnMut(&SegmentInfo, StoredRecord) -> CoreResult<bool>,
    ) -> CoreResult<()> {
        let segments = self.list_segments()?;
        // Where the previously read segment ended, if it was read to the end.
        let mut expected_base: Option<u64> = None;

        for (i, segment) in segments.iter().enumerate() {
            if before > 0 && segment.base_index >= before {
                break;
            }
            // Every index in this segment is below the next segment's base.
            if let Some(next) = segments.get(i + 1) {
                if next.base_index <= after.saturating_add(1) {
                    expected_base = None;
                    continue;
                }
            }
            if let Some(expected) = expected_base {
                if segment.base_index != expected {
                    return Err(CoreError::segment_corruption(format!(
                        "{}: starts at index {} but the previous segment ends before {expected}",
                        segment.file_name(),
                        segment.base_index
                    )));
                }
            }

            let mut reader = self
                .open_segment(segment)?
                .sealed(i + 1 < segments.len());
            let info = reader.info().clone();
            tracing::debug!(
                segment = %segment.file_name(),
                base_index = info.base_index,
                codec = info.codec,
                "scanning segment"
            );

            for record in &mut reader {
                let record = record?;
                if record.index <= after {
                    continue;
                }
                if before > 0 && record.index >= before {
                    return Ok(());
                }
                if !visit(&info, record)? {
                    return Ok(());
                }
            }
            expected_base = Some(reader.next_index());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentWriter;
    use chrono::Utc;
    use tempfile::tempdir;

    fn write_segment(dir: &Path, id: u64, base_index: u64, count: u64) {
        let info = SegmentInfo::new(SegmentId::new(id), base_index, Utc::now());
        let mut writer = SegmentWriter::create(dir, info).unwrap();
        for i in 0..count {
            writer.append(format!("entry-{}", base_index + i).as_bytes()).unwrap();
        }
        writer.sync().unwrap();
    }

    fn collect(filer: &SegmentFiler, after: u64, before: u64) -> Vec<u64> {
        let mut seen = Vec::new();
        filer
            .for_each_stored_record(after, before, &mut |_, record| {
                seen.push(record.index);
                Ok(true)
            })
            .unwrap();
        seen
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempdir().unwrap();
        let err = SegmentFiler::open(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("cannot open log directory"));
    }

    #[test]
    fn iterates_across_segments_in_order() {
        let dir = tempdir().unwrap();
        write_segment(dir.path(), 2, 4, 3);
        write_segment(dir.path(), 1, 1, 3);
        std::fs::write(dir.path().join("wal-meta.db"), b"not a segment").unwrap();

        let filer = SegmentFiler::open(dir.path()).unwrap();
        assert_eq!(filer.list_segments().unwrap().len(), 2);
        assert_eq!(collect(&filer, 0, 0), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(collect(&filer, 2, 6), vec![3, 4, 5]);
        assert_eq!(collect(&filer, 6, 0), Vec::<u64>::new());
    }

    #[test]
    fn visitor_can_stop_early() {
        let dir = tempdir().unwrap();
        write_segment(dir.path(), 1, 1, 5);
        let filer = SegmentFiler::open(dir.path()).unwrap();

        let mut seen = 0;
        filer
            .for_each_stored_record(0, 0, &mut |_, _| {
                seen += 1;
                Ok(seen < 2)
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn gap_between_segments_is_corruption() {
        let dir = tempdir().unwrap();
        write_segment(dir.path(), 1, 1, 3);
        write_segment(dir.path(), 2, 5, 2);
        let filer = SegmentFiler::open(dir.path()).unwrap();

        let mut seen = Vec::new();
        let err = filer
            .for_each_stored_record(0, 0, &mut |_, record| {
                seen.push(record.index);
                Ok(true)
            })
            .unwrap_err();
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(err.to_string().contains("starts at index 5"));

        // Skipped segments are not read, so their end is not checked.
        assert_eq!(collect(&filer, 5, 0), vec![6]);
    }

    #[test]
    fn torn_tail_only_tolerated_in_last_segment() {
        let dir = tempdir().unwrap();
        write_segment(dir.path(), 1, 1, 2);
        let first = dir.path().join(crate::segment::file_name(1, SegmentId::new(1)));
        let mut bytes = std::fs::read(&first).unwrap();
        bytes.truncate(bytes.len() - 2);
        std::fs::write(&first, bytes).unwrap();

        let filer = SegmentFiler::open(dir.path()).unwrap();
        assert_eq!(collect(&filer, 0, 0), vec![1]);

        write_segment(dir.path(), 2, 3, 1);
        let result = filer.for_each_stored_record(0, 0, &mut |_, _| Ok(true));
        assert!(matches!(result, Err(CoreError::SegmentCorruption { .. })));
    }

    #[test]
    fn header_mismatching_name_is_corruption() {
        let dir = tempdir().unwrap();
        write_segment(dir.path(), 1, 1, 1);
        let from = dir.path().join(crate::segment::file_name(1, SegmentId::new(1)));
        let to = dir.path().join(crate::segment::file_name(50, SegmentId::new(1)));
        std::fs::rename(from, to).unwrap();

        let filer = SegmentFiler::open(dir.path()).unwrap();
        let result = filer.for_each_stored_record(0, 0, &mut |_, _| Ok(true));
        assert!(matches!(result, Err(CoreError::SegmentCorruption { .. })));
    }
}
