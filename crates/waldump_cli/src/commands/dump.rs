//! Dump command implementation.

use std::io::{self, Write};
use std::path::Path;
use waldump_core::{
    CoreResult, DumpConfig, DumpRecord, Dumper, RangeScanner, ScanCursor, ScanOutcome,
    SegmentFiler, SegmentInfo, StoredRecord, TailController,
};

/// Runs the dump command, writing JSON lines to stdout.
pub fn run(dir: &Path, config: &DumpConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    dump_to(dir, config, stdout.lock())
}

/// Dumps the log in `dir` to `out`, one JSON object per line.
///
/// In follow mode this only returns on error or when `out` is closed.
pub fn dump_to<W: Write>(
    dir: &Path,
    config: &DumpConfig,
    mut out: W,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let scanner = RangeScanner::new(SegmentFiler::open(dir)?);
    let dumper = Dumper::new(config.short);
    let mut emit = |info: &SegmentInfo, record: StoredRecord| -> CoreResult<bool> {
        let line = dumper.dump_entry(info, &record)?;
        write_line(&mut out, &line)
    };

    let mut cursor = ScanCursor::new(config.after);
    let outcome = scanner.scan(config.bound(), &mut cursor, &mut emit)?;
    tracing::debug!(
        last_index = cursor.last_delivered_index,
        "initial pass complete"
    );

    if config.follow && outcome == ScanOutcome::Exhausted {
        TailController::new(scanner, config.poll_interval).follow(cursor, &mut emit)?;
    }

    Ok(())
}

/// Writes one record. Returns `Ok(false)` once the reader has gone away.
fn write_line<W: Write>(out: &mut W, record: &DumpRecord) -> CoreResult<bool> {
    let written = serde_json::to_writer(&mut *out, record)
        .map_err(io::Error::from)
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush());
    match written {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("output closed, stopping");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waldump_core::MessageType;
    use waldump_testkit::prelude::*;

    fn lines(output: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn sample_log() -> TempLogDir {
        let mut log = TempLogDir::new();
        let entries = LogBuilder::new(1)
            .command(MessageType::Kvs, &kv_set("foo", b"0123456789"))
            .command(MessageType::Register, &register_service("n1", "10.0.0.1", "web", 8080))
            .command(MessageType::Kvs, &kv_set("bar", b"x"))
            .build();
        log.write_segment(1, &entries);
        log
    }

    #[test]
    fn writes_json_lines() {
        let log = sample_log();
        let mut output = Vec::new();
        dump_to(log.path(), &DumpConfig::default(), &mut output).unwrap();

        let records = lines(&output);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["Index"], 1);
        assert_eq!(records[0]["Op"]["Type"], "KVS");
        assert_eq!(records[0]["Op"]["Value"]["DirEnt"]["Key"], "foo");
        assert!(records[0]["AppendedAt"].is_string());
    }

    #[test]
    fn short_mode_summarizes() {
        let log = sample_log();
        let mut output = Vec::new();
        let config = DumpConfig::default().short(true);
        dump_to(log.path(), &config, &mut output).unwrap();

        let records = lines(&output);
        assert_eq!(
            records[0]["Op"]["Value"],
            serde_json::json!({"Key": "foo", "ValueSize": 10})
        );
        assert_eq!(
            records[1]["Op"]["Value"],
            serde_json::json!({"Node": "n1", "Service": "web", "Addr": "10.0.0.1:8080"})
        );
    }

    #[test]
    fn honours_bounds() {
        let log = sample_log();
        let mut output = Vec::new();
        let config = DumpConfig::default().after(1).before(3);
        dump_to(log.path(), &config, &mut output).unwrap();

        let records = lines(&output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Index"], 2);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let log = TempLogDir::new();
        let mut output = Vec::new();
        let err = dump_to(&log.path().join("missing"), &DumpConfig::default(), &mut output)
            .unwrap_err();
        assert!(err.to_string().contains("cannot open log directory"));
        assert!(output.is_empty());
    }

    #[test]
    fn follow_with_upper_bound_is_rejected() {
        let log = sample_log();
        let mut output = Vec::new();
        let config = DumpConfig::default().follow(true).before(2);
        assert!(dump_to(log.path(), &config, &mut output).is_err());
        assert!(output.is_empty());
    }
}
