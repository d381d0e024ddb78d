//! Inspect command implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use waldump_core::segment::SegmentFile;
use waldump_core::SegmentFiler;

/// Log directory inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Log directory path.
    pub path: String,
    /// Number of segment files.
    pub segment_count: usize,
    /// Number of readable entries across all segments.
    pub entry_count: u64,
    /// Index of the first entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_index: Option<u64>,
    /// Index of the last entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_index: Option<u64>,
    /// Total size of all segment files in bytes.
    pub total_size: u64,
    /// Per-segment details.
    pub segments: Vec<SegmentStats>,
}

/// Statistics for a single segment file.
#[derive(Debug, Serialize)]
pub struct SegmentStats {
    /// File name.
    pub file: String,
    /// Segment ID, hex encoded.
    pub id: String,
    /// Index of the first entry.
    pub base_index: u64,
    /// Codec identifier from the header.
    pub codec: u64,
    /// When the segment was created.
    pub created_at: DateTime<Utc>,
    /// Number of readable entries.
    pub entries: u64,
    /// Index of the last readable entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_index: Option<u64>,
    /// File size in bytes.
    pub size: u64,
}

/// Runs the inspect command.
pub fn run(dir: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(dir)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "text" => {
            print_text_output(&result);
        }
        other => return Err(format!("unknown output format {other:?}").into()),
    }

    Ok(())
}

/// Collects statistics for every segment in `dir`.
pub fn inspect(dir: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let filer = SegmentFiler::open(dir)?;

    let listed = filer.list_segments()?;
    let mut segments = Vec::with_capacity(listed.len());
    for (i, segment) in listed.iter().enumerate() {
        segments.push(segment_stats(&filer, segment, i + 1 < listed.len())?);
    }

    let entry_count = segments.iter().map(|s| s.entries).sum();
    let first_index = segments
        .iter()
        .find(|s| s.entries > 0)
        .map(|s| s.base_index);
    let last_index = segments
        .iter()
        .rev()
        .find_map(|s| s.last_index);

    Ok(InspectResult {
        path: dir.display().to_string(),
        segment_count: segments.len(),
        entry_count,
        first_index,
        last_index,
        total_size: segments.iter().map(|s| s.size).sum(),
        segments,
    })
}

fn segment_stats(
    filer: &SegmentFiler,
    segment: &SegmentFile,
    sealed: bool,
) -> Result<SegmentStats, Box<dyn std::error::Error>> {
    let mut reader = filer.open_segment(segment)?.sealed(sealed);
    let info = reader.info().clone();

    let mut entries = 0;
    let mut last_index = None;
    for record in &mut reader {
        last_index = Some(record?.index);
        entries += 1;
    }

    Ok(SegmentStats {
        file: segment.file_name(),
        id: info.id.to_string(),
        base_index: info.base_index,
        codec: info.codec,
        created_at: info.created_at,
        entries,
        last_index,
        size: filer.segment_size(segment)?,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("WAL Directory Inspection");
    println!("========================");
    println!();
    println!("Path: {}", result.path);
    println!();
    println!("Segments:   {}", result.segment_count);
    println!("Entries:    {}", result.entry_count);
    match (result.first_index, result.last_index) {
        (Some(first), Some(last)) => println!("Index range: {first}..={last}"),
        _ => println!("Index range: (empty)"),
    }
    println!("Total size: {}", format_size(result.total_size));

    if !result.segments.is_empty() {
        println!();
        for seg in &result.segments {
            println!(
                "  {}  base={} codec={} entries={} size={} created={}",
                seg.file,
                seg.base_index,
                seg.codec,
                seg.entries,
                format_size(seg.size),
                seg.created_at.to_rfc3339()
            );
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
