use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::ico::IcoContainer;

/// A byte count that displays the way file pickers show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_file_size(self.0))
    }
}

/// `512 B`, `1.50 KB`, `10.00 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Pick the output file name.
///
/// A non-blank `custom` name wins (without doubling the extension);
/// otherwise the name is stamped with `now`: `icon_YYYYMMDD_HHMMSS.ico`.
pub fn output_filename(custom: Option<&str>, now: NaiveDateTime) -> String {
    if let Some(name) = custom.map(str::trim).filter(|n| !n.is_empty()) {
        let lower = name.to_ascii_lowercase();
        let stem = if lower.ends_with(".ico") && name.len() > 4 {
            &name[..name.len() - 4]
        } else {
            name
        };
        return format!("{}.ico", stem);
    }
    format!("icon_{}.ico", now.format("%Y%m%d_%H%M%S"))
}

/// Write `bytes` to `dir/filename`, creating `dir` if needed.
pub fn write_ico(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        "Wrote {} ({})",
        path.display(),
        format_file_size(bytes.len() as u64)
    );
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub size: u32,
    pub data_size: u32,
    pub data_offset: u32,
}

/// What one conversion produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub source: String,
    pub path: PathBuf,
    pub total_bytes: u64,
    pub entries: Vec<ReportEntry>,
}

impl ExportReport {
    /// Describe `container` as written to `path`.
    pub fn from_entries(source: &str, path: PathBuf, container: &IcoContainer) -> Self {
        let entries = container
            .directory()
            .iter()
            .map(|d| ReportEntry {
                size: d.size,
                data_size: d.data_size,
                data_offset: d.data_offset,
            })
            .collect();
        Self {
            source: source.to_string(),
            path,
            total_bytes: container.encoded_len() as u64,
            entries,
        }
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} -> {} ({})",
            self.source,
            self.path.display(),
            ByteSize(self.total_bytes)
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  {:>3}x{:<3}  {:>10}  @ {}",
                e.size,
                e.size,
                ByteSize(e.data_size as u64),
                e.data_offset
            )?;
        }
        Ok(())
    }
}
