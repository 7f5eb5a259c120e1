use anyhow::Context;
use captionbridge_core::{FileStatus, LogSeverity, QueuedFile, SubtitleFile};
use captionbridge_pipeline::PipelineEvent;
use std::path::{Path, PathBuf};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size with up to two decimals, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Files named by `paths`; directories contribute their direct children.
pub async fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<SubtitleFile>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Cannot access {}", path.display()))?;

        if metadata.is_dir() {
            let mut entries = tokio::fs::read_dir(path)
                .await
                .with_context(|| format!("Cannot read directory {}", path.display()))?;
            let mut children = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    children.push(entry.path());
                }
            }
            children.sort();
            for child in children {
                files.push(read_file(&child).await?);
            }
        } else {
            files.push(read_file(path).await?);
        }
    }
    Ok(files)
}

async fn read_file(path: &Path) -> anyhow::Result<SubtitleFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SubtitleFile::new(name, data))
}

/// Tab-separated name, size and language of a queued file.
pub fn preview_line(item: &QueuedFile) -> String {
    let language = item
        .language
        .as_ref()
        .map(|l| l.display_name())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\t{}\t{}",
        item.name(),
        format_file_size(item.file.size()),
        language
    )
}

/// Console line for an event, `None` for events not worth printing.
pub fn render_event(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::StatusChanged { .. } => None,
        PipelineEvent::LogAppended { file_id, entry } => {
            let marker = match entry.severity {
                LogSeverity::Info => "  ",
                LogSeverity::Success => "ok",
                LogSeverity::Error => "!!",
            };
            Some(format!(
                "[{}] {} {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                marker,
                file_id,
                entry.message
            ))
        }
        PipelineEvent::ProgressChanged { completed, total } => {
            Some(format!("Progress: {}/{}", completed, total))
        }
    }
}

pub fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Pending => "pending",
        FileStatus::Processing => "processing",
        FileStatus::Success => "success",
        FileStatus::Error => "error",
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
