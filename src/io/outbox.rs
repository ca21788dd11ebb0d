use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::atomic_write;
use super::lock::StoreLock;

/// Size above which old entries are trimmed on append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries older than this are dropped by inline trimming.
pub const PRUNE_AGE_DAYS: i64 = 30;

const FILE_HEADER: &str = "\
<!-- taskflow notification outbox, append-only
     Every task/comment notification is recorded here.
     View with: tf notifications
     Prune old entries: tf notifications prune -->

---
";

/// One delivered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub summary: String,
    pub fields: Vec<(String, String)>,
}

pub fn outbox_path(data_dir: &Path) -> PathBuf {
    data_dir.join("notifications.log")
}

impl OutboxEntry {
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} | {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.kind,
            one_line(&self.summary),
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, one_line(value)));
        }
        out.push_str("\n---\n");
        out
    }
}

fn one_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Append an entry, trimming old entries first if the log has grown too large.
pub fn append(data_dir: &Path, entry: &OutboxEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = outbox_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        if let Err(e) = prune_before(data_dir, cutoff) {
            tracing::warn!(error = %e, "could not trim notification outbox");
        }
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Read entries, most recent first. `limit` keeps the newest N.
pub fn read_entries(data_dir: &Path, limit: Option<usize>) -> Vec<OutboxEntry> {
    let content = match std::fs::read_to_string(outbox_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

/// Remove entries older than `cutoff`. Returns how many were removed.
pub fn prune_before(data_dir: &Path, cutoff: DateTime<Utc>) -> io::Result<usize> {
    let path = outbox_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let _lock = StoreLock::acquire_default(data_dir)
        .map_err(|e| io::Error::new(io::ErrorKind::WouldBlock, e.to_string()))?;

    let content = std::fs::read_to_string(&path)?;
    let entries = parse_entries(&content);
    let before = entries.len();
    let kept: Vec<&OutboxEntry> = entries.iter().filter(|e| e.timestamp >= cutoff).collect();
    let removed = before - kept.len();
    if removed == 0 {
        return Ok(0);
    }

    let mut out = String::from(FILE_HEADER);
    for entry in kept {
        out.push_str(&entry.to_markdown());
    }
    atomic_write(&path, out.as_bytes())?;
    Ok(removed)
}

fn parse_entries(content: &str) -> Vec<OutboxEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, kind, summary)) = parse_header(header) else {
            continue;
        };

        let mut fields = Vec::new();
        for line in lines.by_ref() {
            if line == "---" {
                break;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(OutboxEntry {
            timestamp,
            kind,
            summary,
            fields,
        });
    }
    entries
}

/// `<rfc3339> | <kind>: <summary>`
fn parse_header(header: &str) -> Option<(DateTime<Utc>, String, String)> {
    let (ts, rest) = header.split_once(" | ")?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
    let (kind, summary) = rest.split_once(": ")?;
    Some((timestamp, kind.to_string(), summary.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(ts: &str, kind: &str, summary: &str) -> OutboxEntry {
        OutboxEntry {
            timestamp: DateTime::parse_from_rfc3339(ts)
                .unwrap()
                .with_timezone(&Utc),
            kind: kind.to_string(),
            summary: summary.to_string(),
            fields: vec![("Task".to_string(), "Write copy".to_string())],
        }
    }

    #[test]
    fn append_then_read_newest_first() {
        let tmp = TempDir::new().unwrap();
        let first = entry("2025-05-01T10:00:00Z", "task_created", "New task");
        let second = entry("2025-05-02T10:00:00Z", "comment_added", "New comment");
        append(tmp.path(), &first).unwrap();
        append(tmp.path(), &second).unwrap();

        let entries = read_entries(tmp.path(), None);
        assert_eq!(entries, vec![second.clone(), first]);

        let limited = read_entries(tmp.path(), Some(1));
        assert_eq!(limited, vec![second]);
    }

    #[test]
    fn header_written_once() {
        let tmp = TempDir::new().unwrap();
        append(tmp.path(), &entry("2025-05-01T10:00:00Z", "a", "x")).unwrap();
        append(tmp.path(), &entry("2025-05-01T11:00:00Z", "b", "y")).unwrap();
        let content = std::fs::read_to_string(outbox_path(tmp.path())).unwrap();
        assert_eq!(content.matches("append-only").count(), 1);
    }

    #[test]
    fn multiline_comment_stays_on_one_line() {
        let tmp = TempDir::new().unwrap();
        append(
            tmp.path(),
            &entry("2025-05-01T10:00:00Z", "comment_added", "line one\nline two"),
        )
        .unwrap();
        let entries = read_entries(tmp.path(), None);
        assert_eq!(entries[0].summary, "line one line two");
    }

    #[test]
    fn prune_drops_old_entries() {
        let tmp = TempDir::new().unwrap();
        append(tmp.path(), &entry("2024-01-01T00:00:00Z", "a", "old")).unwrap();
        append(tmp.path(), &entry("2025-06-01T00:00:00Z", "b", "new")).unwrap();

        let cutoff = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(prune_before(tmp.path(), cutoff).unwrap(), 1);

        let entries = read_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].summary, "new");
    }

    #[test]
    fn missing_log_reads_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_entries(tmp.path(), None).is_empty());
        assert_eq!(prune_before(tmp.path(), Utc::now()).unwrap(), 0);
    }
}
