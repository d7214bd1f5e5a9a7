//! Incident Sink Implementations

use crate::{IncidentError, IncidentRecord};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Fire-and-forget incident persistence.
pub trait IncidentSink {
    fn append(&mut self, record: &IncidentRecord) -> Result<(), IncidentError>;
}

/// Append-only file sink. The file is opened per append so a transient
/// storage fault on one record does not wedge the sink.
pub struct FileIncidentSink {
    path: PathBuf,
}

impl FileIncidentSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IncidentSink for FileIncidentSink {
    fn append(&mut self, record: &IncidentRecord) -> Result<(), IncidentError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_line())?;
        debug!(path = %self.path.display(), "incident appended");
        Ok(())
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemoryIncidentSink {
    pub records: Vec<IncidentRecord>,
}

impl IncidentSink for MemoryIncidentSink {
    fn append(&mut self, record: &IncidentRecord) -> Result<(), IncidentError> {
        self.records.push(*record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends_lines() {
        let path = std::env::temp_dir().join(format!("incidents-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut sink = FileIncidentSink::new(path.clone());
        sink.append(&IncidentRecord {
            timestamp_ms: 1,
            distance_m: 4.0,
            ego_speed_kmh: 50.0,
            follower_speed_kmh: 80.0,
        })
        .unwrap();
        sink.append(&IncidentRecord {
            timestamp_ms: 2,
            distance_m: 3.5,
            ego_speed_kmh: 50.0,
            follower_speed_kmh: 85.0,
        })
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["1,4.00,50.0,80.0", "2,3.50,50.0,85.0"]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_memory_sink_collects_records() {
        let mut sink = MemoryIncidentSink::default();
        sink.append(&IncidentRecord::now(8.0, 60.0, 95.0)).unwrap();
        assert_eq!(sink.records.len(), 1);
        assert!((sink.records[0].distance_m - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_append_to_unwritable_path_errors() {
        let mut sink = FileIncidentSink::new("/nonexistent-dir/incidents.log");
        assert!(sink.append(&IncidentRecord::now(1.0, 2.0, 3.0)).is_err());
    }
}
