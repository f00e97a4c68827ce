use bitcoin_augur::MempoolSnapshot;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Persistence layer errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Manages persistent storage of mempool snapshots
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a new snapshot store with the specified data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        // Ensure the data directory exists
        fs::create_dir_all(&data_dir)?;

        info!("Initialized snapshot store at: {}", data_dir.display());

        Ok(Self { data_dir })
    }

    /// Saves a mempool snapshot to disk
    pub fn save_snapshot(&self, snapshot: &MempoolSnapshot) -> Result<(), PersistenceError> {
        // Create directory structure: data/YYYY-MM-DD/
        let date_str = snapshot.timestamp.format("%Y-%m-%d").to_string();
        let date_dir = self.data_dir.join(&date_str);
        fs::create_dir_all(&date_dir)?;

        // Create filename: blockheight_timestamp.json
        let filename = format!(
            "{}_{}.json",
            snapshot.block_height,
            snapshot.timestamp.timestamp()
        );
        let file_path = date_dir.join(filename);

        // Serialize and save snapshot
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&file_path, json)?;

        debug!("Saved snapshot to: {}", file_path.display());

        Ok(())
    }

    /// Retrieves snapshots within a time range
    pub fn get_snapshots(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<MempoolSnapshot>, PersistenceError> {
        let mut snapshots = Vec::new();

        // Iterate through date directories
        let mut current_date = start.date_naive();
        let end_date = end.date_naive();

        while current_date <= end_date {
            let date_str = current_date.format("%Y-%m-%d").to_string();
            let date_dir = self.data_dir.join(&date_str);

            if date_dir.exists() && date_dir.is_dir() {
                // Read all JSON files in the directory
                for entry in fs::read_dir(&date_dir)? {
                    let entry = entry?;
                    let path = entry.path();

                    if path.extension().and_then(|s| s.to_str()) == Some("json") {
                        // Parse the filename to check if it's within our time range
                        if let Some(timestamp) = Self::extract_timestamp_from_filename(&path) {
                            let snapshot_time = DateTime::from_timestamp(timestamp, 0)
                                .ok_or(PersistenceError::InvalidTimestamp(timestamp))?
                                .with_timezone(&Local);

                            if snapshot_time >= start && snapshot_time <= end {
                                // Load and parse the snapshot, skipping files that fail to
                                // deserialize rather than failing the whole query.
                                let content = fs::read_to_string(&path)?;
                                match serde_json::from_str::<MempoolSnapshot>(&content) {
                                    Ok(snapshot) => snapshots.push(snapshot),
                                    Err(e) => {
                                        error!(
                                            "Skipping corrupted snapshot file {}: {}",
                                            path.display(),
                                            e
                                        );
                                    }
                                }
                            }
                        }
                    }
                }
            }

            // Move to next day
            current_date = current_date
                .succ_opt()
                .ok_or_else(|| PersistenceError::InvalidPath("Date overflow".to_string()))?;
        }

        // Sort snapshots by timestamp
        snapshots.sort_by_key(|s| s.timestamp);

        debug!(
            "Retrieved {} snapshots from {} to {}",
            snapshots.len(),
            start.format("%Y-%m-%d %H:%M:%S"),
            end.format("%Y-%m-%d %H:%M:%S")
        );

        Ok(snapshots)
    }

    /// Gets the most recent snapshot
    pub fn get_latest_snapshot(&self) -> Result<Option<MempoolSnapshot>, PersistenceError> {
        let mut latest: Option<(i64, PathBuf)> = None;

        // Scan all date directories
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                // Scan JSON files in this directory
                for file_entry in fs::read_dir(&path)? {
                    let file_entry = file_entry?;
                    let file_path = file_entry.path();

                    if file_path.extension().and_then(|s| s.to_str()) == Some("json") {
                        if let Some(timestamp) = Self::extract_timestamp_from_filename(&file_path) {
                            if latest.is_none() || timestamp > latest.as_ref().unwrap().0 {
                                latest = Some((timestamp, file_path));
                            }
                        }
                    }
                }
            }
        }

        if let Some((_, path)) = latest {
            let content = fs::read_to_string(&path)?;
            let snapshot: MempoolSnapshot = serde_json::from_str(&content)?;
            Ok(Some(snapshot))
        } else {
            Ok(None)
        }
    }

    /// Gets snapshots from the last N hours
    pub fn get_recent_snapshots(
        &self,
        hours: i64,
    ) -> Result<Vec<MempoolSnapshot>, PersistenceError> {
        let end = Local::now();
        let start = end - chrono::Duration::hours(hours);
        self.get_snapshots(start, end)
    }

    /// Cleans up old snapshots older than the specified number of days
    pub fn cleanup_old_snapshots(&self, days_to_keep: i64) -> Result<usize, PersistenceError> {
        let cutoff_date = Local::now().date_naive() - chrono::Duration::days(days_to_keep);
        let mut deleted_count = 0;

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                // Parse directory name as date
                if let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) {
                    if let Ok(dir_date) = chrono::NaiveDate::parse_from_str(dir_name, "%Y-%m-%d") {
                        if dir_date < cutoff_date {
                            // Delete old directory
                            fs::remove_dir_all(&path)?;
                            deleted_count += 1;
                            info!("Deleted old snapshot directory: {}", dir_name);
                        }
                    }
                }
            }
        }

        Ok(deleted_count)
    }

    /// Extracts timestamp from snapshot filename
    fn extract_timestamp_from_filename(path: &Path) -> Option<i64> {
        let filename = path.file_stem()?.to_str()?;
        let parts: Vec<&str> = filename.split('_').collect();

        if parts.len() >= 2 {
            parts.last()?.parse().ok()
        } else {
            None
        }
    }
}
