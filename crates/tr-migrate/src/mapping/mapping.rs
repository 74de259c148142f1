use crate::{MappingPair, MappingStatus, MigrationError, MigrationResult};

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

const FILE_PREFIX: &str = "mapping_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Source-ID to target-ID correspondence for one migration.
///
/// Each source ID is recorded at most once: the first pair wins and later
/// [`Mapping::add_pair`] calls for the same source are ignored. `count` always
/// equals the number of pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    src_project_id: i64,
    dst_project_id: i64,
    created_at: DateTime<Utc>,
    count: usize,
    pairs: Vec<MappingPair>,

    #[serde(skip)]
    index: HashMap<i64, i64>,
}

/// The two on-disk shapes a mapping file may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    Full(Mapping),
    Flat(BTreeMap<String, i64>),
}

impl Mapping {
    pub fn new(src_project_id: i64, dst_project_id: i64) -> Self {
        Self {
            src_project_id,
            dst_project_id,
            created_at: Utc::now(),
            count: 0,
            pairs: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn src_project_id(&self) -> i64 {
        self.src_project_id
    }

    pub fn dst_project_id(&self) -> i64 {
        self.dst_project_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn pairs(&self) -> &[MappingPair] {
        &self.pairs
    }

    /// Returns `false` when `source_id` was already mapped.
    pub fn add_pair(&mut self, source_id: i64, target_id: i64, status: MappingStatus) -> bool {
        if self.index.contains_key(&source_id) {
            return false;
        }
        self.index.insert(source_id, target_id);
        self.pairs.push(MappingPair::new(source_id, target_id, status));
        self.count = self.pairs.len();
        true
    }

    /// Fill in project IDs a legacy flat file could not carry. Known IDs are
    /// left alone.
    pub fn adopt_projects(&mut self, src_project_id: i64, dst_project_id: i64) {
        if self.src_project_id <= 0 {
            self.src_project_id = src_project_id;
        }
        if self.dst_project_id <= 0 {
            self.dst_project_id = dst_project_id;
        }
    }

    pub fn get_target_by_source(&self, source_id: i64) -> Option<i64> {
        self.index.get(&source_id).copied()
    }

    /// Write `mapping_<timestamp>.json` into `dir`, creating it if needed.
    /// An empty mapping writes nothing and returns `None`. An existing file is
    /// never overwritten.
    pub fn save(&mut self, dir: &Path) -> MigrationResult<Option<PathBuf>> {
        if self.count == 0 {
            return Ok(None);
        }

        self.pairs.sort_by_key(|pair| pair.source_id);

        fs::create_dir_all(dir)
            .map_err(|e| MigrationError::mapping_io(dir.display().to_string(), e))?;

        let file_name = format!(
            "{FILE_PREFIX}{}.json",
            Utc::now().format(TIMESTAMP_FORMAT)
        );
        let path = dir.join(file_name);
        let contents = serde_json::to_string_pretty(self)?;

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(contents.as_bytes()))
            .map_err(|e| MigrationError::mapping_io(path.display().to_string(), e))?;

        log::info!("Saved {} mapping pairs to {}", self.count, path.display());
        Ok(Some(path))
    }

    /// Load a mapping saved by [`Mapping::save`], or a legacy flat
    /// `{"<source>": <target>}` object whose entries become `existing` pairs.
    pub fn load(path: &Path) -> MigrationResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MigrationError::mapping_io(path.display().to_string(), e))?;
        Self::from_json(&contents, path)
    }

    pub(crate) fn from_json(contents: &str, path: &Path) -> MigrationResult<Self> {
        let file: MappingFile =
            serde_json::from_str(contents).map_err(|e| format_error(path, e.to_string()))?;

        let mapping = match file {
            MappingFile::Full(full) => Self::from_pairs(full),
            MappingFile::Flat(flat) => {
                let mut mapping = Self::new(0, 0);
                for (source, target) in flat {
                    let source_id = source.trim().parse::<i64>().map_err(|_| {
                        format_error(path, format!("key {source:?} is not a numeric source ID"))
                    })?;
                    mapping.add_pair(source_id, target, MappingStatus::Existing);
                }
                mapping
            }
        };

        log::debug!(
            "Loaded {} mapping pairs from {}",
            mapping.count,
            path.display()
        );
        Ok(mapping)
    }

    fn from_pairs(loaded: Mapping) -> Self {
        let mut mapping = Self {
            src_project_id: loaded.src_project_id,
            dst_project_id: loaded.dst_project_id,
            created_at: loaded.created_at,
            count: 0,
            pairs: Vec::with_capacity(loaded.pairs.len()),
            index: HashMap::with_capacity(loaded.pairs.len()),
        };
        for pair in loaded.pairs {
            if mapping.index.contains_key(&pair.source_id) {
                continue;
            }
            mapping.index.insert(pair.source_id, pair.target_id);
            mapping.pairs.push(pair);
        }
        mapping.count = mapping.pairs.len();
        mapping
    }
}

#[track_caller]
fn format_error(path: &Path, message: String) -> MigrationError {
    MigrationError::MappingFormat {
        path: path.display().to_string(),
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}
