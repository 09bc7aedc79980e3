//! isaac-save: Save/restore of ISAAC generator state
//!
//! Two on-disk forms: a versioned JSON snapshot with a header, and the plain
//! text dump produced by [`Isaac::to_text`].

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use isaac_rng::{Isaac, StateError};

/// Current snapshot file format version
pub const SAVE_VERSION: u32 = 1;

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid generator state: {0}")]
    State(#[from] StateError),

    #[error("State file not found")]
    NotFound,

    #[error("Incompatible state version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid state file header")]
    InvalidHeader,
}

/// Snapshot header for versioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Snapshot format version
    pub version: u32,
    /// Regeneration cycles since seeding
    pub cycles: u32,
    /// Buffered results left in the current block
    pub cursor: usize,
    /// Timestamp of save
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "ISRS";

    pub fn new(state: &Isaac) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            cycles: state.counter(),
            cursor: state.cursor(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete snapshot file structure
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub state: Isaac,
}

/// Header-only view, so listing files skips the state tables
#[derive(Deserialize)]
struct HeaderOnly {
    header: SaveHeader,
}

/// A missing file is `NotFound`; every other read failure stays an I/O error
fn read_error(err: io::Error) -> SaveError {
    if err.kind() == io::ErrorKind::NotFound {
        SaveError::NotFound
    } else {
        SaveError::Io(err)
    }
}

fn snapshot(state: &Isaac) -> SaveFile {
    SaveFile {
        header: SaveHeader::new(state),
        state: state.clone(),
    }
}

/// Save generator state to a JSON snapshot
pub fn save_state(state: &Isaac, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &snapshot(state))?;
    log::debug!("isaac-save: wrote snapshot to {}", path.display());
    Ok(())
}

/// Save generator state to a compact JSON snapshot (no pretty printing)
pub fn save_state_compact(state: &Isaac, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &snapshot(state))?;
    log::debug!("isaac-save: wrote compact snapshot to {}", path.display());
    Ok(())
}

/// Load generator state from a JSON snapshot
pub fn load_state(path: impl AsRef<Path>) -> Result<Isaac, SaveError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(read_error)?;
    let reader = BufReader::new(file);
    let save_file: SaveFile = serde_json::from_reader(reader)?;

    save_file.header.validate()?;
    log::debug!(
        "isaac-save: loaded snapshot from {} (cycle {}, cursor {})",
        path.display(),
        save_file.header.cycles,
        save_file.header.cursor
    );
    Ok(save_file.state)
}

/// Load only the header from a snapshot
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    let file = File::open(path).map_err(read_error)?;
    let reader = BufReader::new(file);
    let view: HeaderOnly = serde_json::from_reader(reader)?;
    view.header.validate()?;
    Ok(view.header)
}

/// Save generator state as a plain text dump
pub fn save_text(state: &Isaac, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    std::fs::write(path, state.to_text())?;
    log::debug!("isaac-save: wrote text dump to {}", path.display());
    Ok(())
}

/// Load generator state from a plain text dump
pub fn load_text(path: impl AsRef<Path>) -> Result<Isaac, SaveError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(read_error)?;
    let state = Isaac::from_text(&text)?;
    log::debug!("isaac-save: loaded text dump from {}", path.display());
    Ok(state)
}

/// Check if a state file exists
pub fn state_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a state file
pub fn delete_state(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

fn states_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("isaac-rng");
    path.push("states");
    path
}

/// Get the default snapshot path for a named generator, creating its directory
pub fn default_state_path(name: &str) -> Result<PathBuf, SaveError> {
    let mut path = states_dir();
    std::fs::create_dir_all(&path)?;
    path.push(format!("{}.json", name));
    Ok(path)
}

/// List all snapshots in the default state directory
pub fn list_states() -> Result<Vec<(PathBuf, SaveHeader)>, SaveError> {
    list_states_in(states_dir())
}

/// List all snapshots in `dir`, newest first
///
/// Only `.json` files are considered. Files whose header cannot be read are
/// skipped with a warning.
pub fn list_states_in(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, SaveHeader)>, SaveError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut states = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match load_header(&path) {
                Ok(header) => states.push((path, header)),
                Err(err) => log::warn!("isaac-save: skipping {}: {}", path.display(), err),
            }
        }
    }

    // Sort by timestamp, newest first
    states.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unique temp file path (avoids collisions across parallel tests)
    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("isaac_save_{}_{}", std::process::id(), name))
    }

    fn advanced(seed: &str, steps: u64) -> Isaac {
        let mut rng = Isaac::from_bytes(seed.as_bytes());
        rng.discard(steps);
        rng
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("snapshot.json");
        let mut state = advanced("snapshot", 700);

        save_state(&state, &path).unwrap();
        assert!(state_exists(&path));

        let mut loaded = load_state(&path).unwrap();
        assert_eq!(loaded, state);
        for _ in 0..512 {
            assert_eq!(loaded.next_u32(), state.next_u32());
        }

        delete_state(&path).unwrap();
        assert!(!state_exists(&path));
    }

    #[test]
    fn test_compact_matches_pretty() {
        let pretty = temp_path("pretty.json");
        let compact = temp_path("compact.json");
        let state = advanced("compact", 3);

        save_state(&state, &pretty).unwrap();
        save_state_compact(&state, &compact).unwrap();
        assert_eq!(load_state(&pretty).unwrap(), load_state(&compact).unwrap());

        let pretty_len = std::fs::metadata(&pretty).unwrap().len();
        let compact_len = std::fs::metadata(&compact).unwrap().len();
        assert!(compact_len < pretty_len);

        std::fs::remove_file(&pretty).ok();
        std::fs::remove_file(&compact).ok();
    }

    #[test]
    fn test_load_header() {
        let path = temp_path("header.json");
        let state = advanced("header", 300);
        save_state(&state, &path).unwrap();

        let header = load_header(&path).unwrap();
        assert_eq!(header.magic, "ISRS");
        assert_eq!(header.version, SAVE_VERSION);
        assert_eq!(header.cycles, 2);
        assert_eq!(header.cursor, state.cursor());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_validation() {
        let header = SaveHeader::new(&Isaac::new());
        assert!(header.validate().is_ok());

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { expected: 1, found: 999 })
        ));
    }

    #[test]
    fn test_load_rejects_bad_version() {
        let path = temp_path("version.json");
        let mut save_file = snapshot(&Isaac::new());
        save_file.header.version = 7;
        std::fs::write(&path, serde_json::to_string(&save_file).unwrap()).unwrap();

        assert!(matches!(
            load_state(&path),
            Err(SaveError::IncompatibleVersion { found: 7, .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_rejects_corrupt_state() {
        let path = temp_path("corrupt.json");
        let mut value = serde_json::to_value(snapshot(&Isaac::new())).unwrap();
        value["state"]["results"] = serde_json::json!([1, 2, 3]);
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            load_state(&path),
            Err(SaveError::Serialization(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_text_round_trip() {
        let path = temp_path("state.txt");
        let mut state = advanced("Pack my red box with five dozen quality jugs", 5);

        save_text(&state, &path).unwrap();
        let mut loaded = load_text(&path).unwrap();
        assert_eq!(loaded, state);
        for _ in 0..300 {
            assert_eq!(loaded.next_u32(), state.next_u32());
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_text_incomplete() {
        let path = temp_path("short.txt");
        std::fs::write(&path, "1 2 3 4 5 6 7").unwrap();

        assert!(matches!(
            load_text(&path),
            Err(SaveError::State(StateError::Incomplete { found: 3, .. }))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_state("/nonexistent/path/state.json");
        assert!(matches!(result, Err(SaveError::NotFound)));

        let result = load_text("/nonexistent/path/state.txt");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }

    #[test]
    fn test_default_state_path() {
        let path = default_state_path("worker-3").unwrap();
        assert!(path.ends_with("isaac-rng/states/worker-3.json"));
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_load_text_invalid_utf8_is_io_error() {
        let path = temp_path("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, b' ', b'1']).unwrap();

        let result = load_text(&path);
        assert!(
            matches!(&result, Err(SaveError::Io(e)) if e.kind() == io::ErrorKind::InvalidData),
            "unexpected result: {:?}",
            result.map(|_| ())
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = temp_path("not_a_file");
        std::fs::create_dir_all(&dir).unwrap();

        assert!(matches!(load_text(&dir), Err(SaveError::Io(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_states_in_order_and_filter() {
        let dir = temp_path("listing");
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();

        for (name, timestamp) in [("old", 100u64), ("new", 300), ("mid", 200)] {
            let mut save_file = snapshot(&advanced(name, 1));
            save_file.header.timestamp = timestamp;
            std::fs::write(
                dir.join(format!("{}.json", name)),
                serde_json::to_string(&save_file).unwrap(),
            )
            .unwrap();
        }
        save_text(&Isaac::new(), dir.join("dump.txt")).unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();

        let listed = list_states_in(&dir).unwrap();
        let names: Vec<String> = listed
            .iter()
            .map(|(p, _)| p.file_stem().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["new", "mid", "old"]);
        let stamps: Vec<u64> = listed.iter().map(|(_, h)| h.timestamp).collect();
        assert_eq!(stamps, [300, 200, 100]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_list_states_in_missing_dir() {
        let listed = list_states_in(temp_path("no_such_dir")).unwrap();
        assert!(listed.is_empty());
    }
}
