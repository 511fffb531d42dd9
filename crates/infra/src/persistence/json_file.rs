use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

use stockroom_inventory::StockLevels;

use super::r#trait::{InventoryRepository, PersistenceError};

/// File name used when the caller does not pick one, relative to the working
/// directory.
pub const DEFAULT_INVENTORY_FILE: &str = "inventory.json";

/// Stock levels as a single pretty-printed JSON object, e.g.
///
/// ```json
/// {
///     "apple": 7,
///     "pen": 10
/// }
/// ```
///
/// Saves go through a temporary file in the same directory which is then
/// renamed over the target, so a crash mid-save leaves the previous file
/// intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for JsonFileRepository {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_FILE)
    }
}

impl InventoryRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<StockLevels>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, levels: &StockLevels) -> Result<(), PersistenceError> {
        let encoded = encode(levels)?;

        // Write through symlinks: replace the file the link points at.
        let target = match fs::canonicalize(&self.path) {
            Ok(resolved) => resolved,
            Err(err) if err.kind() == ErrorKind::NotFound => self.path.clone(),
            Err(err) => return Err(self.write_err(err)),
        };
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_err(e))?;
        tmp.write_all(&encoded).map_err(|e| self.write_err(e))?;

        // The temp file is created 0600; keep an existing file's mode.
        match fs::metadata(&target) {
            Ok(meta) => tmp
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.write_err(e))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(self.write_err(err)),
        }

        tmp.as_file().sync_all().map_err(|e| self.write_err(e))?;
        tmp.persist(&target).map_err(|e| self.write_err(e.error))?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serialize with 4-space indentation and a trailing newline.
pub fn encode(levels: &StockLevels) -> Result<Vec<u8>, PersistenceError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    levels.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{ItemName, Quantity};

    fn levels(entries: &[(&str, Quantity)]) -> StockLevels {
        entries
            .iter()
            .map(|(name, qty)| (ItemName::parse(*name).unwrap(), *qty))
            .collect()
    }

    #[test]
    fn encode_uses_four_space_indent() {
        let encoded = encode(&levels(&[
            ("apple", Quantity::Whole(7)),
            ("pen", Quantity::Whole(10)),
        ]))
        .unwrap();
        assert_eq!(
            String::from_utf8(encoded).unwrap(),
            "{\n    \"apple\": 7,\n    \"pen\": 10\n}\n"
        );
    }

    #[test]
    fn encode_empty_mapping() {
        assert_eq!(encode(&StockLevels::new()).unwrap(), b"{}\n");
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("absent.json"));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_preserves_entries_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("inventory.json"));
        let original = levels(&[
            ("pen", Quantity::Whole(10)),
            ("banana", Quantity::Whole(-2)),
            ("ink", Quantity::Fractional(0.75)),
        ]);

        repo.save(&original).unwrap();
        let loaded = repo.load().unwrap().unwrap();

        assert_eq!(loaded, original);
        let order: Vec<&str> = loaded.keys().map(ItemName::as_str).collect();
        assert_eq!(order, vec!["pen", "banana", "ink"]);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("inventory.json"));

        repo.save(&levels(&[("old", Quantity::Whole(1))])).unwrap();
        repo.save(&levels(&[("new", Quantity::Whole(2))])).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("new"));
    }

    #[test]
    fn load_reads_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, r#"{"apple": 7, "pen": 10, "glue": 1.5}"#).unwrap();

        let loaded = JsonFileRepository::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.get("apple"), Some(&Quantity::Whole(7)));
        assert_eq!(loaded.get("glue"), Some(&Quantity::Fractional(1.5)));
    }

    #[test]
    fn malformed_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("truncated.json", "{\"apple\": "),
            ("array.json", "[1, 2]"),
            ("text_value.json", "{\"apple\": \"seven\"}"),
            ("empty_name.json", "{\"\": 1}"),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            let err = JsonFileRepository::new(&path).load().unwrap_err();
            assert!(
                matches!(err, PersistenceError::Malformed { .. }),
                "{name}: expected malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nope").join("inventory.json"));
        let err = repo.save(&StockLevels::new()).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let repo = JsonFileRepository::new(&path);
        repo.save(&levels(&[("apple", Quantity::Whole(7))])).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert!(repo.load().unwrap().unwrap().contains_key("apple"));
    }

    #[cfg(unix)]
    #[test]
    fn save_writes_through_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.json");
        let link = dir.path().join("inventory.json");
        fs::write(&real, "{}").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let repo = JsonFileRepository::new(&link);
        repo.save(&levels(&[("apple", Quantity::Whole(7))])).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(&real).unwrap(),
            "{\n    \"apple\": 7\n}\n"
        );
    }

    #[test]
    fn default_points_at_inventory_json() {
        assert_eq!(JsonFileRepository::default().path(), Path::new("inventory.json"));
    }
}
