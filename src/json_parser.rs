use once_cell::sync::Lazy;
use serde_json::{self, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::CatalogError;

/// Parsed JSON documents keyed by the path they were read from
static JSON_CACHE: Lazy<Mutex<HashMap<PathBuf, Value>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn cache() -> MutexGuard<'static, HashMap<PathBuf, Value>> {
    // a panic while holding the lock cannot leave a half-written entry
    JSON_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cached access to JSON files such as the material catalog.
pub struct JsonParser;

impl JsonParser {
    /// Load JSON data from a file path, using the cache if available
    pub fn load_json<P: AsRef<Path>>(file_path: P) -> Result<Value, CatalogError> {
        let path_buf = file_path.as_ref().to_path_buf();

        if let Some(json) = cache().get(&path_buf) {
            return Ok(json.clone());
        }

        let json_str = fs::read_to_string(&path_buf).map_err(|source| CatalogError::Io {
            path: path_buf.display().to_string(),
            source,
        })?;
        let json: Value = serde_json::from_str(&json_str)?;

        cache().insert(path_buf, json.clone());
        Ok(json)
    }

    /// Drops one file from the cache so the next load re-reads it
    pub fn invalidate<P: AsRef<Path>>(file_path: P) -> bool {
        cache().remove(file_path.as_ref()).is_some()
    }

    pub fn is_cached<P: AsRef<Path>>(file_path: P) -> bool {
        cache().contains_key(file_path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("thermal_insulation_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_file_caching_and_invalidation() {
        let path = scratch_file("cache.json", r#"[{"name": "A", "k_func": "0.04"}]"#);

        let first = JsonParser::load_json(&path).unwrap();
        assert!(JsonParser::is_cached(&path));
        assert_eq!(first[0]["name"].as_str(), Some("A"));

        // the cached copy wins until invalidated
        fs::write(&path, r#"[{"name": "B", "k_func": "0.04"}]"#).unwrap();
        let cached = JsonParser::load_json(&path).unwrap();
        assert_eq!(cached[0]["name"].as_str(), Some("A"));

        assert!(JsonParser::invalidate(&path));
        assert!(!JsonParser::is_cached(&path));
        let fresh = JsonParser::load_json(&path).unwrap();
        assert_eq!(fresh[0]["name"].as_str(), Some("B"));

        JsonParser::invalidate(&path);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_error_handling() {
        let missing = PathBuf::from("/path/that/does/not/exist.json");
        assert!(matches!(
            JsonParser::load_json(&missing),
            Err(CatalogError::Io { .. })
        ));
        assert!(!JsonParser::is_cached(&missing));

        let path = scratch_file("broken.json", r#"{"broken": "json""#);
        assert!(matches!(JsonParser::load_json(&path), Err(CatalogError::Json(_))));
        fs::remove_file(&path).unwrap();
    }
}
