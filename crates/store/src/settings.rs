//! [`SettingsStore`] — named JSON records under a data directory.
//!
//! Each key maps to one file at `{data_dir}/settings/{key}.json` holding an
//! envelope of `updated_at` plus the record itself. Reads deserialize the
//! record with serde defaults filling absent fields; saves replace the whole
//! file, so a record never persists partially.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;

/// On-disk envelope wrapping every stored record.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    updated_at: String,
    #[serde(default)]
    record: serde_json::Value,
}

/// File-backed store for named settings records.
pub struct SettingsStore {
    data_dir: PathBuf,
}

impl SettingsStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join("settings").join(format!("{key}.json")))
    }

    fn load_envelope(&self, key: &str) -> Result<Option<Envelope>, StoreError> {
        let path = self.record_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Read a typed record. Absent files and absent fields both resolve to
    /// the record's defaults.
    pub fn get<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.load_envelope(key)? {
            Some(envelope) if !envelope.record.is_null() => {
                Ok(serde_json::from_value(envelope.record)?)
            }
            _ => Ok(T::default()),
        }
    }

    /// Read a record as raw JSON, for records whose shape another component
    /// owns. `None` when the record has never been written.
    pub fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.load_envelope(key)?.map(|e| e.record))
    }

    /// Replace a typed record in full.
    pub fn put<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StoreError> {
        self.put_value(key, serde_json::to_value(record)?)
    }

    /// Replace a raw-JSON record in full.
    pub fn put_value(&self, key: &str, record: serde_json::Value) -> Result<(), StoreError> {
        let path = self.record_path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = Envelope {
            updated_at: chrono::Utc::now().to_rfc3339(),
            record,
        };
        let data = serde_json::to_string_pretty(&envelope)?;
        std::fs::write(&path, data)?;
        info!("Saved settings record '{}'", key);
        Ok(())
    }

    /// When the record was last saved, RFC 3339. `None` if never written.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load_envelope(key)?.map(|e| e.updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        enabled: bool,
        limit: u32,
    }

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(tmp.path());
        (tmp, store)
    }

    #[test]
    fn absent_record_yields_defaults() {
        let (_tmp, store) = store();
        let s: Sample = store.get("sample").unwrap();
        assert_eq!(s, Sample::default());
    }

    #[test]
    fn put_then_get_roundtrips() {
        let (_tmp, store) = store();
        let s = Sample {
            name: "alpha".to_string(),
            enabled: true,
            limit: 7,
        };
        store.put("sample", &s).unwrap();
        let back: Sample = store.get("sample").unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn partial_record_fills_missing_fields() {
        let (_tmp, store) = store();
        store
            .put_value("sample", serde_json::json!({"name": "beta"}))
            .unwrap();
        let s: Sample = store.get("sample").unwrap();
        assert_eq!(s.name, "beta");
        assert!(!s.enabled);
        assert_eq!(s.limit, 0);
    }

    #[test]
    fn put_replaces_whole_record() {
        let (_tmp, store) = store();
        store
            .put_value("sample", serde_json::json!({"name": "old", "limit": 9}))
            .unwrap();
        store
            .put_value("sample", serde_json::json!({"name": "new"}))
            .unwrap();
        let s: Sample = store.get("sample").unwrap();
        assert_eq!(s.name, "new");
        // `limit` was dropped by the replacement, not carried over.
        assert_eq!(s.limit, 0);
    }

    #[test]
    fn raw_records_preserve_foreign_fields() {
        let (_tmp, store) = store();
        store
            .put_value("external", serde_json::json!({"email": "x@y.z", "interval": "4h"}))
            .unwrap();
        let v = store.get_value("external").unwrap().unwrap();
        assert_eq!(v["interval"], "4h");
    }

    #[test]
    fn get_value_absent_is_none() {
        let (_tmp, store) = store();
        assert!(store.get_value("nope").unwrap().is_none());
    }

    #[test]
    fn updated_at_set_on_save() {
        let (_tmp, store) = store();
        assert!(store.updated_at("sample").unwrap().is_none());
        store.put("sample", &Sample::default()).unwrap();
        assert!(store.updated_at("sample").unwrap().is_some());
    }

    #[test]
    fn path_traversal_keys_rejected() {
        let (_tmp, store) = store();
        let err = store.get::<Sample>("../escape").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
