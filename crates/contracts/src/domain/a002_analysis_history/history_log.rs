//! Ограниченный журнал истории анализов поверх произвольного key-value хранилища.
//!
//! Журнал читается один раз при создании, пишется целиком после каждого
//! добавления и очищается только полностью.

use super::aggregate::HistoryEntry;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

/// Ключ в хранилище
pub const HISTORY_KEY: &str = "log_doctor_history";
/// Максимум записей; самые старые вытесняются первыми
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage write failed: {0}")]
    WriteFailed(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Key-value хранилище строк (localStorage в браузере, память в тестах)
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Хранилище в памяти
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Журнал истории, новые записи первыми
pub struct HistoryLog<S: KeyValueStorage> {
    storage: S,
    entries: Vec<HistoryEntry>,
}

impl<S: KeyValueStorage> HistoryLog<S> {
    /// Прочитать журнал. Повреждённые данные считаются пустой историей.
    pub fn load(storage: S) -> Self {
        let entries = match storage.get(HISTORY_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(MAX_ENTRIES);
                    entries
                }
                Err(e) => {
                    ::log::warn!("History storage is corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
        };
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Добавить запись в начало, обрезать до [`MAX_ENTRIES`] и сохранить.
    ///
    /// При ошибке записи журнал в памяти остаётся прежним.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut next = Vec::with_capacity(MAX_ENTRIES);
        next.push(entry);
        next.extend(self.entries.iter().take(MAX_ENTRIES - 1).cloned());

        let raw =
            serde_json::to_string(&next).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(HISTORY_KEY, &raw)?;
        self.entries = next;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(HISTORY_KEY)?;
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_log_analysis::AnalysisMode;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(n: i64) -> HistoryEntry {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(n);
        HistoryEntry::new(
            &format!("log #{}", n),
            "{}".into(),
            AnalysisMode::Structured,
            at,
        )
    }

    #[test]
    fn test_eleventh_entry_evicts_oldest() {
        let storage = MemoryStorage::new();
        let mut log = HistoryLog::load(&storage);
        for n in 0..10 {
            log.append(entry(n)).unwrap();
        }
        assert_eq!(log.len(), 10);

        log.append(entry(10)).unwrap();
        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.entries()[0].log_full, "log #10");
        assert_eq!(log.entries()[9].log_full, "log #1");
        assert!(log.entries().iter().all(|e| e.log_full != "log #0"));
    }

    #[test]
    fn test_persisted_and_reloaded() {
        let storage = MemoryStorage::new();
        {
            let mut log = HistoryLog::load(&storage);
            log.append(entry(1)).unwrap();
            log.append(entry(2)).unwrap();
        }
        let reloaded = HistoryLog::load(&storage);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[0].log_full, "log #2");
        assert!(reloaded.find(entry(1).id).is_some());
    }

    #[test]
    fn test_corrupt_storage_is_empty_history() {
        let storage = MemoryStorage::new();
        storage.set(HISTORY_KEY, "{not json").unwrap();
        let mut log = HistoryLog::load(&storage);
        assert!(log.is_empty());

        log.append(entry(1)).unwrap();
        assert_eq!(HistoryLog::load(&storage).len(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let storage = MemoryStorage::new();
        let mut log = HistoryLog::load(&storage);
        log.append(entry(1)).unwrap();
        log.clear().unwrap();
        assert!(log.is_empty());
        assert!(storage.get(HISTORY_KEY).is_none());
    }

    struct ReadOnly;

    impl KeyValueStorage for ReadOnly {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteFailed("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let mut log = HistoryLog::load(ReadOnly);
        assert!(log.append(entry(1)).is_err());
        assert!(log.is_empty());
    }
}
