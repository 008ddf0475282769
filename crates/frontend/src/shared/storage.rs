//! `localStorage` как хранилище журнала истории

use contracts::domain::a002_analysis_history::{KeyValueStorage, StorageError};

/// Доступ к `window.localStorage`. Хранилище запрашивается на каждую операцию,
/// поэтому тип ничего не держит и свободно копируется.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Переполнение квоты приходит исключением
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::WriteFailed(format!("{:?}", e)))
    }
}
