pub mod aggregate;
pub mod history_log;

pub use aggregate::HistoryEntry;
pub use history_log::{
    HistoryLog, KeyValueStorage, MemoryStorage, StorageError, HISTORY_KEY, MAX_ENTRIES,
};
