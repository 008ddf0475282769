// Log analysis handlers
pub mod a001_log_analysis;
