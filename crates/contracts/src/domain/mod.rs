pub mod a001_log_analysis;
pub mod a002_analysis_history;
