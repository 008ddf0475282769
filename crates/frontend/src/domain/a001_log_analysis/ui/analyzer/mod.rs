//! Log Analysis UI Module (MVVM Standard)
//!
//! Structure:
//! - model.rs: API functions (structured request, streaming chat)
//! - view_model.rs: AnalyzerVm with RwSignals and the submission cycle
//! - view.rs: Main component LogAnalyzer

mod model;
mod view;
mod view_model;

pub use view::LogAnalyzer;
pub use view_model::AnalyzerVm;
