pub mod diagram_view;
pub mod diff_view;
pub mod severity_badge;

pub use diagram_view::DiagramView;
pub use diff_view::DiffView;
pub use severity_badge::SeverityBadge;
