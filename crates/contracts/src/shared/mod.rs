pub mod diagram;
pub mod diff;
