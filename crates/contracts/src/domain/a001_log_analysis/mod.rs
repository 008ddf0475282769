pub mod aggregate;
pub mod request;
pub mod response;
pub mod submission;

pub use aggregate::{LogAnalysis, MalformedResult, Severity};
pub use request::{AnalysisRequest, AnalyzeRequest, ChatMessage, ChatRole};
pub use response::ErrorResponse;
pub use submission::{AnalysisMode, SubmissionState};
