pub mod analyzer;
pub mod chat_stream;
pub mod result;
