pub mod gateway;
pub mod json_extract;
pub mod openai_provider;
pub mod types;

pub use gateway::{GatewayError, GatewayOutcome, ModelGateway};
pub use types::*;
