pub mod backend_client;
pub mod gemini_client;
pub mod llm_client;
pub mod openai_client;

pub use backend_client::{BackendClient, CompareRequest, SimulationRequest};
pub use gemini_client::GeminiClient;
pub use llm_client::LlmClient;
pub use openai_client::OpenAiClient;
