//! Transform clients and the LLM-backed transform service.

pub mod chat_backend;
pub mod http_client;
pub mod openai_api_agent;
pub mod prompts;
pub mod transform_service;

pub use chat_backend::{AgentError, ChatBackend, ChatCompletion};
pub use http_client::{DEFAULT_SERVER_URL, HttpTransformClient};
pub use openai_api_agent::OpenAIApiAgent;
pub use prompts::PromptLibrary;
pub use transform_service::{LocalTransformClient, TransformService};
