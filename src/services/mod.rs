pub mod dashboard;
pub mod export_service;
pub mod llm_service;

pub use export_service::ExportService;
pub use llm_service::LlmService;
