pub mod chat_service;
pub mod project_service;

pub use chat_service::ChatService;
pub use project_service::ProjectService;
