pub mod catalog;
pub mod orchestrator;
pub mod types;

pub use catalog::{ToolCatalog, ToolCatalogEntry};
pub use orchestrator::{TaskOrchestrator, ToolUseDecision};
pub use types::{Message, MessageRole, Task, TaskState};
