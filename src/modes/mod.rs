pub mod builtin;
pub mod loader;
pub mod registry;
pub mod types;

pub use registry::{ModeRegistry, SourceFilter};
pub use types::{GroupEntry, GroupName, GroupOptions, Mode, ModeSource};
