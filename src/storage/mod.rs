//! Persistence sinks for field-group maps

mod memory;
mod sqlite;
mod traits;

pub use memory::MemorySink;
pub use sqlite::{SqliteSink, GROUP_NAMES};
pub use traits::{FieldGroupSink, SinkError, SinkResult};
