pub mod process;
pub mod query;

pub use process::{KillMode, ProcessDetails, ProcessRecord, ProcessStatus, ProcessUpdateEvent};
pub use query::{apply_sort, is_system, ProcessFilter, SortDirection, SortField, SortSpec};
