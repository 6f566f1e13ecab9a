pub mod filter;
pub mod process;
pub mod selection;
pub mod settings;

pub use filter::FilterStore;
pub use process::{epoch_millis, ProcessMap, ProcessTable};
pub use selection::SelectionStore;
pub use settings::{ColumnDef, ColumnId, SettingsStore, Theme};
