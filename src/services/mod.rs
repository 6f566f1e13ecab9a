pub mod collector;
pub mod executor;
pub mod local_source;
pub mod updater;

pub use collector::SysinfoCollector;
pub use executor::SystemExecutor;
pub use local_source::LocalSource;
pub use updater::{diff_snapshots, prime, start_updater, SharedCollector};
