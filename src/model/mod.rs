mod process_entry;
mod system_snapshot;

pub use process_entry::{ProcessEntry, WorkingSet};
pub use system_snapshot::*;
