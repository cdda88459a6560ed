mod collector;
mod cpu;
mod history;
mod memory;
mod process;
mod reconcile;
mod source;

pub use collector::Collector;
pub use history::HistoryBuffer;
pub use process::is_critical_process;
pub use reconcile::SelectionState;
pub use source::{KillSignal, ProcSource, SystemSource};
