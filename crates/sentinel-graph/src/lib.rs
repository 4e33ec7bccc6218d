//! Module Graph & Cycles (C5), §4.4.

mod builder;
mod cycles;

pub use builder::{build, ModuleGraph};
pub use cycles::{find_cycles, Cycle};
