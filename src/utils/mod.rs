// Shared utilities

pub mod constants;
pub mod storage;
pub mod timer;

pub use constants::*;
pub use storage::*;
pub use timer::*;
