//! Loading source tables and exporting results.

pub mod export;
pub mod loader;

pub use export::*;
pub use loader::*;
