//! Generic helpers shared by the core modules.

pub mod shell;
