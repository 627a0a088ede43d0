// src/exec/mod.rs

//! Built-in transforms used by config-declared tasks.
//!
//! - [`command`] runs a shell command per matched file (`cmd = "..."`).
//! - [`copy`] copies the source bytes verbatim (`copy = true`).

pub mod command;
pub mod copy;

pub use command::ShellTransform;
pub use copy::CopyTransform;
