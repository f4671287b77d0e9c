//! Question-answering client.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod prompt;

pub use builder::QaClientBuilder;
pub use core::{GenerationSettings, QaClient};
