//! Procedural sky.

mod sky;

pub use sky::{Sky, SkySettings, SkyTerms, SkyUniform};
