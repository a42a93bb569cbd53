//! Error types for Afinar

use crate::fragment::Category;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not find {category} '{name}'")]
    MissingFragment { category: Category, name: String },

    #[error("Speaker resolution failed: {0}")]
    SpeakerResolution(String),

    #[error("Unknown resolver '{0}'")]
    UnknownResolver(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
