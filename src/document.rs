//! Composite configuration document schema
//!
//! The top level is typed; the fragment fields stay opaque YAML values and
//! are carried through untouched apart from interpolation resolution.

use crate::speakers::MultiSpeakerDatasets;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;

/// Dataset section of the composite document.
///
/// Single-speaker runs carry a loaded dataset fragment; multi-speaker runs
/// carry the synthesized per-speaker collections instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetSection {
    MultiSpeaker(MultiSpeakerDatasets),
    Fragment(Value),
}

/// The fully assembled training configuration.
///
/// Built once per invocation, resolved, written to `configs/<output>.yaml`,
/// and never mutated after the write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeConfig {
    pub trainer: Value,
    pub model_type: String,
    pub text_features_extractor_type: String,
    pub pitch_extractor_type: String,
    pub pretrained: Option<String>,
    pub resume: Option<String>,
    pub tensorboard: bool,
    pub resume_id: Option<String>,
    pub entity: Option<String>,
    pub name: Option<String>,
    pub only_train_speaker_embeddings: bool,
    pub path: PathBuf,
    pub clean: bool,
    pub num_workers: usize,
    pub no_augmentation: bool,
    pub model: Value,
    pub preprocessing: Value,
    pub dataset: DatasetSection,
    pub dataloader: Value,
    pub scheduler: Value,
    pub optimizer: Value,
}

impl CompositeConfig {
    /// Fixed defaults for the bookkeeping fields; fragment fields start null
    /// and are filled in by the assembler.
    pub fn with_defaults(data_root: PathBuf) -> Self {
        Self {
            trainer: Value::Null,
            model_type: "DiffSVC".to_string(),
            text_features_extractor_type: "HubertSoft".to_string(),
            pitch_extractor_type: "ParselMouthPitchExtractor".to_string(),
            pretrained: None,
            resume: None,
            tensorboard: false,
            resume_id: None,
            entity: None,
            name: None,
            only_train_speaker_embeddings: false,
            path: data_root,
            clean: false,
            num_workers: 8,
            no_augmentation: true,
            model: Value::Null,
            preprocessing: Value::Null,
            dataset: DatasetSection::Fragment(Value::Null),
            dataloader: Value::Null,
            scheduler: Value::Null,
            optimizer: Value::Null,
        }
    }
}
