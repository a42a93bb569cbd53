//! Composite configuration assembly
//!
//! Orchestrates the whole run: load the trainer/model/preprocessing
//! fragments, resolve the dataset section (loaded fragment or synthesized
//! multi-speaker collections), load scheduler/optimizer, resolve
//! interpolations, and persist. Every failure is terminal; nothing is
//! written on an abort path.

use crate::document::{CompositeConfig, DatasetSection};
use crate::error::Result;
use crate::fragment::{load_fragment, Category};
use crate::resolve::{resolve, ResolverContext};
use crate::speakers::{build_descriptors, enumerate_speakers, set_speaker_count};
use std::path::PathBuf;

/// Inputs for one assembly run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Model fragment name (also selects the preprocessing fragment).
    pub model: String,
    /// Dataset fragment name (also selects the dataloader fragment).
    pub dataset: String,
    /// Scheduler fragment name (also selects the optimizer fragment).
    pub scheduler: String,
    /// Stem of the output file under the configs root.
    pub output: String,
    /// Synthesize per-speaker datasets instead of loading a dataset fragment.
    pub multi_speaker: bool,
    /// Root directory holding the fragment category directories.
    pub configs_root: PathBuf,
    /// Root directory holding the train/ and valid/ speaker folders.
    pub data_root: PathBuf,
}

impl AssembleOptions {
    /// Destination of the merged document: `<configs root>/<output>.yaml`.
    pub fn output_path(&self) -> PathBuf {
        self.configs_root.join(format!("{}.yaml", self.output))
    }
}

/// Assemble the composite document in memory.
pub fn assemble(opts: &AssembleOptions, ctx: &ResolverContext) -> Result<CompositeConfig> {
    let mut config = CompositeConfig::with_defaults(opts.data_root.clone());

    config.trainer = load_fragment(&opts.configs_root, Category::Trainer, "base")?;
    config.model = load_fragment(&opts.configs_root, Category::Model, &opts.model)?;
    config.preprocessing = load_fragment(&opts.configs_root, Category::Preprocessing, &opts.model)?;

    config.dataset = if opts.multi_speaker {
        let train_ids = enumerate_speakers(&opts.data_root, "train")?;
        let valid_ids = enumerate_speakers(&opts.data_root, "valid")?;
        let collections = build_descriptors(&opts.data_root, &train_ids, &valid_ids);
        set_speaker_count(&mut config.model, train_ids.len());
        DatasetSection::MultiSpeaker(collections)
    } else {
        DatasetSection::Fragment(load_fragment(
            &opts.configs_root,
            Category::Dataset,
            &opts.dataset,
        )?)
    };
    config.dataloader = load_fragment(&opts.configs_root, Category::Dataloader, &opts.dataset)?;

    config.scheduler = load_fragment(&opts.configs_root, Category::Scheduler, &opts.scheduler)?;
    config.optimizer = load_fragment(&opts.configs_root, Category::Optimizer, &opts.scheduler)?;

    for value in [
        &mut config.trainer,
        &mut config.model,
        &mut config.preprocessing,
        &mut config.dataloader,
        &mut config.scheduler,
        &mut config.optimizer,
    ] {
        resolve(value, ctx)?;
    }
    if let DatasetSection::Fragment(fragment) = &mut config.dataset {
        resolve(fragment, ctx)?;
    }

    Ok(config)
}

/// Assemble and write the composite document, returning its path.
pub fn assemble_to_file(opts: &AssembleOptions, ctx: &ResolverContext) -> Result<PathBuf> {
    let config = assemble(opts, ctx)?;
    let out_path = opts.output_path();
    let content = serde_yaml::to_string(&config)?;
    std::fs::write(&out_path, content)?;
    Ok(out_path)
}
