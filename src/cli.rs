//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! afinar
//! afinar --model diff_svc_v2 --scheduler warmup_cosine --output my_run
//! afinar --multi-speaker false --dataset naive_svc
//! ```

use crate::assemble::AssembleOptions;
use clap::Parser;
use std::path::PathBuf;

/// Afinar: composite training-configuration assembler
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "afinar")]
#[command(version)]
#[command(about = "Assemble a composite YAML training configuration from named fragments")]
pub struct Cli {
    /// Model fragment to use
    #[arg(long, default_value = "diff_svc_v2")]
    pub model: String,

    /// Dataset fragment to use
    #[arg(long, default_value = "naive_svc")]
    pub dataset: String,

    /// Scheduler fragment to use
    #[arg(long, default_value = "warmup_cosine")]
    pub scheduler: String,

    /// Name of the output file
    #[arg(long, default_value = "svc_hubert_soft")]
    pub output: String,

    /// Whether to synthesize a multi-speaker dataset
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub multi_speaker: bool,

    /// Root directory holding the fragment categories
    #[arg(long, default_value = "configs")]
    pub configs_dir: PathBuf,

    /// Root directory holding the train/ and valid/ speaker folders
    #[arg(long, default_value = "dataset")]
    pub data_root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Translate the parsed flags into assembler inputs.
    pub fn to_options(&self) -> AssembleOptions {
        AssembleOptions {
            model: self.model.clone(),
            dataset: self.dataset.clone(),
            scheduler: self.scheduler.clone(),
            output: self.output.clone(),
            multi_speaker: self.multi_speaker,
            configs_root: self.configs_dir.clone(),
            data_root: self.data_root.clone(),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
