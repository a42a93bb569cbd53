//! # Afinar: Training-Configuration Assembly
//!
//! Afinar merges named YAML fragments (trainer, model, preprocessing, dataset,
//! dataloader, scheduler, optimizer) into one composite training configuration
//! for a diffusion SVC pipeline. In multi-speaker mode it replaces the dataset
//! fragment with a per-speaker concatenated dataset structure derived from the
//! dataset directory tree.
//!
//! ## Architecture
//!
//! - **fragment**: Named YAML fragment loading
//! - **speakers**: Speaker enumeration and dataset descriptor synthesis
//! - **resolve**: `${name}` interpolation against an explicit resolver context
//! - **document**: Composite document schema
//! - **assemble**: Orchestration and persistence
//! - **cli**: Command-line surface

pub mod assemble;
pub mod cli;
pub mod document;
pub mod error;
pub mod fragment;
pub mod resolve;
pub mod speakers;

pub use error::{Error, Result};
