//! Named YAML fragment loading
//!
//! Fragments live at `<configs root>/<category>/<name>.yaml` and are loaded
//! as untyped YAML values; their contents are merged into the composite
//! document without interpretation.

use crate::error::{Error, Result};
use serde_yaml::Value;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fragment categories, each backed by a directory under the configs root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Trainer,
    Model,
    Preprocessing,
    Dataset,
    Dataloader,
    Scheduler,
    Optimizer,
}

impl Category {
    /// Directory name under the configs root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Trainer => "trainer",
            Category::Model => "model",
            Category::Preprocessing => "preprocessing",
            Category::Dataset => "dataset",
            Category::Dataloader => "dataloader",
            Category::Scheduler => "scheduler",
            Category::Optimizer => "optimizer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Path of the fragment `<configs_root>/<category>/<name>.yaml`.
pub fn fragment_path(configs_root: &Path, category: Category, name: &str) -> PathBuf {
    configs_root
        .join(category.dir_name())
        .join(format!("{name}.yaml"))
}

/// Load a named fragment as an untyped YAML value.
///
/// A missing file is reported as [`Error::MissingFragment`] naming the
/// category and the requested name; a file that exists but does not parse is
/// reported as [`Error::Yaml`]. The two are distinct so the operator knows
/// whether to fix a name or a file.
pub fn load_fragment(configs_root: &Path, category: Category, name: &str) -> Result<Value> {
    let path = fragment_path(configs_root, category, name);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::MissingFragment {
                category,
                name: name.to_string(),
            })
        }
        Err(e) => return Err(Error::Io(e)),
    };
    Ok(serde_yaml::from_str(&content)?)
}
