//! Speaker enumeration and multi-speaker dataset synthesis
//!
//! Each immediate subdirectory of `<data root>/train` and `<data root>/valid`
//! is one speaker. Speakers are assigned integer indices for model
//! conditioning, and the dataset section of the composite document becomes a
//! concatenation of one per-speaker dataset descriptor per split.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Dispatch identifier for the concatenating dataset wrapper.
pub const CONCAT_DATASET_TARGET: &str = "fish_diffusion.datasets.ConcatDataset";

/// Dispatch identifier for a single per-speaker dataset.
pub const NAIVE_DATASET_TARGET: &str = "fish_diffusion.datasets.naive.NaiveSVCDataset";

/// Dispatch identifier for the batch-collation function.
pub const NAIVE_COLLATE_FN: &str = "fish_diffusion.datasets.naive.NaiveSVCDataset.collate_fn";

/// Map each immediate subdirectory of `<data_root>/<split>` to an index.
///
/// Names are sorted lexicographically before assignment, so the indices do
/// not depend on the filesystem's directory iteration order. Plain files
/// under the split directory are ignored; nothing below one level is read.
/// Indices always form `{0, .., N-1}`.
pub fn enumerate_speakers(data_root: &Path, split: &str) -> Result<BTreeMap<String, usize>> {
    let split_dir = data_root.join(split);
    let entries = std::fs::read_dir(&split_dir)
        .map_err(|e| Error::SpeakerResolution(format!("{}: {e}", split_dir.display())))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::SpeakerResolution(e.to_string()))?;
        let file_type = entry
            .file_type()
            .map_err(|e| Error::SpeakerResolution(e.to_string()))?;
        if !file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect())
}

/// One per-speaker dataset reference.
///
/// The `_target_` string is an opaque dispatch identifier consumed later by
/// the training pipeline; it is emitted as-is and never resolved here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    #[serde(rename = "_target_")]
    pub target: String,
    pub path: PathBuf,
    pub speaker_id: usize,
}

/// An ordered concatenation of per-speaker datasets for one split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    #[serde(rename = "_target_")]
    pub target: String,
    pub datasets: Vec<DatasetDescriptor>,
    pub collate_fn: String,
}

/// Synthesized train/valid dataset sections for multi-speaker mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSpeakerDatasets {
    pub train: CollectionDescriptor,
    pub valid: CollectionDescriptor,
}

/// Build the per-speaker dataset collections for both splits.
///
/// Validation entries reuse the training index when the speaker name also
/// appears in the training map, so a real-world speaker keeps one canonical
/// index across both splits. A validation-only speaker keeps its
/// validation-local index; that index may collide with a training speaker's
/// index, which callers accept.
pub fn build_descriptors(
    data_root: &Path,
    train_ids: &BTreeMap<String, usize>,
    valid_ids: &BTreeMap<String, usize>,
) -> MultiSpeakerDatasets {
    let train_dir = data_root.join("train");
    let valid_dir = data_root.join("valid");

    let train = CollectionDescriptor {
        target: CONCAT_DATASET_TARGET.to_string(),
        datasets: train_ids
            .iter()
            .map(|(name, &id)| DatasetDescriptor {
                target: NAIVE_DATASET_TARGET.to_string(),
                path: train_dir.join(name),
                speaker_id: id,
            })
            .collect(),
        collate_fn: NAIVE_COLLATE_FN.to_string(),
    };

    let valid = CollectionDescriptor {
        target: CONCAT_DATASET_TARGET.to_string(),
        datasets: valid_ids
            .iter()
            .map(|(name, &id)| DatasetDescriptor {
                target: NAIVE_DATASET_TARGET.to_string(),
                path: valid_dir.join(name),
                speaker_id: train_ids.get(name).copied().unwrap_or(id),
            })
            .collect(),
        collate_fn: NAIVE_COLLATE_FN.to_string(),
    };

    MultiSpeakerDatasets { train, valid }
}

/// Point the model fragment's speaker embedding at the training speaker count.
///
/// Sets `speaker_encoder.input_size` in the loaded model fragment, creating
/// the intermediate mapping if the fragment omits it. This is the only place
/// derived data is fed back into a loaded fragment, and it must run before
/// the document is finalized.
pub fn set_speaker_count(model: &mut Value, count: usize) {
    let encoder_key = Value::from("speaker_encoder");

    if !model.is_mapping() {
        *model = Value::Mapping(Mapping::new());
    }
    if let Some(root) = model.as_mapping_mut() {
        let has_encoder = root.get(&encoder_key).map_or(false, Value::is_mapping);
        if !has_encoder {
            root.insert(encoder_key.clone(), Value::Mapping(Mapping::new()));
        }
        if let Some(encoder) = root.get_mut(&encoder_key).and_then(Value::as_mapping_mut) {
            encoder.insert(Value::from("input_size"), Value::from(count as u64));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn make_split(root: &Path, split: &str, speakers: &[&str]) {
        for speaker in speakers {
            fs::create_dir_all(root.join(split).join(speaker)).unwrap();
        }
    }

    #[test]
    fn test_enumerate_assigns_contiguous_sorted_indices() {
        let tmp = TempDir::new().unwrap();
        make_split(tmp.path(), "train", &["carol", "alice", "bob"]);

        let ids = enumerate_speakers(tmp.path(), "train").unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids["alice"], 0);
        assert_eq!(ids["bob"], 1);
        assert_eq!(ids["carol"], 2);
    }

    #[test]
    fn test_enumerate_ignores_plain_files() {
        let tmp = TempDir::new().unwrap();
        make_split(tmp.path(), "valid", &["alice"]);
        fs::write(tmp.path().join("valid").join("README.txt"), "notes").unwrap();

        let ids = enumerate_speakers(tmp.path(), "valid").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains_key("alice"));
    }

    #[test]
    fn test_enumerate_missing_split_surfaces_io_message() {
        let tmp = TempDir::new().unwrap();

        let err = enumerate_speakers(tmp.path(), "train").unwrap_err();
        match err {
            Error::SpeakerResolution(msg) => assert!(msg.contains("train")),
            other => panic!("Expected SpeakerResolution, got {other:?}"),
        }
    }

    #[test]
    fn test_enumerate_empty_split() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("train")).unwrap();

        let ids = enumerate_speakers(tmp.path(), "train").unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_validation_reuses_training_index() {
        // Train {a: 0, b: 1}, valid {a: 0, c: 0}: "a" keeps the training
        // value, "c" keeps its validation-local value even though it collides.
        let train_ids = BTreeMap::from([("a".to_string(), 0), ("b".to_string(), 1)]);
        let valid_ids = BTreeMap::from([("a".to_string(), 0), ("c".to_string(), 0)]);

        let collections = build_descriptors(Path::new("dataset"), &train_ids, &valid_ids);

        let by_name: BTreeMap<_, _> = collections
            .valid
            .datasets
            .iter()
            .map(|d| (d.path.file_name().unwrap().to_string_lossy().into_owned(), d.speaker_id))
            .collect();
        assert_eq!(by_name["a"], 0);
        assert_eq!(by_name["c"], 0);
    }

    #[test]
    fn test_descriptor_paths_and_targets() {
        let train_ids = BTreeMap::from([("alice".to_string(), 0)]);
        let valid_ids = BTreeMap::from([("alice".to_string(), 0)]);

        let collections = build_descriptors(Path::new("dataset"), &train_ids, &valid_ids);

        assert_eq!(collections.train.target, CONCAT_DATASET_TARGET);
        assert_eq!(collections.train.collate_fn, NAIVE_COLLATE_FN);
        let first = &collections.train.datasets[0];
        assert_eq!(first.target, NAIVE_DATASET_TARGET);
        assert_eq!(first.path, PathBuf::from("dataset/train/alice"));
        assert_eq!(
            collections.valid.datasets[0].path,
            PathBuf::from("dataset/valid/alice")
        );
    }

    #[test]
    fn test_descriptor_serializes_target_key() {
        let descriptor = DatasetDescriptor {
            target: NAIVE_DATASET_TARGET.to_string(),
            path: PathBuf::from("dataset/train/alice"),
            speaker_id: 3,
        };

        let yaml = serde_yaml::to_string(&descriptor).unwrap();
        assert!(yaml.contains("_target_:"));
        assert!(yaml.contains("speaker_id: 3"));
    }

    #[test]
    fn test_set_speaker_count_updates_existing_encoder() {
        let mut model: Value =
            serde_yaml::from_str("speaker_encoder:\n  input_size: 1\n  output_size: 256\n")
                .unwrap();

        set_speaker_count(&mut model, 7);

        assert_eq!(
            model["speaker_encoder"]["input_size"].as_u64(),
            Some(7)
        );
        // Sibling fields survive.
        assert_eq!(model["speaker_encoder"]["output_size"].as_u64(), Some(256));
    }

    #[test]
    fn test_set_speaker_count_creates_missing_encoder() {
        let mut model: Value = serde_yaml::from_str("hidden: 256\n").unwrap();

        set_speaker_count(&mut model, 2);

        assert_eq!(model["speaker_encoder"]["input_size"].as_u64(), Some(2));
        assert_eq!(model["hidden"].as_u64(), Some(256));
    }

    proptest! {
        #[test]
        fn prop_indices_unique_and_contiguous(
            names in proptest::collection::btree_set("[a-z][a-z0-9_]{0,12}", 0..16)
        ) {
            let tmp = TempDir::new().unwrap();
            fs::create_dir_all(tmp.path().join("train")).unwrap();
            for name in &names {
                fs::create_dir_all(tmp.path().join("train").join(name)).unwrap();
            }

            let ids = enumerate_speakers(tmp.path(), "train").unwrap();
            prop_assert_eq!(ids.len(), names.len());

            let indices: BTreeSet<usize> = ids.values().copied().collect();
            prop_assert_eq!(indices, (0..names.len()).collect::<BTreeSet<_>>());
        }

        #[test]
        fn prop_shared_names_always_take_training_index(
            shared in proptest::collection::btree_set("[a-z]{1,8}", 1..8)
        ) {
            let train_ids: BTreeMap<String, usize> = shared
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, name)| (name, i))
                .collect();
            // Validation enumerated the same names but offset, as if extra
            // directories shifted every index.
            let valid_ids: BTreeMap<String, usize> = shared
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, name)| (name, i + 100))
                .collect();

            let collections =
                build_descriptors(Path::new("dataset"), &train_ids, &valid_ids);

            for descriptor in &collections.valid.datasets {
                let name = descriptor.path.file_name().unwrap().to_string_lossy();
                prop_assert_eq!(descriptor.speaker_id, train_ids[name.as_ref()]);
            }
        }
    }
}
