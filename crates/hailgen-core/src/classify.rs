//! Avro listing classification.
//!
//! Turns a recursive GCS listing into the per-category argument groups that
//! `hl.import_gvs` expects: superpartitioned categories become a list of
//! lists (one outer entry per superpartition), everything else a flat list.

use std::collections::BTreeMap;

use crate::error::{HailgenError, Result};

/// File suffix that marks a line as an Avro export file.
pub const AVRO_SUFFIX: &str = ".avro";

/// Category keys that are sharded into superpartitions by the GVS export.
pub const DEFAULT_SUPERPARTITIONED_KEYS: &[&str] = &["vets", "refs"];

/// One classified argument group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvroGroup {
    /// Paths in encounter order, one per file.
    Flat(Vec<String>),
    /// Outer index is the zero-based superpartition number; inner lists keep
    /// encounter order within that superpartition.
    Superpartitioned(Vec<Vec<String>>),
}

impl AvroGroup {
    /// Total number of file paths in the group.
    pub fn file_count(&self) -> usize {
        match self {
            Self::Flat(paths) => paths.len(),
            Self::Superpartitioned(parts) => parts.iter().map(Vec::len).sum(),
        }
    }
}

/// Classified argument set, keyed by category, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvroArgumentSet {
    entries: Vec<(String, AvroGroup)>,
}

impl AvroArgumentSet {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AvroGroup)> {
        self.entries.iter().map(|(k, g)| (k.as_str(), g))
    }

    pub fn get(&self, key: &str) -> Option<&AvroGroup> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, g)| g)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of classified file paths across all groups.
    pub fn file_count(&self) -> usize {
        self.entries.iter().map(|(_, g)| g.file_count()).sum()
    }
}

/// Partial group state during a classification pass.
///
/// Superpartitions are collected into an index-keyed map so the listing does
/// not have to present them in order; contiguity is checked once at the end.
enum GroupBuilder {
    Flat(Vec<String>),
    Superpartitioned(BTreeMap<usize, Vec<String>>),
}

/// Classifies Avro listing lines into an [`AvroArgumentSet`].
#[derive(Debug, Clone)]
pub struct PathClassifier {
    superpartitioned_keys: Vec<String>,
    suffix: String,
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_SUPERPARTITIONED_KEYS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            AVRO_SUFFIX.to_string(),
        )
    }
}

impl PathClassifier {
    pub fn new(superpartitioned_keys: Vec<String>, suffix: String) -> Self {
        Self {
            superpartitioned_keys,
            suffix,
        }
    }

    /// Classify every qualifying line under `prefix` into exactly one group.
    ///
    /// Lines are trimmed; lines not ending in the recognized suffix are
    /// skipped regardless of shape. A qualifying line that does not start
    /// with the normalized prefix, has too few path segments for its
    /// category, or names a superpartition directory without a parseable
    /// numeric suffix aborts the whole pass - no partial result is returned.
    pub fn classify<I, S>(&self, prefix: &str, lines: I) -> Result<AvroArgumentSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if prefix.is_empty() {
            return Err(HailgenError::EmptyPrefix);
        }
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };

        let mut builders: Vec<(String, GroupBuilder)> = Vec::new();

        for line in lines {
            let full_path = line.as_ref().trim();
            if !full_path.ends_with(&self.suffix) {
                continue;
            }
            if !full_path.starts_with(&prefix) {
                return Err(HailgenError::PrefixMismatch {
                    prefix,
                    path: full_path.to_string(),
                });
            }

            let relative = &full_path[prefix.len()..];
            let parts: Vec<&str> = relative.split('/').collect();
            let key = parts[0];

            if self.superpartitioned_keys.iter().any(|k| k == key) {
                if parts.len() < 3 {
                    return Err(HailgenError::MissingSegments {
                        path: full_path.to_string(),
                    });
                }
                let index = parse_superpartition_index(full_path, parts[1])?;
                match entry(&mut builders, key, || {
                    GroupBuilder::Superpartitioned(BTreeMap::new())
                }) {
                    GroupBuilder::Superpartitioned(map) => {
                        map.entry(index).or_default().push(full_path.to_string());
                    }
                    GroupBuilder::Flat(_) => unreachable!("key classified as flat"),
                }
            } else {
                if parts.len() < 2 {
                    return Err(HailgenError::MissingSegments {
                        path: full_path.to_string(),
                    });
                }
                match entry(&mut builders, key, || GroupBuilder::Flat(Vec::new())) {
                    GroupBuilder::Flat(paths) => paths.push(full_path.to_string()),
                    GroupBuilder::Superpartitioned(_) => {
                        unreachable!("key classified as superpartitioned")
                    }
                }
            }
        }

        let mut entries = Vec::with_capacity(builders.len());
        for (key, builder) in builders {
            let group = match builder {
                GroupBuilder::Flat(paths) => AvroGroup::Flat(paths),
                GroupBuilder::Superpartitioned(map) => {
                    AvroGroup::Superpartitioned(into_contiguous(&key, map)?)
                }
            };
            entries.push((key, group));
        }

        Ok(AvroArgumentSet { entries })
    }
}

/// Find or create the builder for `key`, preserving first-seen order.
fn entry<'a>(
    builders: &'a mut Vec<(String, GroupBuilder)>,
    key: &str,
    init: impl FnOnce() -> GroupBuilder,
) -> &'a mut GroupBuilder {
    if let Some(pos) = builders.iter().position(|(k, _)| k == key) {
        return &mut builders[pos].1;
    }
    builders.push((key.to_string(), init()));
    &mut builders.last_mut().unwrap().1
}

/// Parse the 1-based `_NNN` suffix of a superpartition directory name into a
/// zero-based index (`vet_001` -> 0).
fn parse_superpartition_index(full_path: &str, segment: &str) -> Result<usize> {
    let malformed = || HailgenError::MalformedSuperpartition {
        path: full_path.to_string(),
        segment: segment.to_string(),
    };

    let suffix = segment.rsplit('_').next().unwrap_or(segment);
    let number: usize = suffix.parse().map_err(|_| malformed())?;
    // 1-based on disk; 0 never occurs in a well-formed export
    number.checked_sub(1).ok_or_else(malformed)
}

/// Flatten an index-keyed map into a dense outer list, failing on any gap.
fn into_contiguous(key: &str, map: BTreeMap<usize, Vec<String>>) -> Result<Vec<Vec<String>>> {
    let mut out = Vec::with_capacity(map.len());
    for (expected, (index, paths)) in map.into_iter().enumerate() {
        if index != expected {
            return Err(HailgenError::SuperpartitionGap {
                key: key.to_string(),
                index: expected,
            });
        }
        out.push(paths);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(prefix: &str, lines: &[&str]) -> Result<AvroArgumentSet> {
        PathClassifier::default().classify(prefix, lines.iter().copied())
    }

    #[test]
    fn test_groups_superpartitioned_and_flat() {
        let result = classify(
            "gs://bucket/avro/",
            &[
                "gs://bucket/avro/vets/vet_001/a.avro",
                "gs://bucket/avro/vets/vet_001/b.avro",
                "gs://bucket/avro/vets/vet_002/c.avro",
                "gs://bucket/avro/sample_mapping_data/d.avro",
            ],
        )
        .unwrap();

        assert_eq!(
            result.get("vets"),
            Some(&AvroGroup::Superpartitioned(vec![
                vec![
                    "gs://bucket/avro/vets/vet_001/a.avro".to_string(),
                    "gs://bucket/avro/vets/vet_001/b.avro".to_string(),
                ],
                vec!["gs://bucket/avro/vets/vet_002/c.avro".to_string()],
            ]))
        );
        assert_eq!(
            result.get("sample_mapping_data"),
            Some(&AvroGroup::Flat(vec![
                "gs://bucket/avro/sample_mapping_data/d.avro".to_string()
            ]))
        );
        assert_eq!(result.file_count(), 4);
    }

    #[test]
    fn test_prefix_without_trailing_slash_is_normalized() {
        let result = classify(
            "gs://bucket/avro",
            &["gs://bucket/avro/site_filtering_data/a.avro"],
        )
        .unwrap();
        assert_eq!(
            result.get("site_filtering_data"),
            Some(&AvroGroup::Flat(vec![
                "gs://bucket/avro/site_filtering_data/a.avro".to_string()
            ]))
        );
    }

    #[test]
    fn test_non_avro_lines_are_skipped() {
        let result = classify(
            "gs://bucket/avro/",
            &[
                "gs://bucket/avro/vets/vet_001/a.avro",
                "gs://bucket/avro/vets/vet_001/_SUCCESS",
                "gs://elsewhere/readme.txt",
                "",
            ],
        )
        .unwrap();
        assert_eq!(result.file_count(), 1);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let result = classify(
            "gs://bucket/avro/",
            &["  gs://bucket/avro/vqsr_tranche_data/a.avro\n"],
        )
        .unwrap();
        assert_eq!(
            result.get("vqsr_tranche_data"),
            Some(&AvroGroup::Flat(vec![
                "gs://bucket/avro/vqsr_tranche_data/a.avro".to_string()
            ]))
        );
    }

    #[test]
    fn test_out_of_order_superpartitions_are_regrouped() {
        let result = classify(
            "gs://bucket/avro/",
            &[
                "gs://bucket/avro/refs/ref_ranges_002/b.avro",
                "gs://bucket/avro/refs/ref_ranges_001/a.avro",
                "gs://bucket/avro/refs/ref_ranges_002/c.avro",
            ],
        )
        .unwrap();

        assert_eq!(
            result.get("refs"),
            Some(&AvroGroup::Superpartitioned(vec![
                vec!["gs://bucket/avro/refs/ref_ranges_001/a.avro".to_string()],
                vec![
                    "gs://bucket/avro/refs/ref_ranges_002/b.avro".to_string(),
                    "gs://bucket/avro/refs/ref_ranges_002/c.avro".to_string(),
                ],
            ]))
        );
    }

    #[test]
    fn test_superpartition_gap_is_an_error() {
        let err = classify(
            "gs://bucket/avro/",
            &[
                "gs://bucket/avro/vets/vet_001/a.avro",
                "gs://bucket/avro/vets/vet_003/b.avro",
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            HailgenError::SuperpartitionGap { index: 1, .. }
        ));
    }

    #[test]
    fn test_malformed_superpartition_name_is_an_error() {
        let err = classify("gs://bucket/avro/", &["gs://bucket/avro/vets/vet_abc/a.avro"])
            .unwrap_err();
        assert!(matches!(
            err,
            HailgenError::MalformedSuperpartition { .. }
        ));
    }

    #[test]
    fn test_zero_superpartition_number_is_an_error() {
        let err = classify("gs://bucket/avro/", &["gs://bucket/avro/vets/vet_000/a.avro"])
            .unwrap_err();
        assert!(matches!(
            err,
            HailgenError::MalformedSuperpartition { .. }
        ));
    }

    #[test]
    fn test_superpartitioned_path_needs_three_segments() {
        let err = classify("gs://bucket/avro/", &["gs://bucket/avro/vets/loose.avro"])
            .unwrap_err();
        assert!(matches!(err, HailgenError::MissingSegments { .. }));
    }

    #[test]
    fn test_prefix_mismatch_is_an_error() {
        let err = classify("gs://bucket/avro/", &["gs://other/vets/vet_001/a.avro"])
            .unwrap_err();
        assert!(matches!(err, HailgenError::PrefixMismatch { .. }));
    }

    #[test]
    fn test_empty_prefix_is_an_error() {
        let err = classify("", &["gs://bucket/avro/vets/vet_001/a.avro"]).unwrap_err();
        assert!(matches!(err, HailgenError::EmptyPrefix));
    }

    #[test]
    fn test_flat_keys_keep_first_seen_order() {
        let result = classify(
            "gs://bucket/avro/",
            &[
                "gs://bucket/avro/site_filtering_data/a.avro",
                "gs://bucket/avro/sample_mapping_data/b.avro",
                "gs://bucket/avro/site_filtering_data/c.avro",
            ],
        )
        .unwrap();
        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["site_filtering_data", "sample_mapping_data"]);
    }

    #[test]
    fn test_custom_superpartitioned_keys() {
        let classifier = PathClassifier::new(
            vec!["shards".to_string()],
            AVRO_SUFFIX.to_string(),
        );
        let result = classifier
            .classify(
                "gs://b/",
                ["gs://b/shards/shard_001/x.avro", "gs://b/vets/y.avro"],
            )
            .unwrap();
        assert!(matches!(
            result.get("shards"),
            Some(AvroGroup::Superpartitioned(_))
        ));
        assert!(matches!(result.get("vets"), Some(AvroGroup::Flat(_))));
    }
}
