//! Canonical textual encoding of a classified argument set.
//!
//! Each group is rendered as a JSON array literal (nested for
//! superpartitioned groups) with 4-space indentation, matching what the
//! downstream `hl.import_gvs` call site expects to see interpolated.

use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::classify::{AvroArgumentSet, AvroGroup};
use crate::error::Result;

impl Serialize for AvroGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Flat(paths) => paths.serialize(serializer),
            Self::Superpartitioned(partitions) => partitions.serialize(serializer),
        }
    }
}

/// Render the argument set as `key=<json array>` assignments joined with
/// `,\n`, in the set's insertion order. Order and nesting are preserved
/// exactly, so structurally different sets never serialize identically.
pub fn serialize_avro_args(argset: &AvroArgumentSet) -> Result<String> {
    let mut assignments = Vec::with_capacity(argset.len());
    for (key, group) in argset.iter() {
        assignments.push(format!("{}={}", key, to_json_indent4(group)?));
    }
    Ok(assignments.join(",\n"))
}

fn to_json_indent4(group: &AvroGroup) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    group.serialize(&mut ser)?;
    // serde_json always emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PathClassifier;

    fn classify(lines: &[&str]) -> AvroArgumentSet {
        PathClassifier::default()
            .classify("gs://bucket/avro/", lines.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_flat_group_renders_as_json_array() {
        let argset = classify(&[
            "gs://bucket/avro/sample_mapping_data/a.avro",
            "gs://bucket/avro/sample_mapping_data/b.avro",
        ]);
        let rendered = serialize_avro_args(&argset).unwrap();
        assert_eq!(
            rendered,
            concat!(
                "sample_mapping_data=[\n",
                "    \"gs://bucket/avro/sample_mapping_data/a.avro\",\n",
                "    \"gs://bucket/avro/sample_mapping_data/b.avro\"\n",
                "]",
            )
        );
    }

    #[test]
    fn test_superpartitioned_group_renders_nested() {
        let argset = classify(&[
            "gs://bucket/avro/vets/vet_001/a.avro",
            "gs://bucket/avro/vets/vet_002/b.avro",
        ]);
        let rendered = serialize_avro_args(&argset).unwrap();
        assert_eq!(
            rendered,
            concat!(
                "vets=[\n",
                "    [\n",
                "        \"gs://bucket/avro/vets/vet_001/a.avro\"\n",
                "    ],\n",
                "    [\n",
                "        \"gs://bucket/avro/vets/vet_002/b.avro\"\n",
                "    ]\n",
                "]",
            )
        );
    }

    #[test]
    fn test_entries_joined_in_insertion_order() {
        let argset = classify(&[
            "gs://bucket/avro/vqsr_filtering_data/a.avro",
            "gs://bucket/avro/site_filtering_data/b.avro",
        ]);
        let rendered = serialize_avro_args(&argset).unwrap();
        let first = rendered.find("vqsr_filtering_data=").unwrap();
        let second = rendered.find("site_filtering_data=").unwrap();
        assert!(first < second);
        assert!(rendered.contains(",\n"));
    }

    #[test]
    fn test_empty_argset_renders_empty() {
        let argset = classify(&[]);
        assert_eq!(serialize_avro_args(&argset).unwrap(), "");
    }
}
