use std::collections::HashMap;

use crate::pipeline::CorrectionStage;
use crate::record::GffLine;

/// Restores parent/child links lost in the format round trip.
///
/// A child carries its original parent identifier in a `note=Parent:<x>`
/// provenance note; the parent carries its own original identifier in a
/// `note=ID:<x>` note. For every child, the first record (in input order)
/// whose original identifier matches is taken as the parent, and the
/// parent's current, post-renumbering ID is attached as the child's
/// `Parent` attribute, directly after the child's own ID. A child whose
/// original parent was not transferred is left unlinked.
pub struct ParentLinker;

impl CorrectionStage for ParentLinker {
    fn name(&self) -> &'static str {
        "parent linking"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;

        // Index of the first record claiming each original identifier.
        // Equivalent to scanning the full record set per child, in linear time.
        let mut by_original_id: HashMap<String, usize> = HashMap::new();
        for (index, line) in lines.iter().enumerate() {
            if let Some(record) = line.as_feature() {
                if let Some(original) = record.attributes.original_id() {
                    by_original_id.entry(original.to_string()).or_insert(index);
                }
            }
        }

        let mut links: Vec<(usize, String)> = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let record = match line.as_feature() {
                Some(record) => record,
                None => continue,
            };
            let original_parent = match record.attributes.original_parent() {
                Some(value) => value,
                None => continue,
            };
            if let Some(&parent_index) = by_original_id.get(original_parent) {
                if let Some(parent_id) = lines[parent_index]
                    .as_feature()
                    .and_then(|parent| parent.attributes.id())
                {
                    links.push((index, parent_id.to_string()));
                }
            }
        }

        for (index, parent_id) in links {
            if let Some(record) = lines[index].as_feature_mut() {
                record.attributes.insert(1, "Parent", &parent_id);
            }
        }

        lines
    }
}
