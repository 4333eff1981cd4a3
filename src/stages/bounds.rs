use std::collections::HashMap;

use crate::pipeline::CorrectionStage;
use crate::record::{GffLine, TYPE_CDS, TYPE_MRNA};

/// Clamps coding-record coordinates into the bounds of the linked
/// transcript.
///
/// The transfer tool can move a coding segment slightly outside its
/// transcript. For every CDS with a resolved `Parent`, the first mRNA
/// record carrying that ID provides the allowed interval; the child's
/// start is raised and its end lowered as needed. No other record types
/// are adjusted.
pub struct BoundsCorrector;

impl CorrectionStage for BoundsCorrector {
    fn name(&self) -> &'static str {
        "coding-bounds correction"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;

        let mut transcript_bounds: HashMap<String, (i64, i64)> = HashMap::new();
        for record in lines.iter().filter_map(GffLine::as_feature) {
            if record.is_type(TYPE_MRNA) {
                if let Some(id) = record.attributes.id() {
                    transcript_bounds
                        .entry(id.to_string())
                        .or_insert((record.start, record.end));
                }
            }
        }

        for record in lines.iter_mut().filter_map(GffLine::as_feature_mut) {
            if !record.is_type(TYPE_CDS) {
                continue;
            }
            let parent = match record.attributes.parent() {
                Some(value) => value,
                None => continue,
            };
            if let Some(&(parent_start, parent_end)) = transcript_bounds.get(parent) {
                if record.start < parent_start {
                    record.start = parent_start;
                }
                if record.end > parent_end {
                    record.end = parent_end;
                }
            }
        }

        lines
    }
}
