use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::pipeline::CorrectionStage;
use crate::record::{GffLine, TYPE_NCRNA};

/// Converter-internal keys with no meaning in the corrected output: the
/// translation-table reference, the codon-start hint, the internal
/// feature-flag bundle and the locus-tag echo.
static STRIP_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["locus_tag", "transl_table", "codon_start", "featflags"]
        .into_iter()
        .collect()
});

/// Strips converter-internal attributes and renames vendor keys to their
/// canonical forms.
///
/// A key slated for removal can occur more than once in one attribute list
/// after the upstream merges; a single retain pass removes every
/// occurrence. `standard_name` becomes the canonical `Name` key, and for
/// ncRNA records the lowercased class key is restored to `ncRNA_class`.
/// The pass is idempotent.
pub struct AttributeSanitizer;

impl CorrectionStage for AttributeSanitizer {
    fn name(&self) -> &'static str {
        "attribute cleanup"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;
        for record in lines.iter_mut().filter_map(GffLine::as_feature_mut) {
            record
                .attributes
                .retain(|pair| !STRIP_KEYS.contains(pair.key.as_str()));
            record.attributes.rename_key("standard_name", "Name");
            if record.is_type(TYPE_NCRNA) {
                record.attributes.rename_key("ncrna_class", "ncRNA_class");
            }
        }
        lines
    }
}
