use crate::pipeline::CorrectionStage;
use crate::record::GffLine;

/// Replaces converter-assigned identifiers with sequential `<contig>.<n>`
/// identifiers.
///
/// The converter emits every fragment of one logical feature with the same
/// identifier, as a contiguous block. Walking the records in order, the
/// counter advances whenever the pre-renumbering identifier differs from
/// that of the previous record, so all fragments of one block share the new
/// identifier. A record without an ID starts a new block and gains an ID at
/// the front of its attribute list.
pub struct IdRenumberer;

impl CorrectionStage for IdRenumberer {
    fn name(&self) -> &'static str {
        "identifier renumbering"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;
        let mut counter: u64 = 1;
        let mut previous: Option<Option<String>> = None;

        for record in lines.iter_mut().filter_map(GffLine::as_feature_mut) {
            let old_id = record.attributes.id().map(str::to_string);
            if let Some(previous_id) = &previous {
                if old_id.is_none() || *previous_id != old_id {
                    counter += 1;
                }
            }
            let new_id = format!("{}.{}", record.contig, counter);
            if !record.attributes.set_value("ID", &new_id) {
                record.attributes.insert(0, "ID", &new_id);
            }
            previous = Some(old_id);
        }

        lines
    }
}
