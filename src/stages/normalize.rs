use crate::pipeline::CorrectionStage;
use crate::record::GffLine;

/// Suffix the transfer tool appends to the sequence names it emits.
const TRANSFER_SUFFIX: &str = ".final";

/// Restores the plain contig name in the first column and blanks the source
/// column.
///
/// The transfer tool names its output sequences `<run-id>.<contig>.final`;
/// the contig field is truncated at the transfer suffix and stripped of the
/// leading run identifier. Must run before renumbering, which derives the
/// new identifiers from the cleaned contig name.
pub struct ContigSourceNormalizer;

impl CorrectionStage for ContigSourceNormalizer {
    fn name(&self) -> &'static str {
        "contig and source cleanup"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;
        for record in lines.iter_mut().filter_map(GffLine::as_feature_mut) {
            if let Some(position) = record.contig.find(TRANSFER_SUFFIX) {
                record.contig.truncate(position);
            }
            if let Some(position) = record.contig.find('.') {
                record.contig.drain(..=position);
            }
            record.source = ".".to_string();
        }
        lines
    }
}
