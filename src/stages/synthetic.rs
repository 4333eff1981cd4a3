use crate::pipeline::CorrectionStage;
use crate::record::{
    Attributes, FeatureRecord, GffLine, TYPE_CDS, TYPE_DATABANK_ENTRY, TYPE_MRNA,
    TYPE_SYNTHETIC_REGION,
};

/// Flag payload marking a synthetic region as a collapsed coding feature.
const FLAG_CODING: &str = "type:CDS";
/// Flag payload marking a synthetic region as a collapsed transcript.
const FLAG_TRANSCRIPT: &str = "type:mRNA";

/// Resolves the placeholder records the EMBL-to-GFF converter emits in place
/// of real features.
///
/// A synthetic region flagged as a coding feature is dropped and its
/// attribute payload replaces the attributes of every immediately following
/// CDS record. A synthetic region flagged as a transcript is promoted in
/// place to an mRNA record, and immediately following mRNA records without
/// their own ID are fragments of the same conceptual feature and are
/// dropped. Databank pseudo-features are dropped unconditionally. Any other
/// line ends an active group and passes through unchanged.
pub struct SyntheticFeatureResolver;

enum State {
    Scanning,
    InCodingGroup(Attributes),
    InTranscriptGroup,
}

enum Classified {
    Coding(Attributes),
    Transcript(FeatureRecord),
    Databank,
    Pass(GffLine),
}

impl CorrectionStage for SyntheticFeatureResolver {
    fn name(&self) -> &'static str {
        "synthetic-feature resolution"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut output = Vec::with_capacity(lines.len());
        let mut state = State::Scanning;

        for line in lines {
            loop {
                match state {
                    State::InCodingGroup(ref payload) => {
                        if let Some(record) = line.as_feature() {
                            if record.is_type(TYPE_CDS) {
                                let mut record = record.clone();
                                record.attributes = payload.clone();
                                output.push(GffLine::Feature(record));
                                break;
                            }
                        }
                        // group ends here; rescan the line from Scanning
                        state = State::Scanning;
                    }
                    State::InTranscriptGroup => {
                        if let Some(record) = line.as_feature() {
                            if record.is_type(TYPE_MRNA) && record.attributes.id().is_none() {
                                break; // fragment of the promoted transcript
                            }
                        }
                        state = State::Scanning;
                    }
                    State::Scanning => {
                        match classify(line) {
                            Classified::Coding(payload) => {
                                state = State::InCodingGroup(payload);
                            }
                            Classified::Transcript(record) => {
                                output.push(GffLine::Feature(record));
                                state = State::InTranscriptGroup;
                            }
                            Classified::Databank => {}
                            Classified::Pass(line) => output.push(line),
                        }
                        break;
                    }
                }
            }
        }

        output
    }
}

fn classify(line: GffLine) -> Classified {
    let record = match line {
        GffLine::Feature(ref record) => record,
        GffLine::Opaque(_) => return Classified::Pass(line),
    };
    if record.is_type(TYPE_SYNTHETIC_REGION) {
        if has_flag(&record.attributes, FLAG_CODING) {
            return Classified::Coding(record.attributes.clone());
        }
        if has_flag(&record.attributes, FLAG_TRANSCRIPT) {
            let mut promoted = record.clone();
            promoted.feature_type = TYPE_MRNA.to_string();
            return Classified::Transcript(promoted);
        }
        return Classified::Pass(line);
    }
    if record.is_type(TYPE_DATABANK_ENTRY) {
        return Classified::Databank;
    }
    Classified::Pass(line)
}

fn has_flag(attributes: &Attributes, flag: &str) -> bool {
    attributes
        .iter()
        .any(|pair| pair.key == "featflags" && pair.value.contains(flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(text: &str) -> Vec<GffLine> {
        text.lines().map(GffLine::parse).collect()
    }

    fn types_of(lines: &[GffLine]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| line.as_feature())
            .map(|record| record.feature_type.clone())
            .collect()
    }

    #[test]
    fn test_coding_group_attributes_transferred() {
        let lines = parse_all(
            "c\t.\tbiological_region\t1\t300\t.\t+\t.\tID=b1;featflags=type:CDS;note=ID:gene-1\n\
             c\t.\tCDS\t1\t100\t.\t+\t.\tID=frag1\n\
             c\t.\tCDS\t150\t300\t.\t+\t.\tID=frag2\n\
             c\t.\tgene\t1\t300\t.\t+\t.\tID=g1\n",
        );
        let resolved = SyntheticFeatureResolver.apply(lines);
        assert_eq!(types_of(&resolved), vec!["CDS", "CDS", "gene"]);
        for record in resolved[..2].iter().filter_map(|line| line.as_feature()) {
            assert_eq!(record.attributes.id(), Some("b1"));
            assert_eq!(record.attributes.original_id(), Some("gene-1"));
        }
        // coordinates of the real CDS records are kept
        assert_eq!(resolved[0].as_feature().unwrap().start, 1);
        assert_eq!(resolved[1].as_feature().unwrap().start, 150);
    }

    #[test]
    fn test_transcript_promotion_drops_fragments() {
        let lines = parse_all(
            "c\t.\tbiological_region\t1\t500\t.\t+\t.\tID=b2;featflags=type:mRNA\n\
             c\t.\tmRNA\t1\t200\t.\t+\t.\tnote=fragment\n\
             c\t.\tmRNA\t250\t500\t.\t+\t.\tnote=fragment\n\
             c\t.\tmRNA\t600\t900\t.\t+\t.\tID=m2\n",
        );
        let resolved = SyntheticFeatureResolver.apply(lines);
        assert_eq!(types_of(&resolved), vec!["mRNA", "mRNA"]);
        assert_eq!(resolved[0].as_feature().unwrap().attributes.id(), Some("b2"));
        assert_eq!(resolved[1].as_feature().unwrap().attributes.id(), Some("m2"));
    }

    #[test]
    fn test_databank_entry_dropped() {
        let lines = parse_all(
            "c\t.\tdatabank_entry\t1\t5000\t.\t+\t.\tID=d1\n\
             c\t.\tgene\t10\t90\t.\t+\t.\tID=g1\n",
        );
        let resolved = SyntheticFeatureResolver.apply(lines);
        assert_eq!(types_of(&resolved), vec!["gene"]);
    }

    #[test]
    fn test_unflagged_region_passes_through() {
        let lines = parse_all("c\t.\tbiological_region\t1\t50\t.\t+\t.\tID=b3;note=misc\n");
        let resolved = SyntheticFeatureResolver.apply(lines);
        assert_eq!(types_of(&resolved), vec!["biological_region"]);
    }

    #[test]
    fn test_opaque_line_ends_coding_group() {
        let lines = parse_all(
            "c\t.\tbiological_region\t1\t300\t.\t+\t.\tID=b1;featflags=type:CDS\n\
             c\t.\tCDS\t1\t100\t.\t+\t.\tID=frag1\n\
             # comment\n\
             c\t.\tCDS\t150\t300\t.\t+\t.\tID=other\n",
        );
        let resolved = SyntheticFeatureResolver.apply(lines);
        // the CDS after the comment is outside the group and keeps its own ID
        assert_eq!(resolved.len(), 3);
        assert_eq!(
            resolved[2].as_feature().unwrap().attributes.id(),
            Some("other")
        );
    }
}
