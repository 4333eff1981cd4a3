//! Repair of wrapped feature-table lines in converter-produced EMBL text.
//!
//! The GFF-to-EMBL converter wraps long qualifier lines across several
//! physical lines. The transfer tool does not recognize a wrapped line as
//! belonging to the line above, so the wrapping has to be undone before the
//! EMBL files are handed over.

/// Fixed-width prefix of a feature-table line: `FT` followed by 19 spaces.
const CONTINUATION_PREFIX: &str = "FT                   ";

/// Start marker of a qualifier. A feature-table line that carries one is a
/// new qualifier, not a wrapped continuation.
const QUALIFIER_MARKER: char = '/';

/// True when the physical line is a wrapped continuation of the line above.
fn is_continuation(line: &str) -> bool {
    line.contains(CONTINUATION_PREFIX) && !line.contains(QUALIFIER_MARKER)
}

/// Merge wrapped continuation lines back into single logical lines.
///
/// Walks the physical lines from last to first so that a qualifier wrapped
/// across three or more lines collapses in a single pass: each continuation
/// is appended to its predecessor with the fixed-width prefix stripped, and
/// consumed lines are dropped from the output.
pub fn merge_wrapped_lines(lines: Vec<String>) -> Vec<String> {
    let mut lines = lines;
    let mut consumed = vec![false; lines.len()];

    for index in (1..lines.len()).rev() {
        if is_continuation(&lines[index]) {
            let tail = lines[index]
                .get(CONTINUATION_PREFIX.len()..)
                .unwrap_or("")
                .to_string();
            lines[index - 1].push_str(&tail);
            consumed[index] = true;
        }
    }

    lines
        .into_iter()
        .zip(consumed)
        .filter(|(_, used)| !used)
        .map(|(line, _)| line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_width() {
        assert_eq!(CONTINUATION_PREFIX.len(), 21);
    }

    #[test]
    fn test_single_continuation_merges() {
        let lines = vec![
            "FT                   /note=\"ID:gene-1 some long".to_string(),
            "FT                   text that wrapped\"".to_string(),
        ];
        let repaired = merge_wrapped_lines(lines);
        assert_eq!(
            repaired,
            vec!["FT                   /note=\"ID:gene-1 some longtext that wrapped\"".to_string()]
        );
    }

    #[test]
    fn test_triple_wrap_collapses_in_one_pass() {
        let lines = vec![
            "FT                   /product=\"aaa".to_string(),
            "FT                   bbb".to_string(),
            "FT                   ccc\"".to_string(),
        ];
        let repaired = merge_wrapped_lines(lines);
        assert_eq!(repaired.len(), 1);
        assert_eq!(repaired[0], "FT                   /product=\"aaabbbccc\"");
    }

    #[test]
    fn test_qualifier_lines_are_not_merged() {
        let lines = vec![
            "FT   CDS             join(100..200)".to_string(),
            "FT                   /locus_tag=\"b0001\"".to_string(),
            "FT                   /codon_start=1".to_string(),
        ];
        let repaired = merge_wrapped_lines(lines.clone());
        assert_eq!(repaired, lines);
    }

    #[test]
    fn test_non_feature_lines_pass_through() {
        let lines = vec![
            "ID   contig1; SV 1; linear; genomic DNA; STD; UNC; 5000 BP.".to_string(),
            "SQ   Sequence 5000 BP;".to_string(),
        ];
        let repaired = merge_wrapped_lines(lines.clone());
        assert_eq!(repaired, lines);
    }

    #[test]
    fn test_all_continuations_consumed() {
        let mut lines = vec!["FT                   /note=\"base".to_string()];
        for part in ["one", "two", "three", "four"] {
            lines.push(format!("FT                   {}", part));
        }
        let repaired = merge_wrapped_lines(lines);
        assert_eq!(repaired.len(), 1);
        assert_eq!(
            repaired[0],
            "FT                   /note=\"baseonetwothreefour"
        );
    }
}
