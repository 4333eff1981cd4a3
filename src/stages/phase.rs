use crate::pipeline::CorrectionStage;
use crate::record::{GffLine, Phase, Strand, TYPE_CDS};

/// Computes the reading-frame phase for every coding record.
///
/// Phase is defined per contiguous run of CDS records (an opaque line or a
/// record of any other type ends the run). On the forward strand the first
/// record of the run starts in frame and each successor's phase is the
/// number of bases needed to complete the previous segment's codon. On the
/// reverse strand translation begins at the highest-coordinate segment, so
/// the run is processed from its last record upward with the mirrored
/// recurrence. The strand of the run's first record selects the direction;
/// anything other than `+` is processed as reverse.
pub struct PhaseCalculator;

impl CorrectionStage for PhaseCalculator {
    fn name(&self) -> &'static str {
        "phase calculation"
    }

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;
        let mut index = 0;

        while index < lines.len() {
            if !is_cds(&lines[index]) {
                index += 1;
                continue;
            }
            let run_start = index;
            while index < lines.len() && is_cds(&lines[index]) {
                index += 1;
            }
            assign_run_phases(&mut lines[run_start..index]);
        }

        lines
    }
}

fn is_cds(line: &GffLine) -> bool {
    line.as_feature()
        .map(|record| record.is_type(TYPE_CDS))
        .unwrap_or(false)
}

/// Phase of a segment given the bounds and phase of the segment translated
/// before it. Euclidean remainder keeps the result in `0..3` even for
/// inconsistent upstream coordinates.
fn next_phase(previous_start: i64, previous_end: i64, previous_phase: i64) -> u8 {
    let size = previous_end - (previous_start - 1) - previous_phase;
    let remainder = size.rem_euclid(3);
    if remainder == 0 {
        0
    } else {
        (3 - remainder) as u8
    }
}

fn assign_run_phases(run: &mut [GffLine]) {
    let forward = run
        .first()
        .and_then(GffLine::as_feature)
        .map(|record| record.strand == Strand::Forward)
        .unwrap_or(true);

    let order: Vec<usize> = if forward {
        (0..run.len()).collect()
    } else {
        (0..run.len()).rev().collect()
    };

    let mut previous: Option<(i64, i64, u8)> = None;
    for &position in &order {
        let phase = match previous {
            None => 0,
            Some((start, end, prev_phase)) => next_phase(start, end, i64::from(prev_phase)),
        };
        if let Some(record) = run[position].as_feature_mut() {
            record.phase = Phase::Frame(phase);
            previous = Some((record.start, record.end, phase));
        }
    }
}
