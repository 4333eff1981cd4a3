use crate::record::GffLine;
use crate::stages::{
    AttributeSanitizer, BoundsCorrector, ContigSourceNormalizer, IdRenumberer, ParentLinker,
    PhaseCalculator, SyntheticFeatureResolver,
};

/// One correction pass over a contig's parsed feature lines.
///
/// Each stage consumes the full record sequence and materializes its output
/// before the next stage runs; there is no streaming between stages.
pub trait CorrectionStage {
    /// Short human-readable name for progress output.
    fn name(&self) -> &'static str;

    fn apply(&self, lines: Vec<GffLine>) -> Vec<GffLine>;
}

/// The ordered set of correction passes applied to each transferred contig.
pub struct CorrectionPipeline {
    stages: Vec<Box<dyn CorrectionStage>>,
}

impl CorrectionPipeline {
    /// The standard pipeline. Order matters: synthetic placeholders must be
    /// resolved before renumbering, the contig name must be cleaned before
    /// the renumberer derives identifiers from it, and parents must be
    /// linked before the bounds corrector can find them.
    pub fn standard() -> Self {
        CorrectionPipeline {
            stages: vec![
                Box::new(SyntheticFeatureResolver),
                Box::new(ContigSourceNormalizer),
                Box::new(IdRenumberer),
                Box::new(ParentLinker),
                Box::new(PhaseCalculator),
                Box::new(AttributeSanitizer),
                Box::new(BoundsCorrector),
            ],
        }
    }

    pub fn run(&self, lines: Vec<GffLine>) -> Vec<GffLine> {
        let mut lines = lines;
        for stage in &self.stages {
            lines = stage.apply(lines);
        }
        lines
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

/// Parse raw converter output into the line stream the pipeline operates on.
pub fn parse_lines(text: &str) -> Vec<GffLine> {
    text.lines().map(GffLine::parse).collect()
}
