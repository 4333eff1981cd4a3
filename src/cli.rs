use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ratt-gff")]
#[command(about = "Run the RATT annotation transfer tool with GFF3 input")]
#[command(
    long_about = "Run the RATT annotation transfer tool with GFF3 input.\n\n\
Splits the reference genome per contig, converts the annotations to the\n\
EMBL format RATT consumes, runs the transfer, converts the results back\n\
and repairs the errors the format round trip introduces. Requires\n\
samtools, EMBLmyGFF3, RATT and EMBOSS on the PATH; QUAST is optional."
)]
#[command(version)]
pub struct Cli {
    /// Reference annotations in GFF3 format
    pub reference_gff: PathBuf,

    /// Reference genome in FASTA format
    pub reference_fasta: PathBuf,

    /// Query genome in FASTA format
    pub query_fasta: PathBuf,

    /// Identifier used to name the run directory and the transferred files
    pub run_id: String,

    /// RATT transfer mode
    #[arg(value_enum)]
    pub transfer_mode: TransferMode,
}

/// The transfer modes the annotation-transfer tool accepts.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    #[value(name = "Assembly")]
    Assembly,
    #[value(name = "Assembly.Repetitive")]
    AssemblyRepetitive,
    #[value(name = "Strain")]
    Strain,
    #[value(name = "Strain.Repetitive")]
    StrainRepetitive,
    #[value(name = "Species")]
    Species,
    #[value(name = "Species.Repetitive")]
    SpeciesRepetitive,
    #[value(name = "Multiple")]
    Multiple,
}

impl TransferMode {
    /// The literal mode string passed through to the transfer tool.
    pub fn as_arg(&self) -> &'static str {
        match self {
            TransferMode::Assembly => "Assembly",
            TransferMode::AssemblyRepetitive => "Assembly.Repetitive",
            TransferMode::Strain => "Strain",
            TransferMode::StrainRepetitive => "Strain.Repetitive",
            TransferMode::Species => "Species",
            TransferMode::SpeciesRepetitive => "Species.Repetitive",
            TransferMode::Multiple => "Multiple",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_five_positional_arguments() {
        let cli = Cli::try_parse_from([
            "ratt-gff",
            "ref.gff",
            "ref.fa",
            "query.fa",
            "sample1",
            "Strain",
        ])
        .unwrap();
        assert_eq!(cli.run_id, "sample1");
        assert_eq!(cli.transfer_mode, TransferMode::Strain);
    }

    #[test]
    fn test_dotted_transfer_modes_accepted() {
        let cli = Cli::try_parse_from([
            "ratt-gff",
            "ref.gff",
            "ref.fa",
            "query.fa",
            "sample1",
            "Species.Repetitive",
        ])
        .unwrap();
        assert_eq!(cli.transfer_mode, TransferMode::SpeciesRepetitive);
        assert_eq!(cli.transfer_mode.as_arg(), "Species.Repetitive");
    }

    #[test]
    fn test_invalid_transfer_mode_rejected() {
        let result = Cli::try_parse_from([
            "ratt-gff",
            "ref.gff",
            "ref.fa",
            "query.fa",
            "sample1",
            "Chromosome",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["ratt-gff", "ref.gff"]).is_err());
    }

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
