use std::path::PathBuf;

use crate::cli::{Cli, TransferMode};

/// Directory of per-contig annotation files, under the working directory.
pub const CONTIG_GFF_DIR: &str = "contig_gff";
/// Directory of per-contig sequence files.
pub const CONTIG_FASTA_DIR: &str = "contig_fasta";
/// Directory of per-contig EMBL files handed to the transfer tool.
pub const CONTIG_EMBL_DIR: &str = "contig_embl";

/// Everything one run needs to know, derived once from the command line and
/// threaded explicitly through every stage and collaborator invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub reference_gff: PathBuf,
    pub reference_fasta: PathBuf,
    pub query_fasta: PathBuf,
    pub run_id: String,
    pub transfer_mode: TransferMode,
    /// Directory all intermediates and results are created under.
    pub work_dir: PathBuf,
    /// Working directory of the transfer tool: `<work-dir>/<run-id>_RATT`.
    pub ratt_dir: PathBuf,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> RunConfig {
        Self::new(
            cli.reference_gff.clone(),
            cli.reference_fasta.clone(),
            cli.query_fasta.clone(),
            cli.run_id.clone(),
            cli.transfer_mode,
            PathBuf::from("."),
        )
    }

    pub fn new(
        reference_gff: PathBuf,
        reference_fasta: PathBuf,
        query_fasta: PathBuf,
        run_id: String,
        transfer_mode: TransferMode,
        work_dir: PathBuf,
    ) -> RunConfig {
        let ratt_dir = work_dir.join(format!("{}_RATT", run_id));
        RunConfig {
            reference_gff,
            reference_fasta,
            query_fasta,
            run_id,
            transfer_mode,
            work_dir,
            ratt_dir,
        }
    }

    pub fn final_embl_dir(&self) -> PathBuf {
        self.ratt_dir.join("final_embl")
    }

    pub fn final_gff_dir(&self) -> PathBuf {
        self.ratt_dir.join("final_gff")
    }

    pub fn genomic_gff_path(&self) -> PathBuf {
        self.final_gff_dir().join("genomic.final.gff")
    }

    pub fn stats_path(&self) -> PathBuf {
        self.ratt_dir.join("transferStats.csv")
    }

    pub fn contig_gff_path(&self, contig: &str) -> PathBuf {
        self.work_dir.join(CONTIG_GFF_DIR).join(format!("{}.gff", contig))
    }

    pub fn contig_fasta_path(&self, contig: &str) -> PathBuf {
        self.work_dir.join(CONTIG_FASTA_DIR).join(format!("{}.fa", contig))
    }

    pub fn contig_embl_path(&self, contig: &str) -> PathBuf {
        self.work_dir.join(CONTIG_EMBL_DIR).join(format!("{}.embl", contig))
    }

    pub fn contig_embl_tmp_path(&self, contig: &str) -> PathBuf {
        self.work_dir
            .join(CONTIG_EMBL_DIR)
            .join(format!("{}_tmp1.embl", contig))
    }
}
