//! Invocation wrappers for the external collaborators.
//!
//! Every collaborator is a synchronous file-in/file-out command. A failure
//! to launch one is fatal and carries a diagnostic naming the dependency
//! that is likely missing; exit codes of launched tools are not inspected,
//! their output files are what the pipeline consumes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::config::RunConfig;

/// Build the `.fai` index of a multi-sequence file.
pub fn index_fasta(fasta: &Path) -> Result<()> {
    Command::new("samtools")
        .arg("faidx")
        .arg(fasta)
        .status()
        .map_err(|_| {
            anyhow!("could not parse reference files, check that samtools is installed properly")
        })?;
    Ok(())
}

/// Extract one named sequence from an indexed multi-sequence file.
pub fn extract_contig(fasta: &Path, contig: &str) -> Result<String> {
    let output = Command::new("samtools")
        .arg("faidx")
        .arg(fasta)
        .arg(contig)
        .output()
        .map_err(|_| {
            anyhow!("could not parse reference files, check that samtools is installed properly")
        })?;
    if !output.status.success() {
        return Err(anyhow!("samtools could not extract sequence '{}'", contig));
    }
    String::from_utf8(output.stdout)
        .with_context(|| format!("sequence of '{}' is not valid UTF-8", contig))
}

/// Convert one contig's annotation file to the EMBL intermediate format.
pub fn gff_to_embl(gff: &Path, fasta: &Path, output: &Path, contig: &str) -> Result<()> {
    Command::new("EMBLmyGFF3")
        .arg(gff)
        .arg(fasta)
        .arg("-o")
        .arg(output)
        .args(["-i", "tag"])
        .args(["-p", contig])
        .args(["-s", "unknown"])
        .args(["-t", "linear"])
        .args(["-d", "STD"])
        .args(["-m", "genomic DNA"])
        .args(["-x", "UNC"])
        .args(["--rg", "none"])
        .args(["-r", "1"])
        .args(["-a", contig])
        .arg("--keep_duplicates")
        .arg("-q")
        .arg("--shame")
        .status()
        .map_err(|_| {
            anyhow!("could not convert gff to embl, check that EMBLmyGFF is installed properly")
        })?;
    Ok(())
}

/// Convert one transferred EMBL file back to the annotation format. The
/// converter writes `<stem>.gff` into the given working directory.
pub fn embl_to_gff(embl: &Path, stem: &str, work_dir: &Path) -> Result<()> {
    let embl = fs::canonicalize(embl)
        .with_context(|| format!("could not resolve {}", embl.display()))?;
    Command::new("seqret")
        .arg("-sequence")
        .arg(&embl)
        .arg("-feature")
        .args(["-fformat", "embl"])
        .arg("-fopenfile")
        .arg(&embl)
        .args(["-osformat", "gff"])
        .args(["-osname", stem])
        .arg("-auto")
        .current_dir(work_dir)
        .status()
        .map_err(|_| {
            anyhow!("could not call EMBOSS seqret, make sure EMBOSS is installed correctly")
        })?;
    Ok(())
}

/// Run the assembly-stats tool over one sequence file. Soft dependency: the
/// caller downgrades a failure to a warning.
pub fn assembly_stats(output_dir: &Path, fasta: &Path) -> Result<()> {
    Command::new("quast.py")
        .arg("-o")
        .arg(output_dir)
        .arg("--fast")
        .arg("-s")
        .arg("--silent")
        .arg(fasta)
        .status()
        .map_err(|_| anyhow!("could not call QUAST, check that it is installed correctly"))?;
    Ok(())
}

/// Run the annotation-transfer tool inside the run directory. The tool
/// reads the per-contig EMBL directory and the query sequence relative to
/// its working directory.
pub fn run_transfer(config: &RunConfig, query_fasta: &Path) -> Result<()> {
    let query = query_fasta
        .file_name()
        .map(|name| format!("../{}", name.to_string_lossy()))
        .ok_or_else(|| anyhow!("query sequence path has no file name"))?;
    Command::new("start.ratt.sh")
        .arg("../contig_embl")
        .arg(query)
        .arg(&config.run_id)
        .arg(config.transfer_mode.as_arg())
        .current_dir(&config.ratt_dir)
        .status()
        .map_err(|_| anyhow!("could not call RATT, check that RATT is installed correctly"))?;
    Ok(())
}

/// Subdirectories the transfer tool's flat output is sorted into.
const OUTPUT_SUBDIRS: [&str; 8] = [
    "final_embl",
    "Report_gff",
    "Report_txt",
    "NOTTransfered_embl",
    "nucmer",
    "tmp2_embl",
    "uncorrected_embl",
    "final_gff",
];

/// Sort the transfer tool's output files into subdirectories by suffix.
/// Pattern order matters: the catch-all `*.embl` move must run last.
pub fn organize_transfer_output(config: &RunConfig) -> Result<()> {
    for subdir in OUTPUT_SUBDIRS {
        fs::create_dir_all(config.ratt_dir.join(subdir))
            .with_context(|| format!("could not create {}", subdir))?;
    }
    let moves = [
        ("*.final.embl", "final_embl"),
        ("*.Report.gff", "Report_gff"),
        ("*.Report.txt", "Report_txt"),
        ("*.NOTTransfered.embl", "NOTTransfered_embl"),
        ("nucmer.*", "nucmer"),
        ("*tmp2.embl", "tmp2_embl"),
        ("*.embl", "uncorrected_embl"),
    ];
    for (pattern, destination) in moves {
        move_matching(&config.ratt_dir, pattern, destination)?;
    }
    Ok(())
}

fn move_matching(directory: &Path, pattern: &str, destination: &str) -> Result<()> {
    let full_pattern = directory.join(pattern);
    let full_pattern = full_pattern.to_string_lossy();
    for entry in glob::glob(&full_pattern)
        .with_context(|| format!("invalid file pattern {}", full_pattern))?
    {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name() {
            let target = directory.join(destination).join(name);
            fs::rename(&path, &target)
                .with_context(|| format!("could not move {} into {}", path.display(), destination))?;
        }
    }
    Ok(())
}

/// The transferred EMBL files, in lexicographic name order so the
/// genome-level merge is deterministic.
pub fn transferred_embls(config: &RunConfig) -> Result<Vec<PathBuf>> {
    let directory = config.final_embl_dir();
    let mut files = Vec::new();
    for entry in fs::read_dir(&directory)
        .with_context(|| format!("could not read {}", directory.display()))?
    {
        let path = entry?.path();
        if path.extension().map(|extension| extension == "embl") == Some(true) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
