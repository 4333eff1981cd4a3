//! Input validation and normalization.
//!
//! The three input files are sniffed for their expected format markers and
//! copied into working files with LF line endings before anything else
//! runs; the external tools downstream silently misbehave on CRLF input.
//! Gzip-compressed inputs are detected by magic bytes and decompressed
//! transparently while copying.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use flate2::read::MultiGzDecoder;

use crate::config::RunConfig;

/// Line-ending-normalized working copies of the three input files, removed
/// again after a successful run.
#[derive(Debug)]
pub struct WorkingInputs {
    pub gff: PathBuf,
    pub fasta: PathBuf,
    pub query: PathBuf,
}

impl WorkingInputs {
    pub fn prepare(config: &RunConfig) -> Result<WorkingInputs> {
        Ok(WorkingInputs {
            gff: normalize_line_endings(&config.reference_gff, &config.work_dir)?,
            fasta: normalize_line_endings(&config.reference_fasta, &config.work_dir)?,
            query: normalize_line_endings(&config.query_fasta, &config.work_dir)?,
        })
    }

    /// Remove the working copies. Only called after a successful run; on a
    /// failed run they are left behind for inspection.
    pub fn remove(&self) -> Result<()> {
        for path in [&self.gff, &self.fasta, &self.query] {
            std::fs::remove_file(path)
                .with_context(|| format!("could not remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Open a file for reading, decompressing gzip content on the fly.
/// Detection is by the gzip magic bytes (1F 8B 08), not the file name.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let mut file =
        File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let mut head = [0u8; 3];
    let read = file.read(&mut head)?;

    // Put the inspected bytes back in front using a cursor chain
    let prefix = Cursor::new(head[..read].to_vec());
    let chained = prefix.chain(file);

    let is_gzip = read >= 3 && head[0] == 0x1F && head[1] == 0x8B && head[2] == 0x08;
    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(chained))))
    } else {
        Ok(Box::new(BufReader::new(chained)))
    }
}

/// Check that the inputs look like the formats the run expects: the
/// annotation file must carry the GFF3 version marker on its first line,
/// both sequence files must begin with a FASTA record header.
pub fn validate_inputs(config: &RunConfig) -> Result<()> {
    let header = first_line(&config.reference_gff)?;
    if !header.contains("#gff-version 3") {
        bail!("first argument is not a gff file");
    }
    if !first_line(&config.reference_fasta)?.contains('>') {
        bail!("second argument is not a fasta file");
    }
    if !first_line(&config.query_fasta)?.contains('>') {
        bail!("third argument is not a fasta file");
    }
    Ok(())
}

fn first_line(path: &Path) -> Result<String> {
    let mut reader = open_input(path)?;
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(line)
}

/// Copy a file into the working directory with LF line endings. The copy is
/// named after the original with a `temp_` prefix.
pub fn normalize_line_endings(path: &Path, work_dir: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("input path {} has no file name", path.display()))?;
    let output_path = work_dir.join(format!("temp_{}", name.to_string_lossy()));

    let reader = open_input(path)?;
    let output = File::create(&output_path)
        .with_context(|| format!("could not create {}", output_path.display()))?;
    let mut writer = BufWriter::new(output);

    for line in reader.lines() {
        let line = line.with_context(|| format!("could not read {}", path.display()))?;
        if line.contains('\r') {
            writeln!(writer, "{}", line.replace('\r', ""))?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }
    writer.flush()?;
    Ok(output_path)
}
