//! Preparation of the per-contig inputs handed to the transfer tool: one
//! sequence file and one annotation file per contig, converted to the EMBL
//! intermediate format with the wrapped-line damage repaired.

use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::aggregate::GFF_HEADER;
use crate::config::{RunConfig, CONTIG_EMBL_DIR, CONTIG_FASTA_DIR, CONTIG_GFF_DIR};
use crate::input::{open_input, WorkingInputs};
use crate::record::{FeatureRecord, GffLine, TYPE_NCRNA};
use crate::repair::merge_wrapped_lines;
use crate::{report, tools};

/// Split the reference genome and its annotations into per-contig files.
/// Returns the contig names in the order the sequence index lists them.
pub fn split_genomic_files(config: &RunConfig, inputs: &WorkingInputs) -> Result<Vec<String>> {
    report::progress("Indexing fasta..");
    tools::index_fasta(&inputs.fasta)?;
    let contigs = read_contig_names(&fasta_index_path(&inputs.fasta))?;

    for directory in [CONTIG_GFF_DIR, CONTIG_FASTA_DIR, CONTIG_EMBL_DIR] {
        fs::create_dir_all(config.work_dir.join(directory))
            .with_context(|| format!("could not create {}", directory))?;
    }

    report::progress("Generating contig fastas and gffs...");
    for contig in &contigs {
        let sequence = tools::extract_contig(&inputs.fasta, contig)?;
        fs::write(config.contig_fasta_path(contig), sequence)
            .with_context(|| format!("could not write sequence of {}", contig))?;
        write_contig_annotation(&inputs.gff, contig, &config.contig_gff_path(contig))?;
    }
    Ok(contigs)
}

/// The index file the sequence indexer writes next to its input.
fn fasta_index_path(fasta: &Path) -> PathBuf {
    let mut name = fasta.as_os_str().to_os_string();
    name.push(".fai");
    PathBuf::from(name)
}

/// Contig names are the first tab-delimited field of each index line.
fn read_contig_names(index: &Path) -> Result<Vec<String>> {
    let reader = open_input(index)?;
    let mut contigs = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("could not read {}", index.display()))?;
        if let Some(name) = line.split('\t').next() {
            if !name.is_empty() {
                contigs.push(name.to_string());
            }
        }
    }
    Ok(contigs)
}

/// Write one contig's annotation records, annotated so the relationships
/// survive the format round trip.
fn write_contig_annotation(gff: &Path, contig: &str, output: &Path) -> Result<()> {
    let reader = open_input(gff)?;
    let file = File::create(output)
        .with_context(|| format!("could not create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", GFF_HEADER)?;

    for line in reader.lines() {
        let line = line.with_context(|| format!("could not read {}", gff.display()))?;
        if let GffLine::Feature(mut record) = GffLine::parse(&line) {
            if record.contig == contig {
                annotate_provenance(&mut record);
                writer.write_all(record.to_gff_line().as_bytes())?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Attach the attributes that survive the round trip: ncRNA records gain a
/// default class when they have none (the EMBL converter rejects classless
/// ncRNAs), and a record's `Parent` value is mirrored into a provenance
/// note because the conversion drops the `Parent` attribute itself.
pub fn annotate_provenance(record: &mut FeatureRecord) {
    if record.is_type(TYPE_NCRNA) && !record.attributes.has_key("ncRNA_class") {
        record.attributes.push("ncRNA_class", "other");
    }
    if let Some(parent) = record.attributes.parent().map(str::to_string) {
        record.attributes.push("note", &format!("Parent:{}", parent));
    }
}

/// Convert every per-contig annotation file to the EMBL intermediate format
/// and merge the converter's wrapped continuation lines, which the transfer
/// tool would otherwise misread.
pub fn convert_contigs_to_embl(config: &RunConfig, contigs: &[String]) -> Result<()> {
    for contig in contigs {
        report::progress(&format!(
            "converting {}.gff to {}.embl....",
            contig, contig
        ));
        let tmp = config.contig_embl_tmp_path(contig);
        tools::gff_to_embl(
            &config.contig_gff_path(contig),
            &config.contig_fasta_path(contig),
            &tmp,
            contig,
        )?;

        println!("\nfixing line-breaks for: {}.embl....", contig);
        let text = fs::read_to_string(&tmp)
            .with_context(|| format!("could not read {}", tmp.display()))?;
        let repaired = merge_wrapped_lines(text.lines().map(str::to_string).collect());

        let output = config.contig_embl_path(contig);
        let file = File::create(&output)
            .with_context(|| format!("could not create {}", output.display()))?;
        let mut writer = BufWriter::new(file);
        for line in repaired {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        fs::remove_file(&tmp).with_context(|| format!("could not remove {}", tmp.display()))?;
    }
    Ok(())
}
