//! Genome-level merge of the corrected per-contig files and the transfer
//! statistics comparing feature counts before and after the round trip.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use crate::record::{GffLine, TYPE_GAP};

/// Standard header line of the annotation format.
pub const GFF_HEADER: &str = "##gff-version 3";

/// Marker introducing the sequence-data section of a converted file.
const SEQUENCE_SECTION_MARKER: &str = "##FASTA";

/// Feature categories reported in the statistics table, in output order.
pub const STAT_CATEGORIES: [&str; 7] = ["CDS", "exon", "gene", "mRNA", "tRNA", "ncRNA", "rRNA"];

/// Synthetic category summing the per-category distinct counts.
pub const TOTAL_CATEGORY: &str = "total features";

/// Write one contig's corrected lines. Gap features are omitted: a gap is a
/// property of the assembly the annotations came from, not of the target.
pub fn write_contig_gff(lines: &[GffLine], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        if let Some(record) = line.as_feature() {
            if record.is_type(TYPE_GAP) {
                continue;
            }
        }
        writer.write_all(line.to_gff_line().as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Start the genome-level file with the standard header line.
pub fn create_genome_gff(path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("could not create {}", path.display()))?;
    writeln!(file, "{}", GFF_HEADER)?;
    Ok(())
}

/// Append one contig's feature lines to the genome-level file. Reading
/// stops at the sequence-data section; header and comment lines are
/// dropped, the genome file already carries its own header.
pub fn append_contig_to_genome(contig_gff: &Path, genome_gff: &Path) -> Result<()> {
    let input = File::open(contig_gff)
        .with_context(|| format!("could not open {}", contig_gff.display()))?;
    let output = OpenOptions::new()
        .append(true)
        .open(genome_gff)
        .with_context(|| format!("could not open {}", genome_gff.display()))?;
    let mut writer = BufWriter::new(output);

    for line in BufReader::new(input).lines() {
        let line = line?;
        if line.contains(SEQUENCE_SECTION_MARKER) {
            break;
        }
        if line.contains('#') {
            continue;
        }
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Distinct feature identifiers per category, in category order.
///
/// The final entry is the synthetic total: a set of `0..n` integer keys
/// whose size is the sum of the per-category distinct counts, kept as a set
/// for symmetry with the real categories.
pub fn count_unique_ids(gff: &Path) -> Result<IndexMap<String, HashSet<String>>> {
    let mut counts: IndexMap<String, HashSet<String>> = STAT_CATEGORIES
        .iter()
        .map(|category| (category.to_string(), HashSet::new()))
        .collect();

    let file = File::open(gff).with_context(|| format!("could not open {}", gff.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        let record = match GffLine::parse(&line) {
            GffLine::Feature(record) => record,
            GffLine::Opaque(_) => continue,
        };
        let id = match record.attributes.id() {
            Some(id) => id,
            None => continue,
        };
        if let Some(ids) = counts.get_mut(record.feature_type.as_str()) {
            ids.insert(id.to_string());
        }
    }

    let total: usize = counts.values().map(HashSet::len).sum();
    let total_set: HashSet<String> = (0..total).map(|index| index.to_string()).collect();
    counts.insert(TOTAL_CATEGORY.to_string(), total_set);
    Ok(counts)
}

#[derive(Serialize)]
struct StatRow<'a> {
    #[serde(rename = "Feat.")]
    feature: &'a str,
    #[serde(rename = "Orig.")]
    original: usize,
    #[serde(rename = "Final")]
    transferred: usize,
}

/// Compare the pre-transfer and post-pipeline feature counts and write the
/// comma-delimited statistics table.
pub fn make_transfer_stats(original_gff: &Path, genome_gff: &Path, stats: &Path) -> Result<()> {
    let original_counts = count_unique_ids(original_gff)?;
    let final_counts = count_unique_ids(genome_gff)?;

    let mut writer = csv::Writer::from_path(stats)
        .with_context(|| format!("could not create {}", stats.display()))?;
    for (category, original_ids) in &original_counts {
        let transferred = final_counts
            .get(category)
            .map(HashSet::len)
            .unwrap_or(0);
        writer.serialize(StatRow {
            feature: category,
            original: original_ids.len(),
            transferred,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the statistics file as the column-padded table printed to the
/// operator.
pub fn format_transfer_stats(stats: &Path) -> Result<String> {
    let file = File::open(stats).with_context(|| format!("could not open {}", stats.display()))?;
    let mut table = String::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() == 3 {
            table.push_str(&format!(
                "{:<20}{:<20}{}\n",
                fields[0], fields[1], fields[2]
            ));
        }
    }
    Ok(table)
}
