// Core library for the ratt-gff annotation-transfer wrapper.
//
// RATT transfers annotations between genomes but only speaks EMBL. This
// crate drives the full round trip for GFF3 input: split the reference per
// contig, convert to EMBL, transfer, convert back, then reconcile the
// damage the lossy conversions cause into corrected per-contig and
// genome-level GFF3 files plus a transfer statistics table.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod input;
pub mod pipeline;
pub mod prepare;
pub mod record;
pub mod repair;
pub mod report;
pub mod stages;
pub mod tools;

use std::fs;

use anyhow::{Context, Result};

pub use crate::config::RunConfig;
pub use crate::pipeline::{CorrectionPipeline, CorrectionStage};
pub use crate::record::{Attributes, FeatureRecord, GffLine};

/// Execute a full transfer run. Inputs are assumed validated; a returned
/// error is a fatal collaborator or I/O failure and aborts the run.
pub fn run(config: &RunConfig) -> Result<()> {
    let inputs = input::WorkingInputs::prepare(config)?;

    let contigs = prepare::split_genomic_files(config, &inputs)?;
    prepare::convert_contigs_to_embl(config, &contigs)?;

    fs::create_dir_all(&config.ratt_dir)
        .with_context(|| format!("could not create {}", config.ratt_dir.display()))?;

    // Assembly statistics are informational; a missing QUAST must not stop
    // the transfer.
    report::progress("***RUNNING QUAST on both sequences.....");
    let stats_result = tools::assembly_stats(&config.ratt_dir.join("ref_quast"), &inputs.fasta)
        .and_then(|_| tools::assembly_stats(&config.ratt_dir.join("query_quast"), &inputs.query));
    if let Err(error) = stats_result {
        eprintln!("{}", report::warning_banner(&format!("{:#}", error)));
    }

    report::progress("***RUNNING RATT.....");
    tools::run_transfer(config, &inputs.query)?;
    tools::organize_transfer_output(config)?;

    report::progress("processing RATT results...");
    reconcile_transferred(config)?;

    aggregate::make_transfer_stats(&inputs.gff, &config.genomic_gff_path(), &config.stats_path())?;
    report::progress("RATT TRANSFER STATISTICS");
    print!("{}", aggregate::format_transfer_stats(&config.stats_path())?);

    inputs.remove()?;
    Ok(())
}

/// Convert every transferred contig back to the annotation format, run the
/// correction pipeline over it and fold the result into the genome-level
/// file. Contigs are processed in file-name order so the merge is
/// deterministic.
fn reconcile_transferred(config: &RunConfig) -> Result<()> {
    let genome_gff = config.genomic_gff_path();
    aggregate::create_genome_gff(&genome_gff)?;

    let corrections = CorrectionPipeline::standard();
    for embl in tools::transferred_embls(config)? {
        report::progress(&format!("converting: {} to gff...", embl.display()));
        tools::embl_to_gff(&embl, "temp01", &config.work_dir)?;
        let converted = config.work_dir.join("temp01.gff");
        let text = fs::read_to_string(&converted)
            .with_context(|| format!("could not read {}", converted.display()))?;
        fs::remove_file(&converted)
            .with_context(|| format!("could not remove {}", converted.display()))?;

        let output = config.final_gff_dir().join(contig_output_name(&embl)?);
        report::progress(&format!(
            "Fixing embl-gff conversion errors in: {}",
            output.display()
        ));
        let corrected = corrections.run(pipeline::parse_lines(&text));
        aggregate::write_contig_gff(&corrected, &output)?;

        println!(
            "\nadding: {} annotations to: {}",
            output.display(),
            genome_gff.display()
        );
        aggregate::append_contig_to_genome(&output, &genome_gff)?;
    }
    Ok(())
}

/// `<name>.embl` becomes `<name>.gff` in the corrected-output directory.
fn contig_output_name(embl: &std::path::Path) -> Result<String> {
    let name = embl
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .with_context(|| format!("transferred file {} has no name", embl.display()))?;
    let stem = name.strip_suffix(".embl").unwrap_or(&name);
    Ok(format!("{}.gff", stem))
}
