use std::path::PathBuf;

use anyhow::Result;
use glossary_manager::importer;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ecss_glossaire.txt"));
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/glossary.json"));

    let summary = importer::import_glossary(&input, &output)?;
    println!(
        "Parsed {} entries ({} terms, {} abbreviations).",
        summary.entries, summary.terms, summary.abbreviations
    );
    println!("Wrote {}", output.display());
    Ok(())
}
