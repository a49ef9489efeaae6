//! One-shot CSV-to-JSON bootstrap for an external glossary export.
//!
//! Emits the legacy record shape on purpose: the term store's migration
//! modernizes it on first load.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GlossaryEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub entries: usize,
    pub terms: usize,
    pub abbreviations: usize,
}

/// Parse a headered glossary CSV and write a flat JSON array.
///
/// Column headers are resolved against the names the export has used over
/// time; a column that cannot be found defaults every value to the empty
/// string. Malformed rows are skipped, never fatal; only a missing or
/// unreadable input file is an error.
pub fn import_glossary(input: &Path, output: &Path) -> Result<ImportSummary> {
    let file = File::open(input)
        .with_context(|| format!("cannot open glossary file {}", input.display()))?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

    let headers = reader
        .headers()
        .context("cannot read glossary header row")?
        .clone();
    let kind_col = find_column(&headers, &["Type", "type"]);
    let id_col = find_column(&headers, &["Identifiant", "identifiant"]);
    let term_col = find_column(&headers, &["Terme/Abréviation", "Terme", "terme"]);
    let definition_col = find_column(
        &headers,
        &["Définition/Signification", "Définition", "definition"],
    );

    let mut entries = Vec::new();
    for row in reader.records() {
        let Ok(row) = row else { continue };
        entries.push(GlossaryEntry {
            kind: cell(&row, kind_col),
            id: cell(&row, id_col),
            term: cell(&row, term_col),
            definition: cell(&row, definition_col),
        });
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create output directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(output, json)
        .with_context(|| format!("cannot write {}", output.display()))?;

    let terms = entries
        .iter()
        .filter(|e| e.kind.to_lowercase().starts_with("ter"))
        .count();
    let abbreviations = entries
        .iter()
        .filter(|e| e.kind.to_lowercase().starts_with("abr"))
        .count();

    Ok(ImportSummary {
        entries: entries.len(),
        terms,
        abbreviations,
    })
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}

fn cell(row: &StringRecord, col: Option<usize>) -> String {
    col.and_then(|i| row.get(i)).unwrap_or("").trim().to_string()
}
