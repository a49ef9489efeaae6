use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use super::models::{iso_utc, LegacyTermRecord, ModernTermRecord, RawTermRecord, TermRecord};

pub struct MigrationResult {
    pub records: Vec<TermRecord>,
    /// True when at least one record was altered, signalling the caller to
    /// persist the migrated collection back to disk.
    pub changed: bool,
}

/// Modernize the terms collection. Applied on every load; a no-op for data
/// already in the current shape. Every input record yields exactly one
/// output record.
///
/// Records without a `created_at` receive a synthetic timestamp of
/// (now - 30 days + index hours), giving historical entries a plausible
/// oldest-first ordering. The values are not faithful creation times.
pub fn migrate_terms(
    raw: &[Value],
    now: DateTime<Utc>,
) -> Result<MigrationResult, serde_json::Error> {
    let base_time = now - Duration::days(30);
    let needs_remigration = timestamps_need_remigration(raw);

    let mut records = Vec::with_capacity(raw.len());
    let mut changed = false;

    for (idx, value) in raw.iter().enumerate() {
        let synthetic = iso_utc(base_time + Duration::hours(idx as i64));
        match RawTermRecord::classify(value)? {
            RawTermRecord::Modern(record) => {
                let ModernTermRecord {
                    id,
                    term,
                    definition,
                    abbreviation,
                    tags,
                    created_at,
                    updated_at,
                    extra,
                } = record;

                let (created_at, updated_at) = match created_at {
                    Some(_) if needs_remigration => {
                        changed = true;
                        (synthetic.clone(), synthetic)
                    }
                    None => {
                        changed = true;
                        (synthetic.clone(), synthetic)
                    }
                    Some(created) => match updated_at {
                        Some(updated) => (created, updated),
                        None => {
                            changed = true;
                            (created.clone(), created)
                        }
                    },
                };
                let tags = match tags {
                    Some(tags) => tags,
                    None => {
                        changed = true;
                        Vec::new()
                    }
                };

                records.push(TermRecord {
                    id: id.unwrap_or_default(),
                    term: term.unwrap_or_default(),
                    definition: definition.unwrap_or_default(),
                    abbreviation: abbreviation.unwrap_or_default(),
                    tags,
                    created_at,
                    updated_at,
                    extra,
                });
            }
            RawTermRecord::Legacy(record) => {
                let LegacyTermRecord {
                    kind,
                    id,
                    term,
                    definition,
                    tags,
                    extra,
                    ..
                } = record;

                let (term, abbreviation) = if kind.as_deref() == Some("Abréviation") {
                    // Legacy abbreviations store the short form in `term` and
                    // the expanded meaning in `definition`: swap into the
                    // modern convention.
                    let short = term.unwrap_or_default();
                    let expanded = definition.clone().unwrap_or_default();
                    let term = if expanded.is_empty() {
                        short.clone()
                    } else {
                        expanded
                    };
                    (term, short)
                } else {
                    // "Terme" and any unrecognized value pass through as-is.
                    (term.unwrap_or_default(), String::new())
                };

                records.push(TermRecord {
                    id: id.unwrap_or_default(),
                    term,
                    definition: definition.unwrap_or_default(),
                    abbreviation,
                    tags: tags.unwrap_or_default(),
                    created_at: synthetic.clone(),
                    updated_at: synthetic,
                    extra,
                });
                changed = true;
            }
        }
    }

    Ok(MigrationResult { records, changed })
}

/// Repair heuristic for an earlier buggy migration that stamped many records
/// with the same timestamp: with at least 3 records, flag re-migration when
/// fewer than half the timestamped records have unique timestamps. Existing
/// data files were repaired against this exact threshold; keep it as-is.
fn timestamps_need_remigration(raw: &[Value]) -> bool {
    if raw.len() < 3 {
        return false;
    }
    let timestamps: Vec<&str> = raw
        .iter()
        .filter_map(|v| v.get("created_at").and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .collect();
    if timestamps.is_empty() {
        return false;
    }
    let unique: HashSet<&str> = timestamps.iter().copied().collect();
    (unique.len() as f64) < (timestamps.len() as f64) * 0.5
}
