use std::fs;

use glossary_manager::store::models::EquationRecord;
use glossary_manager::store::{JsonStore, LoadOutcome};
use serde::Serialize;

fn test_store(dir: &tempfile::TempDir) -> JsonStore {
    JsonStore::open(
        dir.path().join("data").join("equations.json"),
        dir.path().join("backups"),
        10,
    )
    .unwrap()
}

fn sample_equation(id: &str, name: &str) -> EquationRecord {
    EquationRecord {
        id: id.to_string(),
        name: name.to_string(),
        content: "E = mc^2".to_string(),
        description: String::new(),
        created_at: "2026-01-01T00:00:00.000000Z".to_string(),
        updated_at: "2026-01-01T00:00:00.000000Z".to_string(),
    }
}

/// A record whose serialization always fails, for exercising the failure
/// path of save.
struct Exploding;

impl Serialize for Exploding {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("boom"))
    }
}

#[test]
fn test_round_trip_preserves_content_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let records = vec![
        sample_equation("eq-1", "Mass-energy equivalence"),
        sample_equation("eq-2", "Euler identity"),
        sample_equation("eq-3", "Pythagorean theorem"),
    ];
    store.save(&records).unwrap();

    let loaded: Vec<EquationRecord> = store.load();
    assert_eq!(loaded, records);
}

#[test]
fn test_load_missing_file_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    assert_eq!(
        store.load_outcome::<EquationRecord>(),
        LoadOutcome::Missing
    );
    assert!(store.load::<EquationRecord>().is_empty());
}

#[test]
fn test_load_corrupt_file_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    fs::write(store.path(), "{not json at all").unwrap();

    assert_eq!(
        store.load_outcome::<EquationRecord>(),
        LoadOutcome::Corrupt
    );
    assert!(store.load::<EquationRecord>().is_empty());
}

#[test]
fn test_load_empty_file_is_empty_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    fs::write(store.path(), "  \n").unwrap();

    assert_eq!(
        store.load_outcome::<EquationRecord>(),
        LoadOutcome::Loaded(Vec::new())
    );
}

#[test]
fn test_save_replaces_collection_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store
        .save(&[sample_equation("a", "A"), sample_equation("b", "B")])
        .unwrap();
    store.save(&[sample_equation("c", "C")]).unwrap();

    let loaded: Vec<EquationRecord> = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "c");
}

#[test]
fn test_failed_save_surfaces_error_and_preserves_original() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store.save(&[sample_equation("keep", "Keep me")]).unwrap();
    let original = fs::read_to_string(store.path()).unwrap();

    assert!(store.save(&[Exploding]).is_err());

    assert_eq!(fs::read_to_string(store.path()).unwrap(), original);

    // No temporary residue next to the target
    let entries: Vec<String> = fs::read_dir(store.path().parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["equations.json".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_interrupted_write_leaves_original_intact() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);
    store.save(&[sample_equation("keep", "Keep me")]).unwrap();
    let original = fs::read_to_string(store.path()).unwrap();

    // Make the data directory unwritable so the temp-file creation fails
    // before any rename can happen.
    let data_dir = store.path().parent().unwrap().to_path_buf();
    fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o555)).unwrap();

    // Permissions don't bind a privileged user; nothing to assert then.
    if fs::File::create(data_dir.join("probe")).is_ok() {
        fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = store.save(&[sample_equation("new", "New")]);
    fs::set_permissions(&data_dir, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
}

#[test]
fn test_save_creates_backup_of_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let first = vec![sample_equation("first", "First")];
    store.save(&first).unwrap();
    // The very first save has nothing to back up
    assert!(!dir.path().join("backups").exists());

    store.save(&[sample_equation("second", "Second")]).unwrap();

    let backups: Vec<std::path::PathBuf> = fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    assert_eq!(backups.len(), 1);

    let name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("equations_"));
    assert!(name.ends_with(".json"));

    let backed_up: Vec<EquationRecord> =
        serde_json::from_str(&fs::read_to_string(&backups[0]).unwrap()).unwrap();
    assert_eq!(backed_up, first);
}

#[test]
fn test_backup_retention_prunes_oldest() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);
    store.save(&[sample_equation("a", "A")]).unwrap();

    // Seed 14 old backups with names that sort before anything current
    let backups_dir = dir.path().join("backups");
    fs::create_dir_all(&backups_dir).unwrap();
    for i in 0..14 {
        fs::write(
            backups_dir.join(format!("equations_20240101_0000{i:02}.json")),
            "[]",
        )
        .unwrap();
    }

    store.save(&[sample_equation("b", "B")]).unwrap();

    let mut names: Vec<String> = fs::read_dir(&backups_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 10);
    // The five oldest seeds are gone, the rest survive in order
    assert_eq!(names[0], "equations_20240101_000005.json");
    assert_eq!(names[8], "equations_20240101_000013.json");
    assert!(names[9] > "equations_20240101_000013.json".to_string());
}

#[test]
fn test_repeated_saves_never_exceed_backup_cap() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    for i in 0..15 {
        store
            .save(&[sample_equation(&format!("eq-{i}"), "Updated")])
            .unwrap();
    }

    let backups: Vec<_> = fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(!backups.is_empty());
    assert!(backups.len() <= 10);
}

#[test]
fn test_backup_failure_does_not_block_save() {
    let dir = tempfile::tempdir().unwrap();
    // Point the backup directory at a path that can never be a directory
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let store = JsonStore::open(
        dir.path().join("equations.json"),
        blocker.join("backups"),
        10,
    )
    .unwrap();

    store.save(&[sample_equation("a", "A")]).unwrap();
    // Second save attempts (and fails) a backup, but still succeeds
    store.save(&[sample_equation("b", "B")]).unwrap();

    let loaded: Vec<EquationRecord> = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "b");
}
