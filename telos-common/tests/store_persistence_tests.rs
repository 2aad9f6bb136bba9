//! Store persistence round-trip tests
//!
//! Exercise the load/save boundary against real files: a saved store must
//! reload with the same document, section position, and completion set, and a
//! missing file must start a fresh store rather than erroring.

use tempfile::TempDir;

use telos_common::model::{Narratives, Problem, SectionData, TelosSection};
use telos_common::store::TelosStore;

#[test]
fn save_then_reload_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telos.json");

    let doc_id;
    {
        let mut store = TelosStore::open(&path).unwrap();
        store.initialize();
        doc_id = store.current().unwrap().id;

        store
            .add_problem(Problem::custom("Student debt preventing economic mobility"))
            .unwrap();
        store
            .update_section(SectionData::Narratives(Narratives {
                short: "I help students escape debt".to_string(),
                conversational: "I work on tools that make repayment understandable".to_string(),
                pitch: "Debt literacy at scale".to_string(),
            }))
            .unwrap();
        store.advance();
        store.save().unwrap();
    }

    let reloaded = TelosStore::open(&path).unwrap();
    let data = reloaded.current().expect("document survives reload");
    assert_eq!(data.id, doc_id);
    assert_eq!(data.problems.len(), 1);
    assert_eq!(data.narratives.short, "I help students escape debt");
    assert_eq!(reloaded.current_section(), TelosSection::Missions);
    assert!(reloaded.is_complete(TelosSection::Problems));
}

#[test]
fn missing_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let store = TelosStore::open(dir.path().join("does-not-exist.json")).unwrap();
    assert!(store.current().is_none());
    assert_eq!(store.current_section(), TelosSection::Problems);
    assert_eq!(store.completed_count(), 0);
}

#[test]
fn save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("telos.json");

    let mut store = TelosStore::open(&path).unwrap();
    store.initialize();
    store.save().unwrap();

    assert!(path.exists());
}

#[test]
fn corrupt_file_is_an_error_not_a_panic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telos.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(TelosStore::open(&path).is_err());
}

#[test]
fn persisted_shape_matches_the_web_client() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telos.json");

    let mut store = TelosStore::open(&path).unwrap();
    store.initialize();
    store.advance();
    store.save().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.get("currentTelos").is_some());
    assert_eq!(raw["currentSection"], "missions");
    assert_eq!(raw["completedSections"][0], "problems");
}
