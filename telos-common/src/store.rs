//! Persisted questionnaire store
//!
//! An explicit state container for the TELOS document and the user's position
//! in the flow. Nothing here is ambient: callers construct a store against a
//! path, mutate it through the operations below, and decide when `save` runs.
//!
//! The on-disk format is a single JSON document mirroring what the web client
//! persisted: the document itself, the completed-section list, and the
//! current section.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::{EventBus, TelosEvent};
use crate::flow;
use crate::model::{Problem, SectionData, TelosData, TelosSection};
use crate::{Error, Result};

/// The Problems form accepts at most this many entries
pub const MAX_PROBLEMS: usize = 3;

/// Maximum length of a single problem statement, in characters
pub const MAX_PROBLEM_LEN: usize = 100;

/// On-disk shape, camelCase for compatibility with the web client's storage
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    current_telos: Option<TelosData>,
    completed_sections: Vec<TelosSection>,
    current_section: TelosSection,
}

/// Questionnaire state container with an explicit load/save boundary
pub struct TelosStore {
    path: PathBuf,
    data: Option<TelosData>,
    current_section: TelosSection,
    completed_sections: BTreeSet<TelosSection>,
    events: Option<Arc<EventBus>>,
}

impl TelosStore {
    /// Open a store backed by `path`, loading prior state when the file
    /// exists and starting fresh when it does not.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            path,
            data: None,
            current_section: TelosSection::Problems,
            completed_sections: BTreeSet::new(),
            events: None,
        };

        if store.path.exists() {
            let text = std::fs::read_to_string(&store.path)?;
            let persisted: PersistedState = serde_json::from_str(&text)?;
            store.data = persisted.current_telos;
            store.current_section = persisted.current_section;
            store.completed_sections = persisted.completed_sections.into_iter().collect();
            debug!("loaded store from {}", store.path.display());
        } else {
            debug!("no store file at {}; starting fresh", store.path.display());
        }

        Ok(store)
    }

    /// Attach an event bus; section transitions emit on it afterwards
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Default store file under the resolved data folder
    pub fn default_path() -> PathBuf {
        crate::config::default_data_dir().join("telos.json")
    }

    /// Create an empty document if none exists yet
    pub fn initialize(&mut self) {
        if self.data.is_none() {
            self.data = Some(TelosData::empty());
            info!("initialized new TELOS document");
        }
    }

    /// The current document, if one has been initialized or loaded
    pub fn current(&self) -> Option<&TelosData> {
        self.data.as_ref()
    }

    /// Snapshot of the current document
    pub fn export(&self) -> Option<TelosData> {
        self.data.clone()
    }

    pub fn current_section(&self) -> TelosSection {
        self.current_section
    }

    pub fn is_complete(&self, section: TelosSection) -> bool {
        self.completed_sections.contains(&section)
    }

    /// Number of completed sections
    pub fn completed_count(&self) -> usize {
        self.completed_sections.len()
    }

    /// Replace one section's contents and touch the document timestamp.
    ///
    /// No-op (Ok) when no document exists, matching the web client.
    pub fn update_section(&mut self, payload: SectionData) -> Result<()> {
        if let SectionData::Problems(problems) = &payload {
            validate_problems(problems)?;
        }

        let Some(data) = self.data.as_mut() else {
            return Ok(());
        };

        match payload {
            SectionData::Problems(v) => data.problems = v,
            SectionData::Missions(v) => data.missions = v,
            SectionData::Narratives(v) => data.narratives = v,
            SectionData::Goals(v) => data.goals = v,
            SectionData::Challenges(v) => data.challenges = v,
            SectionData::Strategies(v) => data.strategies = v,
            SectionData::Projects(v) => data.projects = v,
            SectionData::History(v) => data.history = v,
            SectionData::Log(v) => data.log = v,
        }
        data.touch();
        Ok(())
    }

    /// Append one problem, enforcing the form limits
    pub fn add_problem(&mut self, problem: Problem) -> Result<()> {
        validate_problem_text(&problem.text)?;

        let Some(data) = self.data.as_mut() else {
            return Err(Error::InvalidState("store not initialized".to_string()));
        };
        if data.problems.len() >= MAX_PROBLEMS {
            return Err(Error::Validation(format!(
                "at most {} problems may be selected",
                MAX_PROBLEMS
            )));
        }
        data.problems.push(problem);
        data.touch();
        Ok(())
    }

    /// Remove a problem by id; unknown ids are ignored
    pub fn remove_problem(&mut self, id: Uuid) {
        if let Some(data) = self.data.as_mut() {
            let before = data.problems.len();
            data.problems.retain(|p| p.id != id);
            if data.problems.len() != before {
                data.touch();
            }
        }
    }

    pub fn set_current_section(&mut self, section: TelosSection) {
        if section == self.current_section {
            return;
        }
        let old = self.current_section;
        self.current_section = section;
        if let Some(events) = &self.events {
            events.emit_lossy(TelosEvent::SectionChanged {
                old_section: old,
                new_section: section,
                timestamp: Utc::now(),
            });
        }
    }

    pub fn mark_section_complete(&mut self, section: TelosSection) {
        if self.completed_sections.insert(section) {
            if let Some(events) = &self.events {
                events.emit_lossy(TelosEvent::SectionCompleted {
                    section,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Complete the current section and move to the next one in the flow.
    ///
    /// Returns the new current section, or None when the flow is finished.
    pub fn advance(&mut self) -> Option<TelosSection> {
        self.mark_section_complete(self.current_section);
        let next = flow::next_section(self.current_section)?;
        self.set_current_section(next);
        Some(next)
    }

    /// Discard everything and start over with a fresh document
    pub fn reset(&mut self) {
        self.data = Some(TelosData::empty());
        self.current_section = TelosSection::Problems;
        self.completed_sections.clear();
        info!("store reset");
    }

    /// Persist the store to its backing file.
    ///
    /// Writes a sibling temp file first and renames it into place, so a crash
    /// mid-save never leaves a truncated document behind.
    pub fn save(&self) -> Result<()> {
        let persisted = PersistedState {
            current_telos: self.data.clone(),
            completed_sections: self.completed_sections.iter().copied().collect(),
            current_section: self.current_section,
        };
        let json = serde_json::to_string_pretty(&persisted)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Store(format!(
                "failed to move {} into place: {}",
                tmp.display(),
                e
            ))
        })?;
        debug!("saved store to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn validate_problems(problems: &[Problem]) -> Result<()> {
    if problems.len() > MAX_PROBLEMS {
        return Err(Error::Validation(format!(
            "at most {} problems may be selected",
            MAX_PROBLEMS
        )));
    }
    for problem in problems {
        validate_problem_text(&problem.text)?;
    }
    Ok(())
}

fn validate_problem_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Validation("problem text is required".to_string()));
    }
    if text.chars().count() > MAX_PROBLEM_LEN {
        return Err(Error::Validation(format!(
            "problem must be {} characters or less",
            MAX_PROBLEM_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_store() -> TelosStore {
        let dir = std::env::temp_dir().join(format!("telos-store-test-{}", Uuid::new_v4()));
        let mut store = TelosStore::open(dir.join("telos.json")).unwrap();
        store.initialize();
        store
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut store = fresh_store();
        let id = store.current().unwrap().id;
        store.initialize();
        assert_eq!(store.current().unwrap().id, id);
    }

    #[test]
    fn test_problem_limit() {
        let mut store = fresh_store();
        for i in 0..MAX_PROBLEMS {
            store.add_problem(Problem::custom(format!("problem {}", i))).unwrap();
        }
        let err = store.add_problem(Problem::custom("one too many"));
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[test]
    fn test_problem_text_limits() {
        let mut store = fresh_store();
        assert!(store.add_problem(Problem::custom("   ")).is_err());
        assert!(store.add_problem(Problem::custom("x".repeat(101))).is_err());
        assert!(store.add_problem(Problem::custom("x".repeat(100))).is_ok());
    }

    #[test]
    fn test_remove_problem() {
        let mut store = fresh_store();
        let problem = Problem::suggested("Climate change acceleration and impacts");
        let id = problem.id;
        store.add_problem(problem).unwrap();
        assert_eq!(store.current().unwrap().problems.len(), 1);

        store.remove_problem(id);
        assert!(store.current().unwrap().problems.is_empty());

        // removing again is harmless
        store.remove_problem(id);
    }

    #[test]
    fn test_advance_walks_the_flow() {
        let mut store = fresh_store();
        assert_eq!(store.current_section(), TelosSection::Problems);

        assert_eq!(store.advance(), Some(TelosSection::Missions));
        assert!(store.is_complete(TelosSection::Problems));
        assert_eq!(store.current_section(), TelosSection::Missions);
    }

    #[test]
    fn test_advance_stops_at_the_end() {
        let mut store = fresh_store();
        store.set_current_section(TelosSection::Log);
        assert_eq!(store.advance(), None);
        assert!(store.is_complete(TelosSection::Log));
    }

    #[test]
    fn test_reset() {
        let mut store = fresh_store();
        store.add_problem(Problem::custom("something")).unwrap();
        store.advance();

        store.reset();
        assert!(store.current().unwrap().problems.is_empty());
        assert_eq!(store.current_section(), TelosSection::Problems);
        assert_eq!(store.completed_count(), 0);
    }

    #[tokio::test]
    async fn test_section_events() {
        let bus = Arc::new(EventBus::new(16));
        let mut rx = bus.subscribe();

        let dir = std::env::temp_dir().join(format!("telos-store-test-{}", Uuid::new_v4()));
        let mut store = TelosStore::open(dir.join("telos.json"))
            .unwrap()
            .with_events(Arc::clone(&bus));
        store.initialize();
        store.advance();

        match rx.recv().await.unwrap() {
            TelosEvent::SectionCompleted { section, .. } => {
                assert_eq!(section, TelosSection::Problems)
            }
            other => panic!("expected SectionCompleted, got {:?}", other),
        }
        match rx.recv().await.unwrap() {
            TelosEvent::SectionChanged { new_section, .. } => {
                assert_eq!(new_section, TelosSection::Missions)
            }
            other => panic!("expected SectionChanged, got {:?}", other),
        }
    }
}
