//! TELOS questionnaire data model
//!
//! The document a coaching session builds up, section by section. Field names
//! serialize in camelCase so documents round-trip with the JSON the web
//! client persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A problem the user wants to help solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: Uuid,
    pub text: String,
    /// Catalog category id, or "custom" / "suggested"
    pub category: String,
    /// Self-rated relevance, 1-10
    pub personal_relevance: u8,
    #[serde(default)]
    pub is_custom: bool,
}

impl Problem {
    /// Build a user-authored problem (category "custom", default relevance)
    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            category: "custom".to_string(),
            personal_relevance: 5,
            is_custom: true,
        }
    }

    /// Build a problem picked from the catalog suggestions
    pub fn suggested(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            category: "suggested".to_string(),
            personal_relevance: 5,
            is_custom: false,
        }
    }
}

/// A mission statement tied to one of the user's problems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: Uuid,
    pub text: String,
    pub problem_id: Uuid,
    /// Leading verb of the mission statement ("Create", "Teach", ...)
    pub action_verb: String,
}

/// The three tellings of the user's story
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narratives {
    pub short: String,
    pub conversational: String,
    pub pitch: String,
}

/// SMART checklist attached to a goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartCriteria {
    pub specific: bool,
    pub measurable: bool,
    pub achievable: bool,
    pub relevant: bool,
    pub time_bound: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub text: String,
    pub mission_id: Uuid,
    pub metric: String,
    pub deadline: String,
    pub smart_criteria: SmartCriteria,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeCategory {
    Internal,
    External,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: Uuid,
    pub text: String,
    pub category: ChallengeCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: Uuid,
    pub text: String,
    pub challenge_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planned,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub text: String,
    pub strategy_id: Uuid,
    pub status: ProjectStatus,
    pub timeline: String,
}

/// A formative event from the user's past
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    pub year: i32,
    pub event: String,
    /// Self-rated impact, 1-10
    pub impact_rating: u8,
}

/// One dated journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: String,
    pub entry: String,
    pub tags: Vec<String>,
}

/// The nine questionnaire sections, in coaching order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelosSection {
    Problems,
    Missions,
    Narratives,
    Goals,
    Challenges,
    Strategies,
    Projects,
    History,
    Log,
}

impl std::fmt::Display for TelosSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TelosSection::Problems => "problems",
            TelosSection::Missions => "missions",
            TelosSection::Narratives => "narratives",
            TelosSection::Goals => "goals",
            TelosSection::Challenges => "challenges",
            TelosSection::Strategies => "strategies",
            TelosSection::Projects => "projects",
            TelosSection::History => "history",
            TelosSection::Log => "log",
        };
        write!(f, "{}", name)
    }
}

/// The complete TELOS document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelosData {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub problems: Vec<Problem>,
    pub missions: Vec<Mission>,
    pub narratives: Narratives,
    pub goals: Vec<Goal>,
    pub challenges: Vec<Challenge>,
    pub strategies: Vec<Strategy>,
    pub projects: Vec<Project>,
    pub history: Vec<HistoryEvent>,
    pub log: Vec<LogEntry>,
}

impl TelosData {
    /// Create an empty document, timestamped now
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            problems: Vec::new(),
            missions: Vec::new(),
            narratives: Narratives::default(),
            goals: Vec::new(),
            challenges: Vec::new(),
            strategies: Vec::new(),
            projects: Vec::new(),
            history: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Replacement payload for one section of the document
///
/// The web client updated sections dynamically by key; a typed enum keeps the
/// same one-call-per-section shape without stringly-typed field access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionData {
    Problems(Vec<Problem>),
    Missions(Vec<Mission>),
    Narratives(Narratives),
    Goals(Vec<Goal>),
    Challenges(Vec<Challenge>),
    Strategies(Vec<Strategy>),
    Projects(Vec<Project>),
    History(Vec<HistoryEvent>),
    Log(Vec<LogEntry>),
}

impl SectionData {
    /// Which section this payload belongs to
    pub fn section(&self) -> TelosSection {
        match self {
            SectionData::Problems(_) => TelosSection::Problems,
            SectionData::Missions(_) => TelosSection::Missions,
            SectionData::Narratives(_) => TelosSection::Narratives,
            SectionData::Goals(_) => TelosSection::Goals,
            SectionData::Challenges(_) => TelosSection::Challenges,
            SectionData::Strategies(_) => TelosSection::Strategies,
            SectionData::Projects(_) => TelosSection::Projects,
            SectionData::History(_) => TelosSection::History,
            SectionData::Log(_) => TelosSection::Log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let data = TelosData::empty();
        assert!(data.problems.is_empty());
        assert!(data.narratives.short.is_empty());
        assert_eq!(data.created_at, data.updated_at);
    }

    #[test]
    fn test_section_serde_names() {
        let json = serde_json::to_string(&TelosSection::Narratives).unwrap();
        assert_eq!(json, "\"narratives\"");

        let parsed: TelosSection = serde_json::from_str("\"problems\"").unwrap();
        assert_eq!(parsed, TelosSection::Problems);
    }

    #[test]
    fn test_document_round_trip_uses_camel_case() {
        let mut data = TelosData::empty();
        data.problems.push(Problem::custom("Income inequality"));

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"personalRelevance\""));
        assert!(json.contains("\"isCustom\""));

        let back: TelosData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_section_data_maps_to_section() {
        let payload = SectionData::Goals(Vec::new());
        assert_eq!(payload.section(), TelosSection::Goals);
    }
}
