//! Session transcript

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use telos_common::events::TranscriptRole;

/// One line of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: TranscriptRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: TranscriptRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of one session's conversation
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::new(TranscriptRole::System, "started"));
        transcript.push(TranscriptEntry::new(TranscriptRole::Agent, "hello"));
        transcript.push(TranscriptEntry::new(TranscriptRole::User, "hi"));

        let roles: Vec<TranscriptRole> =
            transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![
                TranscriptRole::System,
                TranscriptRole::Agent,
                TranscriptRole::User
            ]
        );
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = TranscriptEntry::new(TranscriptRole::Agent, "hello");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"role\":\"agent\""));
        assert!(json.contains("\"timestamp\""));
    }
}
