//! Sequencer and session configuration

use telos_common::config::VoiceSettings;

/// Configuration for one playback sequencer.
///
/// The web client carried three near-identical copies of the playback queue
/// differing only in this rate; here it is the single point of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Fixed output context rate (Hz), matching the remote service's
    /// configured encoding rate.
    pub sample_rate: u32,
}

impl SequencerConfig {
    pub const fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

/// Configuration for a voice coaching session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Remote coaching agent identifier
    pub agent_id: String,

    /// Encoding rate of the remote audio stream (Hz)
    pub sample_rate: u32,

    /// Volume the session starts at, 0.0-1.0
    pub initial_volume: f32,

    /// Optional coaching prompt the session opens with
    /// (see `telos_common::flow::coaching_prompt`)
    pub initial_prompt: Option<String>,
}

impl SessionConfig {
    pub fn sequencer(&self) -> SequencerConfig {
        SequencerConfig::new(self.sample_rate)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&VoiceSettings::default())
    }
}

impl From<&VoiceSettings> for SessionConfig {
    fn from(settings: &VoiceSettings) -> Self {
        Self {
            agent_id: settings.agent_id.clone(),
            sample_rate: settings.sample_rate,
            initial_volume: settings.volume.clamp(0.0, 1.0),
            initial_prompt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_voice_settings() {
        let config = SessionConfig::default();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.initial_volume, 0.8);
        assert_eq!(config.sequencer(), SequencerConfig::new(16000));
    }

    #[test]
    fn test_from_settings_clamps_volume() {
        let settings = VoiceSettings {
            volume: 2.0,
            ..VoiceSettings::default()
        };
        let config = SessionConfig::from(&settings);
        assert_eq!(config.initial_volume, 1.0);
    }
}
