//! Section flow progression
//!
//! The coaching journey walks the nine sections in a fixed order. This module
//! owns that order plus the per-section prompt a coach (human or voice agent)
//! opens with.

use crate::model::TelosSection;

/// The nine sections in coaching order
pub const SECTION_ORDER: [TelosSection; 9] = [
    TelosSection::Problems,
    TelosSection::Missions,
    TelosSection::Narratives,
    TelosSection::Goals,
    TelosSection::Challenges,
    TelosSection::Strategies,
    TelosSection::Projects,
    TelosSection::History,
    TelosSection::Log,
];

/// Action verbs suggested for mission statements
pub const ACTION_VERBS: [&str; 20] = [
    "Create", "Build", "Develop", "Design", "Educate", "Empower", "Connect", "Inspire",
    "Transform", "Improve", "Solve", "Innovate", "Lead", "Support", "Organize", "Advocate",
    "Research", "Teach", "Heal", "Protect",
];

/// Section after `section`, or None at the end of the flow
pub fn next_section(section: TelosSection) -> Option<TelosSection> {
    let idx = position(section);
    SECTION_ORDER.get(idx + 1).copied()
}

/// Section before `section`, or None at the start
pub fn previous_section(section: TelosSection) -> Option<TelosSection> {
    let idx = position(section);
    idx.checked_sub(1).map(|i| SECTION_ORDER[i])
}

/// 1-based step number for progress display
pub fn step_number(section: TelosSection) -> usize {
    position(section) + 1
}

/// Total number of steps in the flow
pub fn total_steps() -> usize {
    SECTION_ORDER.len()
}

fn position(section: TelosSection) -> usize {
    SECTION_ORDER
        .iter()
        .position(|s| *s == section)
        .expect("section is in SECTION_ORDER")
}

/// Opening coaching prompt for a section
pub fn coaching_prompt(section: TelosSection) -> &'static str {
    match section {
        TelosSection::Problems => {
            "Think about issues that frustrate you or situations you wish were different. \
             These could be global problems, local community issues, or personal challenges. \
             What problems do you feel called to address?"
        }
        TelosSection::Missions => {
            "Your missions should start with strong action verbs and clearly connect to the \
             problems you identified. Think about what you want to accomplish, not just what \
             you want to change."
        }
        TelosSection::Narratives => {
            "Your narratives should tell the same story but adapt to different contexts. The \
             short version is for quick introductions, conversational is for casual \
             explanations, and the pitch is for formal presentations or detailed discussions."
        }
        TelosSection::Goals => {
            "Turn each mission into concrete goals. A strong goal is specific, measurable, \
             achievable, relevant, and time-bound. What will you measure, and by when?"
        }
        TelosSection::Challenges => {
            "What stands between you and your goals? Consider internal obstacles like habits \
             and fears, external ones like circumstances, and missing resources."
        }
        TelosSection::Strategies => {
            "For each challenge, sketch a strategy to work around or through it. Strategies \
             are approaches, not tasks; keep them at the level of how, not what."
        }
        TelosSection::Projects => {
            "Break your strategies into projects you can actually start. Give each one a \
             status and a rough timeline."
        }
        TelosSection::History => {
            "Look back at the events that shaped you. Which years mattered, what happened, \
             and how strongly did each event shape who you are today?"
        }
        TelosSection::Log => {
            "Keep a running log of your progress. Short, dated entries with a few tags are \
             enough to see your trajectory over time."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_starts_with_problems_and_ends_with_log() {
        assert_eq!(SECTION_ORDER[0], TelosSection::Problems);
        assert_eq!(SECTION_ORDER[8], TelosSection::Log);
    }

    #[test]
    fn test_next_section() {
        assert_eq!(
            next_section(TelosSection::Problems),
            Some(TelosSection::Missions)
        );
        assert_eq!(next_section(TelosSection::Log), None);
    }

    #[test]
    fn test_previous_section() {
        assert_eq!(previous_section(TelosSection::Problems), None);
        assert_eq!(
            previous_section(TelosSection::Missions),
            Some(TelosSection::Problems)
        );
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(step_number(TelosSection::Problems), 1);
        assert_eq!(step_number(TelosSection::Log), 9);
        assert_eq!(total_steps(), 9);
    }

    #[test]
    fn test_every_section_has_a_prompt() {
        for section in SECTION_ORDER {
            assert!(!coaching_prompt(section).is_empty());
        }
    }
}
