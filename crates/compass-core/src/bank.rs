//! # Question Bank
//!
//! The fixed 26-item questionnaire, defined at build time.
//!
//! The bank is configuration data, not logic: section membership and the
//! reverse-scored flag live here as one static table, so the scoring engine
//! never carries scattered numeric literals. The reverse-scored items are the
//! negative-pole items of each section (Self-Judgment, Isolation,
//! Over-Identification).

use crate::primitives::QUESTION_COUNT;
use crate::types::Section;

// =============================================================================
// QUESTION
// =============================================================================

/// One questionnaire item. Immutable, defined at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// 1-based position in canonical order.
    pub position: usize,
    /// Statement text, shown verbatim to the respondent.
    pub text: &'static str,
    /// The section this item is scored under.
    pub section: Section,
    /// Whether the ordinal score is reverse-coded before averaging.
    /// Internal to scoring; never displayed.
    pub reversed: bool,
}

// =============================================================================
// THE BANK
// =============================================================================

/// The full questionnaire in canonical order.
///
/// Positions 12 and 13 carry identical text; the source instrument ships it
/// that way and scoring depends only on positions, so it is preserved.
pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        position: 1,
        text: "I try to be loving towards myself when I\u{2019}m feeling emotional pain.",
        section: Section::SelfKindness,
        reversed: false,
    },
    Question {
        position: 2,
        text: "When I\u{2019}m going through a very hard time, I give myself the caring and tenderness I need.",
        section: Section::SelfKindness,
        reversed: false,
    },
    Question {
        position: 3,
        text: "I\u{2019}m kind to myself when I\u{2019}m experiencing suffering.",
        section: Section::SelfKindness,
        reversed: false,
    },
    Question {
        position: 4,
        text: "I\u{2019}m tolerant of my own flaws and inadequacies.",
        section: Section::SelfKindness,
        reversed: false,
    },
    Question {
        position: 5,
        text: "I try to be understanding and patient towards those aspects of my personality I don't like.",
        section: Section::SelfKindness,
        reversed: false,
    },
    Question {
        position: 6,
        text: "I\u{2019}m disapproving and judgmental about my own flaws and inadequacies.",
        section: Section::SelfKindness,
        reversed: true,
    },
    Question {
        position: 7,
        text: "When times are really difficult, I tend to be tough on myself.",
        section: Section::SelfKindness,
        reversed: true,
    },
    Question {
        position: 8,
        text: "I\u{2019}m intolerant and impatient towards those aspects of my personality I don't like.",
        section: Section::SelfKindness,
        reversed: true,
    },
    Question {
        position: 9,
        text: "When I see aspects of myself that I don\u{2019}t like, I get down on myself.",
        section: Section::SelfKindness,
        reversed: true,
    },
    Question {
        position: 10,
        text: "I can be a bit cold-hearted towards myself when I'm experiencing suffering.",
        section: Section::SelfKindness,
        reversed: true,
    },
    Question {
        position: 11,
        text: "When things are going badly for me, I see the difficulties as part of life that everyone goes through.",
        section: Section::CommonHumanity,
        reversed: false,
    },
    Question {
        position: 12,
        text: "When I'm down, I remind myself that there are lots of other people in the world feeling like I am.",
        section: Section::CommonHumanity,
        reversed: false,
    },
    Question {
        position: 13,
        text: "When I'm down, I remind myself that there are lots of other people in the world feeling like I am.",
        section: Section::CommonHumanity,
        reversed: false,
    },
    Question {
        position: 14,
        text: "I try to see my failings as part of the human condition.",
        section: Section::CommonHumanity,
        reversed: false,
    },
    Question {
        position: 15,
        text: "When I think about my inadequacies, it tends to make me feel more separate and cut off from the rest of the world.",
        section: Section::CommonHumanity,
        reversed: true,
    },
    Question {
        position: 16,
        text: "When I\u{2019}m feeling down, I tend to feel like most other people are probably happier than I am.",
        section: Section::CommonHumanity,
        reversed: true,
    },
    Question {
        position: 17,
        text: "When I\u{2019}m really struggling, I tend to feel like other people must be having an easier time of it.",
        section: Section::CommonHumanity,
        reversed: true,
    },
    Question {
        position: 18,
        text: "When I fail at something that's important to me, I tend to feel alone in my failure.",
        section: Section::CommonHumanity,
        reversed: true,
    },
    Question {
        position: 19,
        text: "When something upsets me I try to keep my emotions in balance.",
        section: Section::Mindfulness,
        reversed: false,
    },
    Question {
        position: 20,
        text: "When something painful happens I try to take a balanced view of the situation.",
        section: Section::Mindfulness,
        reversed: false,
    },
    Question {
        position: 21,
        text: "When I fail at something important to me I try to keep things in perspective.",
        section: Section::Mindfulness,
        reversed: false,
    },
    Question {
        position: 22,
        text: "When I'm feeling down I try to approach my feelings with curiosity and openness.",
        section: Section::Mindfulness,
        reversed: false,
    },
    Question {
        position: 23,
        text: "When I\u{2019}m feeling down I tend to obsess and fixate on everything that\u{2019}s wrong.",
        section: Section::Mindfulness,
        reversed: true,
    },
    Question {
        position: 24,
        text: "When I fail at something important to me I become consumed by feelings of inadequacy.",
        section: Section::Mindfulness,
        reversed: true,
    },
    Question {
        position: 25,
        text: "When something upsets me I get carried away with my feelings.",
        section: Section::Mindfulness,
        reversed: true,
    },
    Question {
        position: 26,
        text: "When something painful happens I tend to blow the incident out of proportion.",
        section: Section::Mindfulness,
        reversed: true,
    },
];

// =============================================================================
// ACCESSORS
// =============================================================================

/// Look up a question by its 1-based position.
#[must_use]
pub fn question(position: usize) -> Option<&'static Question> {
    if position == 0 {
        return None;
    }
    QUESTIONS.get(position - 1)
}

/// Iterate the questions belonging to one section, in position order.
pub fn section_questions(section: Section) -> impl Iterator<Item = &'static Question> {
    QUESTIONS.iter().filter(move |q| q.section == section)
}

/// Iterate the 1-based positions of all reverse-scored items.
pub fn reverse_positions() -> impl Iterator<Item = usize> {
    QUESTIONS.iter().filter(|q| q.reversed).map(|q| q.position)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::SECTION_COUNT;

    #[test]
    fn bank_has_twenty_six_questions() {
        assert_eq!(QUESTIONS.len(), QUESTION_COUNT);
    }

    #[test]
    fn positions_are_sequential() {
        for (idx, q) in QUESTIONS.iter().enumerate() {
            assert_eq!(q.position, idx + 1);
        }
    }

    #[test]
    fn section_membership_matches_ranges() {
        for q in &QUESTIONS {
            assert!(
                q.section.positions().contains(&q.position),
                "Q{} outside its section range",
                q.position
            );
        }
    }

    #[test]
    fn reverse_set_is_fixed() {
        let expected: Vec<usize> = (6..=10).chain(15..=18).chain(23..=26).collect();
        assert_eq!(reverse_positions().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn every_section_has_questions() {
        for section in Section::ALL {
            let count = section_questions(section).count();
            assert_eq!(count, section.positions().count());
        }
        assert_eq!(Section::ALL.len(), SECTION_COUNT);
    }

    #[test]
    fn lookup_by_position() {
        assert!(question(0).is_none());
        assert_eq!(question(1).map(|q| q.position), Some(1));
        assert_eq!(question(26).map(|q| q.position), Some(26));
        assert!(question(27).is_none());
    }
}
