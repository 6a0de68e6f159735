pub mod loader;

use rand::seq::SliceRandom;
use rand::thread_rng;

/// One exam loaded from a single `.exam` file. The question order is fixed
/// once loaded (or scrambled once right after loading) and reused across
/// restarts.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Exam {
    pub questions: Vec<Question>,
    pub source: String,
}

impl Exam {
    pub fn new(questions: Vec<Question>, source: String) -> Self {
        Self { questions, source }
    }

    pub fn scramble(&mut self) {
        self.questions.shuffle(&mut thread_rng());
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    /// Trimmed, lowercased. A single letter for well-formed files, but the
    /// loader keeps whatever the answer field normalizes to.
    pub answer: String,
}

impl Question {
    pub fn new(text: String, options: Vec<String>, answer: String) -> Self {
        Self {
            text,
            options,
            answer,
        }
    }

    pub fn is_correct(&self, user_answer: &str) -> bool {
        self.answer == user_answer.trim().to_lowercase()
    }
}

/// Record of one incorrectly answered question, kept for post-exam review.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AttemptResult {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
}

impl AttemptResult {
    pub fn new(question: String, user_answer: String, correct_answer: String) -> Self {
        Self {
            question,
            user_answer,
            correct_answer,
        }
    }
}

/// Letter label for a 1-based option position: 1 -> 'a', 2 -> 'b', up to 26.
pub fn option_label(position: usize) -> Option<char> {
    if position == 0 || position > 26 {
        return None;
    }
    return Some((b'a' + position as u8 - 1) as char);
}

/// Qualitative performance category derived from the score percentage.
/// Boundaries are inclusive on the lower bound of each band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Excellent,
    Good,
    NeedsImprovement,
    TryAgain,
}

impl Band {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Band::Excellent
        } else if percentage >= 75.0 {
            Band::Good
        } else if percentage >= 50.0 {
            Band::NeedsImprovement
        } else {
            Band::TryAgain
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Band::Excellent => "Excellent job!",
            Band::Good => "Good work!",
            Band::NeedsImprovement => "Needs improvement.",
            Band::TryAgain => "Better luck next time!",
        }
    }
}
