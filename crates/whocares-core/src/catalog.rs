//! Question catalog.
//!
//! The catalog is authored elsewhere; the core only relies on its order and on
//! which questions are inverted. An inverted question (the stress question in
//! the standard catalog) subtracts its value from the score.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Smallest catalog that still makes a check-in.
pub const MIN_QUESTIONS: usize = 2;

/// One rating question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable, 1-based id
    pub id: u32,
    /// Short label shown on the receipt
    pub label: String,
    /// Prompt shown while answering
    pub description: String,
    pub glyph: String,
    /// Value counts against the score
    #[serde(default)]
    pub inverted: bool,
}

impl Question {
    pub fn new(id: u32, label: &str, description: &str, glyph: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            description: description.to_string(),
            glyph: glyph.to_string(),
            inverted: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// `+1` for regular questions, `-1` for inverted ones.
    pub fn weight(&self) -> i32 {
        if self.inverted {
            -1
        } else {
            1
        }
    }

    /// Receipt sign for this question.
    pub fn sign(&self) -> char {
        if self.inverted {
            '-'
        } else {
            '+'
        }
    }
}

/// Ordered, immutable list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog, rejecting short lists and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CatalogTooShort`] or
    /// [`ValidationError::DuplicateQuestionId`].
    pub fn new(questions: Vec<Question>) -> Result<Self, ValidationError> {
        if questions.len() < MIN_QUESTIONS {
            return Err(ValidationError::CatalogTooShort {
                min: MIN_QUESTIONS,
                len: questions.len(),
            });
        }
        for (i, q) in questions.iter().enumerate() {
            if questions[..i].iter().any(|other| other.id == q.id) {
                return Err(ValidationError::DuplicateQuestionId(q.id));
            }
        }
        Ok(Self { questions })
    }

    /// The weekly check-in questions.
    pub fn standard() -> Self {
        Self {
            questions: vec![
                Question::new(1, "Productivity", "How productive were you this week?", "💪"),
                Question::new(2, "Satisfaction", "How satisfied are you with your week?", "😊"),
                Question::new(3, "Physical", "How would you rate your physical health?", "🏃‍♂️"),
                Question::new(4, "Who Cares?", "How stressed were you?", "😓").inverted(),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Question>> for QuestionCatalog {
    type Error = ValidationError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionCatalog> for Vec<Question> {
    fn from(catalog: QuestionCatalog) -> Self {
        catalog.questions
    }
}

impl<'a> IntoIterator for &'a QuestionCatalog {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
