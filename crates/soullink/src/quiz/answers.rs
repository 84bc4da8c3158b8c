use super::schema::{QuestionBank, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Likert rating, always within `Rating::MIN..=Rating::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Exact constructor; `None` when the value is out of range.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Clamp any integer to the nearest bound.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = std::convert::Infallible;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ok(Self::clamped(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("question '{0}' is not part of the active question bank")]
    UnknownQuestion(QuestionId),
}

/// Answers keyed by question id. Missing entries are unanswered questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: BTreeMap<QuestionId, Rating>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rating for one question, clamping it into range. Other entries are untouched.
    pub fn set_answer(
        &mut self,
        bank: &QuestionBank,
        question_id: &str,
        value: i64,
    ) -> Result<Rating, AnswerError> {
        let question = bank
            .question(question_id)
            .ok_or_else(|| AnswerError::UnknownQuestion(QuestionId::from(question_id)))?;

        let rating = Rating::clamped(value);
        if i64::from(rating.value()) != value {
            tracing::debug!(question = %question.id, value, clamped = rating.value(), "clamped rating");
        }
        self.answers.insert(question.id.clone(), rating);
        Ok(rating)
    }

    pub fn get(&self, question_id: &str) -> Option<Rating> {
        self.answers.get(&QuestionId::from(question_id)).copied()
    }

    pub fn is_complete(&self, bank: &QuestionBank) -> bool {
        bank.questions()
            .iter()
            .all(|question| self.answers.contains_key(&question.id))
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, Rating)> {
        self.answers.iter().map(|(id, rating)| (id, *rating))
    }
}
