use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Share-link key carrying the display name; no question may use it as an id.
pub const DISPLAY_NAME_KEY: &str = "u";

/// Stable identifier of a question, used verbatim as its share-link key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Named dimension grouping questions. The set of pillars is declared by the bank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pillar(String);

impl Pillar {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub pillar: Pillar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Question {
    pub fn new(id: &str, text: &str, pillar: &Pillar) -> Self {
        Self {
            id: QuestionId::from(id),
            text: text.to_string(),
            pillar: pillar.clone(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }
}

/// Structural problems detected while assembling a question bank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("question bank declares no questions")]
    EmptyBank,
    #[error("question id must not be blank")]
    BlankQuestionId,
    #[error("question id '{0}' is declared more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question id '{0}' collides with the reserved display-name key")]
    ReservedQuestionId(QuestionId),
    #[error("pillar '{0}' is declared more than once")]
    DuplicatePillar(Pillar),
    #[error("question '{question}' references undeclared pillar '{pillar}'")]
    UndeclaredPillar { question: QuestionId, pillar: Pillar },
    #[error("pillar '{0}' has no questions")]
    EmptyPillar(Pillar),
}

/// Ordered, immutable set of questions plus the pillars they are scored under.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pillars: Vec<Pillar>,
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    pub fn new(pillars: Vec<Pillar>, questions: Vec<Question>) -> Result<Self, SchemaError> {
        if questions.is_empty() {
            return Err(SchemaError::EmptyBank);
        }

        for (position, pillar) in pillars.iter().enumerate() {
            if pillars[..position].contains(pillar) {
                return Err(SchemaError::DuplicatePillar(pillar.clone()));
            }
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.id.as_str().trim().is_empty() {
                return Err(SchemaError::BlankQuestionId);
            }
            if question.id.as_str() == DISPLAY_NAME_KEY {
                return Err(SchemaError::ReservedQuestionId(question.id.clone()));
            }
            if !pillars.contains(&question.pillar) {
                return Err(SchemaError::UndeclaredPillar {
                    question: question.id.clone(),
                    pillar: question.pillar.clone(),
                });
            }
            if index.insert(question.id.clone(), position).is_some() {
                return Err(SchemaError::DuplicateQuestion(question.id.clone()));
            }
        }

        if let Some(empty) = pillars
            .iter()
            .find(|pillar| !questions.iter().any(|q| &q.pillar == *pillar))
        {
            return Err(SchemaError::EmptyPillar(empty.clone()));
        }

        Ok(Self {
            pillars,
            questions,
            index,
        })
    }

    /// Build a bank whose pillars are declared in order of first appearance.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, SchemaError> {
        let mut pillars: Vec<Pillar> = Vec::new();
        for question in &questions {
            if !pillars.contains(&question.pillar) {
                pillars.push(question.pillar.clone());
            }
        }
        Self::new(pillars, questions)
    }

    /// The fifteen-question scan with five pillars, three questions each.
    pub fn standard() -> Self {
        let honesty = Pillar::new("Honesty");
        let attachment = Pillar::new("Attachment");
        let boundaries = Pillar::new("Boundaries");
        let growth = Pillar::new("Growth");
        let polarity = Pillar::new("Polarity");

        let questions = vec![
            Question::new(
                "q1",
                "If telling the truth might upset someone, I still prefer to tell it.",
                &honesty,
            )
            .with_hint("Truth over harmony"),
            Question::new(
                "q2",
                "When I feel ignored, I don't chase. I let people come back to me.",
                &attachment,
            )
            .with_hint("Secure vs anxious"),
            Question::new("q3", "I can say \"no\" without feeling guilty.", &boundaries),
            Question::new(
                "q4",
                "I work on myself (health, money, mindset, spirit) every month.",
                &growth,
            ),
            Question::new(
                "q5",
                "I like some masculine/feminine polarity in a relationship.",
                &polarity,
            )
            .with_hint("Chemistry preference"),
            Question::new(
                "q6",
                "I don't keep secret convos or DMs from someone I'm dating.",
                &honesty,
            ),
            Question::new(
                "q7",
                "If there's conflict, I'd rather talk it out than disappear.",
                &attachment,
            ),
            Question::new(
                "q8",
                "I can respect a partner's time, work, and friendships.",
                &boundaries,
            ),
            Question::new(
                "q9",
                "I believe two people should grow together, not compete.",
                &growth,
            ),
            Question::new(
                "q10",
                "I'm attracted to a partner who leads OR lets me lead (not both confused).",
                &polarity,
            ),
            Question::new(
                "q11",
                "I don't lie about kids, exes, money, or living situation.",
                &honesty,
            ),
            Question::new(
                "q12",
                "I don't panic if someone takes a little longer to reply.",
                &attachment,
            ),
            Question::new(
                "q13",
                "I don't let family or friends disrespect my relationship.",
                &boundaries,
            ),
            Question::new(
                "q14",
                "I study, pray, or learn things that make me a better partner.",
                &growth,
            ),
            Question::new(
                "q15",
                "I like when energy is clearly masculine/feminine, not roommate energy.",
                &polarity,
            ),
        ];

        let index = questions
            .iter()
            .enumerate()
            .map(|(position, question)| (question.id.clone(), position))
            .collect();

        Self {
            pillars: vec![honesty, attachment, boundaries, growth, polarity],
            questions,
            index,
        }
    }

    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.index
            .get(&QuestionId::from(id))
            .map(|position| &self.questions[*position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.question(id).is_some()
    }

    pub fn questions_for<'a>(&'a self, pillar: &'a Pillar) -> impl Iterator<Item = &'a Question> {
        self.questions
            .iter()
            .filter(move |question| &question.pillar == pillar)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_passes_validation() {
        let standard = QuestionBank::standard();
        let rebuilt = QuestionBank::new(
            standard.pillars().to_vec(),
            standard.questions().to_vec(),
        )
        .expect("standard bank is well formed");

        assert_eq!(rebuilt.len(), 15);
        assert_eq!(rebuilt.pillars().len(), 5);
        for pillar in rebuilt.pillars() {
            assert_eq!(rebuilt.questions_for(pillar).count(), 3);
        }
    }

    #[test]
    fn lookup_resolves_by_id() {
        let bank = QuestionBank::standard();
        let question = bank.question("q5").expect("q5 exists");
        assert_eq!(question.pillar.name(), "Polarity");
        assert_eq!(question.hint.as_deref(), Some("Chemistry preference"));
        assert!(!bank.contains("q16"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let pillar = Pillar::new("Honesty");
        let err = QuestionBank::from_questions(vec![
            Question::new("a", "first", &pillar),
            Question::new("a", "second", &pillar),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateQuestion(QuestionId::from("a")));
    }

    #[test]
    fn rejects_reserved_display_name_key() {
        let pillar = Pillar::new("Honesty");
        let err = QuestionBank::from_questions(vec![Question::new("u", "who?", &pillar)])
            .unwrap_err();
        assert!(matches!(err, SchemaError::ReservedQuestionId(_)));
    }

    #[test]
    fn rejects_undeclared_and_empty_pillars() {
        let honesty = Pillar::new("Honesty");
        let growth = Pillar::new("Growth");

        let undeclared = QuestionBank::new(
            vec![honesty.clone()],
            vec![Question::new("q1", "text", &growth)],
        )
        .unwrap_err();
        assert!(matches!(undeclared, SchemaError::UndeclaredPillar { .. }));

        let empty = QuestionBank::new(
            vec![honesty.clone(), growth],
            vec![Question::new("q1", "text", &honesty)],
        )
        .unwrap_err();
        assert_eq!(empty, SchemaError::EmptyPillar(Pillar::new("Growth")));
    }

    #[test]
    fn from_questions_declares_pillars_in_first_appearance_order() {
        let stability = Pillar::new("Stability");
        let empathy = Pillar::new("Empathy");
        let bank = QuestionBank::from_questions(vec![
            Question::new("s1", "I keep my word.", &stability),
            Question::new("e1", "I notice how others feel.", &empathy),
            Question::new("s2", "My routines are steady.", &stability),
        ])
        .expect("bank builds");

        assert_eq!(bank.pillars(), &[stability, empathy]);
    }
}
