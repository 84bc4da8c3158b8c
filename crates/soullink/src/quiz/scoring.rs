use super::answers::{AnswerStore, Rating};
use super::schema::{Pillar, QuestionBank};
use serde::{Deserialize, Serialize};

/// Denominator used when normalizing a pillar sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    /// Every question in the pillar counts, answered or not.
    #[default]
    WholePillar,
    /// Only answered questions count.
    AnsweredOnly,
}

impl ScoreBasis {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "whole_pillar" | "whole" => Some(Self::WholePillar),
            "answered_only" | "answered" => Some(Self::AnsweredOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarScore {
    pub pillar: Pillar,
    pub score: f64,
    pub percent: u8,
    pub answered: usize,
    pub total: usize,
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Display percentage; clamps before rounding so every caller agrees on the edges.
pub fn percent(value: f64) -> u8 {
    (clamp_unit(value) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    basis: ScoreBasis,
}

impl ScoringEngine {
    pub fn new(basis: ScoreBasis) -> Self {
        Self { basis }
    }

    pub fn basis(&self) -> ScoreBasis {
        self.basis
    }

    /// One entry per declared pillar, in declaration order.
    pub fn pillar_scores(&self, bank: &QuestionBank, answers: &AnswerStore) -> Vec<PillarScore> {
        bank.pillars()
            .iter()
            .map(|pillar| self.score_pillar(bank, answers, pillar))
            .collect()
    }

    fn score_pillar(&self, bank: &QuestionBank, answers: &AnswerStore, pillar: &Pillar) -> PillarScore {
        let mut total = 0usize;
        let mut answered = 0usize;
        let mut sum = 0u32;

        for question in bank.questions_for(pillar) {
            total += 1;
            if let Some(rating) = answers.get(question.id.as_str()) {
                answered += 1;
                sum += u32::from(rating.value());
            }
        }

        let counted = match self.basis {
            ScoreBasis::WholePillar => total,
            ScoreBasis::AnsweredOnly => answered,
        };

        let score = if answered == 0 || counted == 0 {
            0.0
        } else {
            clamp_unit(f64::from(sum) / (counted as f64 * f64::from(Rating::MAX)))
        };

        PillarScore {
            pillar: pillar.clone(),
            score,
            percent: percent(score),
            answered,
            total,
        }
    }
}

/// Free-function form of [`ScoringEngine::pillar_scores`] with the default basis.
pub fn pillar_scores(bank: &QuestionBank, answers: &AnswerStore) -> Vec<PillarScore> {
    ScoringEngine::default().pillar_scores(bank, answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::schema::Question;

    fn two_pillar_bank() -> QuestionBank {
        let a = Pillar::new("A");
        let b = Pillar::new("B");
        QuestionBank::new(
            vec![a.clone(), b.clone()],
            vec![
                Question::new("a1", "first", &a),
                Question::new("a2", "second", &a),
                Question::new("a3", "third", &a),
                Question::new("b1", "fourth", &b),
                Question::new("b2", "fifth", &b),
            ],
        )
        .expect("bank builds")
    }

    #[test]
    fn full_pillar_of_fives_scores_one_and_empty_pillar_scores_zero() {
        let bank = two_pillar_bank();
        let mut answers = AnswerStore::new();
        for id in ["a1", "a2", "a3"] {
            answers.set_answer(&bank, id, 5).expect("known id");
        }

        let scores = pillar_scores(&bank, &answers);

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].pillar.name(), "A");
        assert_eq!(scores[0].score, 1.0);
        assert_eq!(scores[0].percent, 100);
        assert_eq!(scores[1].pillar.name(), "B");
        assert_eq!(scores[1].score, 0.0);
        assert_eq!(scores[1].answered, 0);
        assert_eq!(scores[1].total, 2);
    }

    #[test]
    fn partial_pillar_depends_on_basis() {
        let bank = two_pillar_bank();
        let mut answers = AnswerStore::new();
        answers.set_answer(&bank, "b1", 4).expect("known id");

        let whole = ScoringEngine::new(ScoreBasis::WholePillar).pillar_scores(&bank, &answers);
        let answered =
            ScoringEngine::new(ScoreBasis::AnsweredOnly).pillar_scores(&bank, &answers);

        assert!((whole[1].score - 0.4).abs() < 1e-9);
        assert!((answered[1].score - 0.8).abs() < 1e-9);
        assert_eq!(whole[1].percent, 40);
        assert_eq!(answered[1].percent, 80);
    }

    #[test]
    fn every_score_stays_within_unit_range() {
        let bank = QuestionBank::standard();
        let mut answers = AnswerStore::new();
        for (step, question) in bank.questions().iter().enumerate() {
            answers
                .set_answer(&bank, question.id.as_str(), (step as i64 % 7) - 1)
                .expect("known id");
            for basis in [ScoreBasis::WholePillar, ScoreBasis::AnsweredOnly] {
                for score in ScoringEngine::new(basis).pillar_scores(&bank, &answers) {
                    assert!((0.0..=1.0).contains(&score.score), "{score:?}");
                    assert!(score.percent <= 100);
                }
            }
        }
    }

    #[test]
    fn percent_clamps_before_rounding() {
        assert_eq!(percent(-0.2), 0);
        assert_eq!(percent(0.004), 0);
        assert_eq!(percent(0.005), 1);
        assert_eq!(percent(0.98), 98);
        assert_eq!(percent(1.7), 100);
        assert_eq!(percent(f64::NAN), 0);
    }

    #[test]
    fn basis_parses_config_values() {
        assert_eq!(ScoreBasis::parse("answered_only"), Some(ScoreBasis::AnsweredOnly));
        assert_eq!(ScoreBasis::parse(" Whole_Pillar "), Some(ScoreBasis::WholePillar));
        assert_eq!(ScoreBasis::parse("median"), None);
    }
}
