use super::answers::{AnswerError, AnswerStore, Rating};
use super::photos::{PhotoRef, PhotoSlot, PhotoSlots};
use super::schema::QuestionBank;
use super::scoring::{percent, PillarScore, ScoreBasis, ScoringEngine};
use super::share::{decode_query, encode_query, publish, share_url, ShareSink, ShareState};
use super::trust::TrustPolicy;
use serde::Serialize;
use std::sync::Arc;

/// Derived view of a session, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSummary {
    pub pillars: Vec<PillarScore>,
    pub answered: usize,
    pub total: usize,
    pub complete: bool,
    pub photo_count: u8,
    pub trust_ratio: f64,
    pub trust_percent: u8,
    pub score_basis: ScoreBasis,
}

/// Owned state for one quiz taker: name, answers, and photo slots over a shared bank.
#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    engine: ScoringEngine,
    trust: TrustPolicy,
    display_name: Option<String>,
    answers: AnswerStore,
    photos: PhotoSlots,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>, engine: ScoringEngine, trust: TrustPolicy) -> Self {
        Self {
            bank,
            engine,
            trust,
            display_name: None,
            answers: AnswerStore::new(),
            photos: PhotoSlots::default(),
        }
    }

    /// Restore a session from a share-link query string.
    pub fn from_query(
        bank: Arc<QuestionBank>,
        engine: ScoringEngine,
        trust: TrustPolicy,
        query: &str,
    ) -> Self {
        let restored = decode_query(&bank, query);
        let mut session = Self::new(bank, engine, trust);
        session.display_name = restored.display_name;
        session.answers = restored.answers;
        tracing::debug!(
            answered = session.answers.len(),
            named = session.display_name.is_some(),
            "restored quiz session from share query"
        );
        session
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.display_name = if name.is_empty() { None } else { Some(name) };
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn set_answer(&mut self, question_id: &str, value: i64) -> Result<Rating, AnswerError> {
        self.answers.set_answer(&self.bank, question_id, value)
    }

    pub fn photos(&self) -> &PhotoSlots {
        &self.photos
    }

    /// Put an ingested photo into its slot, returning the photo it displaced.
    pub fn attach_photo(&mut self, photo: PhotoRef) -> Option<PhotoRef> {
        self.photos.replace(photo)
    }

    /// Count a slot as filled when only the slot name is known (client-side uploads).
    /// Returns `true` when the slot was empty.
    pub fn mark_photo(&mut self, slot: PhotoSlot) -> bool {
        self.photos.mark(slot)
    }

    /// Empty one photo slot, leaving the other untouched.
    pub fn remove_photo(&mut self, slot: PhotoSlot) -> bool {
        self.photos.remove(slot)
    }

    /// Drop answers and photos; the display name survives.
    pub fn clear(&mut self) {
        self.answers.clear();
        self.photos = PhotoSlots::default();
    }

    pub fn is_complete(&self) -> bool {
        self.answers.is_complete(&self.bank)
    }

    pub fn summary(&self) -> QuizSummary {
        let complete = self.is_complete();
        let photo_count = self.photos.count();
        let trust_ratio = self.trust.trust_ratio(complete, photo_count);

        QuizSummary {
            pillars: self.engine.pillar_scores(&self.bank, &self.answers),
            answered: self.answers.len(),
            total: self.bank.len(),
            complete,
            photo_count,
            trust_ratio,
            trust_percent: percent(trust_ratio),
            score_basis: self.engine.basis(),
        }
    }

    pub fn share_state(&self) -> ShareState {
        ShareState::new(self.display_name.clone(), self.answers.clone())
    }

    pub fn share_query(&self) -> String {
        encode_query(&self.bank, &self.share_state())
    }

    pub fn share_url(&self, base_url: &str) -> String {
        share_url(base_url, &self.share_query())
    }

    /// Build the link and hand it to the sink. The session is unaffected by sink failures.
    pub fn publish_share_link(&self, sink: &dyn ShareSink, base_url: &str) -> String {
        let url = self.share_url(base_url);
        publish(sink, &url);
        url
    }
}
