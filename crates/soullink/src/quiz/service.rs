use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::answers::AnswerError;
use super::photos::{PhotoIngest, PhotoRef, PhotoSlot};
use super::schema::{Pillar, Question, QuestionBank};
use super::scoring::ScoringEngine;
use super::session::{QuizSession, QuizSummary};
use super::trust::TrustPolicy;

/// Stateless facade over a question bank: every call builds a fresh session.
pub struct QuizService<I> {
    bank: Arc<QuestionBank>,
    engine: ScoringEngine,
    trust: TrustPolicy,
    ingest: Arc<I>,
    base_url: String,
}

impl<I> QuizService<I>
where
    I: PhotoIngest + 'static,
{
    pub fn new(
        bank: Arc<QuestionBank>,
        engine: ScoringEngine,
        trust: TrustPolicy,
        ingest: Arc<I>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            bank,
            engine,
            trust,
            ingest,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> QuizSession {
        QuizSession::new(self.bank.clone(), self.engine, self.trust)
    }

    pub fn catalog(&self) -> QuestionCatalog {
        let pillars = self
            .bank
            .pillars()
            .iter()
            .map(|pillar| PillarView {
                pillar: pillar.clone(),
                question_count: self.bank.questions_for(pillar).count(),
            })
            .collect();

        QuestionCatalog {
            pillars,
            questions: self.bank.questions().to_vec(),
        }
    }

    /// Score a submitted quiz state. Unknown question ids are rejected as a whole;
    /// each distinct photo slot listed counts once toward trust.
    pub fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, QuizServiceError> {
        let ScoreRequest {
            display_name,
            answers,
            photos,
        } = request;

        let mut session = self.session();
        if let Some(name) = display_name {
            session.set_display_name(name);
        }
        for (question_id, value) in &answers {
            session.set_answer(question_id, *value)?;
        }
        for slot in photos {
            session.mark_photo(slot);
        }

        Ok(self.respond(&session))
    }

    pub fn restore_session(&self, query: &str) -> QuizSession {
        QuizSession::from_query(self.bank.clone(), self.engine, self.trust, query)
    }

    /// Rebuild the state carried by a share-link query.
    pub fn restore(&self, query: &str) -> ScoreResponse {
        self.respond(&self.restore_session(query))
    }

    pub fn ingest_photo(
        &self,
        slot: PhotoSlot,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<PhotoRef, QuizServiceError> {
        require_image(content_type)?;
        if bytes.is_empty() {
            return Err(QuizServiceError::EmptyUpload(slot));
        }

        let photo = self.ingest.ingest(slot, bytes);
        tracing::info!(
            slot = ?photo.slot,
            bytes = photo.byte_len,
            quality = ?photo.quality,
            "photo ingested"
        );
        Ok(photo)
    }

    fn respond(&self, session: &QuizSession) -> ScoreResponse {
        let share_query = session.share_query();
        ScoreResponse {
            display_name: session.display_name().map(str::to_string),
            answers: session
                .answers()
                .iter()
                .map(|(id, rating)| (id.0.clone(), rating.value()))
                .collect(),
            summary: session.summary(),
            share_url: session.share_url(&self.base_url),
            share_query,
        }
    }
}

fn require_image(content_type: Option<&str>) -> Result<(), QuizServiceError> {
    let raw = content_type.ok_or(QuizServiceError::MissingContentType)?;
    let parsed: mime::Mime = raw
        .parse()
        .map_err(|_| QuizServiceError::UnsupportedMedia(raw.to_string()))?;

    if parsed.type_() == mime::IMAGE {
        Ok(())
    } else {
        Err(QuizServiceError::UnsupportedMedia(parsed.essence_str().to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, i64>,
    #[serde(default)]
    pub photos: Vec<PhotoSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub answers: BTreeMap<String, u8>,
    pub summary: QuizSummary,
    pub share_query: String,
    pub share_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PillarView {
    pub pillar: Pillar,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionCatalog {
    pub pillars: Vec<PillarView>,
    pub questions: Vec<Question>,
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error("photo upload is missing a content type")]
    MissingContentType,
    #[error("photo uploads must be images, got '{0}'")]
    UnsupportedMedia(String),
    #[error("photo upload for slot {0:?} is empty")]
    EmptyUpload(PhotoSlot),
}
