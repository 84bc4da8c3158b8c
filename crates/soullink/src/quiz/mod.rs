//! Compatibility quiz: question bank, answers, pillar scoring, trust ratio, and share links.
//!
//! Everything below `service` is synchronous and free of I/O. The service and router
//! wrap a shared [`QuestionBank`] so each HTTP request scores its own [`QuizSession`].

pub mod answers;
pub mod import;
pub mod photos;
pub mod router;
pub mod schema;
pub mod scoring;
pub mod service;
pub mod session;
pub mod share;
pub mod trust;

pub use answers::{AnswerError, AnswerStore, Rating};
pub use import::{QuestionBankImportError, QuestionBankImporter};
pub use photos::{
    PhotoIngest, PhotoQuality, PhotoRef, PhotoSlot, PhotoSlots, SizeHeuristicIngest, SlotFill,
    DEFAULT_MIN_PHOTO_BYTES,
};
pub use router::quiz_router;
pub use schema::{Pillar, Question, QuestionBank, QuestionId, SchemaError, DISPLAY_NAME_KEY};
pub use scoring::{percent, pillar_scores, PillarScore, ScoreBasis, ScoringEngine};
pub use service::{QuestionCatalog, QuizService, QuizServiceError, ScoreRequest, ScoreResponse};
pub use session::{QuizSession, QuizSummary};
pub use share::{
    decode_query, encode_query, publish, share_url, ShareSink, ShareSinkError, ShareState,
};
pub use trust::{trust_ratio, TrustPolicy, TRUST_CEILING};
