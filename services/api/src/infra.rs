use metrics_exporter_prometheus::PrometheusHandle;
use soullink::config::QuizConfig;
use soullink::error::AppError;
use soullink::quiz::{
    PhotoSlot, QuestionBank, QuestionBankImporter, QuizService, ScoringEngine, ShareSink,
    ShareSinkError, SizeHeuristicIngest,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type DefaultQuizService = QuizService<SizeHeuristicIngest>;

/// Configured CSV bank when present, the built-in bank otherwise.
pub(crate) fn load_question_bank(config: &QuizConfig) -> Result<QuestionBank, AppError> {
    match &config.question_bank {
        Some(path) => {
            let bank = QuestionBankImporter::from_path(path)?;
            tracing::info!(
                path = %path.display(),
                questions = bank.len(),
                pillars = bank.pillars().len(),
                "loaded question bank"
            );
            Ok(bank)
        }
        None => Ok(QuestionBank::standard()),
    }
}

pub(crate) fn build_quiz_service(config: &QuizConfig) -> Result<DefaultQuizService, AppError> {
    let bank = load_question_bank(config)?;
    Ok(QuizService::new(
        Arc::new(bank),
        ScoringEngine::new(config.score_basis),
        config.trust,
        Arc::new(SizeHeuristicIngest::new(config.photo_min_bytes)),
        config.base_url.clone(),
    ))
}

/// Terminal stand-in for the clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StdoutShareSink;

impl ShareSink for StdoutShareSink {
    fn write(&self, url: &str) -> Result<(), ShareSinkError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Share link: {url}")?;
        stdout.flush()?;
        Ok(())
    }
}

pub(crate) fn parse_answer(raw: &str) -> Result<(String, i64), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("failed to parse rating in '{raw}' ({err})"))?;
    Ok((id.to_string(), value))
}

pub(crate) fn parse_photo(raw: &str) -> Result<(PhotoSlot, PathBuf), String> {
    let (slot, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected slot=path, got '{raw}'"))?;
    let slot = PhotoSlot::parse(slot)
        .ok_or_else(|| format!("unknown photo slot '{}' (front or side)", slot.trim()))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing photo path in '{raw}'"));
    }
    Ok((slot, PathBuf::from(path)))
}
