use super::answers::AnswerStore;
use super::schema::{QuestionBank, DISPLAY_NAME_KEY};
use serde::Serialize;
use std::collections::HashSet;
use std::num::IntErrorKind;

/// Display name plus answers, the payload carried by a share link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub answers: AnswerStore,
}

impl ShareState {
    pub fn new(display_name: Option<String>, answers: AnswerStore) -> Self {
        Self {
            display_name: display_name.filter(|name| !name.is_empty()),
            answers,
        }
    }
}

/// Encode as `application/x-www-form-urlencoded`: the name first, then answered
/// questions in bank order. Unanswered questions are omitted.
pub fn encode_query(bank: &QuestionBank, state: &ShareState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let Some(name) = state.display_name.as_deref().filter(|name| !name.is_empty()) {
        serializer.append_pair(DISPLAY_NAME_KEY, name);
    }

    for question in bank.questions() {
        if let Some(rating) = state.answers.get(question.id.as_str()) {
            serializer.append_pair(question.id.as_str(), &rating.value().to_string());
        }
    }

    serializer.finish()
}

/// Decode a share query. Only the first occurrence of a key is read, numeric
/// values are clamped into range, non-numeric values and unknown keys are dropped.
pub fn decode_query(bank: &QuestionBank, query: &str) -> ShareState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut display_name = None;
    let mut answers = AnswerStore::new();
    let mut seen = HashSet::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if !seen.insert(key.clone()) {
            continue;
        }

        if key == DISPLAY_NAME_KEY {
            display_name = Some(value.into_owned()).filter(|name| !name.is_empty());
            continue;
        }

        if !bank.contains(&key) {
            tracing::trace!(%key, "ignoring unknown share parameter");
            continue;
        }

        match parse_rating(&value) {
            Some(raw) => {
                if let Err(err) = answers.set_answer(bank, &key, raw) {
                    tracing::debug!(error = %err, "skipping share parameter");
                }
            }
            None => tracing::debug!(%key, %value, "dropping non-numeric rating"),
        }
    }

    ShareState {
        display_name,
        answers,
    }
}

fn parse_rating(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Join a base URL and an encoded query into the link handed to the user.
pub fn share_url(base_url: &str, query: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if query.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/?{query}")
    }
}

/// Destination for generated links (clipboard, address bar, terminal).
pub trait ShareSink {
    fn write(&self, url: &str) -> Result<(), ShareSinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ShareSinkError {
    #[error("share target unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Best-effort write. Failures are logged and reported as `false`, never raised.
pub fn publish(sink: &dyn ShareSink, url: &str) -> bool {
    match sink.write(url) {
        Ok(()) => {
            tracing::info!(%url, "share link published");
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to publish share link");
            false
        }
    }
}
