use crate::infra::{build_quiz_service, parse_answer, parse_photo, DefaultQuizService, StdoutShareSink};
use clap::Args;
use soullink::config::{AppConfig, QuizConfig};
use soullink::error::AppError;
use soullink::quiz::{PhotoSlot, QuizSession, QuizSummary};
use std::path::PathBuf;

const BAR_WIDTH: usize = 20;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Share-link query to restore, e.g. "u=Alex&q1=5&q3=2"
    #[arg(long, default_value = "")]
    pub(crate) query: String,
    /// Photo to attach as slot=path (front or side); repeatable
    #[arg(long = "photo", value_parser = parse_photo)]
    pub(crate) photos: Vec<(PhotoSlot, PathBuf)>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LinkArgs {
    /// Display name carried in the link
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Answer as id=value; values outside 1..=5 are clamped
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) answers: Vec<(String, i64)>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Display name for the sample quiz taker
    #[arg(long, default_value = "Alex")]
    pub(crate) name: String,
    /// Leave the last pillar unanswered to show a partial scan
    #[arg(long)]
    pub(crate) partial: bool,
}

fn load_quiz_config() -> Result<QuizConfig, AppError> {
    Ok(AppConfig::load()?.quiz)
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let service = build_quiz_service(&load_quiz_config()?)?;
    let catalog = service.catalog();

    println!(
        "Question bank: {} questions across {} pillars",
        catalog.questions.len(),
        catalog.pillars.len()
    );
    for view in &catalog.pillars {
        println!("\n{} ({} questions)", view.pillar, view.question_count);
        for question in catalog
            .questions
            .iter()
            .filter(|question| question.pillar == view.pillar)
        {
            match &question.hint {
                Some(hint) => println!("  [{}] {} ({})", question.id, question.text, hint),
                None => println!("  [{}] {}", question.id, question.text),
            }
        }
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { query, photos } = args;
    let service = build_quiz_service(&load_quiz_config()?)?;

    let mut session = service.restore_session(&query);
    attach_photo_files(&service, &mut session, photos)?;

    render_session(&session);
    println!("\nShare link: {}", session.share_url(service.base_url()));
    Ok(())
}

pub(crate) fn run_link(args: LinkArgs) -> Result<(), AppError> {
    let LinkArgs { name, answers } = args;
    let service = build_quiz_service(&load_quiz_config()?)?;

    let mut session = service.session();
    if let Some(name) = name {
        session.set_display_name(name);
    }
    for (question_id, value) in answers {
        session
            .set_answer(&question_id, value)
            .map_err(|err| AppError::Quiz(err.into()))?;
    }

    session.publish_share_link(&StdoutShareSink, service.base_url());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { name, partial } = args;
    let service = build_quiz_service(&load_quiz_config()?)?;

    println!("SoulLink compatibility scan demo");
    let mut session = service.session();
    session.set_display_name(name);

    let pillars = session.bank().pillars().to_vec();
    let skipped = if partial { pillars.last().cloned() } else { None };
    let answers: Vec<(String, i64)> = session
        .bank()
        .questions()
        .iter()
        .enumerate()
        .filter(|(_, question)| Some(&question.pillar) != skipped.as_ref())
        .map(|(position, question)| (question.id.0.clone(), sample_rating(position)))
        .collect();
    for (question_id, value) in answers {
        session
            .set_answer(&question_id, value)
            .map_err(|err| AppError::Quiz(err.into()))?;
    }

    println!("\nBefore photos:");
    render_session(&session);

    for (slot, byte_len) in [(PhotoSlot::Front, 72_000usize), (PhotoSlot::Side, 12_000)] {
        let photo = service.ingest_photo(slot, Some("image/jpeg"), &vec![0u8; byte_len])?;
        println!(
            "\n{}: {} bytes -> {}",
            slot.label(),
            photo.byte_len,
            photo.quality.message()
        );
        session.attach_photo(photo);
    }

    println!("\nAfter photos:");
    render_session(&session);

    println!();
    session.publish_share_link(&StdoutShareSink, service.base_url());
    Ok(())
}

fn sample_rating(position: usize) -> i64 {
    [5, 4, 4, 3, 5][position % 5]
}

fn attach_photo_files(
    service: &DefaultQuizService,
    session: &mut QuizSession,
    photos: Vec<(PhotoSlot, PathBuf)>,
) -> Result<(), AppError> {
    for (slot, path) in photos {
        let bytes = std::fs::read(&path)?;
        let content_type = mime_guess::from_path(&path).first_raw();
        let photo = service.ingest_photo(slot, content_type, &bytes)?;
        println!(
            "{} ({}): {}",
            slot.label(),
            path.display(),
            photo.quality.message()
        );
        if session.attach_photo(photo).is_some() {
            println!("  replaced the earlier {} photo", slot.label());
        }
    }
    Ok(())
}

pub(crate) fn render_session(session: &QuizSession) {
    if let Some(name) = session.display_name() {
        println!("Results for {name}");
    }
    render_summary(&session.summary());
}

pub(crate) fn render_summary(summary: &QuizSummary) {
    println!(
        "Answered {}/{} questions{}",
        summary.answered,
        summary.total,
        if summary.complete { " (complete)" } else { "" }
    );
    for pillar in &summary.pillars {
        println!(
            "  {:<12} {} {:>3}% ({}/{} answered)",
            pillar.pillar.name(),
            bar(pillar.percent),
            pillar.percent,
            pillar.answered,
            pillar.total
        );
    }
    println!(
        "Trust ratio: {}% ({} photo{})",
        summary.trust_percent,
        summary.photo_count,
        if summary.photo_count == 1 { "" } else { "s" }
    );
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_with_percent() {
        assert_eq!(bar(0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(100), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(50).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn sample_ratings_stay_in_range() {
        assert!((0..30).map(sample_rating).all(|value| (1..=5).contains(&value)));
    }
}
