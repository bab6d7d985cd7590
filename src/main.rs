use gesture_quiz::common::Vocabulary;
use gesture_quiz::error::AppError;
use gesture_quiz::intake::{RecordedLandmarks, Recording, TemplateClassifier};
use gesture_quiz::quiz::{ChallengeSession, MemoryLeaderboard, QuizEvent};
use gesture_quiz::{CoordinatorBuilder, PipelineFactory, Settings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

const PLAYER: &str = "trainee";

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let (Some(recording_path), Some(templates_path)) = (args.next(), args.next()) else {
        return Err(AppError::Coordinator(
            "usage: gesture-quiz <recording.jsonl> <templates.json> [settings.toml]".to_string(),
        ));
    };
    let settings = Settings::load(args.next().as_deref())?;

    let recording = Recording::load(&recording_path)?;
    tracing::info!(
        "Loaded {} frames from {}",
        recording.len(),
        recording_path.display()
    );

    let vocabulary = Vocabulary::new(settings.quiz.vocabulary.iter().cloned());
    let feature_length = settings.pipeline.feature_length;
    let classifier = TemplateClassifier::load(&templates_path, &vocabulary, feature_length)?;

    let classifier = Box::new(classifier);
    let (processor, shared) =
        PipelineFactory::create_session(&settings, RecordedLandmarks, classifier)?;

    let board = Arc::new(MemoryLeaderboard::new());
    let mut session = ChallengeSession::new(shared, &settings.quiz, PLAYER, board.clone())?;
    session.begin()?;
    tracing::info!("First challenge: {}", session.current_target());

    let (mut coordinator, mut events) = CoordinatorBuilder::new(settings.quiz.clone())
        .frames(recording.into_frames())
        .handler(Box::new(processor))
        .session(session)
        .build()?;

    let listener = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                QuizEvent::Progress(progress) => tracing::debug!(
                    "{} | {} | {:.0}%",
                    progress.target,
                    progress.label,
                    progress.display * 100.0
                ),
                QuizEvent::Completed(outcome) => tracing::info!(
                    "Completed {} at {}: +{} (total {})",
                    outcome.target,
                    outcome.completed_at.format("%H:%M:%S"),
                    outcome.reward,
                    outcome.total_points
                ),
                QuizEvent::Failed(reason) => tracing::error!("Quiz error: {}", reason),
            }
        }
    });

    let summary = coordinator.join_producer().await?;
    tracing::info!("Replay finished after {} frames", summary.frames);

    let points = coordinator.shutdown().await?;
    let _ = listener.await;
    tracing::info!("Final score: {}", points);

    for entry in board.top(10).await {
        println!("{:>2}. {:<16} {}", entry.rank, entry.name, entry.score);
    }
    Ok(())
}
