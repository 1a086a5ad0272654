use std::path::PathBuf;
use std::sync::Arc;

use crate::error::BotError;
use crate::metrics::{COMMANDS_TOTAL, SUBMISSIONS_TOTAL};
use crate::models::{
    Message, Mistake, Reply, ReplyKeyboardMarkup, ScoreReport, SessionState, User,
};

use super::answer_key_service::AnswerKey;
use super::export_service::StatsExporter;
use super::leaderboard_service;
use super::scoring_service::{evaluate, split_submission};
use super::session_service::SessionStateTracker;
use super::stats_service::{AttemptRecording, UserStatsStore};

pub const GREETING: &str = "Hello! I am your test-checking bot.";
pub const RECOMMENDATIONS: &str = "Set aside 1 hour to solve the test.\n\
     Send your answers in lower case without spaces.\n\
     Example: abcdeabcdeabcdeabcdeabcdeabcde";
pub const WRONG_LENGTH: &str =
    "Wrong number of answers. Please check them and send again.";
pub const ALREADY_SUBMITTED: &str =
    "You have already submitted your answers. Please use the commands.";
pub const GENERIC_FAILURE: &str = "An error occurred while processing your message.";

/// Commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    GetTest,
    ShowStats,
}

impl Command {
    /// Parses the leading `/command` (optionally `/command@bot_name`).
    /// Returns `Ok(None)` for plain text and `Err(name)` for unknown commands.
    pub fn parse(text: &str) -> Result<Option<Self>, String> {
        let Some(token) = text.split_whitespace().next() else {
            return Ok(None);
        };
        let Some(name) = token.strip_prefix('/') else {
            return Ok(None);
        };
        let name = name.split('@').next().unwrap_or(name);

        match name {
            "start" => Ok(Some(Command::Start)),
            "get_test" => Ok(Some(Command::GetTest)),
            "show_stats" => Ok(Some(Command::ShowStats)),
            other => Err(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::GetTest => "get_test",
            Command::ShowStats => "show_stats",
        }
    }
}

/// Handlers for every inbound event. Replies are returned, not sent.
pub struct BotService {
    answer_key: Arc<AnswerKey>,
    stats: Arc<UserStatsStore>,
    sessions: Arc<SessionStateTracker>,
    exporter: StatsExporter,
    test_images: Vec<PathBuf>,
}

impl BotService {
    pub fn new(
        answer_key: Arc<AnswerKey>,
        stats: Arc<UserStatsStore>,
        sessions: Arc<SessionStateTracker>,
        exporter: StatsExporter,
        test_images: Vec<PathBuf>,
    ) -> Self {
        Self {
            answer_key,
            stats,
            sessions,
            exporter,
            test_images,
        }
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    pub fn sessions(&self) -> &SessionStateTracker {
        &self.sessions
    }

    pub fn stats(&self) -> &UserStatsStore {
        &self.stats
    }

    /// Routes one inbound message to its handler.
    pub async fn dispatch(&self, message: &Message) -> Result<Vec<Reply>, BotError> {
        let Some(text) = message.text.as_deref() else {
            tracing::debug!("Ignoring non-text message {}", message.message_id);
            return Ok(Vec::new());
        };
        let user = message
            .from
            .as_ref()
            .ok_or(BotError::MissingSender(message.message_id))?;

        match Command::parse(text) {
            Ok(Some(command)) => {
                tracing::info!("Command /{} from user {}", command.as_str(), user.id);
                COMMANDS_TOTAL.with_label_values(&[command.as_str()]).inc();
                Ok(match command {
                    Command::Start => self.start(),
                    Command::GetTest => self.send_test(user).await,
                    Command::ShowStats => self.show_stats().await,
                })
            }
            Ok(None) => Ok(self.handle_message(user, text).await),
            Err(unknown) => {
                tracing::debug!("Ignoring unknown command /{} from user {}", unknown, user.id);
                Ok(Vec::new())
            }
        }
    }

    pub fn start(&self) -> Vec<Reply> {
        vec![Reply::with_keyboard(
            GREETING,
            ReplyKeyboardMarkup::single_column(&["/get_test", "/show_stats"]),
        )]
    }

    pub async fn send_test(&self, user: &User) -> Vec<Reply> {
        self.sessions.mark(user.id, SessionState::TestSent).await;

        let mut replies: Vec<Reply> = self
            .test_images
            .iter()
            .cloned()
            .map(Reply::Photo)
            .collect();
        replies.push(Reply::text(RECOMMENDATIONS));
        replies
    }

    pub async fn show_stats(&self) -> Vec<Reply> {
        let stats = self.stats.load().await;
        vec![Reply::text(leaderboard_service::render(
            &stats,
            self.answer_key.len(),
        ))]
    }

    /// Free text: blocked once the user has submitted, scored otherwise.
    pub async fn handle_message(&self, user: &User, text: &str) -> Vec<Reply> {
        if self.sessions.has_submitted(user.id).await {
            SUBMISSIONS_TOTAL.with_label_values(&["blocked"]).inc();
            return vec![Reply::text(ALREADY_SUBMITTED)];
        }
        self.submit_answers(user, text).await
    }

    pub async fn submit_answers(&self, user: &User, text: &str) -> Vec<Reply> {
        if self.sessions.get(user.id).await == SessionState::Unset {
            tracing::info!("User {} submitted answers without requesting the test", user.id);
        }

        let submission = split_submission(text);
        let Some(report) = evaluate(&submission, &self.answer_key) else {
            tracing::warn!(
                "Wrong number of answers from user {}: got {}, expected {}",
                user.id,
                submission.len(),
                self.answer_key.len()
            );
            SUBMISSIONS_TOTAL.with_label_values(&["wrong_length"]).inc();
            return vec![Reply::text(WRONG_LENGTH)];
        };

        tracing::info!(
            "User {} scored {}/{} ({}%)",
            user.id,
            report.correct,
            report.total,
            report.percentage
        );
        SUBMISSIONS_TOTAL.with_label_values(&["scored"]).inc();

        let recording = self
            .stats
            .record_first_attempt(
                user.id,
                &user.first_name,
                user.last_name.as_deref(),
                report.correct as u32,
            )
            .await;
        if recording == AttemptRecording::Recorded {
            self.exporter.export(self.stats.load().await).await;
        }

        self.sessions
            .mark(user.id, SessionState::AnswersSubmitted)
            .await;

        vec![Reply::text(format_report(&report))]
    }
}

pub fn format_report(report: &ScoreReport) -> String {
    format!(
        "Correct answers: {}/{} ({}%)\nMistakes: {}",
        report.correct,
        report.total,
        report.percentage,
        format_mistakes(&report.mistakes)
    )
}

fn format_mistakes(mistakes: &[Mistake]) -> String {
    if mistakes.is_empty() {
        return "none".to_string();
    }
    mistakes
        .iter()
        .map(|m| format!("#{} ({})", m.position, m.submitted))
        .collect::<Vec<_>>()
        .join(", ")
}
