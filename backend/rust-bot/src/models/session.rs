use serde::{Deserialize, Serialize};

/// Where a user is in the test-taking lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unset,
    TestSent,
    AnswersSubmitted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Unset => "unset",
            SessionState::TestSent => "test_sent",
            SessionState::AnswersSubmitted => "answers_submitted",
        }
    }
}
