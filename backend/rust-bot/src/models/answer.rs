use serde::{Deserialize, Serialize};

/// On-disk shape of `answers.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerKeyDocument {
    #[serde(default)]
    pub answers: Vec<String>,
}

/// A wrong position in a submission: 1-based index and the character sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mistake {
    pub position: usize,
    pub submitted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub mistakes: Vec<Mistake>,
}
