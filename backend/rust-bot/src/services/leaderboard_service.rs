use std::fmt::Write as _;

use crate::models::StatsMap;

use super::scoring_service::percentage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub name: String,
    pub total: u32,
    pub percentage: u32,
}

/// Ranks users by total correct answers, best first. Ties keep the store
/// order (ascending user id).
pub fn rank(stats: &StatsMap, total_questions: usize) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = stats
        .iter()
        .map(|(user_id, record)| {
            let total = record.total_correct();
            LeaderboardEntry {
                user_id: user_id.clone(),
                name: record.display_name(),
                total,
                percentage: percentage(total as usize, total_questions),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}

pub fn render(stats: &StatsMap, total_questions: usize) -> String {
    let mut out = String::from("Leaderboard:\n");
    let entries = rank(stats, total_questions);

    if entries.is_empty() {
        out.push_str("No results yet.\n");
        return out;
    }

    for entry in entries {
        let _ = writeln!(
            out,
            "{}: {} correct ({}%)",
            entry.name, entry.total, entry.percentage
        );
    }
    out
}
