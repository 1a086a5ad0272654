use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::metrics::KNOWN_USERS;
use crate::models::{SessionState, UserId};

/// In-memory lifecycle marker per user. Nothing is ever evicted, so the map
/// grows with the number of distinct users until the process restarts.
#[derive(Debug, Default)]
pub struct SessionStateTracker {
    states: RwLock<HashMap<UserId, SessionState>>,
}

impl SessionStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark(&self, user_id: UserId, state: SessionState) {
        let mut states = self.states.write().await;
        let previous = states.insert(user_id, state);
        if previous.is_none() {
            KNOWN_USERS.set(states.len() as i64);
        }

        tracing::debug!(
            "Session state for user {}: {} -> {}",
            user_id,
            previous.unwrap_or_default().as_str(),
            state.as_str()
        );
    }

    pub async fn get(&self, user_id: UserId) -> SessionState {
        self.states
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    /// True when free text from this user must not be scored again.
    pub async fn has_submitted(&self, user_id: UserId) -> bool {
        self.get(user_id).await == SessionState::AnswersSubmitted
    }

    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_is_unset() {
        let tracker = SessionStateTracker::new();
        assert_eq!(tracker.get(UserId(1)).await, SessionState::Unset);
        assert!(tracker.is_empty().await);
    }

    #[tokio::test]
    async fn mark_overwrites_unconditionally() {
        let tracker = SessionStateTracker::new();
        let user = UserId(7);

        tracker.mark(user, SessionState::AnswersSubmitted).await;
        assert!(tracker.has_submitted(user).await);

        tracker.mark(user, SessionState::TestSent).await;
        assert_eq!(tracker.get(user).await, SessionState::TestSent);
        assert!(!tracker.has_submitted(user).await);
        assert_eq!(tracker.len().await, 1);
    }

    #[tokio::test]
    async fn users_are_tracked_independently() {
        let tracker = SessionStateTracker::new();
        tracker.mark(UserId(1), SessionState::TestSent).await;
        tracker.mark(UserId(2), SessionState::AnswersSubmitted).await;

        assert_eq!(tracker.get(UserId(1)).await, SessionState::TestSent);
        assert!(tracker.has_submitted(UserId(2)).await);
        assert_eq!(tracker.get(UserId(3)).await, SessionState::Unset);
    }
}
