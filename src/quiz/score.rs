use crate::error::LeaderboardError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Where final session scores go. The core only hands over integers.
#[async_trait]
pub trait ScoreSink: Send + Sync {
    async fn submit(&self, player: &str, points: u32) -> Result<(), LeaderboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedScore {
    pub rank: usize,
    pub name: String,
    pub score: u32,
}

/// In-process leaderboard keeping each player's best score
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    scores: Mutex<HashMap<String, u32>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest scores first; equal scores ordered by name
    pub async fn top(&self, count: usize) -> Vec<RankedScore> {
        let scores = self.scores.lock().await;
        let mut entries: Vec<(&String, &u32)> = scores.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        entries
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(index, (name, score))| RankedScore {
                rank: index + 1,
                name: name.clone(),
                score: *score,
            })
            .collect()
    }

    pub async fn find(&self, name: &str) -> Option<RankedScore> {
        self.top(usize::MAX)
            .await
            .into_iter()
            .find(|entry| entry.name == name)
    }
}

#[async_trait]
impl ScoreSink for MemoryLeaderboard {
    async fn submit(&self, player: &str, points: u32) -> Result<(), LeaderboardError> {
        let player = player.trim();
        if player.is_empty() {
            return Err(LeaderboardError::EmptyName);
        }
        let mut scores = self.scores.lock().await;
        let best = scores.entry(player.to_string()).or_insert(points);
        if points > *best {
            *best = points;
        }
        tracing::debug!("Score for {}: {} (best {})", player, points, best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_only_the_best_score() {
        let board = MemoryLeaderboard::new();
        board.submit("anna", 7).await.unwrap();
        board.submit("anna", 3).await.unwrap();
        board.submit("anna", 9).await.unwrap();
        assert_eq!(board.find("anna").await.unwrap().score, 9);
    }

    #[tokio::test]
    async fn ranks_by_score() {
        let board = MemoryLeaderboard::new();
        board.submit("ben", 4).await.unwrap();
        board.submit("cleo", 12).await.unwrap();
        board.submit("anna", 4).await.unwrap();

        let top = board.top(2).await;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "cleo");
        let anna = RankedScore {
            rank: 2,
            name: "anna".to_string(),
            score: 4,
        };
        assert_eq!(top[1], anna);
    }

    #[tokio::test]
    async fn rejects_blank_names() {
        let board = MemoryLeaderboard::new();
        let result = board.submit("  ", 5).await;
        assert_eq!(result, Err(LeaderboardError::EmptyName));
    }
}
