use crate::ports::TimeProvider;
use crate::scoreboard::badges::{BadgeBoard, BadgeSignal};
use crate::scoreboard::detector;
use crate::types::matches::{MatchId, MatchSnapshot};

use futures::{Stream, StreamExt};
use std::collections::HashMap;

/// Feeds match snapshots through the detector and onto a badge board.
///
/// The watcher owns the last-known snapshot of every match it has seen, so
/// the detector stays a pure function of `(prior, next)`. Where the snapshots
/// come from (push events or periodic polling) does not matter.
pub struct ScoreWatcher<T> {
    last_known: HashMap<MatchId, MatchSnapshot>,
    board: BadgeBoard<T>,
}

impl<T: TimeProvider> ScoreWatcher<T> {
    pub fn new(board: BadgeBoard<T>) -> Self {
        Self {
            last_known: HashMap::new(),
            board,
        }
    }

    pub fn board(&self) -> &BadgeBoard<T> {
        &self.board
    }

    pub fn last_known(&self, match_id: &MatchId) -> Option<&MatchSnapshot> {
        self.last_known.get(match_id)
    }

    pub fn observe(&mut self, snapshot: MatchSnapshot) -> Option<BadgeSignal> {
        let kind = detector::detect(self.last_known.get(&snapshot.id), &snapshot);
        let match_id = snapshot.id.clone();
        self.last_known.insert(match_id.clone(), snapshot);
        kind.map(|kind| self.board.raise(match_id, kind))
    }

    /// Drains `snapshots`, returning every badge raised along the way.
    pub async fn run<S>(&mut self, snapshots: S) -> Vec<BadgeSignal>
    where
        S: Stream<Item = MatchSnapshot>,
    {
        let mut raised = Vec::new();
        let mut snapshots = std::pin::pin!(snapshots);
        while let Some(snapshot) = snapshots.next().await {
            if let Some(signal) = self.observe(snapshot) {
                raised.push(signal);
            }
        }
        raised
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::scoreboard::badges::tests::TestTime;
    use crate::scoreboard::detector::{BadgeKind, ScoringSide};

    fn watcher() -> ScoreWatcher<TestTime> {
        ScoreWatcher::new(BadgeBoard::new(TestTime::new()))
    }

    #[tokio::test]
    async fn observe__should_raise_goal_for_match_42() {
        // Given
        let mut watcher = watcher();
        watcher.observe(MatchSnapshot::new("42", 1, 0, "live"));

        // When
        let signal = watcher
            .observe(MatchSnapshot::new("42", 2, 0, "live"))
            .expect("goal badge");

        // Then
        assert_eq!(signal.match_id, MatchId::new("42"));
        assert_eq!(
            signal.kind,
            BadgeKind::Goal {
                side: ScoringSide::Home
            }
        );
        assert_eq!(
            watcher.board().active(&MatchId::new("42")).expect("active").label,
            "GOAL"
        );
    }

    #[tokio::test]
    async fn observe__should_raise_reset_when_admin_resets_match() {
        // Given
        let mut watcher = watcher();
        watcher.observe(MatchSnapshot::new("42", 2, 1, "live"));

        // When
        let signal = watcher
            .observe(MatchSnapshot::new("42", 0, 0, "in programma"))
            .expect("reset badge");

        // Then
        assert_eq!(signal.kind, BadgeKind::Reset);
        assert_eq!(
            watcher.last_known(&MatchId::new("42")),
            Some(&MatchSnapshot::new("42", 0, 0, "in programma"))
        );
    }

    #[tokio::test]
    async fn run__should_compare_each_match_against_its_own_history() {
        // Given
        let mut watcher = watcher();
        let snapshots = futures::stream::iter(vec![
            MatchSnapshot::new("7", 0, 0, "in programma"),
            MatchSnapshot::new("42", 1, 1, "live 1°t"),
            MatchSnapshot::new("7", 0, 0, "live 1°t"),
            MatchSnapshot::new("42", 1, 1, "live 1°t"),
            MatchSnapshot::new("42", 1, 2, "live 1°t"),
        ]);

        // When
        let raised = watcher.run(snapshots).await;

        // Then
        let labels: Vec<(String, String)> = raised
            .into_iter()
            .map(|signal| (signal.match_id.to_string(), signal.label))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("7".to_string(), "KICK-OFF".to_string()),
                ("42".to_string(), "GOAL".to_string()),
            ]
        );
    }

    #[test]
    fn observe__should_raise_goal_outside_async_runtime() {
        // Given
        let mut watcher = watcher();
        watcher.observe(MatchSnapshot::new("42", 1, 0, "live"));

        // When
        let signal = watcher.observe(MatchSnapshot::new("42", 2, 0, "live"));

        // Then
        assert_eq!(signal.expect("goal badge").label, "GOAL");
        assert_eq!(watcher.board().snapshot().len(), 1);
    }
}
