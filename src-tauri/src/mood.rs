use crate::emotion::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodCounter {
    pub emotion: Emotion,
    pub count: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSnapshot {
    pub counters: Vec<MoodCounter>,
    pub dominant: Option<Emotion>,
    pub total: u32,
}

/// Tallies classified emotions over a session. One counter per non-neutral
/// emotion, never removed; mutated only through `record`.
#[derive(Debug, Clone)]
pub struct MoodAggregator {
    counters: Vec<MoodCounter>,
}

impl MoodAggregator {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            counters: Emotion::PRIORITY
                .iter()
                .map(|&emotion| MoodCounter {
                    emotion,
                    count: 0,
                    last_updated: now,
                })
                .collect(),
        }
    }

    /// Increment the matching counter. Neutral carries no signal and is
    /// never counted.
    pub fn record(&mut self, emotion: Emotion) {
        if emotion == Emotion::Neutral {
            return;
        }
        if let Some(counter) = self.counters.iter_mut().find(|c| c.emotion == emotion) {
            counter.count += 1;
            counter.last_updated = Utc::now();
        }
    }

    /// Emotion with the strictly largest count. Ties resolve to the counter
    /// that appears first in table order; all-zero yields None.
    pub fn dominant(&self) -> Option<Emotion> {
        let mut best: Option<&MoodCounter> = None;
        for counter in &self.counters {
            if counter.count > 0 && best.map_or(true, |b| counter.count > b.count) {
                best = Some(counter);
            }
        }
        best.map(|c| c.emotion)
    }

    pub fn total(&self) -> u32 {
        self.counters.iter().map(|c| c.count).sum()
    }

    pub fn snapshot(&self) -> MoodSnapshot {
        MoodSnapshot {
            counters: self.counters.clone(),
            dominant: self.dominant(),
            total: self.total(),
        }
    }
}

impl Default for MoodAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_is_never_counted() {
        let mut mood = MoodAggregator::new();
        mood.record(Emotion::Neutral);
        mood.record(Emotion::Neutral);

        assert_eq!(mood.total(), 0);
        assert_eq!(mood.dominant(), None);
    }

    #[test]
    fn test_record_increments_and_dominates() {
        let mut mood = MoodAggregator::new();
        mood.record(Emotion::Sad);
        mood.record(Emotion::Sad);

        let snapshot = mood.snapshot();
        let sad = snapshot
            .counters
            .iter()
            .find(|c| c.emotion == Emotion::Sad)
            .unwrap();
        assert_eq!(sad.count, 2);
        assert_eq!(snapshot.dominant, Some(Emotion::Sad));
        assert_eq!(snapshot.total, 2);
    }

    #[test]
    fn test_tie_resolves_to_table_order() {
        let mut mood = MoodAggregator::new();
        // Tired recorded first in time, but Happy comes first in the table
        mood.record(Emotion::Tired);
        mood.record(Emotion::Happy);

        for _ in 0..5 {
            assert_eq!(mood.dominant(), Some(Emotion::Happy));
        }
    }

    #[test]
    fn test_strictly_larger_count_wins_over_table_order() {
        let mut mood = MoodAggregator::new();
        mood.record(Emotion::Happy);
        mood.record(Emotion::Tired);
        mood.record(Emotion::Tired);

        assert_eq!(mood.dominant(), Some(Emotion::Tired));
    }

    #[test]
    fn test_counter_set_is_stable() {
        let mood = MoodAggregator::new();
        let snapshot = mood.snapshot();

        assert_eq!(snapshot.counters.len(), Emotion::PRIORITY.len());
        assert!(snapshot
            .counters
            .iter()
            .all(|c| c.emotion != Emotion::Neutral));
    }
}
