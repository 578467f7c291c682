use serde::{Deserialize, Serialize};

/// Seconds between phase flips: 4s inhale, 4s exhale.
pub const PHASE_INTERVAL_SECS: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingPhase {
    Inhale,
    Exhale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingStatus {
    Idle,
    Running,
}

/// Toggle-driven breathing exercise. The machine only moves when `tick` is
/// called (one interval elapsed), so time is simulated in tests instead of
/// waited on. Restarting always resets; a stopped session never resumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreathingSession {
    pub status: BreathingStatus,
    pub phase: BreathingPhase,
    pub cycle_count: u32,
    /// Bumped on every start/stop so a ticker task spawned for an earlier
    /// run can tell it is stale.
    #[serde(skip)]
    pub generation: u64,
}

impl BreathingSession {
    pub fn new() -> Self {
        Self {
            status: BreathingStatus::Idle,
            phase: BreathingPhase::Inhale,
            cycle_count: 0,
            generation: 0,
        }
    }

    pub fn start(&mut self) {
        self.status = BreathingStatus::Running;
        self.phase = BreathingPhase::Inhale;
        self.cycle_count = 0;
        self.generation += 1;
    }

    /// Halts immediately; no further phase flips until restarted.
    pub fn stop(&mut self) {
        self.status = BreathingStatus::Idle;
        self.generation += 1;
    }

    /// Flip between running and idle. Returns true when now running.
    pub fn toggle(&mut self) -> bool {
        match self.status {
            BreathingStatus::Running => {
                self.stop();
                false
            }
            BreathingStatus::Idle => {
                self.start();
                true
            }
        }
    }

    /// One interval elapsed: flip the phase and advance the cycle counter.
    /// Ignored while idle.
    pub fn tick(&mut self) {
        if self.status != BreathingStatus::Running {
            return;
        }
        self.phase = match self.phase {
            BreathingPhase::Inhale => BreathingPhase::Exhale,
            BreathingPhase::Exhale => BreathingPhase::Inhale,
        };
        self.cycle_count += 1;
    }

    /// Displayed breath number; a full breath is one inhale+exhale pair.
    pub fn breath_number(&self) -> u32 {
        self.cycle_count / 2 + 1
    }
}

impl Default for BreathingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle_on_inhale() {
        let session = BreathingSession::new();
        assert_eq!(session.status, BreathingStatus::Idle);
        assert_eq!(session.phase, BreathingPhase::Inhale);
        assert_eq!(session.cycle_count, 0);
    }

    #[test]
    fn test_tick_flips_phase_and_counts() {
        let mut session = BreathingSession::new();
        session.start();

        session.tick();
        assert_eq!(session.phase, BreathingPhase::Exhale);
        assert_eq!(session.cycle_count, 1);

        session.tick();
        assert_eq!(session.phase, BreathingPhase::Inhale);
        assert_eq!(session.cycle_count, 2);
    }

    #[test]
    fn test_tick_ignored_while_idle() {
        let mut session = BreathingSession::new();
        session.tick();
        assert_eq!(session.cycle_count, 0);

        session.start();
        session.tick();
        session.stop();
        session.tick();
        assert_eq!(session.cycle_count, 1);
    }

    #[test]
    fn test_restart_resets_instead_of_resuming() {
        let mut session = BreathingSession::new();
        session.start();
        session.tick();
        session.tick();
        session.tick();
        session.stop();

        session.start();
        assert_eq!(session.phase, BreathingPhase::Inhale);
        assert_eq!(session.cycle_count, 0);
    }

    #[test]
    fn test_breath_number_counts_pairs() {
        let mut session = BreathingSession::new();
        session.start();
        assert_eq!(session.breath_number(), 1);

        session.tick(); // exhale, count 1
        assert_eq!(session.breath_number(), 1);

        session.tick(); // inhale, count 2
        assert_eq!(session.breath_number(), 2);

        session.tick();
        session.tick();
        assert_eq!(session.breath_number(), 3);
    }

    #[test]
    fn test_generation_invalidates_old_tickers() {
        let mut session = BreathingSession::new();
        session.start();
        let first_run = session.generation;

        session.stop();
        session.start();
        assert_ne!(session.generation, first_run);
    }
}
