//! Trigger state machine - turns a continuously changing observation into discrete,
//! rate-limited narration triggers.
//!
//! Each tick:
//! 1. **Cooldown**: the cooldown timer runs down regardless of what is observed
//! 2. **Stability**: a changed (label, situation) pair restarts the stability timer,
//!    an unchanged pair accumulates time
//! 3. **Gate**: fire only when stable long enough, the cooldown has elapsed, and the
//!    key differs from the last one that fired

mod key;

pub use key::*;

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::observation::{Observation, Situation};

/// The stability + cooldown gate.
#[derive(Debug, Clone)]
pub struct TriggerStateMachine {
    stable_duration: f32,
    cooldown_duration: f32,

    /// The (label, situation) pair seen on the previous tick.
    previous: Option<(Option<String>, Situation)>,

    /// Time the previous pair has remained unchanged.
    stability_elapsed: f32,

    /// Time left before another trigger may fire.
    cooldown_remaining: f32,

    last_fired: Option<TriggerKey>,
}

impl TriggerStateMachine {
    /// Create an idle state machine using the config's timings.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            stable_duration: config.stable_duration_secs.max(0.0),
            cooldown_duration: config.cooldown_secs.max(0.0),
            previous: None,
            stability_elapsed: 0.0,
            cooldown_remaining: 0.0,
            last_fired: None,
        }
    }

    /// Advance by `dt` seconds with this tick's observation.
    ///
    /// Returns `true` when a narration trigger fires.
    pub fn update(&mut self, dt: f32, observation: &Observation) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);

        let current = (observation.label.clone(), observation.situation);
        if self.previous.as_ref() != Some(&current) {
            debug!(
                label = ?current.0,
                situation = %current.1,
                "observation changed, restarting stability timer"
            );
            self.previous = Some(current);
            self.stability_elapsed = 0.0;
            return false;
        }

        self.stability_elapsed += dt;

        let Some(key) = TriggerKey::of(observation) else {
            return false;
        };
        if self.stability_elapsed < self.stable_duration || self.cooldown_remaining > 0.0 {
            return false;
        }
        if self.last_fired.as_ref() == Some(&key) {
            return false;
        }

        info!(key = %key, stable_for = self.stability_elapsed, "narration trigger fired");
        self.cooldown_remaining = self.cooldown_duration;
        self.last_fired = Some(key);
        true
    }

    /// Return to `Idle`, forgetting timers and keys.
    pub fn reset(&mut self) {
        self.previous = None;
        self.stability_elapsed = 0.0;
        self.cooldown_remaining = 0.0;
        self.last_fired = None;
    }

    /// Get the current phase.
    pub fn phase(&self) -> TriggerPhase {
        if self.previous.is_none() {
            TriggerPhase::Idle
        } else if self.cooldown_remaining > 0.0 {
            TriggerPhase::Triggered
        } else {
            TriggerPhase::Observing
        }
    }

    /// Get the seconds the current pair has been held.
    pub fn stability_elapsed(&self) -> f32 {
        self.stability_elapsed
    }

    /// Get the seconds left before another trigger may fire.
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Key of the most recent trigger.
    pub fn last_fired(&self) -> Option<&TriggerKey> {
        self.last_fired.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use mark_rules::{Mark, Sector};

    fn near(label: &str) -> Observation {
        let mark = Mark::new(label, Vec3::ZERO, Vec3::ONE);
        Observation::of_mark(&mark, Situation::Near, Sector::Forward)
    }

    fn inside(label: &str) -> Observation {
        let mark = Mark::new(label, Vec3::ZERO, Vec3::ONE);
        Observation::of_mark(&mark, Situation::Inside, Sector::Here)
    }

    fn machine() -> TriggerStateMachine {
        TriggerStateMachine::new(&SimulationConfig {
            stable_duration_secs: 3.0,
            cooldown_secs: 10.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_fires_after_stable_duration() {
        let mut sm = machine();
        let obs = near("Fountain");

        // The state first appears at t=0.
        assert!(!sm.update(0.0, &obs));
        assert_eq!(sm.phase(), TriggerPhase::Observing);

        assert!(!sm.update(1.0, &obs)); // t=1
        assert!(!sm.update(1.0, &obs)); // t=2
        assert!(sm.update(1.0, &obs)); // t=3
        assert_eq!(sm.phase(), TriggerPhase::Triggered);
        assert_eq!(sm.last_fired(), Some(&TriggerKey::new("Fountain", Situation::Near)));

        // Same state keeps holding: no re-fire.
        assert!(!sm.update(1.0, &obs)); // t=4
    }

    #[test]
    fn test_cooldown_blocks_every_label() {
        let mut sm = machine();
        let a = near("A");
        let b = near("B");

        sm.update(0.0, &a);
        for _ in 0..2 {
            assert!(!sm.update(1.0, &a));
        }
        assert!(sm.update(1.0, &a)); // t=3
        assert!(!sm.update(1.0, &a)); // t=4

        // B appears at t=5 and is stable from t=8, but the cooldown runs until t=13.
        assert!(!sm.update(1.0, &b)); // t=5
        for t in 6..13 {
            assert!(!sm.update(1.0, &b), "fired early at t={}", t);
        }
        assert!(sm.update(1.0, &b)); // t=13
        assert_eq!(sm.last_fired(), Some(&TriggerKey::new("B", Situation::Near)));
    }

    #[test]
    fn test_situation_change_is_a_new_key() {
        let mut sm = TriggerStateMachine::new(&SimulationConfig {
            stable_duration_secs: 1.0,
            cooldown_secs: 0.0,
            ..Default::default()
        });

        sm.update(0.0, &near("Gate"));
        assert!(sm.update(1.0, &near("Gate")));

        assert!(!sm.update(1.0, &inside("Gate")));
        assert!(sm.update(1.0, &inside("Gate")));
        assert_eq!(sm.last_fired(), Some(&TriggerKey::new("Gate", Situation::Inside)));
    }

    #[test]
    fn test_nothing_nearby_never_fires() {
        let mut sm = TriggerStateMachine::new(&SimulationConfig {
            stable_duration_secs: 0.5,
            cooldown_secs: 0.0,
            ..Default::default()
        });
        let nothing = Observation::nothing();

        for _ in 0..20 {
            assert!(!sm.update(1.0, &nothing));
        }
        assert!(sm.last_fired().is_none());
    }

    #[test]
    fn test_nothing_nearby_does_not_rearm_or_block() {
        let mut sm = TriggerStateMachine::new(&SimulationConfig {
            stable_duration_secs: 1.0,
            cooldown_secs: 0.0,
            ..Default::default()
        });

        sm.update(0.0, &near("A"));
        assert!(sm.update(1.0, &near("A")));

        // Wander off and come back: the same key stays spent.
        sm.update(1.0, &Observation::nothing());
        sm.update(1.0, &Observation::nothing());
        sm.update(1.0, &near("A"));
        assert!(!sm.update(1.0, &near("A")));

        // A different mark still fires.
        sm.update(1.0, &near("B"));
        assert!(sm.update(1.0, &near("B")));
    }

    #[test]
    fn test_reset_forgets_accumulated_stability() {
        let mut sm = machine();
        let obs = near("Fountain");

        sm.update(0.0, &obs);
        sm.update(2.9, &obs);
        assert!((sm.stability_elapsed() - 2.9).abs() < 1e-6);

        sm.reset();
        assert_eq!(sm.phase(), TriggerPhase::Idle);
        assert_eq!(sm.stability_elapsed(), 0.0);

        // After reset the first tick only records the pair.
        assert!(!sm.update(0.2, &obs));
        assert!(!sm.update(0.2, &obs));
        assert!(sm.stability_elapsed() < 3.0);
    }

    #[test]
    fn test_invalid_delta_is_ignored() {
        let mut sm = machine();
        let obs = near("A");

        sm.update(0.0, &obs);
        sm.update(f32::NAN, &obs);
        sm.update(-5.0, &obs);
        assert_eq!(sm.stability_elapsed(), 0.0);
    }
}
