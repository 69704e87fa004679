//! Simulation driver - one call per host frame.
//!
//! The host owns the loop and the mode switch. While inactive the simulation is inert;
//! every mode transition returns the trigger state machine to `Idle`.

use mark_rules::Mark;
use tracing::info;

use crate::config::SimulationConfig;
use crate::events::{NarrationRequest, NarrationSink};
use crate::observation::{observe, Observation, Probe};
use crate::prompt::PromptBuilder;
use crate::trigger::{TriggerPhase, TriggerStateMachine};

/// Runs observation and triggering for a moving probe.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    trigger: TriggerStateMachine,
    prompts: PromptBuilder,
    active: bool,
    last_observation: Option<Observation>,
}

impl Simulation {
    /// Create an inactive simulation.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            trigger: TriggerStateMachine::new(&config),
            prompts: PromptBuilder::new(&config),
            config,
            active: false,
            last_observation: None,
        }
    }

    /// Create an inactive simulation with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SimulationConfig::default())
    }

    /// Mode signal from the host. Entering or leaving simulation starts over from `Idle`.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.trigger.reset();
        self.last_observation = None;
        self.active = active;
        if active {
            info!(
                stable_duration_secs = self.config.stable_duration_secs,
                cooldown_secs = self.config.cooldown_secs,
                "simulation mode entered"
            );
        } else {
            info!("simulation mode left");
        }
    }

    /// Check whether simulation mode is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Evaluate one tick. Returns a request when a narration trigger fires.
    pub fn tick<'a, I>(&mut self, dt: f32, probe: &Probe, candidates: I) -> Option<NarrationRequest>
    where
        I: IntoIterator<Item = &'a Mark>,
    {
        if !self.active {
            return None;
        }

        let observation = observe(probe, candidates);
        let request = if self.trigger.update(dt, &observation) {
            let prompt = self.prompts.build(&observation);
            NarrationRequest::from_observation(&observation, prompt)
        } else {
            None
        };

        self.last_observation = Some(observation);
        request
    }

    /// Evaluate one tick and hand any fired request to `sink`.
    ///
    /// Returns whether a request was emitted.
    pub fn tick_into<'a, I, S>(&mut self, dt: f32, probe: &Probe, candidates: I, sink: &mut S) -> bool
    where
        I: IntoIterator<Item = &'a Mark>,
        S: NarrationSink + ?Sized,
    {
        match self.tick(dt, probe, candidates) {
            Some(request) => {
                sink.narrate(request);
                true
            }
            None => false,
        }
    }

    /// The observation from the most recent active tick.
    pub fn last_observation(&self) -> Option<&Observation> {
        self.last_observation.as_ref()
    }

    /// Text to display for the current state, including "No mark nearby.".
    pub fn current_message(&self) -> Option<String> {
        self.last_observation.as_ref().map(Observation::message)
    }

    /// Get the current trigger phase.
    pub fn phase(&self) -> TriggerPhase {
        self.trigger.phase()
    }

    /// Get the trigger state machine.
    pub fn trigger(&self) -> &TriggerStateMachine {
        &self.trigger
    }

    /// Get the active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::observation::Situation;
    use glam::Vec3;
    use mark_rules::{MarkStore, Sector};

    fn store() -> MarkStore {
        let mut store = MarkStore::new();
        store
            .save(
                Mark::new("Fountain", Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 2.0, 4.0))
                    .with_margin(2.0)
                    .with_angles(-180.0, 180.0)
                    .with_keyword("fountain")
                    .with_details("A marble fountain with three tiers."),
            )
            .unwrap();
        store
            .save(
                Mark::new("Library", Vec3::new(20.0, 1.0, 0.0), Vec3::new(6.0, 2.0, 6.0))
                    .with_margin(2.0)
                    .with_angles(-180.0, 180.0),
            )
            .unwrap();
        store
    }

    fn config() -> SimulationConfig {
        SimulationConfig {
            stable_duration_secs: 3.0,
            cooldown_secs: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_inactive_simulation_is_inert() {
        let store = store();
        let mut sim = Simulation::new(config());
        let probe = Probe::new(Vec3::ZERO, 0.0);

        for _ in 0..10 {
            assert!(sim.tick(1.0, &probe, store.iter()).is_none());
        }
        assert!(sim.last_observation().is_none());
        assert_eq!(sim.phase(), TriggerPhase::Idle);
    }

    #[test]
    fn test_fires_once_when_standing_inside() {
        let store = store();
        let mut sim = Simulation::new(config());
        sim.set_active(true);
        let probe = Probe::new(Vec3::new(0.5, 0.0, 0.5), 0.0);
        let mut sink = RecordingSink::new();

        for _ in 0..8 {
            sim.tick_into(1.0, &probe, store.iter(), &mut sink);
        }

        assert_eq!(sink.labels(), vec!["Fountain"]);
        let request = &sink.requests[0];
        assert_eq!(request.situation, Situation::Inside);
        assert_eq!(request.message, "The user is right inside the Fountain.");
        assert!(request.prompt.contains("marble fountain"));
    }

    #[test]
    fn test_near_request_carries_direction() {
        let store = store();
        let mut sim = Simulation::new(config());
        sim.set_active(true);
        // South of the fountain, facing north.
        let probe = Probe::new(Vec3::new(0.0, 0.0, -3.0), 0.0);

        let fired: Vec<_> = (0..5)
            .filter_map(|_| sim.tick(1.0, &probe, store.iter()))
            .collect();

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].situation, Situation::Near);
        assert_eq!(fired[0].sector, Sector::Forward);
        assert_eq!(
            fired[0].message,
            "The user is now near Fountain, the Fountain is forward of the user."
        );
    }

    #[test]
    fn test_nothing_nearby_message_without_trigger() {
        let store = store();
        let mut sim = Simulation::new(config());
        sim.set_active(true);
        let probe = Probe::new(Vec3::new(100.0, 0.0, 100.0), 0.0);

        for _ in 0..20 {
            assert!(sim.tick(1.0, &probe, store.iter()).is_none());
        }
        assert_eq!(sim.current_message().as_deref(), Some("No mark nearby."));
    }

    #[test]
    fn test_cooldown_spans_marks() {
        let store = store();
        let mut sim = Simulation::new(config());
        sim.set_active(true);
        let at_fountain = Probe::new(Vec3::new(0.5, 0.0, 0.0), 0.0);
        let at_library = Probe::new(Vec3::new(20.0, 0.0, 0.0), 0.0);
        let mut fired_at = Vec::new();

        // t=0 .. t=4 at the fountain, then walk to the library at t=5.
        for t in 0..=20u32 {
            let probe = if t < 5 { &at_fountain } else { &at_library };
            let dt = if t == 0 { 0.0 } else { 1.0 };
            if let Some(request) = sim.tick(dt, probe, store.iter()) {
                fired_at.push((t, request.label));
            }
        }

        assert_eq!(
            fired_at,
            vec![(3, "Fountain".to_string()), (13, "Library".to_string())]
        );
    }

    #[test]
    fn test_reentering_resets_stability() {
        let store = store();
        let mut sim = Simulation::new(config());
        let probe = Probe::new(Vec3::new(0.5, 0.0, 0.5), 0.0);

        sim.set_active(true);
        sim.tick(0.0, &probe, store.iter());
        sim.tick(2.9, &probe, store.iter());
        assert!((sim.trigger().stability_elapsed() - 2.9).abs() < 1e-6);

        sim.set_active(false);
        assert_eq!(sim.phase(), TriggerPhase::Idle);
        sim.set_active(true);

        // 2.9s would have been enough with one more 0.2s tick; after re-entry it is not.
        assert!(sim.tick(0.2, &probe, store.iter()).is_none());
        assert!(sim.tick(0.2, &probe, store.iter()).is_none());
        assert!(sim.trigger().stability_elapsed() < 1.0);
    }

    #[test]
    fn test_reentering_clears_last_fired() {
        let store = store();
        let mut sim = Simulation::new(SimulationConfig {
            stable_duration_secs: 1.0,
            cooldown_secs: 0.0,
            ..Default::default()
        });
        let probe = Probe::new(Vec3::new(0.5, 0.0, 0.5), 0.0);

        sim.set_active(true);
        sim.tick(0.0, &probe, store.iter());
        assert!(sim.tick(1.0, &probe, store.iter()).is_some());

        sim.set_active(false);
        sim.set_active(true);
        sim.tick(0.0, &probe, store.iter());
        assert!(sim.tick(1.0, &probe, store.iter()).is_some());
    }

    #[test]
    fn test_scene_candidates_limit_evaluation() {
        let store = store();
        let mut sim = Simulation::new(SimulationConfig {
            stable_duration_secs: 0.0,
            cooldown_secs: 0.0,
            ..Default::default()
        });
        sim.set_active(true);
        let probe = Probe::new(Vec3::ZERO, 0.0);

        // The fountain is stored but not instantiated in the scene.
        let scene = store.candidates(["Library"]);
        sim.tick(0.0, &probe, scene.iter().copied());
        assert!(sim.tick(1.0, &probe, scene.iter().copied()).is_none());
        assert_eq!(sim.current_message().as_deref(), Some("No mark nearby."));
    }
}
