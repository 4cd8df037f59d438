//! Orchestrator: the single-threaded frame loop
//!
//! One [`Player::frame`] does, in order:
//! 1. drain input, forwarding every event to every node in scene order
//! 2. run due periodic tasks (node update tick, demo control step)
//! 3. sync nodes whose bound variable changed, then clear, draw and present
//! 4. flush the snapshot if the autosave interval elapsed
//!
//! A close request moves the player to [`PlayerState::Closing`]; the rest
//! of that frame still runs and the next call returns immediately.
//! [`Player::shutdown`] performs the final flush exactly once.

pub mod control;
pub mod scheduler;

pub use control::{control_step, run_control_step};
pub use scheduler::{Scheduler, TaskKind};

use crate::config::PlayerConfig;
use crate::persistence::SnapshotFile;
use crate::render::{EventSource, Surface};
use crate::scene::Scene;
use crate::store::VariableStore;
use crate::types::Color;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Running,
    Closing,
}

#[derive(Debug)]
pub struct Player {
    store: Rc<VariableStore>,
    scene: Scene,
    scheduler: Scheduler,
    snapshot: Option<SnapshotFile>,
    background: Color,
    frame_interval: Duration,
    state: PlayerState,
    frames: u64,
    flushed: bool,
}

impl Player {
    pub fn new(store: Rc<VariableStore>, scene: Scene, config: &PlayerConfig, start: Instant) -> Self {
        Self {
            store,
            scene,
            scheduler: Scheduler::from_timing(&config.timing, config.demo.enabled, start),
            snapshot: None,
            background: config.window.background,
            frame_interval: config.timing.frame_interval(),
            state: PlayerState::Running,
            frames: 0,
            flushed: false,
        }
    }

    /// Persist to `snapshot` on autosave and at shutdown
    pub fn with_snapshot(mut self, snapshot: SnapshotFile) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn store(&self) -> &Rc<VariableStore> {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// End-of-frame pacing delay
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Run one frame at `now`
    pub fn frame(
        &mut self,
        events: &mut dyn EventSource,
        surface: &mut dyn Surface,
        now: Instant,
    ) -> PlayerState {
        if self.state == PlayerState::Closing {
            return self.state;
        }

        self.dispatch_events(events);

        let due = self.scheduler.due(now);
        if due.contains(&TaskKind::NodeUpdate) {
            for node in self.scene.nodes_mut() {
                node.update(&self.store);
            }
        }
        if due.contains(&TaskKind::DemoControl) {
            run_control_step(&self.store);
        }

        self.render(surface);

        if due.contains(&TaskKind::Autosave) {
            self.flush();
        }

        self.frames += 1;
        self.state
    }

    fn dispatch_events(&mut self, events: &mut dyn EventSource) {
        while let Some(event) = events.poll_event() {
            if event.is_close_request() && self.state == PlayerState::Running {
                tracing::info!("Close requested");
                self.state = PlayerState::Closing;
            }
            for node in self.scene.nodes_mut() {
                node.handle_event(&event, &self.store);
            }
        }
    }

    fn render(&mut self, surface: &mut dyn Surface) {
        for node in self.scene.nodes_mut() {
            node.sync(&self.store);
        }
        surface.clear(self.background);
        for node in self.scene.nodes() {
            node.draw(surface, &self.store);
        }
        surface.present();
    }

    /// Loop until a close request, pacing frames, then flush once
    pub fn run(&mut self, events: &mut dyn EventSource, surface: &mut dyn Surface) {
        tracing::info!("Player running with {} objects", self.scene.len());

        let mut last_frame = Instant::now();
        while self.frame(events, surface, Instant::now()) == PlayerState::Running {
            self.rate_limit(&mut last_frame);
        }

        self.shutdown();
        tracing::info!("Player stopped after {} frames", self.frames);
    }

    /// Sleep out the remainder of the frame interval
    fn rate_limit(&self, last_frame: &mut Instant) {
        if self.frame_interval.is_zero() {
            std::thread::yield_now();
            return;
        }

        let elapsed = last_frame.elapsed();
        if elapsed < self.frame_interval {
            std::thread::sleep(self.frame_interval - elapsed);
        }

        *last_frame = Instant::now();
    }

    /// Write the snapshot now. Returns whether a snapshot was written.
    pub fn flush(&self) -> bool {
        match &self.snapshot {
            Some(snapshot) => snapshot.save(&self.store),
            None => false,
        }
    }

    /// Final flush; later calls do nothing
    pub fn shutdown(&mut self) {
        self.state = PlayerState::Closing;
        if self.flushed {
            return;
        }
        self.flushed = true;
        tracing::info!("Shutting down, saving state");
        self.flush();
    }
}
