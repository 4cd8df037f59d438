//! Headless player construction

use hmi_player::config::PlayerConfig;
use hmi_player::persistence::SnapshotFile;
use hmi_player::player::{Player, PlayerState};
use hmi_player::render::{EventSource, RecordingSurface, StaticAssets};
use hmi_player::scene::{parse_document, SceneBuilder, SceneSource};
use hmi_player::store::VariableStore;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Player driven with explicit timestamps against a recording surface
pub struct Harness {
    pub store: Rc<VariableStore>,
    pub player: Player,
    pub surface: RecordingSurface,
    pub start: Instant,
    now: Instant,
}

impl Harness {
    /// Build the player from scene document text, with demo control off
    pub fn from_json(json: &str) -> Self {
        let mut config = PlayerConfig::default();
        config.demo.enabled = false;
        Self::with_config(json, config, VariableStore::shared())
    }

    pub fn with_config(json: &str, config: PlayerConfig, store: Rc<VariableStore>) -> Self {
        let parsed = parse_document(json).expect("scene document parses");
        let mut assets = StaticAssets::new();
        let report = SceneBuilder::from_config(&store, &mut assets, &config)
            .build(&parsed.descriptors, SceneSource::BuiltinDefault);

        let start = Instant::now();
        let player = Player::new(Rc::clone(&store), report.scene, &config, start);
        Self {
            store,
            player,
            surface: RecordingSurface::new(),
            start,
            now: start,
        }
    }

    /// Persist to `snapshot` on autosave and shutdown
    pub fn with_snapshot(mut self, snapshot: SnapshotFile) -> Self {
        self.player = self.player.with_snapshot(snapshot);
        self
    }

    /// Run one frame `step` after the previous one
    pub fn frame(&mut self, events: &mut dyn EventSource, step: Duration) -> PlayerState {
        self.now += step;
        self.player.frame(events, &mut self.surface, self.now)
    }

    /// Run `count` frames, each `step` apart
    pub fn frames(&mut self, events: &mut dyn EventSource, count: usize, step: Duration) {
        for _ in 0..count {
            self.frame(events, step);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }
}
