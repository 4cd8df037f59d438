//! eframe application hosting the player
//!
//! egui drives the frame: every `update` translates that frame's input,
//! runs one [`Player::frame`] against an [`EguiSurface`], and schedules the
//! next repaint at the pacing interval. Closing the viewport (or Escape)
//! ends the loop and `on_exit` performs the final snapshot flush.

use crate::config::PlayerConfig;
use crate::persistence::SnapshotFile;
use crate::player::{Player, PlayerState};
use crate::render::{install_font, translate_events, EguiAssets, EguiSurface, InputEvent, LoadedFont};
use crate::scene::{load_or_default, SceneBuilder, SceneSource};
use crate::store::VariableStore;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

pub struct HmiApp {
    player: Player,
    assets: EguiAssets,
}

impl HmiApp {
    /// Install the font, build the scene against `store` and start the
    /// player clocks
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &PlayerConfig,
        store: Rc<VariableStore>,
        font: &LoadedFont,
        scene_path: &Path,
        snapshot: SnapshotFile,
    ) -> Self {
        install_font(&cc.egui_ctx, font);

        let mut assets = EguiAssets::new(cc.egui_ctx.clone());
        let report = {
            let mut builder = SceneBuilder::from_config(&store, &mut assets, config);
            load_or_default(scene_path, &mut builder)
        };
        for warning in &report.warnings {
            tracing::warn!("Scene: {}", warning);
        }
        if report.source == SceneSource::BuiltinDefault {
            tracing::warn!("Running the built-in default scene");
        }
        tracing::info!("HMI player initialized with {} objects", report.scene.len());

        let player = Player::new(store, report.scene, config, Instant::now()).with_snapshot(snapshot);
        Self { player, assets }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}

impl eframe::App for HmiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events: VecDeque<InputEvent> = ctx.input(translate_events).into();

        let state = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let mut surface = EguiSurface::new(ui.painter().clone(), self.assets.textures());
                self.player.frame(&mut events, &mut surface, Instant::now())
            })
            .inner;

        match state {
            PlayerState::Closing => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            PlayerState::Running => ctx.request_repaint_after(self.player.frame_interval()),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.player.shutdown();
    }
}
