//! # HMI Player: declarative operator dashboards
//!
//! A small SCADA-style runtime. A scene document describes indicators,
//! labels, charts, input fields and buttons bound to named process
//! variables; the player wires them to a reactive variable store and runs
//! a single-threaded frame loop that dispatches input, ticks the nodes,
//! paints them and periodically persists the store.
//!
//! ## Architecture
//!
//! - **Store**: named `f64` variables with bounded history and synchronous,
//!   re-entrant change subscriptions ([`store`])
//! - **Actions**: the button command language ([`action`])
//! - **Nodes**: the visual node variants and their state machines ([`nodes`])
//! - **Scene**: JSON scene documents and the built-in default panel ([`scene`])
//! - **Player**: the frame loop and its periodic tasks ([`player`])
//! - **Render**: backend traits with an eframe/egui implementation and an
//!   in-memory recording one ([`render`])
//! - **Persistence**: the variable snapshot file ([`persistence`])
//!
//! ## Configuration
//!
//! Settings are read from `hmi.toml` (working directory, then the platform
//! config directory under `dev.xsmall.hmi-player`); see [`config`].
//!
//! ## Example
//!
//! ```ignore
//! use hmi_player::{
//!     player::Player,
//!     render::{RecordingSurface, ScriptedEvents, StaticAssets},
//!     scene::{default_scene_document, SceneBuilder, SceneSource},
//!     store::VariableStore,
//!     PlayerConfig,
//! };
//!
//! let store = VariableStore::shared();
//! store.seed_demo_values();
//!
//! let mut assets = StaticAssets::new();
//! let report = SceneBuilder::new(&store, &mut assets)
//!     .build(&default_scene_document().objects, SceneSource::BuiltinDefault);
//!
//! let config = PlayerConfig::default();
//! let mut player = Player::new(store, report.scene, &config, std::time::Instant::now());
//! player.run(&mut ScriptedEvents::new().idle(10).then_close(), &mut RecordingSurface::new());
//! ```

pub mod action;
pub mod app;
pub mod config;
pub mod error;
pub mod nodes;
pub mod persistence;
pub mod player;
pub mod render;
pub mod scene;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use action::Action;
pub use app::HmiApp;
pub use config::{PlayerConfig, TimingSettings};
pub use error::{HmiError, Result};
pub use nodes::{NodeKind, VisualNode};
pub use persistence::SnapshotFile;
pub use player::{Player, PlayerState};
pub use scene::{Scene, SceneDocument};
pub use store::VariableStore;
pub use types::{Color, Point, Rect};
