//! Menu / game scene transitions
//!
//! The director owns whichever scene is active and routes per-frame input to
//! it. Leaving a game drops its [`GameState`] wholesale, so nothing scheduled
//! inside a finished session can outlive it.

use crate::error::TuningError;
use crate::sim::{GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Seed increment between sessions (golden ratio, keeps seeds well spread)
const SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Active scene
#[derive(Debug, Clone)]
pub enum Scene {
    /// Title screen, waiting for a click
    Menu,
    Game(Box<GameState>),
}

impl Scene {
    pub fn is_menu(&self) -> bool {
        matches!(self, Scene::Menu)
    }
}

/// Owns the active scene and the tuning every new session is built from
#[derive(Debug, Clone)]
pub struct Director {
    tuning: Tuning,
    scene: Scene,
    next_seed: u64,
    sessions_started: u32,
}

impl Director {
    /// Validates `tuning` once; every session after that reuses it
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            scene: Scene::Menu,
            next_seed: seed,
            sessions_started: 0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn game(&self) -> Option<&GameState> {
        match &self.scene {
            Scene::Game(state) => Some(state.as_ref()),
            Scene::Menu => None,
        }
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        match &mut self.scene {
            Scene::Game(state) => Some(state.as_mut()),
            Scene::Menu => None,
        }
    }

    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    /// Leave the menu and build a fresh session
    pub fn start_game(&mut self) {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(SEED_STEP);
        self.sessions_started += 1;
        log::info!("Starting session {} (seed {})", self.sessions_started, seed);
        self.scene = Scene::Game(Box::new(GameState::new(self.tuning.clone(), seed)));
    }

    pub fn return_to_menu(&mut self) {
        if !self.scene.is_menu() {
            log::info!("Returning to menu");
        }
        self.scene = Scene::Menu;
    }

    /// Route one frame of input to the active scene
    pub fn update(&mut self, input: &TickInput, dt_ms: f32) {
        match &mut self.scene {
            Scene::Menu => {
                if input.fire {
                    self.start_game();
                }
            }
            Scene::Game(state) => {
                if input.menu {
                    self.return_to_menu();
                } else if state.phase.is_terminal() && input.fire && !input.restart {
                    // "Click to go to menu" on the game-over screen
                    self.return_to_menu();
                } else {
                    tick(state, input, dt_ms);
                }
            }
        }
    }
}
