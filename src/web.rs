//! Browser host bindings
//!
//! A thin wasm-bindgen wrapper: the page drives `tick()` from
//! `requestAnimationFrame` and renders from the returned JSON.

use wasm_bindgen::prelude::*;

use crate::autoplay::AutoPlay;
use crate::platform;
use crate::settings::Settings;
use crate::sim::{BoardConfig, GameState, RiskLevel, TickOutcome, abandon, tick};
use crate::stats::SessionStats;

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn err_to_js(err: crate::PlinkoError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    platform::init_logging();
    log::info!("Plinko (web) starting...");
}

/// Game instance holding session state and history
#[wasm_bindgen]
pub struct PlinkoGame {
    state: GameState,
    stats: SessionStats,
    settings: Settings,
    autoplay: Option<AutoPlay>,
}

#[wasm_bindgen]
impl PlinkoGame {
    /// Restore saved settings and build the board
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PlinkoGame, JsValue> {
        let settings = Settings::load();
        let config = settings.board_config().or_else(|e| {
            log::warn!("Saved settings unusable ({e}), using defaults");
            Settings::default().board_config()
        });
        let mut state = GameState::new(config.map_err(err_to_js)?).map_err(err_to_js)?;
        if state.set_tuning(settings.tuning).is_err() {
            log::warn!("Saved physics tuning rejected, keeping defaults");
        }
        Ok(PlinkoGame {
            state,
            stats: SessionStats::new(),
            settings,
            autoplay: None,
        })
    }

    /// Regenerate the board for a new risk level, row count and canvas size
    pub fn configure(&mut self, risk: &str, rows: u8, width: f32, height: f32) -> Result<(), JsValue> {
        let risk: RiskLevel = risk.parse().map_err(err_to_js)?;
        let config = BoardConfig::new(risk, rows, width, height).map_err(err_to_js)?;
        self.state.reconfigure(config).map_err(err_to_js)?;

        self.settings.risk = risk;
        self.settings.rows = rows;
        self.settings.width = width;
        self.settings.height = height;
        self.settings.save();
        Ok(())
    }

    /// Attempt a drop; returns the ball id or throws the rejection reason
    pub fn drop_ball(&mut self, bet: f64, balance: f64) -> Result<f64, JsValue> {
        let id = self
            .state
            .drop_ball_with_balance(bet, balance)
            .map_err(err_to_js)?;
        if self.settings.bet != bet {
            self.settings.bet = bet;
            self.settings.save();
        }
        Ok(id as f64)
    }

    /// Advance one tick; returns the outcome as JSON
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let outcome = tick(&mut self.state, &mut self.stats);
        if let Some(auto) = self.autoplay.as_mut() {
            auto.record(&outcome);
        }
        to_js(&outcome)
    }

    /// Settle an in-flight ball immediately (page hidden / navigation)
    pub fn abandon(&mut self) -> Result<String, JsValue> {
        let outcome: TickOutcome = abandon(&mut self.state, &mut self.stats);
        if let Some(auto) = self.autoplay.as_mut() {
            auto.record(&outcome);
            auto.cancel();
        }
        to_js(&outcome)
    }

    /// Begin an auto-play run with the saved auto-play settings
    pub fn start_auto_play(&mut self, bet: f64, balance: f64) -> Result<(), JsValue> {
        let auto = AutoPlay::new(self.settings.autoplay, bet, balance).map_err(err_to_js)?;
        self.autoplay = Some(auto);
        Ok(())
    }

    /// Replace the saved auto-play settings (JSON)
    pub fn set_auto_play_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = serde_json::from_str::<crate::autoplay::AutoPlaySettings>(json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.validate().map_err(err_to_js)?;
        self.settings.autoplay = settings;
        self.settings.save();
        Ok(())
    }

    /// Drop the next auto-play ball; returns its id as JSON, or `null` once the run ended
    pub fn auto_drop(&mut self) -> Result<String, JsValue> {
        let Some(auto) = self.autoplay.as_mut() else {
            return to_js(&Option::<u64>::None);
        };
        let id = auto.next_drop(&mut self.state).map_err(err_to_js)?;
        to_js(&id)
    }

    /// Stop auto-play before the next drop
    pub fn stop_auto_play(&mut self) {
        if let Some(auto) = self.autoplay.as_mut() {
            auto.cancel();
        }
    }

    /// Milliseconds the page should wait between auto-play balls
    pub fn auto_play_interval_ms(&self) -> f64 {
        self.settings.autoplay.drop_interval_ms()
    }

    /// Auto-play progress (balance, balls played, stop reason) as JSON
    pub fn auto_play_status(&self) -> Result<String, JsValue> {
        to_js(&self.autoplay)
    }

    /// Current phase and ball position as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_js(&self.state.snapshot())
    }

    /// Pegs and slots as JSON
    pub fn board(&self) -> Result<String, JsValue> {
        to_js(self.state.board())
    }

    /// Session statistics summary as JSON
    pub fn stats(&self) -> Result<String, JsValue> {
        to_js(&self.stats.summary())
    }
}
