//! Browser boundary
//!
//! `WebGame` wraps a `Game` for a JavaScript renderer. The renderer owns the
//! animation frame loop and hit-testing; this side listens for resize,
//! orientation and visibility changes and hands events back as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::best::{GameOverSummary, PersonalBest, RunResult};
use crate::config::GameConfig;
use crate::sim::{EntityHandle, Game, GameEvent, ObjectKind, ScreenSignal};
use crate::viewport::ViewportAdapter;

/// Install the panic hook and console logger
pub fn boot() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Coin Rain initialized");
}

/// Current window signals
fn read_screen(window: &web_sys::Window) -> ScreenSignal {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let touch = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
        || window.navigator().max_touch_points() > 0;
    ScreenSignal::new(width as f32, height as f32, touch)
}

const BEST_STORAGE_KEY: &str = "coin_rain_best";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

fn load_best() -> PersonalBest {
    match local_storage().and_then(|s| s.get_item(BEST_STORAGE_KEY).ok().flatten()) {
        Some(json) => PersonalBest::from_json(&json),
        None => PersonalBest::default(),
    }
}

fn save_best(best: &PersonalBest) {
    let Some(storage) = local_storage() else {
        return;
    };
    if let Ok(json) = serde_json::to_string(best) {
        if storage.set_item(BEST_STORAGE_KEY, &json).is_err() {
            log::warn!("Could not save personal best");
        }
    }
}

fn listen<F>(target: &web_sys::EventTarget, event: &str, handler: F)
where
    F: FnMut(web_sys::Event) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

struct Session {
    game: Game,
    best: PersonalBest,
    last_summary: Option<GameOverSummary>,
}

impl Session {
    /// Drain events, settling the personal best when a run ends
    fn drain(&mut self) -> Vec<GameEvent> {
        let events = self.game.drain_events();
        for event in &events {
            if let GameEvent::GameOver { final_score } = *event {
                let run = RunResult {
                    score: final_score,
                    best_streak: self.game.state().best_streak,
                };
                self.last_summary = Some(self.best.record(run));
                save_best(&self.best);
            }
        }
        events
    }
}

/// Entity snapshot for the renderer
#[derive(Serialize)]
struct EntityView {
    handle: EntityHandle,
    x: f32,
    y: f32,
    kind: ObjectKind,
    size: f32,
    scale: f32,
    revealed: bool,
}

#[wasm_bindgen]
pub struct WebGame {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a session sized to the current window
    ///
    /// `config_json` overrides the default balance; an invalid config is
    /// rejected rather than silently replaced.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebGame, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let config = match config_json {
            Some(json) => {
                GameConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => GameConfig::default(),
        };

        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let adapter = ViewportAdapter::new(&user_agent, window.device_pixel_ratio() as f32);
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(config, adapter, read_screen(&window), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Device geometry: {:?}", game.geometry());

        let session = Rc::new(RefCell::new(Session {
            game,
            best: load_best(),
            last_summary: None,
        }));

        for event in ["resize", "orientationchange"] {
            let session = session.clone();
            let window_clone = window.clone();
            listen(&window, event, move |_| {
                let screen = read_screen(&window_clone);
                session
                    .borrow_mut()
                    .game
                    .viewport_changed(screen.width, screen.height, screen.touch_capable);
            });
        }

        {
            let session = session.clone();
            let window_clone = window.clone();
            let document_clone = document.clone();
            listen(&document, "visibilitychange", move |_| {
                let mut s = session.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    s.game.pause();
                } else {
                    let screen = read_screen(&window_clone);
                    s.game
                        .viewport_changed(screen.width, screen.height, screen.touch_capable);
                    s.game.resume();
                }
            });
        }

        Ok(WebGame { session })
    }

    pub fn tick(&self, dt_ms: f32) {
        self.session.borrow_mut().game.tick(dt_ms);
    }

    /// The renderer's hit-test landed on this entity
    pub fn pointer_reveal(&self, index: u32, generation: u32) -> bool {
        self.session
            .borrow_mut()
            .game
            .pointer_reveal(EntityHandle { index, generation })
    }

    pub fn viewport_changed(&self, width: f32, height: f32, touch_capable: bool) {
        self.session
            .borrow_mut()
            .game
            .viewport_changed(width, height, touch_capable);
    }

    pub fn pause(&self) {
        self.session.borrow_mut().game.pause();
    }

    pub fn resume(&self) {
        self.session.borrow_mut().game.resume();
    }

    pub fn reset(&self) -> bool {
        let mut session = self.session.borrow_mut();
        let restarted = session.game.reset();
        if restarted {
            session.last_summary = None;
        }
        restarted
    }

    /// Queued events as a JSON array
    pub fn drain_events(&self) -> String {
        let events = self.session.borrow_mut().drain();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Active entities as a JSON array
    pub fn entities(&self) -> String {
        let session = self.session.borrow();
        let views: Vec<_> = session
            .game
            .pool()
            .iter_active()
            .map(|(handle, e)| EntityView {
                handle,
                x: e.pos.x,
                y: e.pos.y,
                kind: e.kind,
                size: e.kind.size(),
                scale: e.scale,
                revealed: e.revealed,
            })
            .collect();
        serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn geometry(&self) -> String {
        serde_json::to_string(self.session.borrow().game.geometry())
            .unwrap_or_else(|_| "null".to_string())
    }

    pub fn state(&self) -> String {
        serde_json::to_string(self.session.borrow().game.state())
            .unwrap_or_else(|_| "null".to_string())
    }

    /// Summary of the run that just ended, or `null` while playing
    pub fn game_over_summary(&self) -> String {
        serde_json::to_string(&self.session.borrow().last_summary)
            .unwrap_or_else(|_| "null".to_string())
    }

    pub fn personal_best(&self) -> String {
        serde_json::to_string(&self.session.borrow().best).unwrap_or_else(|_| "{}".to_string())
    }
}
