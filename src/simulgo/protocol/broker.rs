use std::collections::VecDeque;

use crate::simulgo::engine::{GameEngine, GameSettings};
use crate::simulgo::mov::Move;
use crate::simulgo::stone::Color;
use crate::utils::prelude::*;

use super::message::Message;

/// An in-process message channel standing in for a real transport (a
/// websocket, a UI event loop). Messages sent before a listener is attached
/// are buffered, not dropped -- a renderer or AI that registers its handler
/// a tick late still sees every message the broker already produced.
#[derive(Default)]
pub struct LoopbackChannel {
    queue: VecDeque<Message>,
    listener: Option<Box<dyn FnMut(Message) + Send>>,
}

impl LoopbackChannel {
    pub fn new() -> Self {
        LoopbackChannel::default()
    }

    pub fn send(&mut self, msg: Message) {
        match &mut self.listener {
            Some(listener) => listener(msg),
            None => self.queue.push_back(msg),
        }
    }

    /// Attaches a listener, immediately flushing anything queued while the
    /// channel had no listener.
    pub fn attach_listener(&mut self, mut listener: impl FnMut(Message) + Send + 'static) {
        while let Some(msg) = self.queue.pop_front() {
            listener(msg);
        }
        self.listener = Some(Box::new(listener));
    }

    pub fn detach_listener(&mut self) {
        self.listener = None;
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }
}

impl std::fmt::Debug for LoopbackChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackChannel").field("queued", &self.queue.len()).finish()
    }
}

/// Pairs up to two participants into one `GameEngine` and relays messages
/// between them. The first `join` becomes Black, the second White; a third
/// is rejected. Once both have joined, the game is started and `GAME_START`
/// is broadcast to both sides.
#[derive(Debug)]
pub struct Broker {
    engine: GameEngine,
    black_channel: LoopbackChannel,
    white_channel: LoopbackChannel,
    black_joined: bool,
    white_joined: bool,
}

impl Broker {
    pub fn new(settings: GameSettings) -> Result<Broker> {
        Ok(Broker {
            engine: GameEngine::new(settings)?,
            black_channel: LoopbackChannel::new(),
            white_channel: LoopbackChannel::new(),
            black_joined: false,
            white_joined: false,
        })
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn channel(&mut self, color: Color) -> &mut LoopbackChannel {
        match color {
            Color::Black => &mut self.black_channel,
            Color::White => &mut self.white_channel,
        }
    }

    fn broadcast(&mut self, msg: Message) {
        self.black_channel.send(msg.clone());
        self.white_channel.send(msg);
    }

    fn broadcast_events(&mut self, events: &[crate::simulgo::events::EngineEvent]) {
        for event in events {
            self.broadcast(Message::from_engine_event(event));
        }
    }

    /// Assigns a seat to a newly joined participant, replying `JOINED` to
    /// them. Starts the game (and broadcasts `GAME_START` followed by the
    /// first `TURN_START`) once both seats are filled.
    pub fn join(&mut self) -> std::result::Result<Color, Message> {
        let color = if !self.black_joined {
            self.black_joined = true;
            Color::Black
        } else if !self.white_joined {
            self.white_joined = true;
            Color::White
        } else {
            return Err(Message::error("game is already full"));
        };

        self.channel(color).send(Message::Joined {
            timestamp: now_ms(),
            color: color.notate().to_string(),
            game_settings: self.settings_json(),
        });

        if self.black_joined && self.white_joined {
            let events = self.engine.start_game();
            self.broadcast(Message::GameStart {
                timestamp: now_ms(),
                board_size: self.engine.settings().board_size,
                board: self.engine.board().to_grid(),
                time_settings: self.time_settings_json(),
            });
            self.broadcast_events(&events);
        }

        Ok(color)
    }

    fn settings_json(&self) -> serde_json::Value {
        let settings = self.engine.settings();
        serde_json::json!({
            "boardSize": settings.board_size,
            "baseTimeMs": settings.base_time_ms,
            "byoYomiPeriods": settings.byo_yomi_periods,
            "byoYomiTimeMs": settings.byo_yomi_period_ms,
        })
    }

    fn time_settings_json(&self) -> serde_json::Value {
        let settings = self.engine.settings();
        serde_json::json!({
            "baseTime": settings.base_time_ms,
            "byoYomiPeriods": settings.byo_yomi_periods,
            "byoYomiTime": settings.byo_yomi_period_ms,
        })
    }

    /// Routes a `SUBMIT_MOVE` from `color` to the engine, acking the mover
    /// and broadcasting any resulting turn/game-end events to both sides.
    pub fn submit_move(&mut self, color: Color, mv: Move) {
        match self.engine.submit_move(color, mv) {
            Ok(events) => {
                let waiting = events.is_empty();
                self.channel(color).send(Message::MoveAck { timestamp: now_ms(), waiting });
                self.broadcast_events(&events);
            }
            Err(reason) => self.channel(color).send(Message::reject(reason)),
        }
    }

    pub fn resign(&mut self, color: Color) {
        let events = self.engine.resign(color);
        self.broadcast_events(&events);
    }

    /// Ends the game in favor of the side that did not disconnect.
    pub fn disconnect(&mut self, disconnected: Color) {
        let events = self.engine.disconnect(disconnected);
        self.broadcast_events(&events);
    }

    pub fn chat(&mut self, color: Color, text: String) {
        self.broadcast(Message::Chat {
            timestamp: now_ms(),
            sender: None,
            color: Some(color.notate().to_string()),
            message: text,
        });
    }

    /// Advances engine clocks, broadcasting any `TIME_UPDATE`/`GAME_END`
    /// events produced.
    pub fn tick(&mut self, elapsed_ms: i64) {
        let events = self.engine.tick(elapsed_ms);
        self.broadcast_events(&events);
    }
}

fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
