use super::arena::Arena;
use super::creature::Creature;
use super::orbs::OrbPool;
use super::types::WorldSnapshot;
use crate::audit::{AuditEvent, AuditLog};
use crate::config::RoomConfig;
use crate::protocol::{self, ServerMessage};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Cheap handle to a running room. Every call is forwarded to the single task
/// that owns the simulation, so connection handlers never touch game state.
#[derive(Debug, Clone)]
pub struct Room {
  commands: UnboundedSender<RoomCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
  pub players: usize,
  pub active_orbs: usize,
}

#[derive(Debug)]
enum RoomCommand {
  Connect {
    sender: UnboundedSender<String>,
    reply: oneshot::Sender<String>,
  },
  Text {
    session_id: String,
    text: String,
  },
  Disconnect {
    session_id: String,
  },
  Stats {
    reply: oneshot::Sender<RoomStats>,
  },
}

#[derive(Debug)]
struct SessionEntry {
  sender: UnboundedSender<String>,
}

/// Owns the connection registry, the creatures and the arena.
#[derive(Debug)]
pub struct SessionCoordinator {
  sessions: HashMap<String, SessionEntry>,
  creatures: Vec<Creature>,
  arena: Arena,
  tick_delta: f64,
  audit: Option<AuditLog>,
}

impl Room {
  pub fn spawn(config: &RoomConfig, audit: Option<AuditLog>) -> Self {
    let (commands, receiver) = mpsc::unbounded_channel();
    let coordinator = SessionCoordinator::new(config, audit);
    let tick_interval = Duration::from_secs_f64(1.0 / config.tick_rate as f64);
    tokio::spawn(coordinator.run(receiver, tick_interval));
    Self { commands }
  }

  /// Registers a connection and returns its player id, or `None` if the room
  /// task has stopped.
  pub async fn add_session(&self, sender: UnboundedSender<String>) -> Option<String> {
    let (reply, response) = oneshot::channel();
    self
      .commands
      .send(RoomCommand::Connect { sender, reply })
      .ok()?;
    response.await.ok()
  }

  pub fn handle_text_message(&self, session_id: &str, text: String) {
    let _ = self.commands.send(RoomCommand::Text {
      session_id: session_id.to_string(),
      text,
    });
  }

  pub fn remove_session(&self, session_id: &str) {
    let _ = self.commands.send(RoomCommand::Disconnect {
      session_id: session_id.to_string(),
    });
  }

  pub async fn stats(&self) -> Option<RoomStats> {
    let (reply, response) = oneshot::channel();
    self.commands.send(RoomCommand::Stats { reply }).ok()?;
    response.await.ok()
  }
}

impl SessionCoordinator {
  pub fn new(config: &RoomConfig, audit: Option<AuditLog>) -> Self {
    let orbs = OrbPool::new(config.total_orbs, config.initial_active_orbs);
    Self {
      sessions: HashMap::new(),
      creatures: Vec::new(),
      arena: Arena::new(orbs),
      tick_delta: config.tick_delta,
      audit,
    }
  }

  /// Runs until every `Room` handle is dropped. Commands and ticks are
  /// serviced one at a time, so a tick always sees a consistent world.
  async fn run(mut self, mut commands: UnboundedReceiver<RoomCommand>, tick_interval: Duration) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
      tokio::select! {
        _ = interval.tick() => self.tick(),
        command = commands.recv() => {
          let Some(command) = command else { break };
          self.handle_command(command);
        }
      }
    }
    tracing::info!("room loop stopped");
  }

  fn handle_command(&mut self, command: RoomCommand) {
    match command {
      RoomCommand::Connect { sender, reply } => {
        let session_id = self.connect(sender);
        let _ = reply.send(session_id);
      }
      RoomCommand::Text { session_id, text } => {
        self.handle_text_message(&session_id, &text);
      }
      RoomCommand::Disconnect { session_id } => {
        self.disconnect(&session_id);
      }
      RoomCommand::Stats { reply } => {
        let _ = reply.send(self.stats());
      }
    }
  }

  pub fn connect(&mut self, sender: UnboundedSender<String>) -> String {
    let session_id = Uuid::new_v4().to_string();
    let creature = Creature::new(session_id.clone());
    let join = ServerMessage::PlayerJoin {
      player: creature.snapshot(),
    }
    .encode();

    let init = ServerMessage::Init {
      player_id: &session_id,
    }
    .encode();
    let _ = sender.send(init);

    self.creatures.push(creature);
    self
      .sessions
      .insert(session_id.clone(), SessionEntry { sender });
    self.broadcast(&join, Some(session_id.as_str()));

    tracing::info!(player_id = %session_id, players = self.creatures.len(), "player connected");
    self.record(AuditEvent::connect(&session_id, self.creatures.len()));
    session_id
  }

  pub fn handle_text_message(&mut self, session_id: &str, text: &str) {
    let Some(creature) = self.creatures.iter_mut().find(|c| c.id == session_id) else {
      return;
    };
    match protocol::decode_input(text) {
      Ok(input) => creature.set_input(input.direction, input.boost_requested),
      Err(error) => {
        tracing::debug!(player_id = %session_id, %error, "discarding malformed input");
      }
    }
  }

  pub fn disconnect(&mut self, session_id: &str) {
    let had_session = self.sessions.remove(session_id).is_some();
    let before = self.creatures.len();
    self.creatures.retain(|creature| creature.id != session_id);
    if !had_session && before == self.creatures.len() {
      return;
    }

    let leave = ServerMessage::PlayerLeave {
      player_id: session_id,
    }
    .encode();
    self.broadcast(&leave, None);

    tracing::info!(player_id = %session_id, players = self.creatures.len(), "player disconnected");
    self.record(AuditEvent::disconnect(session_id, self.creatures.len()));
  }

  /// Collisions first, against last tick's positions, then movement, then a
  /// full snapshot to everyone.
  pub fn tick(&mut self) {
    let dt = self.tick_delta;
    self.arena.update(&mut self.creatures, dt);
    for creature in &mut self.creatures {
      creature.update(self.arena.orbs_mut(), dt);
    }

    let update = ServerMessage::WorldUpdate {
      world: self.snapshot(),
    }
    .encode();
    self.broadcast(&update, None);
  }

  pub fn snapshot(&self) -> WorldSnapshot {
    WorldSnapshot {
      players: self
        .creatures
        .iter()
        .map(|creature| (creature.id.clone(), creature.snapshot()))
        .collect(),
      orbs: self.arena.orbs().snapshot(),
    }
  }

  pub fn stats(&self) -> RoomStats {
    RoomStats {
      players: self.creatures.len(),
      active_orbs: self.arena.orbs().active_count(),
    }
  }

  fn broadcast(&self, payload: &str, exclude: Option<&str>) {
    for (session_id, session) in &self.sessions {
      if exclude == Some(session_id.as_str()) {
        continue;
      }
      if session.sender.send(payload.to_string()).is_err() {
        tracing::trace!(%session_id, "skipping closed session");
      }
    }
  }

  fn record(&self, event: AuditEvent) {
    if let Some(audit) = &self.audit {
      audit.record(event);
    }
  }
}
