use rand::Rng;

use crate::components::{CritterKind, Dir, Pos};
use crate::config::Config;
use crate::level::generate_map;
use crate::player::move_avatar;
use crate::turn::{EndReason, Event};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Play,
    End,
}

pub struct Game {
    pub config: Config,
    pub phase: Phase,
    pub world: World,
    /// Top-left map cell of the viewport.
    pub camera: Pos,
    pub end_reason: Option<EndReason>,
    pending: Option<Dir>,
    debounce_ms: u64,
    last_timestamp: Option<u64>,
}

impl Game {
    pub fn new(config: Config, rng: &mut impl Rng) -> Self {
        let world = World::new(config.map_w, config.map_h);
        let mut game = Game {
            config,
            phase: Phase::Start,
            world,
            camera: Pos::new(0, 0),
            end_reason: None,
            pending: None,
            debounce_ms: 0,
            last_timestamp: None,
        };
        game.restart(rng);
        game
    }

    pub fn restart(&mut self, rng: &mut impl Rng) {
        self.phase = Phase::Start;
        self.world = World::new(self.config.map_w, self.config.map_h);
        generate_map(&mut self.world, rng);
        for _ in 0..self.config.prey {
            self.world.spawn_critter(CritterKind::Prey, rng);
        }
        self.camera = camera_for(self.world.avatar, &self.config);
        self.end_reason = None;
        self.pending = None;
        self.debounce_ms = 0;
        self.last_timestamp = None;
        log::info!(
            "new game: {} prey on a {}x{} map",
            self.world.live_prey(),
            self.config.map_w,
            self.config.map_h
        );
    }

    pub fn press(&mut self, dir: Dir) {
        self.pending = Some(dir);
    }

    /// Key released: the next press may act without waiting out the debounce.
    pub fn release(&mut self) {
        self.debounce_ms = 0;
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<Dir> {
        self.pending
    }

    /// Host entry point, called once per displayed frame with a monotonic
    /// millisecond timestamp.
    pub fn frame(&mut self, timestamp_ms: u64, rng: &mut impl Rng) {
        let elapsed = match self.last_timestamp {
            Some(last) => timestamp_ms.saturating_sub(last),
            None => 0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.step(elapsed, rng);
    }

    pub fn step(&mut self, elapsed_ms: u64, rng: &mut impl Rng) {
        match self.phase {
            Phase::Start => {
                if self.pending.is_some() {
                    log::debug!("leaving splash screen");
                    self.phase = Phase::Play;
                }
            }
            Phase::End => {
                if self.pending.is_some() {
                    self.restart(rng);
                }
            }
            Phase::Play => self.play(elapsed_ms, rng),
        }
    }

    fn play(&mut self, elapsed_ms: u64, rng: &mut impl Rng) {
        if self.debounce_ms == 0 {
            if let Some(dir) = self.pending.take() {
                let events = move_avatar(&mut self.world, dir, &self.config, rng);
                self.camera = camera_for(self.world.avatar, &self.config);
                self.debounce_ms = self.config.debounce_ms;
                for event in &events {
                    log_event(&self.world, event);
                }
                if let Some(reason) = events.iter().find_map(|e| e.end_reason()) {
                    self.end(reason);
                }
            }
        }
        self.debounce_ms = self.debounce_ms.saturating_sub(elapsed_ms);
    }

    fn end(&mut self, reason: EndReason) {
        log::info!(
            "game over after {} turns: {:?} ({} escaped, {} dead, {} still loose)",
            self.world.turn,
            reason,
            self.world.count(CritterKind::InPortal),
            self.world.count(CritterKind::Dead),
            self.world.live_prey()
        );
        self.phase = Phase::End;
        self.end_reason = Some(reason);
        self.pending = None;
    }

    #[cfg(test)]
    fn with_world(config: Config, world: World) -> Self {
        let camera = camera_for(world.avatar, &config);
        Game {
            config,
            phase: Phase::Play,
            world,
            camera,
            end_reason: None,
            pending: None,
            debounce_ms: 0,
            last_timestamp: None,
        }
    }
}

fn log_event(world: &World, event: &Event) {
    match *event {
        Event::RockPushed { from, to } => log::trace!(
            "rock pushed from ({}, {}) to ({}, {})",
            from.x,
            from.y,
            to.x,
            to.y
        ),
        Event::PredatorSpawned(pos) => {
            log::debug!("predator spawned at ({}, {})", pos.x, pos.y)
        }
        Event::PreyCaught(pos) => log::debug!("prey caught at ({}, {})", pos.x, pos.y),
        Event::PreyEscaped(pos) => log::info!(
            "prey escaped at ({}, {}), {} through so far",
            pos.x,
            pos.y,
            world.count(CritterKind::InPortal)
        ),
        Event::AvatarCaught => log::info!("predator caught the avatar"),
        Event::AvatarEscaped => log::info!("avatar stepped into the portal"),
        Event::AllPreyResolved => log::info!("no live prey left"),
    }
}

/// Viewport origin that centres `avatar`, clamped so the view stays on the map.
pub fn camera_for(avatar: Pos, config: &Config) -> Pos {
    let x = (avatar.x - config.view_w / 2).clamp(0, config.map_w - config.view_w);
    let y = (avatar.y - config.view_h / 2).clamp(0, config.map_h - config.view_h);
    Pos::new(x, y)
}
