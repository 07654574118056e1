use rand::Rng;

use crate::components::{CritterKind, Pos};
use crate::config::Config;
use crate::critter::{self, Decision, MoveIntent};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    RockPushed { from: Pos, to: Pos },
    PredatorSpawned(Pos),
    PreyCaught(Pos),
    PreyEscaped(Pos),
    AvatarCaught,
    AvatarEscaped,
    AllPreyResolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Escaped,
    Caught,
    AllPreyResolved,
}

impl Event {
    pub fn end_reason(self) -> Option<EndReason> {
        match self {
            Event::AvatarEscaped => Some(EndReason::Escaped),
            Event::AvatarCaught => Some(EndReason::Caught),
            Event::AllPreyResolved => Some(EndReason::AllPreyResolved),
            Event::RockPushed { .. }
            | Event::PredatorSpawned(_)
            | Event::PreyCaught(_)
            | Event::PreyEscaped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    Open,
    Blocked,
    Portal,
}

pub fn take_turn(world: &mut World, config: &Config, rng: &mut impl Rng) -> Vec<Event> {
    let mut events = Vec::new();
    world.turn += 1;

    world.turns_since_predator += 1;
    if world.turns_since_predator > config.predator_every
        && world.count(CritterKind::Predator) < config.predator_cap
    {
        world.turns_since_predator = 0;
        if let Some(idx) = world.spawn_critter(CritterKind::Predator, rng) {
            events.push(Event::PredatorSpawned(world.critters[idx].pos));
        }
    }

    for idx in 0..world.critters.len() {
        let decision = critter::decide(world, idx, rng);
        resolve(world, idx, decision, &mut events);
    }

    events
}

fn resolve(world: &mut World, idx: usize, decision: Decision, events: &mut Vec<Event>) {
    let intent = match decision {
        Decision::Rest => {
            let critter = &mut world.critters[idx];
            critter.turn_timer = critter.turn_timer.saturating_sub(1);
            return;
        }
        Decision::Stay => None,
        Decision::Step(intent) => Some(intent),
    };

    let kind = world.critters[idx].kind;
    world.critters[idx].turn_timer = kind.cooldown();

    let landing = match intent {
        Some(intent) => land(world, idx, intent, events),
        None => Landing::Blocked,
    };

    let critter = &mut world.critters[idx];
    match (landing, intent) {
        (Landing::Open, Some(intent)) => {
            critter.pos = intent.dest;
            critter.blocked_turns = 0;
        }
        (Landing::Portal, Some(intent)) => {
            critter.pos = intent.dest;
            critter.kind = CritterKind::InPortal;
            critter.blocked_turns = 0;
            events.push(Event::PreyEscaped(intent.dest));
            if world.live_prey() == 0 {
                events.push(Event::AllPreyResolved);
            }
        }
        _ => critter.blocked_turns = critter.blocked_turns.saturating_add(1),
    }
}

fn land(world: &mut World, idx: usize, intent: MoveIntent, events: &mut Vec<Event>) -> Landing {
    let dest = intent.dest;
    let mover = world.critters[idx].kind;

    if !world.in_bounds(dest) {
        return Landing::Blocked;
    }
    if dest == world.avatar {
        if mover == CritterKind::Predator {
            events.push(Event::AvatarCaught);
        }
        return Landing::Blocked;
    }
    if let Some(other) = world.critter_at(dest) {
        if mover == CritterKind::Predator && world.critters[other].kind == CritterKind::Prey {
            world.critters[other].kind = CritterKind::Dead;
            events.push(Event::PreyCaught(dest));
            if world.live_prey() == 0 {
                events.push(Event::AllPreyResolved);
            }
        }
        return Landing::Blocked;
    }
    if world.has_tree(dest) || world.rock_at(dest).is_some() {
        return Landing::Blocked;
    }
    if world.is_portal(dest) {
        return if mover == CritterKind::Prey && intent.fleeing {
            Landing::Portal
        } else {
            Landing::Blocked
        };
    }
    Landing::Open
}
