use rand::Rng;

use crate::components::{Dir, Pos};
use crate::config::Config;
use crate::turn::{take_turn, Event};
use crate::world::World;

/// Tries to move the avatar one cell, pushing a rock if one is in the way.
pub fn move_avatar(
    world: &mut World,
    dir: Dir,
    config: &Config,
    rng: &mut impl Rng,
) -> Vec<Event> {
    let mut events = Vec::new();
    world.facing = dir;

    let from = world.avatar;
    let dest = from.step(dir);
    let mut blocked =
        !world.in_bounds(dest) || world.critter_at(dest).is_some() || world.has_tree(dest);

    if !blocked {
        if let Some(rock) = world.rock_at(dest) {
            let to = dest.step(dir);
            if can_take_rock(world, to) {
                world.rocks[rock].pos = to;
                events.push(Event::RockPushed { from: dest, to });
            } else {
                blocked = true;
            }
        }
    }

    if world.is_portal(dest) {
        events.push(Event::AvatarEscaped);
    }

    if !blocked && dest != from {
        world.avatar = dest;
        events.extend(take_turn(world, config, rng));
    }

    world.assert_invariants();
    events
}

fn can_take_rock(world: &World, to: Pos) -> bool {
    world.in_bounds(to)
        && world.critter_at(to).is_none()
        && !world.has_tree(to)
        && world.rock_at(to).is_none()
        && !world.is_portal(to)
}
