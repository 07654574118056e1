use rand::Rng;

use crate::components::{Critter, CritterKind, Dir, Pos};
use crate::world::World;

/// Prey bolt when the avatar is closer than this (squared).
pub const FLEE_RADIUS_SQ: i32 = 3 * 3;
/// Predators lock onto prey closer than this (squared).
pub const HUNT_RADIUS_SQ: i32 = 6 * 6;
/// Predators stalk the avatar closer than this (squared) when no prey is near.
pub const STALK_RADIUS_SQ: i32 = 8 * 8;
/// Consecutive blocked turns after which a critter tries a random step.
pub const STUCK_TURNS: u32 = 4;

/// One cell of movement plus whether the mover is fleeing the avatar.
/// Only a fleeing prey passes through the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub dest: Pos,
    pub fleeing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Still cooling down; the critter sits this turn out entirely.
    Rest,
    /// Took its turn but chose not to move. Counts as a blocked turn.
    Stay,
    Step(MoveIntent),
}

pub fn decide(world: &World, idx: usize, rng: &mut impl Rng) -> Decision {
    let critter = &world.critters[idx];
    if !critter.kind.is_active() || critter.turn_timer > 0 {
        return Decision::Rest;
    }

    if critter.blocked_turns > STUCK_TURNS {
        return step(critter.pos, Dir::random(rng), false);
    }

    match critter.kind {
        CritterKind::Prey => prey_move(world, critter, rng),
        CritterKind::Predator => predator_move(world, critter),
        CritterKind::Dead | CritterKind::InPortal => Decision::Rest,
    }
}

fn step(from: Pos, dir: Dir, fleeing: bool) -> Decision {
    Decision::Step(MoveIntent {
        dest: from.step(dir),
        fleeing,
    })
}

fn prey_move(world: &World, critter: &Critter, rng: &mut impl Rng) -> Decision {
    let dx = world.avatar.x - critter.pos.x;
    let dy = world.avatar.y - critter.pos.y;
    if dx * dx + dy * dy < FLEE_RADIUS_SQ {
        return step(critter.pos, Dir::away_from(dx, dy), true);
    }
    // Five buckets, four of them a direction: prey idles a fifth of the time.
    match rng.gen_range(0..5) {
        n @ 0..=3 => step(critter.pos, Dir::ALL[n], false),
        _ => Decision::Stay,
    }
}

fn predator_move(world: &World, critter: &Critter) -> Decision {
    // First prey in range wins, not the nearest.
    let target = world
        .critters
        .iter()
        .filter(|c| c.kind == CritterKind::Prey)
        .map(|c| c.pos)
        .find(|&p| critter.pos.dist_sq(p) < HUNT_RADIUS_SQ)
        .or_else(|| {
            Some(world.avatar).filter(|&p| critter.pos.dist_sq(p) < STALK_RADIUS_SQ)
        });

    match target {
        Some(p) => step(
            critter.pos,
            Dir::toward(p.x - critter.pos.x, p.y - critter.pos.y),
            false,
        ),
        None => Decision::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world_with(avatar: Pos, critters: &[(CritterKind, Pos)]) -> World {
        let mut world = World::new(40, 40);
        world.avatar = avatar;
        for &(kind, pos) in critters {
            world.critters.push(Critter::new(kind, pos));
        }
        world
    }

    fn dest(decision: Decision) -> Pos {
        match decision {
            Decision::Step(intent) => intent.dest,
            other => panic!("expected a step, got {:?}", other),
        }
    }

    #[test]
    fn prey_flees_avatar_and_marks_the_move() {
        let world = world_with(Pos::new(10, 10), &[(CritterKind::Prey, Pos::new(11, 10))]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            decide(&world, 0, &mut rng),
            Decision::Step(MoveIntent {
                dest: Pos::new(12, 10),
                fleeing: true
            })
        );
    }

    #[test]
    fn prey_outside_flee_radius_wanders_or_idles() {
        let world = world_with(Pos::new(10, 10), &[(CritterKind::Prey, Pos::new(13, 10))]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut stays = 0;
        for _ in 0..500 {
            match decide(&world, 0, &mut rng) {
                Decision::Step(intent) => {
                    assert!(!intent.fleeing);
                    assert_eq!(intent.dest.dist_sq(Pos::new(13, 10)), 1);
                }
                Decision::Stay => stays += 1,
                Decision::Rest => panic!("prey never rests"),
            }
        }
        assert!(stays > 50 && stays < 150, "stayed {} of 500", stays);
    }

    #[test]
    fn predator_chases_first_prey_in_range_not_nearest() {
        let world = world_with(
            Pos::new(0, 39),
            &[
                (CritterKind::Predator, Pos::new(10, 10)),
                (CritterKind::Prey, Pos::new(14, 12)),
                (CritterKind::Prey, Pos::new(10, 9)),
            ],
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(dest(decide(&world, 0, &mut rng)), Pos::new(11, 10));
    }

    #[test]
    fn predator_ignores_dead_prey() {
        let world = world_with(
            Pos::new(0, 39),
            &[
                (CritterKind::Predator, Pos::new(10, 10)),
                (CritterKind::Dead, Pos::new(10, 12)),
            ],
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(decide(&world, 0, &mut rng), Decision::Stay);
    }

    #[test]
    fn predator_stalks_avatar_without_prey_nearby() {
        let world = world_with(
            Pos::new(10, 16),
            &[
                (CritterKind::Predator, Pos::new(10, 10)),
                (CritterKind::Prey, Pos::new(30, 30)),
            ],
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(dest(decide(&world, 0, &mut rng)), Pos::new(10, 11));
    }

    #[test]
    fn distant_predator_stays() {
        let world = world_with(
            Pos::new(30, 30),
            &[(CritterKind::Predator, Pos::new(10, 10))],
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(decide(&world, 0, &mut rng), Decision::Stay);
    }

    #[test]
    fn stuck_critter_takes_a_random_step() {
        let mut world = world_with(Pos::new(10, 11), &[(CritterKind::Prey, Pos::new(10, 10))]);
        world.critters[0].blocked_turns = STUCK_TURNS + 1;
        let mut rng = StdRng::seed_from_u64(2);
        match decide(&world, 0, &mut rng) {
            Decision::Step(intent) => {
                assert!(!intent.fleeing);
                assert_eq!(intent.dest.dist_sq(Pos::new(10, 10)), 1);
            }
            other => panic!("expected a step, got {:?}", other),
        }
    }

    #[test]
    fn four_blocked_turns_keep_normal_behaviour() {
        let mut world = world_with(
            Pos::new(10, 10),
            &[
                (CritterKind::Prey, Pos::new(11, 10)),
                (CritterKind::Predator, Pos::new(30, 30)),
            ],
        );
        world.critters[0].blocked_turns = STUCK_TURNS;
        world.critters[1].blocked_turns = STUCK_TURNS;
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            decide(&world, 0, &mut rng),
            Decision::Step(MoveIntent {
                dest: Pos::new(12, 10),
                fleeing: true
            })
        );
        assert_eq!(decide(&world, 1, &mut rng), Decision::Stay);
    }

    #[test]
    fn cooling_down_or_inert_critters_rest() {
        let mut world = world_with(
            Pos::new(0, 0),
            &[
                (CritterKind::Predator, Pos::new(5, 5)),
                (CritterKind::Dead, Pos::new(6, 6)),
                (CritterKind::InPortal, Pos::new(7, 7)),
            ],
        );
        world.critters[0].turn_timer = 1;
        let mut rng = StdRng::seed_from_u64(0);
        for idx in 0..3 {
            assert_eq!(decide(&world, idx, &mut rng), Decision::Rest);
        }
    }
}
