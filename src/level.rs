use rand::Rng;

use crate::components::{Pos, TerrainKind, PORTAL_RING};
use crate::walk::random_walk;
use crate::world::World;

const RING_WALKS: usize = 3;
const RING_AMOUNT: u32 = 20;
const RING_RATE: f64 = 0.2;

const GREEBLE_WALKS: usize = 10;
const TREE_WALKS: usize = 3;
const MAX_ROCK_WALKS: usize = 10;

const PORTAL_ROLLS: usize = 64;

/// Populates an empty world with the portal block and terrain clusters.
pub fn generate_map(world: &mut World, rng: &mut impl Rng) {
    let (width, height) = (world.width, world.height);

    let corner = portal_corner(world, rng);
    for dy in 0..3 {
        for dx in 0..3 {
            world.portals.push(Pos::new(corner.x + dx, corner.y + dy));
        }
    }

    let center = Pos::new(corner.x + 1, corner.y + 1);
    for _ in 0..RING_WALKS {
        random_walk(rng, width, height, RING_AMOUNT, RING_RATE, Some(center), |pos| {
            world.place_terrain(TerrainKind::Greeble, pos, PORTAL_RING);
        });
    }

    for _ in 0..GREEBLE_WALKS {
        let variant = rng.gen_range(0..3);
        let amount = rng.gen_range(20..220);
        let rate = rng.gen_range(0.01..0.21);
        scatter(world, rng, TerrainKind::Greeble, variant, amount, rate);
    }

    for _ in 0..TREE_WALKS {
        let variant = rng.gen_range(0..3);
        let amount = rng.gen_range(20..220);
        let rate = rng.gen_range(0.01..0.11);
        scatter(world, rng, TerrainKind::Tree, variant, amount, rate);
    }

    let rock_walks = rng.gen_range(1..=MAX_ROCK_WALKS);
    for _ in 0..rock_walks {
        let variant = rng.gen_range(0..3);
        let amount = rng.gen_range(10..30);
        let rate = rng.gen_range(0.01..0.07);
        scatter(world, rng, TerrainKind::Rock, variant, amount, rate);
    }

    log::info!(
        "map {}x{}: portal at ({}, {}), {} greebles, {} trees, {} rocks",
        width,
        height,
        corner.x,
        corner.y,
        world.greebles.len(),
        world.trees.len(),
        world.rocks.len()
    );
}

/// Top-left corner of the portal block. Corners whose block would cover the avatar
/// are re-rolled; maps too small to avoid it keep the last roll.
fn portal_corner(world: &World, rng: &mut impl Rng) -> Pos {
    let mut corner = Pos::new(0, 0);
    for _ in 0..PORTAL_ROLLS {
        corner = Pos::new(
            rng.gen_range(0..world.width - 2),
            rng.gen_range(0..world.height - 2),
        );
        let covers_avatar = (corner.x..corner.x + 3).contains(&world.avatar.x)
            && (corner.y..corner.y + 3).contains(&world.avatar.y);
        if !covers_avatar {
            break;
        }
    }
    corner
}

fn scatter(
    world: &mut World,
    rng: &mut impl Rng,
    kind: TerrainKind,
    variant: u8,
    amount: u32,
    rate: f64,
) {
    let (width, height) = (world.width, world.height);
    random_walk(rng, width, height, amount, rate, None, |pos| {
        world.place_terrain(kind, pos, variant);
    });
}
