use std::collections::HashSet;

use rand::Rng;

use crate::components::{Critter, CritterKind, Dir, Pos, Terrain, TerrainKind};

/// Give up a spawn search after this many samples per map cell.
const SPAWN_TRIES_PER_CELL: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub width: i32,
    pub height: i32,
    pub avatar: Pos,
    pub facing: Dir,
    pub critters: Vec<Critter>,
    pub greebles: Vec<Terrain>,
    pub trees: Vec<Terrain>,
    pub rocks: Vec<Terrain>,
    pub portals: Vec<Pos>,
    pub turns_since_predator: u32,
    pub turn: u64,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            avatar: Pos::new(width / 2, height / 2),
            facing: Dir::Down,
            critters: Vec::new(),
            greebles: Vec::new(),
            trees: Vec::new(),
            rocks: Vec::new(),
            portals: Vec::new(),
            turns_since_predator: 0,
            turn: 0,
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn is_portal(&self, pos: Pos) -> bool {
        self.portals.contains(&pos)
    }

    pub fn has_tree(&self, pos: Pos) -> bool {
        self.trees.iter().any(|t| t.pos == pos)
    }

    pub fn has_greeble(&self, pos: Pos) -> bool {
        self.greebles.iter().any(|g| g.pos == pos)
    }

    pub fn rock_at(&self, pos: Pos) -> Option<usize> {
        self.rocks.iter().position(|r| r.pos == pos)
    }

    /// Index of a critter that blocks `pos`. Escaped critters are ignored.
    pub fn critter_at(&self, pos: Pos) -> Option<usize> {
        self.critters
            .iter()
            .position(|c| c.pos == pos && c.kind.blocks())
    }

    pub fn count(&self, kind: CritterKind) -> usize {
        self.critters.iter().filter(|c| c.kind == kind).count()
    }

    pub fn live_prey(&self) -> usize {
        self.count(CritterKind::Prey)
    }

    pub fn terrain_free(&self, pos: Pos) -> bool {
        pos != self.avatar
            && !self.has_tree(pos)
            && self.rock_at(pos).is_none()
            && !self.has_greeble(pos)
            && !self.is_portal(pos)
    }

    // Greebles are walkable and may be spawned on.
    pub fn spawn_free(&self, pos: Pos) -> bool {
        pos != self.avatar
            && !self.critters.iter().any(|c| c.pos == pos)
            && !self.has_tree(pos)
            && self.rock_at(pos).is_none()
            && !self.is_portal(pos)
    }

    pub fn place_terrain(&mut self, kind: TerrainKind, pos: Pos, variant: u8) -> bool {
        if !self.in_bounds(pos) || !self.terrain_free(pos) {
            return false;
        }
        let terrain = Terrain { pos, variant };
        match kind {
            TerrainKind::Greeble => self.greebles.push(terrain),
            TerrainKind::Tree => self.trees.push(terrain),
            TerrainKind::Rock => self.rocks.push(terrain),
        }
        true
    }

    /// `None` once the search runs out of samples on an overcrowded map.
    pub fn spawn_critter(&mut self, kind: CritterKind, rng: &mut impl Rng) -> Option<usize> {
        let tries = (self.width.max(0) as usize)
            .saturating_mul(self.height.max(0) as usize)
            .saturating_mul(SPAWN_TRIES_PER_CELL);
        for _ in 0..tries {
            let pos = Pos::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.spawn_free(pos) {
                self.critters.push(Critter::new(kind, pos));
                return Some(self.critters.len() - 1);
            }
        }
        log::warn!("no free cell for a new {:?} after {} tries", kind, tries);
        None
    }

    pub fn blocking_overlap(&self) -> Option<Pos> {
        let mut seen = HashSet::new();
        seen.insert(self.avatar);
        let critters = self
            .critters
            .iter()
            .filter(|c| c.kind.blocks())
            .map(|c| c.pos);
        let terrain = self.trees.iter().chain(self.rocks.iter()).map(|t| t.pos);
        critters.chain(terrain).find(|&pos| !seen.insert(pos))
    }

    pub fn out_of_bounds(&self) -> Option<Pos> {
        std::iter::once(self.avatar)
            .chain(self.critters.iter().map(|c| c.pos))
            .chain(self.greebles.iter().map(|t| t.pos))
            .chain(self.trees.iter().map(|t| t.pos))
            .chain(self.rocks.iter().map(|t| t.pos))
            .chain(self.portals.iter().copied())
            .find(|&pos| !self.in_bounds(pos))
    }

    pub fn assert_invariants(&self) {
        debug_assert_eq!(self.blocking_overlap(), None, "blocking entities overlap");
        debug_assert_eq!(self.out_of_bounds(), None, "entity left the map");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn guard_rejects_occupied_cell_without_mutating() {
        let mut world = World::new(20, 20);
        assert!(world.place_terrain(TerrainKind::Tree, Pos::new(3, 3), 0));
        let before = world.clone();

        assert!(!world.place_terrain(TerrainKind::Rock, Pos::new(3, 3), 1));
        assert!(!world.place_terrain(TerrainKind::Rock, Pos::new(3, 3), 1));
        assert_eq!(world, before);
    }

    #[test]
    fn guard_rejects_avatar_cell_and_portals() {
        let mut world = World::new(20, 20);
        world.portals.push(Pos::new(1, 1));
        let avatar = world.avatar;

        assert!(!world.place_terrain(TerrainKind::Greeble, avatar, 0));
        assert!(!world.place_terrain(TerrainKind::Greeble, Pos::new(1, 1), 0));
        assert!(!world.place_terrain(TerrainKind::Greeble, Pos::new(-1, 4), 0));
        assert!(world.greebles.is_empty());
    }

    #[test]
    fn later_terrain_loses_to_earlier_greeble() {
        let mut world = World::new(20, 20);
        assert!(world.place_terrain(TerrainKind::Greeble, Pos::new(4, 4), 2));
        assert!(!world.place_terrain(TerrainKind::Tree, Pos::new(4, 4), 0));
        assert!(world.trees.is_empty());
    }

    #[test]
    fn spawned_critters_avoid_blockers_but_not_greebles() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = World::new(6, 6);
        for x in 0..6 {
            for y in 0..5 {
                world.place_terrain(TerrainKind::Tree, Pos::new(x, y), 0);
            }
        }
        world.place_terrain(TerrainKind::Greeble, Pos::new(0, 5), 0);

        for _ in 0..4 {
            let idx = world.spawn_critter(CritterKind::Prey, &mut rng).unwrap();
            let pos = world.critters[idx].pos;
            assert_eq!(pos.y, 5);
            assert_ne!(pos, world.avatar);
        }
        assert_eq!(world.blocking_overlap(), None);
    }

    #[test]
    fn spawn_gives_up_on_a_full_map() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut world = World::new(3, 3);
        for x in 0..3 {
            for y in 0..3 {
                world.place_terrain(TerrainKind::Rock, Pos::new(x, y), 0);
            }
        }
        assert_eq!(world.spawn_critter(CritterKind::Predator, &mut rng), None);
        assert!(world.critters.is_empty());
    }

    #[test]
    fn spawn_on_a_huge_map_does_not_overflow_the_search() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut world = World::new(2_000_000_000, 2_000_000_000);
        let idx = world.spawn_critter(CritterKind::Prey, &mut rng).unwrap();
        assert!(world.in_bounds(world.critters[idx].pos));
    }

    #[test]
    fn overlap_ignores_escaped_critters() {
        let mut world = World::new(10, 10);
        world.critters.push(Critter::new(CritterKind::InPortal, Pos::new(2, 2)));
        world.critters.push(Critter::new(CritterKind::Prey, Pos::new(2, 2)));
        assert_eq!(world.blocking_overlap(), None);

        world.critters.push(Critter::new(CritterKind::Dead, Pos::new(2, 2)));
        assert_eq!(world.blocking_overlap(), Some(Pos::new(2, 2)));
    }

    #[test]
    fn critter_lookup_skips_escaped() {
        let mut world = World::new(10, 10);
        world.critters.push(Critter::new(CritterKind::InPortal, Pos::new(1, 2)));
        assert_eq!(world.critter_at(Pos::new(1, 2)), None);
        world.critters.push(Critter::new(CritterKind::Dead, Pos::new(1, 3)));
        assert_eq!(world.critter_at(Pos::new(1, 3)), Some(1));
    }
}
