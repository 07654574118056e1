use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Dir) -> Pos {
        let (dx, dy) = dir.delta();
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn dist_sq(self, other: Pos) -> i32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Down, Dir::Up];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Dir {
        Dir::ALL[rng.gen_range(0..4)]
    }

    /// Step that leads away from a target at offset `(dx, dy)`.
    ///
    /// Buckets `atan2(dy, dx)` shifted into `[0, 360)` into four 90 degree sectors
    /// offset by 45 degrees: `(45, 135]` down, `(135, 225]` left, `(225, 315]` up,
    /// anything else right. The sector edges are evaluated exactly on the integer
    /// offsets so diagonals always land in the same sector.
    pub fn away_from(dx: i32, dy: i32) -> Dir {
        if dy < 0 && dx.abs() <= -dy && dx != dy {
            Dir::Down
        } else if (dx > 0 && dy.abs() <= dx && dy != -dx) || (dx == 0 && dy == 0) {
            Dir::Left
        } else if dy > 0 && dx.abs() <= dy && dx != dy {
            Dir::Up
        } else {
            Dir::Right
        }
    }

    pub fn toward(dx: i32, dy: i32) -> Dir {
        Dir::away_from(dx, dy).opposite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CritterKind {
    Prey,
    Predator,
    Dead,
    InPortal,
}

impl CritterKind {
    /// Dead critters stay on the map as obstacles; escaped ones are gone for good.
    pub fn blocks(self) -> bool {
        !matches!(self, CritterKind::InPortal)
    }

    pub fn is_active(self) -> bool {
        matches!(self, CritterKind::Prey | CritterKind::Predator)
    }

    pub fn cooldown(self) -> u8 {
        match self {
            CritterKind::Predator => 1,
            CritterKind::Prey | CritterKind::Dead | CritterKind::InPortal => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Critter {
    pub kind: CritterKind,
    pub pos: Pos,
    pub turn_timer: u8,
    pub blocked_turns: u32,
}

impl Critter {
    pub fn new(kind: CritterKind, pos: Pos) -> Self {
        Self {
            kind,
            pos,
            turn_timer: 0,
            blocked_turns: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainKind {
    Greeble,
    Tree,
    Rock,
}

/// Variant tag for the greebles that ring the portal.
pub const PORTAL_RING: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terrain {
    pub pos: Pos,
    pub variant: u8,
}
