use thiserror::Error;

pub const DEFAULT_MAP_W: i32 = 100;
pub const DEFAULT_MAP_H: i32 = 100;
pub const DEFAULT_VIEW_W: i32 = 16;
pub const DEFAULT_VIEW_H: i32 = 16;
pub const DEFAULT_PREY: usize = 100;
pub const DEFAULT_PREDATOR_CAP: usize = 50;
pub const DEFAULT_PREDATOR_EVERY: u32 = 50;
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;
pub const DEFAULT_RENDER_FPS: u64 = 60;

/// Longest map side accepted.
pub const MAX_MAP_SIDE: i32 = 4096;

/// Cells taken by the portal block plus the avatar's own cell.
const RESERVED_CELLS: usize = 9 + 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected a positive integer, got {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
    #[error("map {width}x{height} is too small, the portal needs at least 3x3")]
    MapTooSmall { width: i32, height: i32 },
    #[error("map {width}x{height} is too large, sides are capped at {max}")]
    MapTooLarge { width: i32, height: i32, max: i32 },
    #[error("viewport {view_w}x{view_h} does not fit in map {width}x{height}")]
    ViewportTooLarge {
        view_w: i32,
        view_h: i32,
        width: i32,
        height: i32,
    },
    #[error("{population} critters cannot fit on a {cells}-cell map")]
    PopulationTooLarge { population: usize, cells: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub map_w: i32,
    pub map_h: i32,
    pub view_w: i32,
    pub view_h: i32,
    pub prey: usize,
    pub predator_cap: usize,
    /// Turns between predator spawns.
    pub predator_every: u32,
    pub debounce_ms: u64,
    pub render_fps: u64,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_w: DEFAULT_MAP_W,
            map_h: DEFAULT_MAP_H,
            view_w: DEFAULT_VIEW_W,
            view_h: DEFAULT_VIEW_H,
            prey: DEFAULT_PREY,
            predator_cap: DEFAULT_PREDATOR_CAP,
            predator_every: DEFAULT_PREDATOR_EVERY,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = Config {
            map_w: read(&lookup, "HERD_MAP_W", defaults.map_w)?,
            map_h: read(&lookup, "HERD_MAP_H", defaults.map_h)?,
            view_w: read(&lookup, "HERD_VIEW_W", defaults.view_w)?,
            view_h: read(&lookup, "HERD_VIEW_H", defaults.view_h)?,
            prey: read(&lookup, "HERD_PREY", defaults.prey)?,
            predator_cap: read(&lookup, "HERD_PREDATORS", defaults.predator_cap)?,
            predator_every: read(&lookup, "HERD_PREDATOR_EVERY", defaults.predator_every)?,
            debounce_ms: read(&lookup, "HERD_DEBOUNCE_MS", defaults.debounce_ms)?,
            render_fps: read(&lookup, "HERD_FPS", defaults.render_fps)?,
            seed: match lookup("HERD_SEED") {
                Some(raw) => Some(parse(&raw, "HERD_SEED")?),
                None => None,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_w < 3 || self.map_h < 3 {
            return Err(ConfigError::MapTooSmall {
                width: self.map_w,
                height: self.map_h,
            });
        }
        if self.map_w > MAX_MAP_SIDE || self.map_h > MAX_MAP_SIDE {
            return Err(ConfigError::MapTooLarge {
                width: self.map_w,
                height: self.map_h,
                max: MAX_MAP_SIDE,
            });
        }
        if self.view_w <= 0 || self.view_h <= 0 || self.view_w > self.map_w || self.view_h > self.map_h
        {
            return Err(ConfigError::ViewportTooLarge {
                view_w: self.view_w,
                view_h: self.view_h,
                width: self.map_w,
                height: self.map_h,
            });
        }
        if self.prey == 0 {
            return Err(ConfigError::Zero { key: "HERD_PREY" });
        }
        if self.predator_every == 0 {
            return Err(ConfigError::Zero {
                key: "HERD_PREDATOR_EVERY",
            });
        }
        if self.render_fps == 0 {
            return Err(ConfigError::Zero { key: "HERD_FPS" });
        }
        // Terrain can take any share of the map, so only the fixed reservations are
        // checked here; a crowded map makes spawning slow, not impossible.
        let cells = (self.map_w as usize) * (self.map_h as usize);
        let population = self.prey.saturating_add(self.predator_cap);
        if population.saturating_add(RESERVED_CELLS) > cells {
            return Err(ConfigError::PopulationTooLarge { population, cells });
        }
        Ok(())
    }

    pub fn frame_ms(&self) -> u64 {
        (1000 / self.render_fps.max(1)).max(1)
    }
}

fn read<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => parse(&raw, key),
        None => Ok(default),
    }
}

fn parse<T: std::str::FromStr>(raw: &str, key: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
