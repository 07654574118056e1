use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::components::Dir;

/// A key counts as held while presses or repeats keep arriving within this window.
pub const INPUT_HOLD_MS: u64 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Dir),
    Release(Dir),
    Quit,
}

pub fn command_for(key: KeyEvent) -> Option<Command> {
    let dir = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            return (key.kind == KeyEventKind::Press).then_some(Command::Quit)
        }
        KeyCode::Up | KeyCode::Char('k') => Dir::Up,
        KeyCode::Down | KeyCode::Char('j') => Dir::Down,
        KeyCode::Left | KeyCode::Char('h') => Dir::Left,
        KeyCode::Right | KeyCode::Char('l') => Dir::Right,
        _ => return None,
    };
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(Command::Press(dir)),
        KeyEventKind::Release => Some(Command::Release(dir)),
    }
}

/// Most terminals never report key releases, so a direction is treated as released
/// once it has gone quiet for [`INPUT_HOLD_MS`].
pub struct HoldTracker {
    last_seen: [Option<Instant>; 4],
    held: bool,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self {
            last_seen: [None; 4],
            held: false,
        }
    }

    pub fn press(&mut self, dir: Dir, now: Instant) {
        self.last_seen[idx_for_dir(dir)] = Some(now);
        self.held = true;
    }

    pub fn release(&mut self, dir: Dir) {
        self.last_seen[idx_for_dir(dir)] = None;
    }

    /// Reports, once, the moment no direction is held any more.
    pub fn poll_release(&mut self, now: Instant) -> bool {
        let window = Duration::from_millis(INPUT_HOLD_MS);
        let any_held = self
            .last_seen
            .iter()
            .flatten()
            .any(|&t| now.duration_since(t) <= window);
        if self.held && !any_held {
            self.held = false;
            return true;
        }
        false
    }
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}
