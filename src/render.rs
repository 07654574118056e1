use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::components::{CritterKind, Dir, Pos, PORTAL_RING};
use crate::game::{Game, Phase};
use crate::turn::EndReason;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Empty,
    Greeble,
    RingGreeble,
    Tree,
    Rock,
    Portal,
    Avatar(Dir),
    Prey,
    Predator,
    Dead,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const EMPTY: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_phase: Option<Phase>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(view_w: i32, view_h: i32) -> Self {
        Self {
            last: vec![EMPTY; (view_w * view_h) as usize],
            last_hud: String::new(),
            last_phase: None,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

pub fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let view_w = game.config.view_w as usize;
    let view_h = game.config.view_h as usize;
    let needed_h = (view_h + 2) as u16;
    let needed_w = (view_w * CELL_W) as u16;

    if renderer.last_phase != Some(game.phase) {
        renderer.last_phase = Some(game.phase);
        renderer.needs_full = true;
        stdout.queue(Clear(ClearType::All))?;
    }

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
        stdout.queue(Clear(ClearType::All))?;
    }

    match game.phase {
        Phase::Start => draw_splash(stdout, renderer, game, needed_w)?,
        Phase::End => draw_end(stdout, renderer, game, needed_w)?,
        Phase::Play => draw_world(stdout, renderer, game)?,
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn draw_world(stdout: &mut Stdout, renderer: &mut Renderer, game: &Game) -> io::Result<()> {
    let world = &game.world;
    let hud = format!(
        "Turn: {}  Prey: {}  Escaped: {}  Dead: {}  Predators: {}  (q to quit)",
        world.turn,
        world.live_prey(),
        world.count(CritterKind::InPortal),
        world.count(CritterKind::Dead),
        world.count(CritterKind::Predator)
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let cells = paint_view(game);
    let view_w = game.config.view_w as usize;
    for (idx, &cell) in cells.iter().enumerate() {
        if renderer.needs_full || cell != renderer.last[idx] {
            renderer.last[idx] = cell;
            draw_cell(stdout, renderer, idx % view_w, idx / view_w, cell)?;
        }
    }
    Ok(())
}

fn paint_view(game: &Game) -> Vec<Cell> {
    let world = &game.world;
    let (view_w, view_h) = (game.config.view_w, game.config.view_h);
    let mut cells = vec![EMPTY; (view_w * view_h) as usize];
    let mut paint = |pos: Pos, cell: Cell| {
        let x = pos.x - game.camera.x;
        let y = pos.y - game.camera.y;
        if x >= 0 && y >= 0 && x < view_w && y < view_h {
            cells[(y * view_w + x) as usize] = cell;
        }
    };

    for g in &world.greebles {
        let cell = if g.variant == PORTAL_RING {
            Cell {
                glyph: Glyph::RingGreeble,
                color: Color::Blue,
            }
        } else {
            Cell {
                glyph: Glyph::Greeble,
                color: Color::DarkGrey,
            }
        };
        paint(g.pos, cell);
    }
    for t in &world.trees {
        paint(
            t.pos,
            Cell {
                glyph: Glyph::Tree,
                color: Color::DarkYellow,
            },
        );
    }
    for r in &world.rocks {
        paint(
            r.pos,
            Cell {
                glyph: Glyph::Rock,
                color: Color::Grey,
            },
        );
    }
    for &p in &world.portals {
        paint(
            p,
            Cell {
                glyph: Glyph::Portal,
                color: Color::DarkBlue,
            },
        );
    }
    paint(
        world.avatar,
        Cell {
            glyph: Glyph::Avatar(world.facing),
            color: Color::White,
        },
    );
    for c in &world.critters {
        let cell = match c.kind {
            CritterKind::Prey => Cell {
                glyph: Glyph::Prey,
                color: Color::Magenta,
            },
            CritterKind::Predator => Cell {
                glyph: Glyph::Predator,
                color: Color::Red,
            },
            CritterKind::Dead => Cell {
                glyph: Glyph::Dead,
                color: Color::DarkMagenta,
            },
            CritterKind::InPortal => continue,
        };
        paint(c.pos, cell);
    }
    cells
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Empty => "  ",
        Glyph::Greeble => "··",
        Glyph::RingGreeble => "∴∴",
        Glyph::Tree => "♣♣",
        Glyph::Rock => "▓▓",
        Glyph::Portal => "░░",
        Glyph::Avatar(Dir::Up) => "▲",
        Glyph::Avatar(Dir::Down) => "▼",
        Glyph::Avatar(Dir::Left) => "◀",
        Glyph::Avatar(Dir::Right) => "▶",
        Glyph::Prey => "🐇",
        Glyph::Predator => "🐺",
        Glyph::Dead => "x",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn draw_splash(
    stdout: &mut Stdout,
    renderer: &Renderer,
    game: &Game,
    width: u16,
) -> io::Result<()> {
    if !renderer.needs_full {
        return Ok(());
    }
    let lines = [
        "PORTAL HERD".to_string(),
        String::new(),
        format!("Herd {} prey into the portal.", game.config.prey),
        "Predators end the run on contact.".to_string(),
        "Push rocks, mind the trees.".to_string(),
        String::new(),
        "arrows / hjkl to start, q to quit".to_string(),
    ];
    draw_centered(stdout, renderer, width, &lines, Color::White, Color::Reset)
}

fn draw_end(stdout: &mut Stdout, renderer: &Renderer, game: &Game, width: u16) -> io::Result<()> {
    if !renderer.needs_full {
        return Ok(());
    }
    let world = &game.world;
    let headline = match game.end_reason {
        Some(EndReason::Escaped) => "You stepped through the portal.",
        Some(EndReason::Caught) => "A predator caught you.",
        Some(EndReason::AllPreyResolved) | None => "The herd is gone.",
    };
    let lines = [
        headline.to_string(),
        String::new(),
        format!("Escaped: {}", world.count(CritterKind::InPortal)),
        format!("Dead:    {}", world.count(CritterKind::Dead)),
        format!("Loose:   {}", world.live_prey()),
        format!("Turns:   {}", world.turn),
        String::new(),
        "any direction to play again".to_string(),
    ];
    draw_centered(stdout, renderer, width, &lines, Color::Black, Color::White)
}

fn draw_centered(
    stdout: &mut Stdout,
    renderer: &Renderer,
    width: u16,
    lines: &[String],
    fg: Color,
    bg: Color,
) -> io::Result<()> {
    stdout.queue(SetForegroundColor(fg))?;
    stdout.queue(SetBackgroundColor(bg))?;
    for (row, line) in lines.iter().enumerate() {
        let w = UnicodeWidthStr::width(line.as_str()) as u16;
        let pad = width.saturating_sub(w) / 2;
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + row as u16))?;
        stdout.queue(Print(" ".repeat(width as usize)))?;
        stdout.queue(MoveTo(renderer.origin_x + pad, renderer.origin_y + row as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
