mod components;
mod config;
mod critter;
mod game;
mod input;
mod level;
mod player;
mod render;
mod turn;
mod walk;
mod world;

use std::fs::File;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use config::Config;
use game::Game;
use input::{Command, HoldTracker};
use render::Renderer;

fn main() -> io::Result<()> {
    init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("bad configuration: {e}");
            eprintln!("herd: {e}");
            std::process::exit(2);
        }
    };
    log::info!("starting with {:?}", config);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = match config.seed {
        Some(seed) => run(&mut stdout, config, &mut StdRng::seed_from_u64(seed)),
        None => run(&mut stdout, config, &mut rand::thread_rng()),
    };

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    if let Err(e) = &result {
        log::error!("terminal loop failed: {e}");
    }
    result
}

/// The screen belongs to the game, so logs go to `HERD_LOG_FILE` when it is set.
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if let Ok(path) = std::env::var("HERD_LOG_FILE") {
        match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("herd: cannot open log file {path}: {e}"),
        }
    }
    builder.init();
}

fn run(stdout: &mut Stdout, config: Config, rng: &mut impl Rng) -> io::Result<()> {
    let frame_time = Duration::from_millis(config.frame_ms());
    let mut renderer = Renderer::new(config.view_w, config.view_h);
    let mut game = Game::new(config, rng);
    let mut tracker = HoldTracker::new();
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match input::command_for(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Press(dir)) => {
                        tracker.press(dir, frame_start);
                        game.press(dir);
                    }
                    Some(Command::Release(dir)) => tracker.release(dir),
                    None => {}
                }
            }
        }
        if tracker.poll_release(frame_start) {
            game.release();
        }

        game.frame(clock.elapsed().as_millis() as u64, rng);
        render::render(stdout, &game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
