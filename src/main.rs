use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::debug;
use sokoban::{
    Direction, FsStore, Game, LevelText, Levels, MoveError, MoveFlags, ParseOptions, Playback,
    Session, Solution,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sokoban")]
#[command(about = "Play Sokoban levels and keep the best solutions", long_about = None)]
struct Args {
    /// Directory holding saved solutions and quick saves
    #[arg(long, env = "SOKOBAN_SAVE_DIR", global = true, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the levels of a file with their best scores
    List {
        /// Path to the levels file (XSB format)
        #[arg(value_name = "FILE")]
        levels_file: PathBuf,
    },
    /// Print a level with its best solution
    Export {
        #[arg(value_name = "FILE")]
        levels_file: PathBuf,
        /// Level number (1-indexed)
        #[arg(value_name = "LEVEL")]
        level: usize,
    },
    /// Replay a solution on a level and keep it if it is the best so far
    Verify {
        #[arg(value_name = "FILE")]
        levels_file: PathBuf,
        #[arg(value_name = "LEVEL")]
        level: usize,
        /// Moves as letters: u d l r, uppercase for pushes
        #[arg(value_name = "SOLUTION")]
        solution: String,
    },
    /// Play a level in the terminal
    Play {
        #[arg(value_name = "FILE")]
        levels_file: PathBuf,
        /// Level number (1-indexed); defaults to the first unsolved level
        #[arg(value_name = "LEVEL")]
        level: Option<usize>,
    },
}

fn save_dir(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join("simple-sokoban"))
            .context("no data directory found, pass --save-dir"),
    }
}

fn open_session(levels_file: &Path, save_dir: &Path) -> Result<Session<FsStore>> {
    let levels = Levels::from_file(levels_file, &ParseOptions::default())
        .with_context(|| format!("failed to load levels from {}", levels_file.display()))?;
    let session = Session::new(levels, FsStore::new(save_dir), FsStore::quicksave(save_dir))
        .context("failed to read saved solutions")?;
    debug!(
        "loaded {} levels, solutions in {}",
        session.len(),
        session.store().dir().display()
    );
    Ok(session)
}

/// Convert a 1-indexed level number into an index.
fn level_index(session: &Session<FsStore>, level: usize) -> Result<usize> {
    if level == 0 {
        bail!("level numbers must be at least 1");
    }
    if level > session.len() {
        bail!(
            "level {} not found (file contains {} levels)",
            level,
            session.len()
        );
    }
    Ok(level - 1)
}

fn list(session: &Session<FsStore>) {
    if let Some(comment) = session.comment() {
        println!("{}", comment);
    }
    let max_allowed = session.max_allowed();
    for (index, puzzle) in session.levels().iter().enumerate() {
        let best = match puzzle.best_score() {
            Some(score) => score.to_string(),
            None => "unsolved".to_string(),
        };
        let lock = if index < max_allowed { "" } else { "  locked" };
        println!(
            "level: {:<4}  id: {:<8}  size: {:>2}x{:<2}  best: {}{}",
            puzzle.level(),
            puzzle.fingerprint(),
            puzzle.width(),
            puzzle.height(),
            best,
            lock
        );
    }
}

fn verify(session: &mut Session<FsStore>, index: usize, solution: &str) -> Result<()> {
    let solution = Solution::parse(solution).context("invalid solution")?;
    let mut game = session
        .new_game(index)
        .context("level disappeared from the session")?;
    let mut playback = Playback::new(solution);
    let mut rejected = 0;
    while let Some(result) = playback.tick_with(|dir| session.apply_move(&mut game, dir)) {
        if let Err(err) = result {
            debug!("move {} rejected: {}", playback.position(), err);
            rejected += 1;
        }
    }

    print!("{}", game);
    if game.is_solved() {
        println!("solved in {} (moves/pushes)", game.score());
    } else {
        println!("not solved after {} moves", game.score().moves);
    }
    if rejected > 0 {
        println!(
            "{} of {} moves were rejected",
            rejected,
            playback.source().moves()
        );
    }
    if let Some(best) = session.get(index).and_then(|puzzle| puzzle.best_score()) {
        println!("best: {}", best);
    }
    Ok(())
}

fn status(session: &Session<FsStore>, index: usize, game: &Game) {
    let best = session
        .get(index)
        .and_then(|puzzle| puzzle.best_score())
        .map_or_else(|| "-".to_string(), |score| score.to_string());
    println!(
        "level {}/{}  id {}  moves {}  best {}",
        index + 1,
        session.len(),
        game.fingerprint(),
        game.score(),
        best
    );
}

fn describe(err: MoveError) -> &'static str {
    match err {
        MoveError::OutOfBounds => "edge of the board",
        MoveError::Wall => "wall",
        MoveError::Blocked => "blocked",
        MoveError::AlreadySolved => "already solved",
        MoveError::HistoryFull => "too many moves",
    }
}

/// Apply a line of move letters. Stops at the first letter that is not a move.
fn play_moves(session: &mut Session<FsStore>, index: usize, game: &mut Game, line: &str) {
    for letter in line.chars() {
        let Some(dir) = Direction::from_letter(letter) else {
            println!("unknown command '{}'", letter);
            return;
        };
        let last_unsolved = session.is_last_unsolved(index);
        match session.apply_move(game, dir) {
            Ok(flags) if flags.contains(MoveFlags::SOLVED) => {
                println!("solved in {}", game.score());
                if last_unsolved {
                    println!("every level in this collection is solved");
                }
            }
            Ok(_) => {}
            Err(err) => println!("{}: {}", dir, describe(err)),
        }
    }
}

fn play(session: &mut Session<FsStore>, mut index: usize) -> Result<()> {
    let mut game = session
        .new_game(index)
        .context("level disappeared from the session")?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", game);
        status(session, index, &game);
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "" => {}
            "q" | "quit" => break,
            "z" | "undo" => {
                if !game.undo() {
                    println!("nothing to undo");
                }
            }
            "reset" => {
                if let Some(puzzle) = session.get(index) {
                    game.reset(puzzle);
                }
            }
            "save" => {
                if session.quicksave(&game)? {
                    println!("saved {} moves", game.score().moves);
                } else {
                    println!("nothing to save");
                }
            }
            "load" => match session.quickload(index)? {
                Some((loaded, _)) => game = loaded,
                None => println!("no saved game for this level"),
            },
            "solve" => {
                let best = session
                    .get(index)
                    .and_then(|puzzle| puzzle.best_solution())
                    .cloned();
                match best {
                    Some(solution) => {
                        if let Some(puzzle) = session.get(index) {
                            game.reset(puzzle);
                        }
                        let mut playback = Playback::new(solution);
                        while playback
                            .tick_with(|dir| session.apply_move(&mut game, dir))
                            .is_some()
                        {}
                    }
                    None => println!("no solution available"),
                }
            }
            "export" => print!("{}", LevelText::snapshot(&game)),
            "next" | "prev" => {
                let target = if line.trim() == "next" {
                    index + 1
                } else {
                    index.wrapping_sub(1)
                };
                if target < session.max_allowed() {
                    index = target;
                    game = session
                        .new_game(index)
                        .context("level disappeared from the session")?;
                } else {
                    println!("no level there");
                }
            }
            moves => play_moves(session, index, &mut game, moves),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let save_dir = save_dir(args.save_dir)?;

    match args.command {
        Command::List { levels_file } => {
            let session = open_session(&levels_file, &save_dir)?;
            list(&session);
        }
        Command::Export { levels_file, level } => {
            let session = open_session(&levels_file, &save_dir)?;
            let index = level_index(&session, level)?;
            if let Some(puzzle) = session.get(index) {
                print!("{}", LevelText::puzzle(puzzle));
            }
        }
        Command::Verify {
            levels_file,
            level,
            solution,
        } => {
            let mut session = open_session(&levels_file, &save_dir)?;
            let index = level_index(&session, level)?;
            verify(&mut session, index, &solution)?;
        }
        Command::Play { levels_file, level } => {
            let mut session = open_session(&levels_file, &save_dir)?;
            let index = match level {
                Some(level) => level_index(&session, level)?,
                None => session.first_unsolved(),
            };
            play(&mut session, index)?;
        }
    }
    Ok(())
}
