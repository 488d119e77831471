//! Host tool for the LED panel simulations.
//!
//! `panel stars` and `panel snake` run a simulation on an 8x8 panel and print the
//! same `META:`/`FRAME:` lines the firmware writes to its serial console.
//! `panel viz` reads such lines and draws each frame in the terminal:
//!
//! ```text
//! panel stars --ticks 50 --serpentine | panel viz
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use led_panel_games::frame::{BLACK, Frame1d, RGB8};
use led_panel_games::panel::export::{
    ColorOrder, FRAME_PREFIX, FrameCsv, META_PREFIX, PanelMeta, parse_frame_csv,
};
use led_panel_games::panel::{PanelConfig, Rotation, Wiring};
use led_panel_games::particles::ParticleSimulator;
use led_panel_games::snake::{Direction, MoveOutcome, SnakeGame};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const SIZE: usize = 8;
const LEN: usize = SIZE * SIZE;

const ASCII_RAMP: &[u8] = b" .,:;ox%#@";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(
    name = "panel",
    version,
    about = "Run LED panel simulations headlessly and view their frame streams"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print frames of the falling-stars simulation.
    Stars {
        /// Number of ticks to simulate.
        #[arg(long, default_value_t = 100)]
        ticks: usize,
        /// Random seed.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[command(flatten)]
        panel: PanelArgs,
    },
    /// Print frames of a snake game driven by a fixed move list.
    Snake {
        /// Moves to replay in a loop, as letters U, R, D and L.
        #[arg(long, default_value = "RRRRDDDDLLLLUUUU")]
        moves: String,
        /// Number of moves to play.
        #[arg(long, default_value_t = 64)]
        ticks: usize,
        /// Random seed for food placement.
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[command(flatten)]
        panel: PanelArgs,
    },
    /// Print one calibration frame: a colored marker in each corner.
    Calibrate {
        #[command(flatten)]
        panel: PanelArgs,
    },
    /// Draw `META:`/`FRAME:` lines from stdin (or a file) as terminal grids.
    Viz {
        /// Read from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Use ASCII brightness glyphs instead of ANSI colors.
        #[arg(long)]
        ascii: bool,
        /// Leave out the row and column labels.
        #[arg(long)]
        no_grid: bool,
    },
}

#[derive(Args, Debug)]
struct PanelArgs {
    /// Clockwise rotation in degrees: 0, 90, 180 or 270.
    #[arg(long, default_value_t = 0)]
    rotation: u16,
    /// Mirror columns.
    #[arg(long)]
    flip_x: bool,
    /// Mirror rows.
    #[arg(long)]
    flip_y: bool,
    /// Odd rows are wired right-to-left.
    #[arg(long)]
    serpentine: bool,
    /// Color order reported in the metadata (RGB, GRB, ...).
    #[arg(long, default_value = "RGB")]
    color_order: String,
}

impl PanelArgs {
    fn meta(&self) -> Result<PanelMeta> {
        let rotation = Rotation::try_from(self.rotation)?;
        let Some(color_order) = ColorOrder::from_name(&self.color_order) else {
            bail!("unknown color order `{}`", self.color_order);
        };
        let wiring = if self.serpentine {
            Wiring::Serpentine
        } else {
            Wiring::Progressive
        };
        let panel = PanelConfig::new(SIZE, SIZE)
            .with_rotation(rotation)
            .with_flip_x(self.flip_x)
            .with_flip_y(self.flip_y)
            .with_wiring(wiring);
        Ok(PanelMeta::new(panel, color_order))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Stars { ticks, seed, panel } => stars_command(&mut out, &panel.meta()?, ticks, seed)?,
        Command::Snake {
            moves,
            ticks,
            seed,
            panel,
        } => snake_command(&mut out, &panel.meta()?, &moves, ticks, seed)?,
        Command::Calibrate { panel } => calibrate_command(&mut out, &panel.meta()?)?,
        Command::Viz {
            file,
            ascii,
            no_grid,
        } => {
            let style = GridStyle {
                ascii,
                labels: !no_grid,
            };
            match file {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    viz_command(&mut out, BufReader::new(file), style)?;
                }
                None => viz_command(&mut out, io::stdin().lock(), style)?,
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn stars_command(out: &mut impl Write, meta: &PanelMeta, ticks: usize, seed: u64) -> Result<()> {
    writeln!(out, "{meta}")?;
    let mut stars: ParticleSimulator<SmallRng, SIZE, SIZE> =
        ParticleSimulator::new(meta.panel, SmallRng::seed_from_u64(seed));
    let mut frame = Frame1d::<LEN>::new();
    for _ in 0..ticks {
        stars.tick();
        stars.render(&mut frame);
        writeln!(out, "{}", FrameCsv::new(&meta.panel, frame.as_slice()))?;
    }
    Ok(())
}

fn snake_command(
    out: &mut impl Write,
    meta: &PanelMeta,
    moves: &str,
    ticks: usize,
    seed: u64,
) -> Result<()> {
    let directions = moves
        .chars()
        .filter(|letter| !letter.is_whitespace())
        .map(parse_direction)
        .collect::<Result<Vec<_>>>()?;
    if directions.is_empty() {
        bail!("--moves needs at least one of U, R, D, L");
    }

    writeln!(out, "{meta}")?;
    let mut game: SnakeGame<SmallRng, SIZE, SIZE> =
        SnakeGame::new(meta.panel, SmallRng::seed_from_u64(seed));
    let mut frame = Frame1d::<LEN>::new();
    game.render(&mut frame);
    writeln!(out, "{}", FrameCsv::new(&meta.panel, frame.as_slice()))?;

    for &direction in directions.iter().cycle().take(ticks) {
        match game.move_snake(direction) {
            MoveOutcome::GameOver(flash) => {
                for (flash_frame, _duration) in flash.frames::<LEN>() {
                    writeln!(out, "{}", FrameCsv::new(&meta.panel, flash_frame.as_slice()))?;
                }
                eprintln!("game over at length {}", game.len());
                return Ok(());
            }
            MoveOutcome::Blocked => return Ok(()),
            MoveOutcome::Normal | MoveOutcome::Ate => {}
        }
        game.render(&mut frame);
        writeln!(out, "{}", FrameCsv::new(&meta.panel, frame.as_slice()))?;
    }
    Ok(())
}

fn parse_direction(letter: char) -> Result<Direction> {
    match letter.to_ascii_uppercase() {
        'U' => Ok(Direction::Up),
        'R' => Ok(Direction::Right),
        'D' => Ok(Direction::Down),
        'L' => Ok(Direction::Left),
        other => bail!("unknown move `{other}`; expected U, R, D or L"),
    }
}

fn calibrate_command(out: &mut impl Write, meta: &PanelMeta) -> Result<()> {
    writeln!(out, "{meta}")?;
    let mut frame = Frame1d::<LEN>::new();
    meta.panel.draw_calibration(&mut frame);
    writeln!(out, "{}", FrameCsv::new(&meta.panel, frame.as_slice()))?;
    Ok(())
}

#[derive(Clone, Copy, Debug)]
struct GridStyle {
    ascii: bool,
    labels: bool,
}

fn viz_command(out: &mut impl Write, input: impl BufRead, style: GridStyle) -> Result<()> {
    let mut meta: Option<PanelMeta> = None;
    let mut frame_number = 0_usize;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(META_PREFIX) {
            let parsed = PanelMeta::parse(line)?;
            let panel = &parsed.panel;
            writeln!(
                out,
                "{}x{} {} rotation={} flip_x={} flip_y={} color={}",
                panel.width(),
                panel.height(),
                panel.wiring(),
                panel.rotation().degrees(),
                panel.flip_x(),
                panel.flip_y(),
                parsed.color_order,
            )?;
            meta = Some(parsed);
            continue;
        }

        // Frames before any metadata are read as an unrotated 8x8 panel.
        let panel = meta.map_or_else(|| PanelConfig::new(SIZE, SIZE), |meta| meta.panel);
        let mut pixels = vec![BLACK; panel.len()];
        match parse_frame_csv(&panel, line, &mut pixels) {
            Ok(()) => {
                frame_number += 1;
                writeln!(out, "frame {frame_number}")?;
                write_grid(out, &panel, &pixels, style)?;
            }
            Err(err) if line.starts_with(FRAME_PREFIX) => eprintln!("skipping frame: {err}"),
            // Other console output.
            Err(_) => {}
        }
    }
    Ok(())
}

fn write_grid(
    out: &mut impl Write,
    panel: &PanelConfig,
    pixels: &[RGB8],
    style: GridStyle,
) -> Result<()> {
    let width = panel.width();
    let rule = "-".repeat(2 * width - 1);
    if style.labels {
        let header = (0..width)
            .map(|x_index| (x_index % 10).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "  {header}")?;
        writeln!(out, "  {rule}")?;
    }

    for y_index in 0..panel.height() {
        if style.labels {
            write!(out, "{}|", y_index % 10)?;
        }
        for x_index in 0..width {
            let color = pixels
                .get(panel.xy_to_index(x_index, y_index))
                .copied()
                .unwrap_or(BLACK);
            if style.ascii {
                write!(out, "{}", ascii_glyph(color))?;
            } else {
                write!(
                    out,
                    "\x1b[48;2;{};{};{}m  {ANSI_RESET}",
                    color.r, color.g, color.b
                )?;
            }
        }
        if style.labels {
            write!(out, "|")?;
        }
        writeln!(out)?;
    }

    if style.labels {
        writeln!(out, "  {rule}")?;
    }
    Ok(())
}

fn ascii_glyph(color: RGB8) -> char {
    let luminance = 0.0722_f32.mul_add(
        f32::from(color.b),
        0.2126_f32.mul_add(f32::from(color.r), 0.7152 * f32::from(color.g)),
    );
    let index = ((luminance / 255.0) * (ASCII_RAMP.len() - 1) as f32) as usize;
    char::from(ASCII_RAMP[index.min(ASCII_RAMP.len() - 1)])
}
