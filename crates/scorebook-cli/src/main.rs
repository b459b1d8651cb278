//! Scorebook CLI
//!
//! Starts games into file-backed save slots and inspects them: score sheet,
//! play-by-play replay and flattened ledger rows.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scorebook_core::collab::{LedgerSink, ScoreSheet, ScoreSheetExporter};
use scorebook_core::derive::{box_score, BoxCell, LedgerRow};
use scorebook_core::persistence::{ClubId, FileSlotStore, SlotId};
use scorebook_core::{
    GameSession, GameSetup, PlayerRegistry, SessionConfig, Side, SidePair, SlotKey, TeamSheet,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Root directory of the slot store
    #[clap(long, default_value = "slots")]
    store: PathBuf,

    /// Club owning the slots
    #[clap(long, default_value_t = 1)]
    club: u64,

    /// Session config as JSON; defaults apply to missing fields
    #[clap(long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List occupied slots
    Slots,
    /// Start a game from a JSON game file, overwriting the slot
    Start {
        /// Slot number (1-20)
        #[clap(long)]
        slot: u8,
        /// Game file: setup, sheets and registry
        file: PathBuf,
    },
    /// Print the score sheet of a slot
    Show {
        /// Slot number (1-20)
        #[clap(long)]
        slot: u8,
    },
    /// Print the play-by-play
    Replay {
        /// Slot number (1-20)
        #[clap(long)]
        slot: u8,
    },
    /// Write ledger rows as JSON lines to stdout
    Ledger {
        /// Slot number (1-20)
        #[clap(long)]
        slot: u8,
        /// Game id the rows are keyed by
        #[clap(long)]
        game_id: String,
    },
    /// Delete a slot
    Discard {
        /// Slot number (1-20)
        #[clap(long)]
        slot: u8,
    },
}

/// Everything needed to start a game.
#[derive(Debug, Deserialize)]
struct GameFile {
    setup: GameSetup,
    sheets: SidePair<TeamSheet>,
    #[serde(default)]
    registry: PlayerRegistry,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let store = FileSlotStore::new(&args.store);
    let club = ClubId::new(args.club);

    match args.cmd {
        Command::Slots => {
            for slot in store.list_slots(club).context("listing slots")? {
                println!("{slot}");
            }
        }
        Command::Start { slot, file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let game: GameFile = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            let key = slot_key(club, slot)?;
            let report = GameSession::start(
                store,
                key,
                config,
                game.setup,
                game.registry,
                game.sheets,
            )
            .context("starting game")?;
            if report.save.is_failed() {
                bail!("game started but {key} could not be written: {:?}", report.save);
            }
            info!(%key, "game started");
            println!("started {key}");
        }
        Command::Show { slot } => {
            let session = open(store, club, slot)?;
            let mut sheet = ScoreSheet::from_game(session.game());
            // Re-derive the grids at the requested width.
            let events = session.game().log().events();
            sheet.box_scores = SidePair::new(
                box_score(events, Side::Away, config.regulation_innings),
                box_score(events, Side::Home, config.regulation_innings),
            );
            print!("{}", TextExporter.export(&sheet)?);
        }
        Command::Replay { slot } => {
            let session = open(store, club, slot)?;
            let game = session.game();
            for line in game.replay() {
                println!(
                    "#{:<4} {} {} {:>2}-{:<2} {} out  {:<20} {} {}{}",
                    line.seq,
                    line.half,
                    line.inning,
                    line.score_before.away,
                    line.score_before.home,
                    line.outs_before,
                    game.registry().display_name(line.actor),
                    line.description,
                    line.pitches,
                    if line.rbi > 0 {
                        format!(" ({} RBI)", line.rbi)
                    } else {
                        String::new()
                    },
                );
            }
        }
        Command::Ledger { slot, game_id } => {
            let session = open(store, club, slot)?;
            let rows = session.game().ledger(&game_id);
            JsonLines(io::stdout().lock())
                .upload(&rows)
                .context("writing ledger rows")?;
        }
        Command::Discard { slot } => {
            let session = open(store, club, slot)?;
            let key = session.key();
            session.discard().context("deleting slot")?;
            println!("discarded {key}");
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn slot_key(club: ClubId, slot: u8) -> Result<SlotKey> {
    Ok(SlotKey::new(club, SlotId::new(slot)?))
}

fn open(store: FileSlotStore, club: ClubId, slot: u8) -> Result<GameSession<FileSlotStore>> {
    let key = slot_key(club, slot)?;
    GameSession::load(store, key)
        .with_context(|| format!("loading {key}"))?
        .with_context(|| format!("{key} is empty"))
}

// =============================================================================
// Collaborators
// =============================================================================

/// Plain-text score sheet.
struct TextExporter;

impl ScoreSheetExporter for TextExporter {
    type Output = String;
    type Error = std::fmt::Error;

    fn export(&self, sheet: &ScoreSheet) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        let names = &sheet.registry;
        writeln!(
            out,
            "{}  {} at {}",
            sheet.setup.date,
            sheet.setup.team_name(Side::Away),
            sheet.setup.team_name(Side::Home)
        )?;

        let line = &sheet.line_score;
        write!(out, "\n{:<12}", "")?;
        for inning in 1..=line.innings() {
            write!(out, "{inning:>3}")?;
        }
        writeln!(out, "  HC   R   H   E")?;
        for side in Side::BOTH {
            write!(out, "{:<12}", sheet.setup.team_name(side))?;
            for runs in line.runs.get(side) {
                match runs {
                    Some(runs) => write!(out, "{runs:>3}")?,
                    None => write!(out, "{:>3}", "-")?,
                }
            }
            writeln!(
                out,
                "{:>4}{:>4}{:>4}{:>4}",
                line.handicap.get(side),
                line.total(side),
                line.hits.get(side),
                line.errors.get(side)
            )?;
        }

        for side in Side::BOTH {
            let grid = sheet.box_scores.get(side);
            writeln!(out, "\n{}", sheet.setup.team_name(side))?;
            for row in &grid.rows {
                let slot = if row.segment == 0 {
                    format!("{}.", row.slot + 1)
                } else {
                    String::new()
                };
                write!(
                    out,
                    "{slot:<4}{:<20}{:<5}",
                    names.display_name(row.player),
                    row.position.to_string()
                )?;
                for cell in &row.cells {
                    match cell {
                        BoxCell::Result(result) => write!(out, " | {}", result.label)?,
                        BoxCell::Empty => write!(out, " | ")?,
                        BoxCell::Inactive => write!(out, " | x")?,
                    }
                }
                let t = &row.totals;
                writeln!(
                    out,
                    " || {}-{} {} RBI {} R {} BB {} K",
                    t.hits, t.at_bats, t.rbi, t.runs, t.walks, t.strikeouts
                )?;
            }

            writeln!(
                out,
                "  {:<20}{:>6}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}",
                "Pitching", "IP", "PC", "H", "R", "ER", "BB", "K"
            )?;
            let decisions = sheet.decisions.get(side);
            for pitcher in sheet.pitching.get(side) {
                let mark = match decisions.decision_of(pitcher.pitcher) {
                    Some(decision) => format!(" ({decision:?})"),
                    None => String::new(),
                };
                writeln!(
                    out,
                    "  {:<20}{:>6}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{mark}",
                    names.display_name(pitcher.pitcher),
                    pitcher.innings.to_string(),
                    pitcher.pitches,
                    pitcher.hits,
                    pitcher.runs,
                    pitcher.earned_runs,
                    pitcher.walks,
                    pitcher.strikeouts
                )?;
            }
        }
        Ok(out)
    }
}

/// Writes each row as one JSON object per line.
struct JsonLines<W>(W);

impl<W: Write> LedgerSink for JsonLines<W> {
    type Error = io::Error;

    fn upload(&mut self, rows: &[LedgerRow]) -> Result<(), io::Error> {
        for row in rows {
            serde_json::to_writer(&mut self.0, row)?;
            self.0.write_all(b"\n")?;
        }
        self.0.flush()
    }
}
