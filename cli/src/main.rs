use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use dutywheel_engine::{layout, SpinLedger, SpinSession, UniformAngleSampler, FULL_TURN};
use dutywheel_roster::FileRoster;

#[derive(Parser, Debug)]
#[command(name = "dutywheel", version, about = "Weighted wheel deciding who fetches the coffee")]
struct Cli {
    /// Roster document path.
    #[arg(long, global = true, default_value = ".dutywheel/roster.json")]
    roster: PathBuf,
    /// Spin history path.
    #[arg(long, global = true, default_value = ".dutywheel/spins.jsonl")]
    ledger: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Adds an entrant to the wheel.
    Add {
        /// Display name, unique case-insensitively.
        name: String,
    },
    /// Removes an entrant by name.
    Remove {
        /// Name of the entrant to drop (case-insensitive).
        name: String,
    },
    /// Lists entrants with their wins and current share of the wheel.
    List,
    /// Spins the wheel and records the winner.
    Spin {
        /// Fixed RNG seed for a reproducible draw.
        #[arg(long)]
        seed: Option<u64>,
        /// Settle delay in milliseconds, matching a rendered animation.
        #[arg(long, default_value_t = 0)]
        settle_ms: u64,
    },
    /// Takes one win back from an entrant.
    Demote {
        /// Name of the entrant (case-insensitive).
        name: String,
    },
    /// Resets every win counter to zero.
    Reset,
    /// Shows the most recent spins.
    History {
        /// Number of entries to display.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let roster = FileRoster::open(&cli.roster)
        .with_context(|| format!("opening roster {}", cli.roster.display()))?;

    match cli.command {
        Commands::Add { name } => {
            let entrant = roster.add(&name)?;
            println!("added {} ({})", entrant.name, entrant.id);
        }
        Commands::Remove { name } => match roster.find_by_name(&name) {
            Some(entrant) => {
                roster.remove(entrant.id)?;
                println!("removed {}", entrant.name);
            }
            None => bail!("no entrant named `{name}`"),
        },
        Commands::List => {
            let entrants = roster.snapshot();
            if entrants.is_empty() {
                println!("roster is empty");
                return Ok(());
            }
            let segments = layout(&entrants);
            for (entrant, segment) in entrants.iter().zip(&segments) {
                println!(
                    "{:<20} wins={:<4} share={:>5.1}%",
                    entrant.name,
                    entrant.wins,
                    segment.segment_angle() / FULL_TURN * 100.0,
                );
            }
        }
        Commands::Spin { seed, settle_ms } => {
            let sampler = seed.map_or_else(UniformAngleSampler::from_entropy, |seed| {
                UniformAngleSampler::seeded(seed)
            });
            let ledger = SpinLedger::open(&cli.ledger)
                .with_context(|| format!("opening spin history {}", cli.ledger.display()))?;
            let session = SpinSession::new(roster, sampler)
                .with_settle_delay(Duration::from_millis(settle_ms))
                .with_ledger(ledger);

            let runtime = Runtime::new()?;
            match runtime.block_on(session.spin())? {
                Some(outcome) => println!(
                    "{} gets the coffee (landed at {:.1} deg, total rotation {:.0} deg)",
                    outcome.winner_label, outcome.final_rotation, outcome.new_cumulative_rotation,
                ),
                None => println!("a spin is already in flight"),
            }
        }
        Commands::Demote { name } => match roster.find_by_name(&name) {
            Some(entrant) => {
                let wins = roster.decrement_wins(entrant.id)?;
                println!("{} now has {wins} wins", entrant.name);
            }
            None => bail!("no entrant named `{name}`"),
        },
        Commands::Reset => {
            roster.reset_wins()?;
            println!("all win counters reset");
        }
        Commands::History { limit } => {
            let ledger = SpinLedger::open(&cli.ledger)
                .with_context(|| format!("opening spin history {}", cli.ledger.display()))?;
            let records = ledger.load_recent(limit);
            if records.is_empty() {
                println!("no spins recorded yet");
                return Ok(());
            }
            for record in records {
                println!(
                    "{}  {:<20} landed {:>6.1} deg",
                    record.spun_at.format("%Y-%m-%d %H:%M:%S"),
                    record.winner_label,
                    record.final_rotation,
                );
            }
        }
    }

    Ok(())
}
