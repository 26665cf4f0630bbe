mod store;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use encounter_engine::content::builtin_encounter;
use encounter_engine::{
    run_command, turn_order_lines, CombatCommand, EncounterStore, InitiativeRequest, TrackerConfig,
};
use tracing_subscriber::EnvFilter;

use crate::store::FileStore;

#[derive(Subcommand)]
enum ConditionOp {
    /// Add a condition (stored lower-case)
    Add { participant: String, condition: String },
    /// Remove a condition
    Remove { participant: String, condition: String },
}

#[derive(Subcommand)]
enum Cmd {
    /// Copy a built-in encounter into the store
    Init {
        /// Built-in encounter id
        #[arg(long, default_value = "goblin_ambush")]
        builtin: String,
        /// Overwrite an existing encounter file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the turn order (or the raw encounter with --json)
    Show {
        encounter: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Roll initiative for everyone (default) or one participant
    Roll {
        encounter: String,
        #[arg(long, default_value_t = false, conflicts_with = "participant")]
        all: bool,
        #[arg(long)]
        participant: Option<String>,
    },
    /// Reroll everyone, or one participant, keeping the current turn
    Reroll {
        encounter: String,
        #[arg(long)]
        participant: Option<String>,
    },
    /// Start combat with the rolled order
    Start { encounter: String },
    /// Advance to the next turn
    Next { encounter: String },
    /// Step back to the previous turn
    Prev { encounter: String },
    Pause { encounter: String },
    Resume { encounter: String },
    /// End combat and clear the turn order
    End { encounter: String },
    /// Mark a participant as delaying
    Delay { encounter: String, participant: String },
    /// Record a readied action and its trigger
    Ready { encounter: String, participant: String, trigger: String },
    /// Clear a participant's delay/ready markers
    Resolve { encounter: String, participant: String },
    Damage {
        encounter: String,
        participant: String,
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },
    Heal {
        encounter: String,
        participant: String,
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },
    /// Grant temporary HP (keeps the larger pool)
    TempHp {
        encounter: String,
        participant: String,
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },
    /// Drop all temporary HP
    ClearTempHp { encounter: String, participant: String },
    SetHp {
        encounter: String,
        participant: String,
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },
    SetMaxHp {
        encounter: String,
        participant: String,
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },
    Condition {
        encounter: String,
        #[command(subcommand)]
        op: ConditionOp,
    },
}

#[derive(Parser)]
#[command(name = "encounter-cli")]
#[command(about = "Initiative and HP tracker for 5e encounters")]
struct Cli {
    /// YAML or JSON tracker config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding <id>.json encounter files
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,
    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// tracing filter, e.g. "encounter_engine=debug"
    #[arg(long, global = true)]
    log: Option<String>,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maps a mutating subcommand onto its engine command.
fn to_command(cmd: Cmd) -> Result<(String, CombatCommand)> {
    use CombatCommand as C;
    let pair = match cmd {
        Cmd::Roll { encounter, all, participant } => {
            let request = match (all, participant) {
                (false, Some(participant_id)) => InitiativeRequest::RollSingle { participant_id },
                _ => InitiativeRequest::RollAll,
            };
            (encounter, C::RollInitiative { request })
        }
        Cmd::Reroll { encounter, participant } => (
            encounter,
            C::RollInitiative { request: InitiativeRequest::Reroll { participant_id: participant } },
        ),
        Cmd::Start { encounter } => (encounter, C::Start),
        Cmd::Next { encounter } => (encounter, C::NextTurn),
        Cmd::Prev { encounter } => (encounter, C::PreviousTurn),
        Cmd::Pause { encounter } => (encounter, C::Pause),
        Cmd::Resume { encounter } => (encounter, C::Resume),
        Cmd::End { encounter } => (encounter, C::End),
        Cmd::Delay { encounter, participant } => (encounter, C::Delay { participant_id: participant }),
        Cmd::Ready { encounter, participant, trigger } => {
            (encounter, C::Ready { participant_id: participant, trigger })
        }
        Cmd::Resolve { encounter, participant } => {
            (encounter, C::ResolvePending { participant_id: participant })
        }
        Cmd::Damage { encounter, participant, amount } => {
            (encounter, C::Damage { participant_id: participant, amount })
        }
        Cmd::Heal { encounter, participant, amount } => {
            (encounter, C::Heal { participant_id: participant, amount })
        }
        Cmd::TempHp { encounter, participant, amount } => {
            (encounter, C::SetTemporaryHp { participant_id: participant, amount })
        }
        Cmd::ClearTempHp { encounter, participant } => {
            (encounter, C::ClearTemporaryHp { participant_id: participant })
        }
        Cmd::SetHp { encounter, participant, amount } => {
            (encounter, C::SetCurrentHp { participant_id: participant, amount })
        }
        Cmd::SetMaxHp { encounter, participant, amount } => {
            (encounter, C::SetMaxHp { participant_id: participant, amount })
        }
        Cmd::Condition { encounter, op } => match op {
            ConditionOp::Add { participant, condition } => {
                (encounter, C::AddCondition { participant_id: participant, condition })
            }
            ConditionOp::Remove { participant, condition } => {
                (encounter, C::RemoveCondition { participant_id: participant, condition })
            }
        },
        Cmd::Init { .. } | Cmd::Show { .. } => bail!("not a combat command"),
    };
    Ok(pair)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(dir) = cli.store_dir {
        cfg.store_dir = dir;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    init_tracing(cli.log.as_deref().or(cfg.log_filter.as_deref()));

    let mut store = FileStore::new(&cfg.store_dir);
    match cli.cmd {
        Cmd::Init { builtin, force } => {
            let encounter = builtin_encounter(&builtin)?;
            if store.exists(&encounter.id) && !force {
                bail!("encounter '{}' already exists (use --force to overwrite)", encounter.id);
            }
            store.save(&encounter)?;
            println!("created {} ({} participants)", encounter.id, encounter.participants.len());
        }
        Cmd::Show { encounter, json } => {
            let encounter = store.load(&encounter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&encounter)?);
            } else {
                for line in turn_order_lines(&encounter) {
                    println!("{}", line);
                }
            }
        }
        cmd => {
            let (id, command) = to_command(cmd)?;
            let mut dice = cfg.dice();
            let encounter = run_command(&mut store, &id, &command, &mut dice, &cfg)?;
            for line in turn_order_lines(&encounter) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
