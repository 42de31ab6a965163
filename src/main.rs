//! # Encounter Forge Main Entry Point
//!
//! Command-line front end: encounter tracking and magic item design over the
//! JSON snapshots in the data directory.

use clap::{Parser, Subcommand, ValueEnum};
use encounter_forge::{
    balance_verdict, config, parse_quick_add, power_details, Bestiary, Creature, Encounter,
    EncounterLibrary, ForgeError, ForgeResult, GeminiClient, ItemCollection, ItemForge,
    JsonStore, LldmConfig, LootParameters, MagicItem, QuickLootParameters, Rarity, TextRenderer,
};
use rand::{rngs::StdRng, SeedableRng};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Command line arguments for Encounter Forge.
#[derive(Parser, Debug)]
#[command(name = "encounter-forge")]
#[command(about = "Tabletop combat tracker and magic item balance forge")]
#[command(version)]
struct Args {
    /// Directory holding the JSON snapshots
    #[arg(long, default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Disable colored hit-point bars
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track combat encounters
    Encounter {
        #[command(subcommand)]
        action: EncounterCommand,
    },
    /// Score and generate magic items
    Loot {
        #[command(subcommand)]
        action: LootCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EncounterCommand {
    /// Create an empty encounter
    New { name: String },
    /// List saved encounters
    List,
    /// Show an encounter
    Show { name: String },
    /// Delete a saved encounter
    Delete { name: String },
    /// Add a creature
    Add {
        name: String,
        #[arg(long)]
        creature: String,
        #[arg(long)]
        hp: i32,
        #[arg(long, default_value_t = config::DEFAULT_ARMOR_CLASS)]
        ac: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        init_mod: i32,
        #[arg(long)]
        player: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add creatures from "name, hp, ac[, init_mod]" lines (newline or ';' separated)
    QuickAdd { name: String, text: String },
    /// Add a creature from the monster templates
    Spawn { name: String, monster: String },
    /// Roll initiative for everyone and start combat
    Roll {
        name: String,
        /// Seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Advance to the next turn
    Next { name: String },
    /// Go back one turn
    Prev { name: String },
    /// Back to round 1, out of combat
    Reset { name: String },
    /// Damage a creature
    Damage { name: String, index: usize, amount: i32 },
    /// Heal a creature
    Heal { name: String, index: usize, amount: i32 },
    /// Restore a creature to max HP
    FullHeal { name: String, index: usize },
    /// Add or remove a condition
    Condition {
        name: String,
        index: usize,
        op: ConditionOp,
        label: String,
    },
    /// Remove a creature
    Remove { name: String, index: usize },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConditionOp {
    Add,
    Remove,
}

#[derive(Subcommand, Debug)]
enum LootCommand {
    /// Show the power breakdown for a parameters file
    Score { params: PathBuf },
    /// Generate an item from a parameters file
    Generate {
        params: PathBuf,
        #[arg(long)]
        save: bool,
        /// Overrides GEMINI_API_KEY
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Generate an item from just a rarity and a theme
    Quick {
        #[arg(long)]
        rarity: Rarity,
        #[arg(long, default_value = "")]
        theme: String,
        #[arg(long)]
        save: bool,
        /// Overrides GEMINI_API_KEY
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List saved items
    List,
    /// Delete a saved item by index
    Delete { index: usize },
}

fn main() -> ExitCode {
    let args = Args::parse();
    initialize_logging(&args.log_level);
    log::debug!("Encounter Forge v{}", encounter_forge::VERSION);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes logging. `RUST_LOG` wins over `--log-level` when set.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        tracing::debug!("tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_target(false)
            .init();
    }
}

fn run(args: Args) -> ForgeResult<()> {
    let store = JsonStore::new(&args.data_dir);
    let renderer = TextRenderer::new(!args.no_color && std::io::stdout().is_terminal());

    match args.command {
        Command::Encounter { action } => run_encounter(action, &store, &renderer),
        Command::Loot { action } => run_loot(action, &store, &renderer),
    }
}

fn run_encounter(
    action: EncounterCommand,
    store: &JsonStore,
    renderer: &TextRenderer,
) -> ForgeResult<()> {
    let library = EncounterLibrary::new(store.clone());

    match action {
        EncounterCommand::New { name } => {
            if library.load(&name).is_some() {
                return Err(ForgeError::InvalidAction(format!(
                    "encounter '{}' already exists",
                    name
                )));
            }
            let encounter = Encounter::new(name);
            library.save(&encounter)?;
            print!("{}", renderer.encounter(&encounter));
        }
        EncounterCommand::List => {
            let names = library.names();
            if names.is_empty() {
                println!("(no saved encounters)");
            }
            for name in names {
                println!("{}", name);
            }
        }
        EncounterCommand::Show { name } => {
            print!("{}", renderer.encounter(&load_encounter(&library, &name)?));
        }
        EncounterCommand::Delete { name } => {
            if !library.delete(&name)? {
                return Err(unknown_encounter(&name));
            }
            println!("Deleted '{}'", name);
        }
        EncounterCommand::Add {
            name,
            creature,
            hp,
            ac,
            init_mod,
            player,
            notes,
        } => update_encounter(&library, renderer, &name, |encounter| {
            let mut new = Creature::at_full_health(creature, hp, ac)?
                .with_initiative_modifier(init_mod);
            if let Some(notes) = notes {
                new = new.with_notes(notes);
            }
            if player {
                new = new.as_player();
            }
            encounter.add_creature(new);
            Ok(())
        })?,
        EncounterCommand::QuickAdd { name, text } => {
            update_encounter(&library, renderer, &name, |encounter| {
                let outcome = parse_quick_add(&text.replace(';', "\n"));
                for rejected in &outcome.rejected {
                    eprintln!("skipped: {}", rejected);
                }
                for creature in outcome.creatures {
                    encounter.add_creature(creature);
                }
                Ok(())
            })?
        }
        EncounterCommand::Spawn { name, monster } => {
            let bestiary = Bestiary::load(store);
            let template = bestiary.find(&monster).ok_or_else(|| {
                ForgeError::InvalidAction(format!(
                    "no monster named '{}' in {}",
                    monster,
                    store.path_for(config::SRD_MONSTERS_KEY).display()
                ))
            })?;
            let creature = template.spawn()?;
            update_encounter(&library, renderer, &name, |encounter| {
                encounter.add_creature(creature);
                Ok(())
            })?
        }
        EncounterCommand::Roll { name, seed } => {
            update_encounter(&library, renderer, &name, |encounter| {
                match seed {
                    Some(seed) => encounter.roll_all_initiative(&mut StdRng::seed_from_u64(seed)),
                    None => encounter.roll_all_initiative(&mut rand::thread_rng()),
                }
                Ok(())
            })?
        }
        EncounterCommand::Next { name } => update_encounter(&library, renderer, &name, |e| {
            e.next_turn();
            Ok(())
        })?,
        EncounterCommand::Prev { name } => update_encounter(&library, renderer, &name, |e| {
            e.prev_turn();
            Ok(())
        })?,
        EncounterCommand::Reset { name } => update_encounter(&library, renderer, &name, |e| {
            e.reset_combat();
            Ok(())
        })?,
        EncounterCommand::Damage {
            name,
            index,
            amount,
        } => update_encounter(&library, renderer, &name, |e| {
            creature_at(e, index)?.apply_damage(amount);
            Ok(())
        })?,
        EncounterCommand::Heal {
            name,
            index,
            amount,
        } => update_encounter(&library, renderer, &name, |e| {
            creature_at(e, index)?.apply_healing(amount);
            Ok(())
        })?,
        EncounterCommand::FullHeal { name, index } => {
            update_encounter(&library, renderer, &name, |e| {
                creature_at(e, index)?.full_heal();
                Ok(())
            })?
        }
        EncounterCommand::Condition {
            name,
            index,
            op,
            label,
        } => update_encounter(&library, renderer, &name, |e| {
            let condition = canonical_condition(&label)?;
            let creature = creature_at(e, index)?;
            match op {
                ConditionOp::Add => {
                    if !creature.conditions.iter().any(|c| c == condition) {
                        creature.add_condition(condition);
                    }
                }
                ConditionOp::Remove => {
                    if !creature.remove_condition(condition) {
                        return Err(ForgeError::InvalidAction(format!(
                            "{} is not {}",
                            creature.name, condition
                        )));
                    }
                }
            }
            Ok(())
        })?,
        EncounterCommand::Remove { name, index } => {
            update_encounter(&library, renderer, &name, |e| {
                e.remove_creature(index)
                    .map(|_| ())
                    .ok_or_else(|| no_creature(index))
            })?
        }
    }

    Ok(())
}

/// Loads the named encounter, applies `change`, prints it and saves it.
fn update_encounter(
    library: &EncounterLibrary,
    renderer: &TextRenderer,
    name: &str,
    change: impl FnOnce(&mut Encounter) -> ForgeResult<()>,
) -> ForgeResult<()> {
    let mut encounter = load_encounter(library, name)?;
    change(&mut encounter)?;
    print!("{}", renderer.encounter(&encounter));
    library.save(&encounter)
}

fn load_encounter(library: &EncounterLibrary, name: &str) -> ForgeResult<Encounter> {
    library.load(name).ok_or_else(|| unknown_encounter(name))
}

fn creature_at(encounter: &mut Encounter, index: usize) -> ForgeResult<&mut Creature> {
    encounter.creature_mut(index).ok_or_else(|| no_creature(index))
}

fn canonical_condition(label: &str) -> ForgeResult<&'static str> {
    config::CONDITIONS
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(label.trim()))
        .ok_or_else(|| {
            ForgeError::InvalidAction(format!(
                "unknown condition '{}'; expected one of: {}",
                label,
                config::CONDITIONS.join(", ")
            ))
        })
}

fn unknown_encounter(name: &str) -> ForgeError {
    ForgeError::InvalidAction(format!("no saved encounter named '{}'", name))
}

fn no_creature(index: usize) -> ForgeError {
    ForgeError::InvalidAction(format!("no creature at index {}", index))
}

fn run_loot(action: LootCommand, store: &JsonStore, renderer: &TextRenderer) -> ForgeResult<()> {
    let collection = ItemCollection::new(store.clone());

    match action {
        LootCommand::Score { params } => {
            let params = read_params(&params)?;
            print!(
                "{}",
                renderer.power_details(
                    &power_details(&params),
                    params.rarity,
                    balance_verdict(&params)
                )
            );
        }
        LootCommand::Generate {
            params,
            save,
            api_key,
        } => {
            let params = read_params(&params)?;
            let item = forge(api_key)?.generate_item(&params)?;
            finish_item(&collection, renderer, &item, save)?;
        }
        LootCommand::Quick {
            rarity,
            theme,
            save,
            api_key,
        } => {
            let params = QuickLootParameters {
                rarity,
                theme_description: theme,
            };
            let item = forge(api_key)?.generate_quick_item(&params)?;
            finish_item(&collection, renderer, &item, save)?;
        }
        LootCommand::List => print!("{}", renderer.item_list(&collection.list())),
        LootCommand::Delete { index } => match collection.delete(index)? {
            Some(item) => println!("Deleted '{}'", item.name),
            None => {
                return Err(ForgeError::InvalidAction(format!(
                    "no saved item at index {}",
                    index
                )))
            }
        },
    }

    Ok(())
}

fn read_params(path: &Path) -> ForgeResult<LootParameters> {
    LootParameters::from_json(&std::fs::read_to_string(path)?)
}

fn forge(api_key: Option<String>) -> ForgeResult<ItemForge<GeminiClient>> {
    let config = LldmConfig::from_env().with_api_key(api_key);
    Ok(ItemForge::new(GeminiClient::new(config)?))
}

fn finish_item(
    collection: &ItemCollection,
    renderer: &TextRenderer,
    item: &MagicItem,
    save: bool,
) -> ForgeResult<()> {
    print!("{}", renderer.item(item));
    if save {
        collection.add(item)?;
        println!("Saved '{}'", item.name);
    }
    Ok(())
}
