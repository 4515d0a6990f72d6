//! Odin CLI
//!
//! Command-line front end for:
//! - Searching the tool catalog the way the command palette does
//! - Browsing and comparing Munin Atlas disciplines
//! - Managing theme, settings and quick notes

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use odin_app::commands::{atlas, catalog, settings};
use odin_app::{init_tracing, AppState, CommandError};
use odin_atlas::{FilterMode, PropertyFilter, RenderedCell};
use odin_catalog::{PaletteAction, PaletteKey};
use odin_core::AppConfig;
use odin_settings::LogNotifier;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "odin")]
#[command(about = "Odin lab suite: catalog, atlas and settings", version)]
struct Cli {
    /// Configuration file (defaults to the XDG config path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Query text; empty lists everything visible, favorites first
        #[arg(default_value = "")]
        query: String,
    },
    /// Type a query into the palette and press keys
    Palette {
        /// Query text
        query: String,
        /// Keys to press: up, down, enter, esc
        #[arg(long = "key", value_parser = parse_key)]
        keys: Vec<PaletteKey>,
    },
    /// Toggle a favorite entry
    Favorite {
        /// Catalog entry id
        entry_id: String,
    },
    /// List favorite entries
    Favorites,
    /// List or clear recent searches
    Recent {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
    /// Sign in as a user
    Login {
        /// Username
        username: String,
    },
    /// Sign out
    Logout,
    /// Check, hide or show a module
    Access {
        /// Module id
        module_id: String,
        /// Hide the module from menus
        #[arg(long, conflicts_with = "show")]
        hide: bool,
        /// Show a hidden module again
        #[arg(long)]
        show: bool,
    },
    /// List available disciplines
    Disciplines,
    /// Show a discipline and its entities
    Discipline {
        /// Discipline id
        discipline: String,
        /// Free-text search
        #[arg(long, default_value = "")]
        search: String,
        /// Exact category
        #[arg(long)]
        category: Option<String>,
        /// Property filter as key=value; repeatable
        #[arg(long = "filter")]
        filters: Vec<PropertyFilter>,
    },
    /// Show one entity
    Entity {
        /// Discipline id
        discipline: String,
        /// Entity id
        entity_id: String,
    },
    /// Show one property across a discipline
    Property {
        /// Discipline id
        discipline: String,
        /// Property key
        property_id: String,
    },
    /// Compare entities side by side
    Compare {
        /// Discipline id
        discipline: String,
        /// Comma-separated entity ids
        entities: String,
        /// Only rows whose values differ
        #[arg(long)]
        diff_only: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Open an atlas URL such as /munin/bacteriology/compare?entities=E1,E2
    Open {
        /// Atlas path
        url: String,
        /// Only rows whose values differ, for comparison pages
        #[arg(long)]
        diff_only: bool,
    },
    /// Show or change the theme
    Theme {
        /// New theme id
        theme: Option<String>,
    },
    /// Settings import and export
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Quick notes
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print current settings
    Show,
    /// Write settings as JSON to a file, or stdout
    Export {
        /// Output file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace settings from an exported file
    Import {
        /// Input file
        file: PathBuf,
    },
    /// Restore defaults
    Reset,
}

#[derive(Subcommand)]
enum NotesCommands {
    /// List notes
    List,
    /// Add a note
    Add {
        /// Note text
        content: String,
        /// yellow, blue, green, pink or purple
        #[arg(long)]
        color: Option<String>,
    },
    /// Edit a note
    Edit {
        /// Note id
        id: String,
        /// New text
        content: String,
        /// New color
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },
}

fn parse_key(raw: &str) -> std::result::Result<PaletteKey, String> {
    match raw.to_ascii_lowercase().as_str() {
        "up" | "arrowup" => Ok(PaletteKey::ArrowUp),
        "down" | "arrowdown" => Ok(PaletteKey::ArrowDown),
        "enter" => Ok(PaletteKey::Enter),
        "esc" | "escape" => Ok(PaletteKey::Escape),
        other => Err(format!("unknown key '{other}' (expected up, down, enter or esc)")),
    }
}

fn filter_mode(diff_only: bool) -> FilterMode {
    if diff_only {
        FilterMode::DiffOnly
    } else {
        FilterMode::All
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn command_error(err: CommandError) -> anyhow::Error {
    anyhow!(err)
}

fn print_comparison(response: &atlas::ComparisonResponse) {
    match response {
        atlas::ComparisonResponse::Unavailable { resolved, message } => {
            println!("{message}");
            if !resolved.is_empty() {
                println!("Resolved: {}", resolved.join(", "));
            }
        }
        atlas::ComparisonResponse::Ready {
            route,
            mode,
            header,
            rows,
            summary,
        } => {
            println!("{route}  ({mode})");
            let names: Vec<&str> = header.iter().map(|cell| cell.name.as_str()).collect();
            println!("{:<24}| {}", "", names.join(" | "));

            for row in rows {
                let marker = if row.identical { ' ' } else { '*' };
                let cells: Vec<String> = row
                    .cells()
                    .iter()
                    .map(|cell| match cell {
                        RenderedCell::Literal(text) => text.clone(),
                        other => other.to_string().replace('\n', "; "),
                    })
                    .collect();
                println!("{marker}{:<23}| {}", row.label, cells.join(" | "));
            }

            println!(
                "{} rows, {} identical, {} differing",
                summary.rows, summary.identical, summary.differing
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };
    let state = AppState::new(config).map_err(command_error)?;

    match cli.command {
        Commands::Search { query } => print_json(&catalog::search_catalog(&state, &query))?,
        Commands::Palette { query, keys } => {
            match catalog::run_palette(&state, &query, &keys) {
                PaletteAction::Navigate { entry_id, path } => println!("{entry_id} -> {path}"),
                PaletteAction::Closed => println!("closed"),
                PaletteAction::None => println!("palette still open"),
            }
        }
        Commands::Favorite { entry_id } => {
            let favorite = catalog::toggle_favorite(&state, &entry_id).map_err(command_error)?;
            println!("{entry_id}: {}", if favorite { "favorite" } else { "not favorite" });
        }
        Commands::Favorites => print_json(&catalog::list_favorites(&state))?,
        Commands::Recent { clear } => {
            if clear {
                catalog::clear_recent_searches(&state).map_err(command_error)?;
            } else {
                print_json(&catalog::recent_searches(&state))?;
            }
        }
        Commands::Login { username } => state.sign_in(&username).map_err(command_error)?,
        Commands::Logout => state.sign_out().map_err(command_error)?,
        Commands::Access {
            module_id,
            hide,
            show,
        } => {
            if hide {
                catalog::hide_tool(&state, &module_id).map_err(command_error)?;
            } else if show {
                catalog::show_tool(&state, &module_id).map_err(command_error)?;
            }
            print_json(&catalog::check_access(&state, &module_id))?;
        }
        Commands::Disciplines => {
            print_json(&atlas::list_disciplines(&state).await.map_err(command_error)?)?;
        }
        Commands::Discipline {
            discipline,
            search,
            category,
            filters,
        } => {
            let query = atlas::EntityQuery {
                search,
                category,
                filters,
            };
            let view = atlas::open_discipline(&state, &discipline, &query)
                .await
                .map_err(command_error)?;
            print_json(&view)?;
        }
        Commands::Entity {
            discipline,
            entity_id,
        } => {
            let detail = atlas::get_entity(&state, &discipline, &entity_id)
                .await
                .map_err(command_error)?;
            print_json(&detail)?;
        }
        Commands::Property {
            discipline,
            property_id,
        } => {
            let detail = atlas::get_property(&state, &discipline, &property_id)
                .await
                .map_err(command_error)?;
            print_json(&detail)?;
        }
        Commands::Compare {
            discipline,
            entities,
            diff_only,
            json,
        } => {
            let ids: Vec<String> = entities.split(',').map(|id| id.trim().to_string()).collect();
            let response = atlas::compare_entities(&state, &discipline, &ids, filter_mode(diff_only))
                .await
                .map_err(command_error)?;
            if json {
                print_json(&response)?;
            } else {
                print_comparison(&response);
            }
        }
        Commands::Open { url, diff_only } => {
            let view = atlas::open_route(&state, &url, filter_mode(diff_only))
                .await
                .map_err(command_error)?;
            print_json(&view)?;
        }
        Commands::Theme { theme } => match theme {
            Some(theme) => {
                let theme = settings::set_theme(&state, &theme).map_err(command_error)?;
                println!("{theme}");
            }
            None => print_json(&settings::get_theme(&state))?,
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show => print_json(&settings::get_settings(&state))?,
            SettingsCommands::Export { out } => {
                let json = settings::export_settings(&state).map_err(command_error)?;
                match out {
                    Some(path) => fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?,
                    None => println!("{json}"),
                }
            }
            SettingsCommands::Import { file } => {
                let json = fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                settings::import_settings(&state, &json, &LogNotifier).map_err(command_error)?;
            }
            SettingsCommands::Reset => settings::reset_settings(&state).map_err(command_error)?,
        },
        Commands::Notes { command } => match command {
            NotesCommands::List => print_json(&settings::list_notes(&state))?,
            NotesCommands::Add { content, color } => {
                let note = settings::add_note(&state, &content, color.as_deref())
                    .map_err(command_error)?;
                print_json(&note)?;
            }
            NotesCommands::Edit { id, content, color } => {
                let note = settings::update_note(&state, &id, &content, color.as_deref())
                    .map_err(command_error)?;
                print_json(&note)?;
            }
            NotesCommands::Delete { id } => {
                settings::delete_note(&state, &id).map_err(command_error)?;
            }
        },
    }

    Ok(())
}
