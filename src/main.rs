use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use roomr::app::App;
use roomr::logging;
use roomr::models::{CapacityFilter, RegistryError, RoomFilter, RoomRegistry, TriState};
use roomr::storage::{
    ConfigStorage, FileStore, JsonRoomStorage, RoomStorage, TomlConfigStorage,
    ensure_directories, open_room_storage,
};

/// Parsed `--capacity` value; `None` when "any"
type CapacityChoice = Option<CapacityFilter>;

#[derive(Parser)]
#[command(name = "roomr")]
#[command(about = "Hostel room registry and allocator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new room
    Add {
        /// Room number
        room_no: String,

        /// Number of students the room holds
        #[arg(short, long)]
        capacity: u32,

        /// Room has air conditioning
        #[arg(long)]
        ac: bool,

        /// Room has an attached washroom
        #[arg(long)]
        washroom: bool,
    },

    /// Delete a room (releasing it if allocated)
    Delete {
        /// Room number
        room_no: String,
    },

    /// Allocate the smallest free room that fits a group
    Allocate {
        /// Number of students in the group
        #[arg(short, long)]
        students: u32,

        /// Require air conditioning
        #[arg(long)]
        ac: bool,

        /// Require an attached washroom
        #[arg(long)]
        washroom: bool,
    },

    /// Free an allocated room
    Release {
        /// Room number
        room_no: String,
    },

    /// List rooms, optionally filtered
    List {
        /// Room number substring
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact capacity, 4+ for four or more, or any
        #[arg(short, long, default_value = "any", value_parser = CapacityFilter::parse_choice)]
        capacity: CapacityChoice,

        /// Filter on AC (yes/no)
        #[arg(long, default_value = "any")]
        ac: TriState,

        /// Filter on attached washroom (yes/no)
        #[arg(long, default_value = "any")]
        washroom: TriState,
    },

    /// Show room statistics
    Stats,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Default: launch TUI
        run_tui()?;
        return Ok(ExitCode::SUCCESS);
    };

    // CLI mode logs to stderr
    env_logger::init();

    let storage = open_storage()?;
    let mut registry = storage.load()?;

    let outcome = match command {
        Commands::Add {
            room_no,
            capacity,
            ac,
            washroom,
        } => cmd_add(&mut registry, &room_no, capacity, ac, washroom),
        Commands::Delete { room_no } => cmd_delete(&mut registry, &room_no),
        Commands::Allocate {
            students,
            ac,
            washroom,
        } => cmd_allocate(&mut registry, students, ac, washroom),
        Commands::Release { room_no } => cmd_release(&mut registry, &room_no),
        Commands::List {
            search,
            capacity,
            ac,
            washroom,
        } => {
            cmd_list(
                &registry,
                &RoomFilter {
                    search,
                    capacity,
                    ac,
                    washroom,
                },
            );
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Stats => {
            cmd_stats(&registry);
            return Ok(ExitCode::SUCCESS);
        }
    };

    match outcome {
        Ok(()) => {
            storage.save(&registry)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Load config and open the room store
fn open_storage() -> Result<JsonRoomStorage<FileStore>> {
    let (data_dir, config_dir) = ensure_directories()?;

    let config_storage = TomlConfigStorage::new(config_dir.join("roomr.toml"));
    let config = config_storage.load()?;

    Ok(open_room_storage(&config, data_dir))
}

fn cmd_add(
    registry: &mut RoomRegistry,
    room_no: &str,
    capacity: u32,
    ac: bool,
    washroom: bool,
) -> Result<(), RegistryError> {
    let room = registry.add_room(room_no, capacity, ac, washroom)?;
    println!("Room {} added successfully!", room.room_no);
    Ok(())
}

fn cmd_delete(registry: &mut RoomRegistry, room_no: &str) -> Result<(), RegistryError> {
    let room_no = room_no.trim();
    let was_allocated = registry.is_allocated(room_no);
    if !registry.delete_room(room_no) {
        return Err(RegistryError::NotFound(room_no.to_string()));
    }

    if was_allocated {
        println!("Room {} deleted (allocation released)", room_no);
    } else {
        println!("Room {} deleted", room_no);
    }
    Ok(())
}

fn cmd_allocate(
    registry: &mut RoomRegistry,
    students: u32,
    ac: bool,
    washroom: bool,
) -> Result<(), RegistryError> {
    let room = registry.allocate(students, ac, washroom)?;

    println!("Room {} has been allocated!", room.room_no);
    println!("  Capacity: {}", room.capacity_label());
    if room.has_ac {
        println!("  AC: Yes");
    }
    if room.has_attached_washroom {
        println!("  Attached Washroom: Yes");
    }
    Ok(())
}

fn cmd_release(registry: &mut RoomRegistry, room_no: &str) -> Result<(), RegistryError> {
    registry.release(room_no)?;
    println!("Room {} is now free", room_no.trim());
    Ok(())
}

fn cmd_list(registry: &RoomRegistry, filter: &RoomFilter) {
    let rooms = registry.filter(filter);

    if rooms.is_empty() {
        println!("No rooms found");
        return;
    }

    for room in rooms {
        let status = if registry.is_allocated(&room.room_no) {
            "Occupied"
        } else {
            "Available"
        };
        let badges = room
            .amenity_badges()
            .iter()
            .map(|b| format!("[{}]", b))
            .collect::<Vec<_>>()
            .join(" ");

        println!(
            "Room {:<8} {:<11} {:<9} {}",
            room.room_no,
            room.capacity_label(),
            status,
            badges
        );
    }
}

fn cmd_stats(registry: &RoomRegistry) {
    let stats = registry.stats();

    println!("Room Statistics");
    println!("===============");
    println!("Total rooms: {}", stats.total);
    println!("  Free: {}", stats.free);
    println!("  Allocated: {}", stats.allocated);
}

/// Run the interactive TUI until the user quits
fn run_tui() -> Result<()> {
    let (data_dir, config_dir) = ensure_directories()?;

    let config_storage = TomlConfigStorage::new(config_dir.join("roomr.toml"));
    let config = config_storage.load()?;

    let (flash_tx, flash_rx) = mpsc::channel();
    logging::init_logger(
        data_dir.join("roomr.log"),
        Some(flash_tx),
        &config.general.log_level,
        &config.general.flash_level,
    )
    .context("Failed to initialize logger")?;

    let storage = open_room_storage(&config, data_dir);
    let registry = storage.load()?;

    let mut app = App::new(registry, Box::new(storage), config, Some(flash_rx));

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();

    result
}

fn event_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.poll_flash_messages();
        app.prune_flash_messages();

        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Err(e) = app.handle_key(key)
        {
            log::error!("{:#}", e);
        }
    }

    Ok(())
}
