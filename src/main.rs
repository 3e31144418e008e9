use clap::Parser;
use oakland_save::{FileHandler, HandlerConfig, SaveManager, SaveSnapshot, Square};
use std::path::PathBuf;
use std::process::ExitCode;

/// Inspect and rewrite board game save files
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.TXT", required_unless_present_any = ["slot", "list"])]
    path: Option<PathBuf>,
    /// Load a named slot from the save directory instead of a file
    #[arg(long, conflicts_with = "path")]
    slot: Option<String>,
    /// Save directory for slots (default ~/.oakland-oligarchy/saves)
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
    /// List the slots in the save directory
    #[arg(long, conflicts_with = "path")]
    list: bool,
    /// JSON handler configuration
    #[arg(long, value_name = "CONFIG.JSON")]
    config: Option<PathBuf>,
    /// Write the loaded game back out to this file
    #[arg(long, value_name = "OUT.TXT")]
    resave: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), oakland_save::SaveError> {
    let config = match &cli.config {
        Some(path) => HandlerConfig::load_from_file(path)?,
        None => HandlerConfig::default(),
    };

    let handler = match (&cli.path, &cli.slot) {
        (Some(path), _) => FileHandler::from_path_with_config(path, config)?,
        (None, slot) => {
            let manager = match &cli.save_dir {
                Some(dir) => SaveManager::new(dir, config)?,
                None => SaveManager::with_default_directory(config)?,
            };
            if cli.list {
                for info in manager.list_saves()? {
                    println!("{}\t{}", info.slot, info.path.display());
                }
            }
            match slot {
                Some(slot) => manager.load_slot(slot)?,
                None => return Ok(()),
            }
        }
    };
    print_summary(&handler);

    if let Some(out) = &cli.resave {
        handler.save(out, &SaveSnapshot::from(handler.state()))?;
        println!("Saved to {}", out.display());
    }
    Ok(())
}

fn print_summary(handler: &FileHandler) {
    println!("Time: {}", handler.time());
    println!("Go payout: {}", handler.go_payout());
    match handler.jail_position() {
        Some(position) => println!("Jail at: {}", position),
        None => println!("Jail at: none"),
    }
    println!("Active players: {}/{}", handler.active_players(), handler.players().len());

    for player in handler.players() {
        let turn = if handler.player_turn() == Some(player.id()) { " <" } else { "" };
        let mut status = Vec::new();
        if player.is_loser() {
            status.push("lost".to_string());
        }
        if player.is_in_jail() {
            status.push(format!("jail {}", player.jail_counter()));
        }
        println!(
            "  #{} {} ${} @{} owns {:?} {}{}",
            player.id(),
            player.name(),
            player.money(),
            player.position(),
            player.owned_properties(),
            status.join(", "),
            turn
        );
    }

    let properties = handler
        .board()
        .iter()
        .filter(|square| matches!(square, Square::Property(_)))
        .count();
    println!("Properties: {}", properties);
}
