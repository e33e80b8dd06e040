//! GeoClash - Entry Point
//!
//! Command-line client for location-based capture battles. It sets up
//! the async runtime, restores the persisted sign-in, and runs a small
//! command loop: list locations, walk into an arena, fight, and claim.

use geoclash::api::auth::{self, AuthSession};
use geoclash::api::client::ApiClient;
use geoclash::api::models::{LocationRecord, PlayerProfile};
use geoclash::arena;
use geoclash::battle::session::{
    format_elapsed, BattleOutcome, BattleReport, BattleSession, BattleSnapshot,
};
use geoclash::core::config::GameConfig;
use geoclash::core::error::{GameError, Result};
use geoclash::core::types::Coordinates;
use geoclash::geofence::haversine_meters;
use geoclash::resolution::cooldown::CooldownLedger;
use geoclash::resolution::submit::{submit_battle_result, BattleAuthority, CaptureOutcome};
use geoclash::storage::{JsonFileStore, KeyValueStore};

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

#[derive(Parser, Debug)]
#[command(name = "geoclash", about = "Location-based capture battles")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the persistent key-value store
    #[arg(long, default_value = "geoclash_store.json")]
    store: PathBuf,

    /// Override the backend base URL
    #[arg(long)]
    api_url: Option<String>,
}

/// A battle in progress, with everything needed to settle it
struct ActiveBattle {
    session: BattleSession,
    report_rx: oneshot::Receiver<BattleReport>,
    player_profile: PlayerProfile,
    location_name: String,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("geoclash=debug")
        .init();

    let args = Args::parse();
    tracing::info!("GeoClash starting...");

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).map_err(GameError::ValidationFailure)?,
        None => GameConfig::default(),
    };
    if let Some(api_url) = args.api_url {
        config.api_base_url = api_url;
    }

    // Async runtime for backend calls and battle timers
    let rt = Runtime::new()?;

    let store: Arc<JsonFileStore> = Arc::new(JsonFileStore::open(&args.store)?);
    let ledger = CooldownLedger::new(
        Arc::clone(&store) as Arc<dyn KeyValueStore>,
        config.cooldown_seconds,
    );
    let mut client = ApiClient::new(config.api_base_url.clone());

    let mut auth_session = AuthSession::load(store.as_ref())?;
    if let Some(session) = &auth_session {
        client.set_token(&session.token);
        println!("Welcome back, {}.", session.username);
    }

    let mut locations: Vec<LocationRecord> = Vec::new();
    let mut position: Option<Coordinates> = None;
    let mut active: Option<ActiveBattle> = None;

    // Display welcome message
    println!("\n=== GEOCLASH ===");
    println!("Location-based capture battles");
    println!();
    println!("Commands:");
    println!("  signin <user> <pass>   - Sign in");
    println!("  register <user> <pass> - Create an account");
    println!("  locations / l          - List capturable locations");
    println!("  goto <lat> <lon>       - Set your position");
    println!("  enter <id>             - Enter a location's arena");
    println!("  fight / f              - Start the battle");
    println!("  attack / a             - Strike the defender");
    println!("  status / s             - Show the current fight");
    println!("  leave                  - Abandon the arena");
    println!("  quit / q               - Exit");
    println!();

    // Main command loop
    loop {
        settle_finished_battle(&mut active, &rt, &client, &ledger, store.as_ref())?;

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input.starts_with("signin ") {
            let mut parts = input.split_whitespace().skip(1);
            match (parts.next(), parts.next()) {
                (Some(username), Some(password)) => {
                    match rt.block_on(auth::sign_in(&mut client, store.as_ref(), username, password))
                    {
                        Ok(session) => {
                            println!("Signed in as {}.", session.username);
                            auth_session = Some(session);
                        }
                        Err(e) => println!("Sign-in failed: {}", e),
                    }
                }
                _ => println!("Usage: signin <username> <password>"),
            }
            continue;
        }

        if input.starts_with("register ") {
            let mut parts = input.split_whitespace().skip(1);
            match (parts.next(), parts.next()) {
                (Some(username), Some(password)) => {
                    match rt.block_on(client.create_account(username, password)) {
                        Ok(()) => println!("Account created. Sign in to start fighting."),
                        Err(e) => println!("Registration failed: {}", e),
                    }
                }
                _ => println!("Usage: register <username> <password>"),
            }
            continue;
        }

        if input == "locations" || input == "l" {
            match rt.block_on(client.get_locations()) {
                Ok(list) => {
                    locations = list;
                    display_locations(&locations, position);
                }
                Err(e) => println!("Could not fetch locations: {}", e),
            }
            continue;
        }

        if input.starts_with("goto ") {
            let mut parts = input.split_whitespace().skip(1);
            match (
                parts.next().and_then(|v| v.parse::<f64>().ok()),
                parts.next().and_then(|v| v.parse::<f64>().ok()),
            ) {
                (Some(latitude), Some(longitude)) => {
                    position = Some(Coordinates::new(latitude, longitude));
                    println!("Position set to ({}, {}).", latitude, longitude);
                }
                _ => println!("Usage: goto <latitude> <longitude>"),
            }
            continue;
        }

        if input.starts_with("enter ") {
            if active.is_some() {
                println!("Finish or leave the current battle first.");
                continue;
            }
            let Some(id) = input
                .split_whitespace()
                .nth(1)
                .and_then(|v| v.parse::<u32>().ok())
            else {
                println!("Usage: enter <location id>");
                continue;
            };
            let Some(here) = position else {
                println!(
                    "{}",
                    GameError::PermissionDenied("position unknown, use goto first".to_string())
                );
                continue;
            };
            let Some(location) = locations.iter().find(|l| l.id.0 == id) else {
                println!("Unknown location {}. Run `locations` to refresh the list.", id);
                continue;
            };

            match rt.block_on(arena::enter(
                &client,
                auth_session.as_ref(),
                &ledger,
                &config,
                location,
                here,
            )) {
                Ok(entry) => {
                    let snapshot = entry.session.snapshot();
                    println!(
                        "You stand at {}. {} defends it. Type `fight` to begin.",
                        location.name, snapshot.opponent_name
                    );
                    active = Some(ActiveBattle {
                        session: entry.session,
                        report_rx: entry.report_rx,
                        player_profile: entry.player_profile,
                        location_name: location.name.clone(),
                    });
                }
                Err(e) => println!("Cannot enter: {}", e),
            }
            continue;
        }

        if input == "fight" || input == "f" {
            match active.as_mut() {
                Some(battle) => {
                    let started = {
                        let _guard = rt.enter();
                        battle.session.start()
                    };
                    match started {
                        Ok(()) => println!("The fight is on. Attack!"),
                        Err(e) => println!("{}", e),
                    }
                }
                None => println!("Enter a location first."),
            }
            continue;
        }

        if input == "attack" || input == "a" {
            match active.as_ref() {
                Some(battle) => {
                    battle.session.attack();
                    display_battle(&battle.session.snapshot());
                }
                None => println!("Enter a location first."),
            }
            continue;
        }

        if input == "status" || input == "s" {
            match active.as_ref() {
                Some(battle) => display_battle(&battle.session.snapshot()),
                None => {
                    match &auth_session {
                        Some(session) => println!("Signed in as {}.", session.username),
                        None => println!("Not signed in."),
                    }
                    match position {
                        Some(here) => {
                            println!("Position: ({}, {}).", here.latitude, here.longitude)
                        }
                        None => println!("Position unknown."),
                    }
                }
            }
            continue;
        }

        if input == "leave" {
            if active.take().is_some() {
                println!("You leave the arena. The fight is abandoned.");
            } else {
                println!("You are not in an arena.");
            }
            continue;
        }

        println!("Unknown command. Type `status` for where you stand.");
    }

    println!("\nGoodbye!");
    Ok(())
}

/// Poll for a finished battle and run the post-battle pipeline
fn settle_finished_battle(
    active: &mut Option<ActiveBattle>,
    rt: &Runtime,
    client: &ApiClient,
    ledger: &CooldownLedger,
    store: &dyn KeyValueStore,
) -> Result<()> {
    let report = match active.as_mut() {
        Some(battle) => match battle.report_rx.try_recv() {
            Ok(report) => report,
            Err(_) => return Ok(()),
        },
        None => return Ok(()),
    };
    let Some(battle) = active.take() else {
        return Ok(());
    };

    println!();
    match report.outcome {
        BattleOutcome::Victory => println!(
            "Victory at {} after {} with {} health left!",
            battle.location_name,
            format_elapsed(report.elapsed_seconds),
            report.player_health
        ),
        BattleOutcome::Defeat => println!(
            "Defeat at {} after {}.",
            battle.location_name,
            format_elapsed(report.elapsed_seconds)
        ),
    }

    let summary = rt.block_on(submit_battle_result(
        &report,
        &battle.player_profile,
        client,
        ledger,
        store,
        &mut rand::thread_rng(),
    ));

    println!("Score: {}", summary.score);
    println!(
        "Record: {} wins / {} losses, strength {}",
        summary.updated_profile.wins, summary.updated_profile.losses, summary.updated_profile.strength
    );
    for failure in &summary.failures {
        println!("  (not saved: {})", failure);
    }

    match summary.capture {
        CaptureOutcome::Captured => {
            print!("You hold the field. Claim {}? (y/n) ", battle.location_name);
            io::stdout().flush()?;
            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;
            if answer.trim().eq_ignore_ascii_case("y") {
                match rt.block_on(client.claim_ownership(report.location_id)) {
                    Ok(()) => println!("{} is yours.", battle.location_name),
                    Err(e) => println!("Claim failed: {}", e),
                }
            }
        }
        CaptureOutcome::Contested => {
            println!("Another fighter scored higher. {} stays contested.", battle.location_name)
        }
        CaptureOutcome::Defeated => println!("{} keeps its defender.", battle.location_name),
        CaptureOutcome::Unreported => println!("The result never reached the server."),
    }
    println!();
    Ok(())
}

/// List locations, with distances when the position is known
fn display_locations(locations: &[LocationRecord], position: Option<Coordinates>) {
    if locations.is_empty() {
        println!("No locations listed.");
        return;
    }
    for location in locations {
        let holder = if location.owner_team_name.is_empty() {
            "unclaimed".to_string()
        } else {
            format!("held by {}", location.owner_team_name)
        };
        match position {
            Some(here) => println!(
                "  {:>4}  {} ({}, {:.0}m away)",
                location.id.0,
                location.name,
                holder,
                haversine_meters(here, location.coordinates())
            ),
            None => println!("  {:>4}  {} ({})", location.id.0, location.name, holder),
        }
    }
}

/// One-line battle readout
fn display_battle(snapshot: &BattleSnapshot) {
    println!(
        "  [{}] {} {} hp  vs  {} {} hp",
        format_elapsed(snapshot.elapsed_seconds),
        snapshot.player_name,
        snapshot.player_health,
        snapshot.opponent_name,
        snapshot.opponent_health
    );
}
