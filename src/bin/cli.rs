//! InnoTrue Hub CLI
//!
//! Command-line interface for InnoTrue Hub operations:
//! - Export a calendar event as an .ics file
//! - List supported timezones
//! - Resolve and switch a user's active role
//! - Check server status

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use innotrue_hub::calendar::timezone::format_offset;
use innotrue_hub::calendar::{supported_zones, Attendee, CalendarEvent, IcsGenerator, Organizer};
use innotrue_hub::config::{generate_default_config, Config};
use innotrue_hub::session::{
    FilePreferenceStore, OrgMembership, OrgRole, Role, SessionManager, UserProfile,
};
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "innotrue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "InnoTrue Hub calendar export and session tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export an event as an iCalendar file
    Ics {
        /// Event identifier
        #[arg(long)]
        id: String,
        /// Event title
        #[arg(long)]
        title: String,
        /// Start time (ISO 8601, or "YYYY-MM-DD HH:MM" in UTC)
        #[arg(long)]
        start: String,
        /// End time (ISO 8601, or "YYYY-MM-DD HH:MM" in UTC)
        #[arg(long)]
        end: String,
        /// IANA timezone name (e.g. Europe/London)
        #[arg(short, long)]
        timezone: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Organizer as "Name <email>" or "email"
        #[arg(long)]
        organizer: Option<String>,
        /// Attendee as "Name <email>" or "email" (repeatable)
        #[arg(short, long)]
        attendee: Vec<String>,
        /// Recurrence pattern (daily, weekly, biweekly, monthly)
        #[arg(short, long)]
        recurrence: Option<String>,
        /// Last date of the recurrence (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,
        /// Directory to write <title>.ics into (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported timezones
    Timezones,

    /// Resolve a user's active role, optionally switching it
    Role {
        /// User identifier
        #[arg(long)]
        user: String,
        /// Stored roles (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,
        /// Organization membership role (member, manager, admin)
        #[arg(long)]
        org_role: Option<String>,
        /// Organization identifier
        #[arg(long, default_value = "default-org")]
        org_id: String,
        /// Role to switch to and remember
        #[arg(long)]
        switch: Option<String>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so .ics output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "innotrue_hub=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    match cli.command {
        Commands::Ics {
            id,
            title,
            start,
            end,
            timezone,
            description,
            location,
            organizer,
            attendee,
            recurrence,
            until,
            output,
        } => {
            let mut event = CalendarEvent::new(id, title, parse_time(&start)?, parse_time(&end)?);
            event.timezone = timezone;
            event.description = description;
            event.location = location;
            event.recurrence_end_date = until;

            if let Some(organizer) = organizer {
                let (name, email) = parse_contact(&organizer)?;
                let mut org = Organizer::new(email);
                org.name = name;
                event = event.organizer(org);
            }

            for contact in attendee {
                let (name, email) = parse_contact(&contact)?;
                let mut person = Attendee::new(email);
                person.name = name;
                event = event.attendee(person);
            }

            if let Some(pattern) = recurrence {
                event = event.recurring(pattern);
            }

            let generator = IcsGenerator::new(config.calendar.ics_options());
            let file = generator.file(&event)?;

            match output {
                Some(dir) => {
                    let path = file.write_to(&dir)?;
                    println!("Calendar file written to {:?}", path);
                }
                None => {
                    println!("{}", file.body);
                }
            }
        }

        Commands::Timezones => {
            println!("{:<24} {:<10} {:<8} {:<10} {}", "Zone", "Standard", "Name", "Daylight", "Name");
            println!("{}", "-".repeat(64));

            for zone in supported_zones() {
                println!(
                    "{:<24} {:<10} {:<8} {:<10} {}",
                    zone.id,
                    format_offset(zone.standard_offset),
                    zone.standard_name,
                    zone.daylight
                        .map(|d| format_offset(d.offset))
                        .unwrap_or_else(|| "-".to_string()),
                    zone.daylight.map(|d| d.name).unwrap_or("-")
                );
            }
        }

        Commands::Role {
            user,
            roles,
            org_role,
            org_id,
            switch,
        } => {
            let mut profile = UserProfile::new(&user);
            for name in roles.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
                profile = profile.role(name.parse::<Role>()?);
            }

            if let Some(org_role) = org_role {
                let role = match org_role.to_lowercase().as_str() {
                    "member" => OrgRole::Member,
                    "manager" => OrgRole::Manager,
                    "admin" => OrgRole::Admin,
                    other => return Err(format!("Invalid organization role: {}", other).into()),
                };
                profile = profile.membership(OrgMembership::new(org_id, role));
            }

            let store = Arc::new(FilePreferenceStore::new(&config.session.preferences_path));
            let manager = SessionManager::new(store);

            let mut session = manager.sign_in(profile).await?;
            if let Some(target) = switch {
                session = manager.switch_role(target.parse::<Role>()?).await?;
            }

            let available: Vec<&str> = session.available_roles().iter().map(|r| r.as_str()).collect();
            println!("User:            {}", session.user_id());
            println!("Available roles: {}", if available.is_empty() { "-".to_string() } else { available.join(", ") });
            println!(
                "Active role:     {}",
                session.active_role().map(|r| r.as_str()).unwrap_or("none")
            );
        }

        Commands::Status => {
            let client = reqwest::Client::new();
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("InnoTrue Hub v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status:  {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Preferences: {}",
                        health["preferences"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Timezones:   {}",
                        health["timezones"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to InnoTrue Hub API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin innotrue-hub");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(format!("Invalid timestamp format: {}", s).into())
}

/// Split "Name <email>" into its parts; a bare address has no name
fn parse_contact(s: &str) -> Result<(Option<String>, String), Box<dyn std::error::Error>> {
    let re = Regex::new(r"^\s*(?:(?P<name>[^<]*?)\s*<(?P<angle>[^>\s]+@[^>\s]+)>|(?P<bare>\S+@\S+))\s*$")?;

    let caps = re
        .captures(s)
        .ok_or_else(|| format!("Invalid contact (expected \"Name <email>\" or \"email\"): {}", s))?;

    if let Some(email) = caps.name("bare") {
        return Ok((None, email.as_str().to_string()));
    }

    let email = caps
        .name("angle")
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| format!("Invalid contact: {}", s))?;
    let name = caps
        .name("name")
        .map(|m| m.as_str().trim().to_string())
        .filter(|n| !n.is_empty());

    Ok((name, email))
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
