use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use shared_config::AppConfig;
use shared_utils::{parse_date, Month};

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "On-call roster client: centers, monthly shifts and auto-assignment")]
#[command(propagate_version = true)]
struct Args {
    /// API base URL (overrides ROSTER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides ROSTER_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and print the access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account (pending until an admin approves it)
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_recheck: String,
    },

    /// Show the signed-in user
    Me,

    /// Profile management
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Center management
    Centers {
        #[command(subcommand)]
        command: CenterCommands,
    },

    /// Center membership
    Members {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// A center's monthly schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// My own shifts and busy days
    My {
        #[command(subcommand)]
        command: MyCommands,
    },

    /// Direct messages and system notices
    Inbox {
        #[command(subcommand)]
        command: InboxCommands,
    },

    /// Support requests
    Support {
        #[command(subcommand)]
        command: SupportCommands,
    },

    /// Account administration
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Monthly shift counts per member
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommands {
    /// Update name or phone
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Change the password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand, Debug)]
enum CenterCommands {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: Option<String>,
    },
    Update {
        center_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    Delete {
        center_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum MemberCommands {
    List {
        center_id: String,
    },
    /// Add an approved user by email
    Add {
        center_id: String,
        #[arg(long)]
        email: String,
    },
    Remove {
        center_id: String,
        user_id: String,
    },
    /// Make a member the center lead
    Lead {
        center_id: String,
        user_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ScheduleCommands {
    /// Print the month as a calendar grid
    Show {
        center_id: String,
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
    },
    /// Put a member on a day, replacing whoever holds it
    Set {
        center_id: String,
        #[arg(value_parser = parse_day)]
        date: NaiveDate,
        member_id: String,
    },
    Unassign {
        center_id: String,
        #[arg(value_parser = parse_day)]
        date: NaiveDate,
    },
    /// Fill every free day from today to the end of the month
    AutoAssign {
        center_id: String,
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_day)]
        today: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum MyCommands {
    /// Calendar of my shifts and busy days
    Schedule {
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
    },
    /// List my busy days
    Busy {
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
    },
    /// Mark or clear a busy day
    ToggleBusy {
        #[arg(value_parser = parse_day)]
        date: NaiveDate,
    },
}

#[derive(Subcommand, Debug)]
enum InboxCommands {
    Conversations,
    Read {
        conversation_id: String,
    },
    Send {
        to_user_id: String,
        content: String,
    },
}

#[derive(Subcommand, Debug)]
enum SupportCommands {
    /// Send a support message (no sign-in needed with --email)
    Send {
        message: String,
        #[arg(long)]
        email: Option<String>,
    },
    List {
        /// Only resolved (true) or open (false) tickets
        #[arg(long)]
        resolved: Option<bool>,
    },
    Resolve {
        ticket_id: String,
        /// Reopen instead of resolving
        #[arg(long)]
        reopen: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    Users,
    Pending,
    Approve {
        user_id: String,
    },
    Reject {
        user_id: String,
    },
    SetEmail {
        user_id: String,
        email: String,
    },
    SetPassword {
        user_id: String,
        password: String,
    },
    Delete {
        user_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommands {
    Show {
        center_id: String,
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
    },
    /// Download the CSV export
    Csv {
        center_id: String,
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,
        /// Output file (defaults to report_<center>_<month>.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn parse_month(s: &str) -> Result<Month, String> {
    s.parse().map_err(|e: shared_models::AppError| e.to_string())
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env().with_overrides(args.api_url, args.token);
    debug!("Using API at {}", config.api_url);

    commands::run(args.command, &config).await
}
