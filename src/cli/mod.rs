pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use crate::Backoffice;

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Back-office client for Impronta Studentesca")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and password links")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Department management")]
    Departments {
        #[command(subcommand)]
        cmd: commands::departments::DepartmentCommands,
    },

    #[command(about = "Degree courses of a department")]
    Courses {
        #[command(subcommand)]
        cmd: commands::courses::CourseCommands,
    },

    #[command(about = "Governing-body terms")]
    Governing {
        #[command(subcommand)]
        cmd: commands::governing::GoverningCommands,
    },

    #[command(about = "Members of a governing body")]
    Members {
        #[command(subcommand)]
        cmd: commands::members::MemberCommands,
    },

    #[command(about = "Staff directory, personal data and photos")]
    Staff {
        #[command(subcommand)]
        cmd: commands::staff::StaffCommands,
    },

    #[command(about = "Representative-body assignments")]
    Representatives {
        #[command(subcommand)]
        cmd: commands::representatives::RepresentativeCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Print notices (session expiry) on stderr while a command runs.
fn spawn_notice_printer(app: &Backoffice) {
    let mut rx = app.notifier().subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(notice) => eprintln!("{}", notice.message()),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let app = config::build_app()?;
    spawn_notice_printer(&app);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &app, output_format).await,
        Commands::Departments { cmd } => commands::departments::handle(cmd, &app, output_format).await,
        Commands::Courses { cmd } => commands::courses::handle(cmd, &app, output_format).await,
        Commands::Governing { cmd } => commands::governing::handle(cmd, &app, output_format).await,
        Commands::Members { cmd } => commands::members::handle(cmd, &app, output_format).await,
        Commands::Staff { cmd } => commands::staff::handle(cmd, &app, output_format).await,
        Commands::Representatives { cmd } => {
            commands::representatives::handle(cmd, &app, output_format).await
        }
    }
}
