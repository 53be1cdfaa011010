use chrono::NaiveDate;
use clap::Subcommand;

use crate::cli::utils::{confirm, enter, find_by_id, output_list, output_success, screen_result, validated};
use crate::cli::OutputFormat;
use crate::models::GoverningBodyKind;
use crate::navigation::Route;
use crate::screens::governing_bodies::GoverningBodyFilters;
use crate::screens::GoverningBodiesScreen;
use crate::Backoffice;

fn parse_kind(raw: &str) -> Result<GoverningBodyKind, String> {
    GoverningBodyKind::from_code(raw)
        .ok_or_else(|| format!("unknown kind '{}', expected GENERALE or DIPARTIMENTALE", raw))
}

#[derive(Subcommand)]
pub enum GoverningCommands {
    #[command(about = "List governing bodies (active only unless --all)")]
    List {
        #[arg(long, help = "Include terms that are no longer active")]
        all: bool,
        #[arg(long, help = "Only terms starting on or after (YYYY-MM-DD)")]
        from: Option<NaiveDate>,
        #[arg(long, help = "Only terms ending on or before (YYYY-MM-DD)")]
        to: Option<NaiveDate>,
    },

    #[command(about = "Create a governing-body term")]
    Create {
        #[arg(long, value_parser = parse_kind, help = "GENERALE or DIPARTIMENTALE")]
        kind: GoverningBodyKind,
        #[arg(long, help = "Department id (departmental bodies only)")]
        department: Option<i64>,
        #[arg(long, help = "Start of term (YYYY-MM-DD)")]
        start: Option<NaiveDate>,
        #[arg(long, help = "End of term (YYYY-MM-DD)")]
        end: Option<NaiveDate>,
    },

    #[command(about = "Update a governing-body term")]
    Update {
        #[arg(help = "Governing body id")]
        id: i64,
        #[arg(long, value_parser = parse_kind)]
        kind: Option<GoverningBodyKind>,
        #[arg(long)]
        department: Option<i64>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    #[command(about = "Delete a governing-body term")]
    Delete {
        #[arg(help = "Governing body id")]
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: GoverningCommands, app: &Backoffice, output_format: OutputFormat) -> anyhow::Result<()> {
    enter(app, Route::GoverningBodies).await?;
    let mut screen = GoverningBodiesScreen::new(app);
    screen.activate().await;
    screen_result(&screen.error_msg)?;

    match cmd {
        GoverningCommands::List { all, from, to } => {
            screen.set_filters(GoverningBodyFilters {
                only_active: !all,
                start_from: from,
                end_to: to,
            });
            output_list(
                &output_format,
                "governing_bodies",
                &screen.filtered,
                "No governing bodies found",
                |b| {
                    let state = if b.active { "" } else { "  (non attivo)" };
                    format!("{:>5}  {:<16} {}{}", b.id, b.title(), b.date_range(), state)
                },
            )
        }
        GoverningCommands::Create {
            kind,
            department,
            start,
            end,
        } => {
            screen.open_create();
            screen.set_kind(kind).await;
            screen.form.department_id = department.filter(|_| screen.form.department_enabled());
            screen.form.term_start = start;
            screen.form.term_end = end;
            validated(screen.form.validate())?;

            screen.save().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, "Governing body created", None)
        }
        GoverningCommands::Update {
            id,
            kind,
            department,
            start,
            end,
        } => {
            let body = find_by_id(&screen.bodies, id, "Governing body", |b| b.id)?.clone();
            screen.open_edit(&body).await;
            if let Some(kind) = kind {
                screen.set_kind(kind).await;
            }
            if department.is_some() && screen.form.department_enabled() {
                screen.form.department_id = department;
            }
            if start.is_some() {
                screen.form.term_start = start;
            }
            if end.is_some() {
                screen.form.term_end = end;
            }
            validated(screen.form.validate())?;

            screen.save().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Governing body {} updated", id), None)
        }
        GoverningCommands::Delete { id, yes } => {
            let body = find_by_id(&screen.bodies, id, "Governing body", |b| b.id)?.clone();
            screen.open_delete(&body);
            if !confirm(&format!("Delete governing body {} ({})?", body.title(), body.date_range()), yes)? {
                screen.close_delete();
                return output_success(&output_format, "Cancelled", None);
            }

            screen.confirm_delete().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Governing body {} deleted", id), None)
        }
    }
}
