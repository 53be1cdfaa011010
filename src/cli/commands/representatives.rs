use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{confirm, enter, find_by_id, output_list, output_success, screen_result};
use crate::cli::OutputFormat;
use crate::models::RepresentativeView;
use crate::navigation::Route;
use crate::screens::{EditTab, StaffEditPanel, StaffScreen};
use crate::Backoffice;

#[derive(Subcommand)]
pub enum RepresentativeCommands {
    #[command(about = "List representative bodies")]
    Bodies,

    #[command(about = "List the assignments of a person")]
    List {
        #[arg(help = "Person id")]
        person: i64,
    },

    #[command(about = "Assign a person to a representative body")]
    Assign {
        #[arg(help = "Person id")]
        person: i64,
        #[arg(long, help = "Representative body id")]
        body: i64,
        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        start: Option<NaiveDate>,
        #[arg(long, help = "End date (YYYY-MM-DD)")]
        end: Option<NaiveDate>,
    },

    #[command(about = "Change the dates of an assignment")]
    Update {
        #[arg(help = "Person id")]
        person: i64,
        #[arg(help = "Assignment id")]
        assignment: i64,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    #[command(about = "Remove an assignment")]
    Remove {
        #[arg(help = "Person id")]
        person: i64,
        #[arg(help = "Assignment id")]
        assignment: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

fn view_json(view: &RepresentativeView) -> Value {
    json!({
        "id": view.id,
        "organoRappresentanzaId": view.body_id,
        "organoNome": view.body_name,
        "dataInizio": view.start,
        "dataFine": view.end,
    })
}

fn view_line(view: &Value) -> String {
    let field = |key: &str| match &view[key] {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "{:>5}  {:<36} {} → {}",
        field("id"),
        field("organoNome"),
        field("dataInizio"),
        field("dataFine")
    )
}

/// The representatives tab of a person's edit panel.
async fn open_tab(app: &Backoffice, person_id: i64) -> anyhow::Result<StaffEditPanel> {
    enter(app, Route::Staff).await?;
    let mut screen = StaffScreen::new(app);
    screen.activate().await;
    screen_result(&screen.error_msg)?;

    let card = find_by_id(&screen.cards, person_id, "Person", |c| c.id)?.clone();
    let mut panel = StaffEditPanel::open(app, card)
        .await
        .ok_or_else(|| anyhow::anyhow!("Not allowed to edit person {}", person_id))?;
    panel.set_tab(EditTab::Representatives);
    if panel.tab != EditTab::Representatives {
        return Err(anyhow::anyhow!("Representative assignments are managed by the board"));
    }
    Ok(panel)
}

fn assignment(panel: &StaffEditPanel, id: i64) -> anyhow::Result<RepresentativeView> {
    panel
        .representatives
        .iter()
        .find(|r| r.id == Some(id))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Assignment {} not found", id))
}

pub async fn handle(
    cmd: RepresentativeCommands,
    app: &Backoffice,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        RepresentativeCommands::Bodies => {
            enter(app, Route::Staff).await?;
            let bodies = app.admin().representative_bodies().await?;
            output_list(&output_format, "bodies", &bodies, "No representative bodies", |b| {
                format!("{:>5}  {}", b.id, b.name)
            })
        }
        RepresentativeCommands::List { person } => {
            let panel = open_tab(app, person).await?;
            let rows: Vec<Value> = panel.representatives.iter().map(view_json).collect();
            output_list(&output_format, "representatives", &rows, "No assignments", view_line)
        }
        RepresentativeCommands::Assign {
            person,
            body,
            start,
            end,
        } => {
            let mut panel = open_tab(app, person).await?;
            panel.reset_representative_form();
            panel.representative_form.body_id = Some(body);
            panel.representative_form.start = start;
            panel.representative_form.end = end;

            panel.save_representative().await;
            screen_result(&panel.error_msg)?;
            let rows: Vec<Value> = panel.representatives.iter().map(view_json).collect();
            output_success(
                &output_format,
                &format!("Person {} assigned to body {}", person, body),
                Some(json!({ "representatives": rows })),
            )
        }
        RepresentativeCommands::Update {
            person,
            assignment: id,
            start,
            end,
        } => {
            let mut panel = open_tab(app, person).await?;
            let row = assignment(&panel, id)?;
            panel.edit_representative(&row);
            if start.is_some() {
                panel.representative_form.start = start;
            }
            if end.is_some() {
                panel.representative_form.end = end;
            }

            panel.save_representative().await;
            screen_result(&panel.error_msg)?;
            output_success(&output_format, &format!("Assignment {} updated", id), None)
        }
        RepresentativeCommands::Remove {
            person,
            assignment: id,
            yes,
        } => {
            let mut panel = open_tab(app, person).await?;
            let row = assignment(&panel, id)?;
            if !confirm(&format!("Remove the assignment to {}?", row.body_name), yes)? {
                return output_success(&output_format, "Cancelled", None);
            }

            panel.delete_representative(&row).await;
            screen_result(&panel.error_msg)?;
            output_success(&output_format, &format!("Assignment {} removed", id), None)
        }
    }
}
