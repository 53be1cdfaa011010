use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, enter, find_by_id, output_list, output_success, screen_result, validated};
use crate::cli::OutputFormat;
use crate::navigation::Route;
use crate::screens::DepartmentsScreen;
use crate::Backoffice;

#[derive(Subcommand)]
pub enum DepartmentCommands {
    #[command(about = "List all departments")]
    List,

    #[command(about = "Create a department")]
    Create {
        #[arg(long, help = "Department name")]
        name: String,
        #[arg(long, help = "Short code (stored uppercase)")]
        code: String,
    },

    #[command(about = "Rename or recode a department")]
    Update {
        #[arg(help = "Department id")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },

    #[command(about = "Delete a department")]
    Delete {
        #[arg(help = "Department id")]
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

pub async fn handle(cmd: DepartmentCommands, app: &Backoffice, output_format: OutputFormat) -> anyhow::Result<()> {
    enter(app, Route::Departments).await?;
    let mut screen = DepartmentsScreen::new(app);
    screen.activate().await;
    screen_result(&screen.error_msg)?;

    match cmd {
        DepartmentCommands::List => output_list(
            &output_format,
            "departments",
            &screen.departments,
            "No departments found",
            |d| format!("{:>5}  {:<8} {}", d.id, d.code, d.name),
        ),
        DepartmentCommands::Create { name, code } => {
            screen.open_create();
            screen.form.name = name;
            screen.form.code = code;
            validated(screen.form.validate())?;

            screen.save().await;
            screen_result(&screen.error_msg)?;
            output_success(
                &output_format,
                "Department created",
                Some(json!({ "departments": screen.departments })),
            )
        }
        DepartmentCommands::Update { id, name, code } => {
            let department = find_by_id(&screen.departments, id, "Department", |d| d.id)?.clone();
            screen.open_edit(&department);
            if let Some(name) = name {
                screen.form.name = name;
            }
            if let Some(code) = code {
                screen.form.code = code;
            }
            validated(screen.form.validate())?;

            screen.save().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Department {} updated", id), None)
        }
        DepartmentCommands::Delete { id, yes } => {
            let department = find_by_id(&screen.departments, id, "Department", |d| d.id)?.clone();
            screen.open_delete(&department);
            if !confirm(&format!("Delete department {} ({})?", department.name, department.code), yes)? {
                screen.close_delete();
                return output_success(&output_format, "Cancelled", None);
            }

            screen.confirm_delete().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Department {} deleted", id), None)
        }
    }
}
