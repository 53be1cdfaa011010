use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, enter, find_by_id, output_list, output_success, screen_result, validated};
use crate::cli::OutputFormat;
use crate::models::StaffCard;
use crate::navigation::Route;
use crate::screens::staff::StaffFilters;
use crate::screens::{StaffEditPanel, StaffScreen};
use crate::Backoffice;

#[derive(Subcommand)]
pub enum StaffCommands {
    #[command(about = "List staff, optionally filtered")]
    List {
        #[arg(long, help = "Department id")]
        department: Option<i64>,
        #[arg(long, help = "Course id")]
        course: Option<i64>,
        #[arg(long, help = "Year of course")]
        year: Option<i32>,
        #[arg(long, short, help = "Free-text search")]
        search: Option<String>,
    },

    #[command(about = "Create a person")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        #[arg(long, help = "Department id")]
        department: i64,
        #[arg(long, help = "Course id")]
        course: Option<i64>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, help = "Create without the STAFF role")]
        no_staff: bool,
    },

    #[command(about = "Update personal data")]
    Update {
        #[arg(help = "Person id")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, help = "Department id")]
        department: Option<i64>,
        #[arg(long, help = "Course id")]
        course: Option<i64>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        staff: Option<bool>,
    },

    #[command(about = "Delete a person")]
    Delete {
        #[arg(help = "Person id")]
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },

    #[command(about = "Upload a photo")]
    Photo {
        #[arg(help = "Person id")]
        id: i64,
        #[arg(help = "Image file")]
        file: PathBuf,
    },

    #[command(about = "Remove the photo")]
    DeletePhoto {
        #[arg(help = "Person id")]
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

fn card_line(card: &StaffCard) -> String {
    let course = card.course.as_ref().map(|c| c.name.as_str()).unwrap_or("-");
    let year = card.year.map(|y| format!(" {}°", y)).unwrap_or_default();
    format!("{:>5}  {:<28} {}{}", card.id, card.full_name(), course, year)
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Open the edit panel for `id`, failing when the user may not manage that card.
async fn open_panel(app: &Backoffice, screen: &StaffScreen, id: i64) -> anyhow::Result<StaffEditPanel> {
    let card = find_by_id(&screen.cards, id, "Person", |c| c.id)?.clone();
    let panel = StaffEditPanel::open(app, card)
        .await
        .ok_or_else(|| anyhow::anyhow!("Not allowed to edit person {}", id))?;
    screen_result(&panel.error_msg)?;
    Ok(panel)
}

pub async fn handle(cmd: StaffCommands, app: &Backoffice, output_format: OutputFormat) -> anyhow::Result<()> {
    enter(app, Route::Staff).await?;
    let mut screen = StaffScreen::new(app);
    screen.activate().await;
    screen_result(&screen.error_msg)?;

    match cmd {
        StaffCommands::List {
            department,
            course,
            year,
            search,
        } => {
            screen.filters = StaffFilters {
                department_id: department,
                course_id: course,
                year,
                search: search.unwrap_or_default(),
            };
            let cards: Vec<StaffCard> = screen.filtered().into_iter().cloned().collect();
            output_list(&output_format, "staff", &cards, "No staff found", card_line)
        }
        StaffCommands::Create {
            name,
            surname,
            email,
            department,
            course,
            year,
            no_staff,
        } => {
            screen.open_create().await;
            screen_result(&screen.error_msg)?;
            screen.create_form.name = name;
            screen.create_form.surname = surname;
            screen.create_form.email = email;
            screen.create_form.year = year;
            screen.create_form.staff = !no_staff;
            screen.select_department(Some(department)).await;
            screen_result(&screen.error_msg)?;
            if !screen.select_course(course) {
                return Err(anyhow::anyhow!(
                    "Course {} is not offered by department {}",
                    course.unwrap_or_default(),
                    department
                ));
            }
            validated(screen.create_form.validate(screen.course_options.is_enabled()))?;

            screen.save_create().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, "Person created", Some(json!({ "count": screen.cards.len() })))
        }
        StaffCommands::Update {
            id,
            name,
            surname,
            email,
            department,
            course,
            year,
            staff,
        } => {
            let mut panel = open_panel(app, &screen, id).await?;
            if panel.form.disabled {
                return Err(anyhow::anyhow!("Personal data can only be changed by the board"));
            }
            if let Some(v) = name {
                panel.form.name = v;
            }
            if let Some(v) = surname {
                panel.form.surname = v;
            }
            if let Some(v) = email {
                panel.form.email = v;
            }
            if year.is_some() {
                panel.form.year = year;
            }
            if let Some(v) = staff {
                panel.form.staff = v;
            }
            if department.is_some() {
                panel.select_department(department).await;
                screen_result(&panel.error_msg)?;
            }
            if course.is_some() && !panel.select_course(course) {
                return Err(anyhow::anyhow!("Course {} is not offered by the selected department", course.unwrap_or_default()));
            }
            validated(panel.form.validate(panel.course_options.is_enabled()))?;

            panel.save_personal_data().await;
            screen_result(&panel.error_msg)?;
            output_success(&output_format, &format!("Person {} updated", id), None)
        }
        StaffCommands::Delete { id, yes } => {
            let card = find_by_id(&screen.cards, id, "Person", |c| c.id)?.clone();
            screen.open_delete(&card);
            if !confirm(&format!("Delete {}?", card.full_name()), yes)? {
                screen.close_delete();
                return output_success(&output_format, "Cancelled", None);
            }

            screen.confirm_delete().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Person {} deleted", id), None)
        }
        StaffCommands::Photo { id, file } => {
            let bytes = std::fs::read(&file)?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let mut panel = open_panel(app, &screen, id).await?;
            if !panel.pick_photo(&file_name, guess_mime(&file), bytes) {
                screen_result(&panel.error_msg)?;
            }
            panel.save_photo().await;
            screen_result(&panel.error_msg)?;
            output_success(&output_format, &format!("Photo of {} uploaded", id), None)
        }
        StaffCommands::DeletePhoto { id, yes } => {
            let card = find_by_id(&screen.cards, id, "Person", |c| c.id)?;
            if !screen.can_manage_card(card) {
                return Err(anyhow::anyhow!("Not allowed to edit person {}", id));
            }
            if !confirm(&format!("Remove the photo of {}?", card.full_name()), yes)? {
                return output_success(&output_format, "Cancelled", None);
            }
            app.staff().delete_photo(id).await?;
            output_success(&output_format, &format!("Photo of {} removed", id), None)
        }
    }
}
