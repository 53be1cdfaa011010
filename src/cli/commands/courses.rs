use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{
    confirm, enter, find_by_id, output_item, output_list, output_success, screen_result, validated,
};
use crate::cli::OutputFormat;
use crate::models::{Course, CourseType};
use crate::navigation::Route;
use crate::screens::CoursesScreen;
use crate::Backoffice;

fn parse_course_type(raw: &str) -> Result<CourseType, String> {
    CourseType::from_code(raw).ok_or_else(|| {
        let known: Vec<&str> = CourseType::ALL.iter().map(|t| t.code()).collect();
        format!("unknown course type '{}', expected one of {}", raw, known.join(", "))
    })
}

#[derive(Subcommand)]
pub enum CourseCommands {
    #[command(about = "List the courses of a department")]
    List {
        #[arg(long, help = "Department id")]
        department: i64,
    },

    #[command(about = "Show one course")]
    Show {
        #[arg(help = "Course id")]
        id: i64,
    },

    #[command(about = "Show the course a person is enrolled in")]
    OfPerson {
        #[arg(help = "Person id")]
        person: i64,
    },

    #[command(about = "Create a course in a department")]
    Create {
        #[arg(long, help = "Department id")]
        department: i64,
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_parser = parse_course_type, help = "TRIENNALE, MAGISTRALE, CICLO_UNICO or ALTRA")]
        course_type: Option<CourseType>,
    },

    #[command(about = "Update a course")]
    Update {
        #[arg(long, help = "Department id")]
        department: i64,
        #[arg(help = "Course id")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type", value_parser = parse_course_type)]
        course_type: Option<CourseType>,
    },

    #[command(about = "Delete a course")]
    Delete {
        #[arg(long, help = "Department id")]
        department: i64,
        #[arg(help = "Course id")]
        id: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

fn describe(course: &Course) -> String {
    let department = course
        .department
        .as_ref()
        .map(|d| format!(" ({})", d.code))
        .unwrap_or_default();
    format!("{}  {} [{}]{}", course.id, course.name, course.course_type.label(), department)
}

/// Public endpoints; no session needed.
async fn show(app: &Backoffice, id: i64, output_format: &OutputFormat) -> anyhow::Result<()> {
    let course = app.courses().get(id).await?;
    output_item(output_format, &course, &describe(&course))
}

async fn of_person(app: &Backoffice, person: i64, output_format: &OutputFormat) -> anyhow::Result<()> {
    let course = app.courses().by_person(person).await?;
    output_item(output_format, &course, &describe(&course))
}

pub async fn handle(cmd: CourseCommands, app: &Backoffice, output_format: OutputFormat) -> anyhow::Result<()> {
    let department_id = match &cmd {
        CourseCommands::Show { id } => return show(app, *id, &output_format).await,
        CourseCommands::OfPerson { person } => return of_person(app, *person, &output_format).await,
        CourseCommands::List { department }
        | CourseCommands::Create { department, .. }
        | CourseCommands::Update { department, .. }
        | CourseCommands::Delete { department, .. } => *department,
    };

    enter(app, Route::Courses { department_id }).await?;
    let mut screen = CoursesScreen::new(app, department_id);
    screen.activate().await;
    screen_result(&screen.error_msg)?;

    match cmd {
        CourseCommands::List { .. } => output_list(
            &output_format,
            "courses",
            &screen.courses,
            "No courses found",
            |c| format!("{:>5}  {:<12} {}", c.id, c.course_type.label(), c.name),
        ),
        CourseCommands::Create { name, course_type, .. } => {
            screen.open_create();
            screen.form.name = name;
            if let Some(t) = course_type {
                screen.form.course_type = t;
            }
            validated(screen.form.validate())?;

            screen.save().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, "Course created", Some(json!({ "courses": screen.courses })))
        }
        CourseCommands::Update { id, name, course_type, .. } => {
            let course = find_by_id(&screen.courses, id, "Course", |c| c.id)?.clone();
            screen.open_edit(&course);
            if let Some(name) = name {
                screen.form.name = name;
            }
            if let Some(t) = course_type {
                screen.form.course_type = t;
            }
            validated(screen.form.validate())?;

            screen.save().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Course {} updated", id), None)
        }
        CourseCommands::Delete { id, yes, .. } => {
            let course = find_by_id(&screen.courses, id, "Course", |c| c.id)?.clone();
            screen.open_delete(&course);
            if !confirm(&format!("Delete course {}?", course.name), yes)? {
                screen.close_delete();
                return output_success(&output_format, "Cancelled", None);
            }

            screen.confirm_delete().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Course {} deleted", id), None)
        }
        CourseCommands::Show { .. } | CourseCommands::OfPerson { .. } => Ok(()),
    }
}
