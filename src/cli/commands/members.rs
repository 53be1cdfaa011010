use clap::Subcommand;

use crate::cli::utils::{confirm, enter, output_list, output_success, screen_result, validated};
use crate::cli::OutputFormat;
use crate::models::{display_role_label, Membership, GOVERNING_ROLES};
use crate::navigation::Route;
use crate::screens::MembersScreen;
use crate::Backoffice;

#[derive(Subcommand)]
pub enum MemberCommands {
    #[command(about = "List the members of a governing body")]
    List {
        #[arg(help = "Governing body id")]
        body: i64,
    },

    #[command(about = "List staff who can still join the body")]
    Available {
        #[arg(help = "Governing body id")]
        body: i64,
    },

    #[command(about = "List the roles a member can hold")]
    Roles,

    #[command(about = "Add a person to a governing body")]
    Add {
        #[arg(help = "Governing body id")]
        body: i64,
        #[arg(long, help = "Person id")]
        person: i64,
        #[arg(long, help = "Role code or label (default SOCIO_CONSIGLIERE)")]
        role: Option<String>,
    },

    #[command(about = "Change a member's role")]
    Role {
        #[arg(help = "Governing body id")]
        body: i64,
        #[arg(help = "Person id")]
        person: i64,
        #[arg(long, help = "Role code or label")]
        role: String,
    },

    #[command(about = "Remove a member")]
    Remove {
        #[arg(help = "Governing body id")]
        body: i64,
        #[arg(help = "Person id")]
        person: i64,
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

fn member<'a>(screen: &'a MembersScreen, person_id: i64) -> anyhow::Result<&'a Membership> {
    screen
        .members
        .iter()
        .find(|m| m.person.id == person_id)
        .ok_or_else(|| anyhow::anyhow!("Person {} is not a member", person_id))
}

pub async fn handle(cmd: MemberCommands, app: &Backoffice, output_format: OutputFormat) -> anyhow::Result<()> {
    let governing_body_id = match &cmd {
        MemberCommands::Roles => {
            let codes: Vec<&str> = GOVERNING_ROLES.iter().map(|r| r.code).collect();
            return output_list(&output_format, "roles", &codes, "", |code| {
                format!("{:<28} {}", code, display_role_label(code))
            });
        }
        MemberCommands::List { body }
        | MemberCommands::Available { body }
        | MemberCommands::Add { body, .. }
        | MemberCommands::Role { body, .. }
        | MemberCommands::Remove { body, .. } => *body,
    };

    enter(app, Route::GoverningBodyMembers { governing_body_id }).await?;
    let mut screen = MembersScreen::new(app, governing_body_id);
    screen.activate().await;
    screen_result(&screen.error_msg)?;

    match cmd {
        MemberCommands::List { .. } => output_list(
            &output_format,
            "members",
            &screen.members,
            "No members",
            |m| format!("{:>5}  {:<28} {}", m.person.id, display_role_label(&m.role), m.person.full_name()),
        ),
        MemberCommands::Available { .. } => {
            screen.open_add_modal().await;
            screen_result(&screen.error_msg)?;
            output_list(
                &output_format,
                "available",
                &screen.available,
                "Nobody available",
                |p| format!("{:>5}  {}", p.id, p.full_name()),
            )
        }
        MemberCommands::Add { person, role, .. } => {
            screen.open_add_modal().await;
            screen.add_form.person_id = Some(person);
            if let Some(role) = role {
                screen.add_form.role_code = role;
            }
            validated(screen.add_form.validate())?;

            screen.add_member().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Person {} added", person), None)
        }
        MemberCommands::Role { person, role, .. } => {
            let target = member(&screen, person)?.clone();
            screen.open_role_modal(&target);
            screen.role_form.role_code = role;

            screen.confirm_role_change().await;
            if screen.role_change.is_armed() && screen.role_form.touched {
                return Err(anyhow::anyhow!("Unknown role: {}", screen.role_form.role_code));
            }
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Role of {} updated", person), None)
        }
        MemberCommands::Remove { person, yes, .. } => {
            let target = member(&screen, person)?.clone();
            screen.open_remove(&target);
            if !confirm(&format!("Remove {} from {}?", target.person.full_name(), screen.header_label()), yes)? {
                screen.close_remove();
                return output_success(&output_format, "Cancelled", None);
            }

            screen.confirm_remove().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, &format!("Person {} removed", person), None)
        }
        MemberCommands::Roles => Ok(()),
    }
}
