use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{enter, output_item, output_success, prompt_line, screen_result, validated};
use crate::cli::OutputFormat;
use crate::navigation::Route;
use crate::screens::{LoginScreen, PasswordSetScreen};
use crate::Backoffice;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with e-mail and password")]
    Login {
        #[arg(help = "E-mail")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Request a password-change e-mail")]
    Forgot {
        #[arg(help = "E-mail")]
        email: String,
    },

    #[command(about = "Create or change a password from an e-mailed link")]
    SetPassword {
        #[arg(help = "Link path, e.g. /password/crea/12?token=...")]
        link: String,
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Password confirmation (defaults to --password)")]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, app: &Backoffice, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            enter(app, Route::Login).await?;
            let mut screen = LoginScreen::new(app);
            screen.form.email = email;
            screen.form.password = match password {
                Some(p) => p,
                None => prompt_line("Password: ")?,
            };
            validated(screen.form.validate())?;

            if !screen.submit().await {
                screen_result(&screen.error_msg)?;
                return Err(anyhow::anyhow!("Login failed"));
            }
            let name = app.session().current().map(|s| s.display_name()).unwrap_or_default();
            output_success(
                &output_format,
                &format!("Logged in as {}", name),
                Some(json!({ "route": app.navigator().current().path() })),
            )
        }
        AuthCommands::Logout => {
            app.sign_out().await;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let authenticated = app.session().is_authenticated();
            let message = if authenticated { "Authenticated" } else { "Not authenticated" };
            output_item(&output_format, &json!({ "authenticated": authenticated }), message)
        }
        AuthCommands::Whoami => {
            let session = app
                .session()
                .current()
                .ok_or_else(|| anyhow::anyhow!("Not logged in"))?;
            let text = format!(
                "{} <{}>\nId: {}\nRoles: {}",
                session.display_name(),
                session.email,
                session.user_id,
                session.roles.join(", ")
            );
            let mut public = serde_json::to_value(&session)?;
            if let Some(obj) = public.as_object_mut() {
                obj.remove("token");
            }
            output_item(&output_format, &public, &text)
        }
        AuthCommands::Forgot { email } => {
            let mut screen = LoginScreen::new(app);
            screen.form.email = email;
            screen.open_forgot();
            screen.submit_forgot().await;
            screen_result(&screen.forgot.error_msg)?;
            if !screen.forgot.success {
                return Err(anyhow::anyhow!("Invalid e-mail address"));
            }
            output_success(
                &output_format,
                "If the address is registered, a password link has been sent",
                None,
            )
        }
        AuthCommands::SetPassword { link, password, confirm } => {
            let mut screen = PasswordSetScreen::new(app, &link);
            screen_result(&screen.error_msg)?;

            let (password, confirm) = match (password, confirm) {
                (Some(p), Some(c)) => (p, c),
                (Some(p), None) => (p.clone(), p),
                (None, _) => (prompt_line("New password: ")?, prompt_line("Confirm password: ")?),
            };
            screen.form.password = password;
            screen.form.confirm = confirm;
            validated(screen.form.validate())?;

            screen.submit().await;
            screen_result(&screen.error_msg)?;
            output_success(&output_format, screen.title(), Some(json!({ "success": screen.success })))
        }
    }
}

