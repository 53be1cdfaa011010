use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::forms::FormErrors;
use crate::navigation::Route;
use crate::Backoffice;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a collection: pretty JSON, or one line per item
pub fn output_list<T, F>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    empty_message: &str,
    line: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text if items.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for item in items {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}

/// Output a single record
pub fn output_item<T: Serialize>(output_format: &OutputFormat, item: &T, text: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => println!("{}", text),
    }
    Ok(())
}

/// Read one line from stdin after printing `prompt`.
pub fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask before a destructive action; `--yes` skips the question.
pub fn confirm(question: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    let answer = prompt_line(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sì"))
}

/// Navigate to `route`, failing when a guard sends us elsewhere.
pub async fn enter(app: &Backoffice, route: Route) -> anyhow::Result<()> {
    let landed = app.navigator().navigate(route.clone()).await;
    if landed != route {
        if landed == Route::Dashboard {
            return Err(anyhow::anyhow!("Already logged in"));
        }
        return Err(anyhow::anyhow!(
            "Not logged in: run `backoffice auth login <email>` first"
        ));
    }
    Ok(())
}

/// Turn a screen's error message into a command failure.
pub fn screen_result(error_msg: &Option<String>) -> anyhow::Result<()> {
    match error_msg {
        Some(msg) => Err(anyhow::anyhow!("{}", msg)),
        None => Ok(()),
    }
}

/// Reject a form locally before anything is sent.
pub fn validated(errors: FormErrors) -> anyhow::Result<()> {
    errors
        .into_result()
        .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))
}

/// Find a record by id in a loaded list.
pub fn find_by_id<'a, T, F>(items: &'a [T], id: i64, item_type: &str, key: F) -> anyhow::Result<&'a T>
where
    F: Fn(&T) -> i64,
{
    items
        .iter()
        .find(|item| key(item) == id)
        .ok_or_else(|| anyhow::anyhow!("{} {} not found", item_type, id))
}
