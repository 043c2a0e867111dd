use serde_json::Value;

use crate::error::CliError;

/// Prints the command payload as JSON on stdout.
pub fn render(data: &Value, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    println!("{payload}");
    Ok(())
}
