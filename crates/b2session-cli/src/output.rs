//! Rendering of a session for the terminal, a shell, or another program.

use anyhow::Result;
use b2session_core::SessionData;

use crate::cli::Format;

/// Number of token characters shown in the text summary
const TOKEN_PREVIEW_CHARS: usize = 12;

pub fn render(data: &SessionData, format: Format) -> Result<String> {
    let descriptor = &data.descriptor;
    let rendered = match format {
        Format::Text => {
            let preview: String = descriptor
                .authorization_token
                .chars()
                .take(TOKEN_PREVIEW_CHARS)
                .collect();
            let minutes = data.minutes_until_expiry();
            format!(
                "Account:       {}\nKey ID:        {}\nAPI URL:       {}\nDownload URL:  {}\nToken:         {}...\nExpires in:    {}h {}m",
                descriptor.account_id,
                data.key_id,
                descriptor.api_url,
                descriptor.download_url,
                preview,
                minutes / 60,
                minutes % 60,
            )
        }
        Format::Env => descriptor
            .env_vars()
            .iter()
            .map(|(name, value)| format!("export {}={}", name, shell_quote(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Json => serde_json::to_string_pretty(descriptor)?,
    };
    Ok(rendered)
}

/// Single-quote a value for POSIX shells
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
