//! Highlighting toggle command.

use super::{call, require_daemon};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use resolar_config_and_utils::Paths;
use resolar_ipc::Method;
use serde_json::json;

/// Turn highlighting on or off for a page.
pub async fn highlighting(
    paths: &Paths,
    page: &str,
    enabled: bool,
    format: &OutputFormat,
) -> Result<bool> {
    let client = require_daemon(paths).await?;
    let outcome = call(
        &client,
        Method::HighlightsToggle,
        json!({ "page": page, "enabled": enabled }),
    )
    .await?;

    Ok(output::print_outcome(&outcome, format, |_| {
        let state = if enabled { "enabled" } else { "disabled" };
        println!("Highlighting {} for {}", state, page);
    }))
}
