//! Page and highlight submission commands.

use super::{call, require_daemon};
use crate::output::{self, OutputFormat};
use crate::SubmitArgs;
use anyhow::Result;
use resolar_config_and_utils::Paths;
use resolar_dispatch::{
    HighlightSubmission, Outcome, PageEndpoint, PageSubmission, NO_HIGHLIGHTS_SELECTED,
    PAGE_CONTENT_UNAVAILABLE,
};
use resolar_ipc::Method;
use serde_json::{Map, Value};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Read captured text from a file, or stdin for `None` and `-`.
///
/// Unreadable and blank input both yield `None`.
fn read_content(file: Option<&Path>) -> Option<String> {
    let result = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };

    match result {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Failed to read content");
            None
        }
    }
}

/// Non-blank lines, trimmed.
fn highlight_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn page_submission(args: &SubmitArgs, content: String) -> PageSubmission {
    PageSubmission {
        url: args.url.clone(),
        title: args.title.clone(),
        content,
        subject_id: args.subject_id,
        api_endpoint: args.endpoint.map(PageEndpoint::from),
        extra: Map::new(),
    }
}

fn highlight_submission(args: &SubmitArgs, highlights: Vec<String>) -> HighlightSubmission {
    HighlightSubmission {
        url: args.url.clone(),
        title: args.title.clone(),
        highlights,
        subject_id: args.subject_id,
        api_endpoint: args.endpoint.map(PageEndpoint::from),
        extra: Map::new(),
    }
}

fn print_submitted(data: &Value) {
    match data {
        Value::Null => println!("Submitted"),
        other => println!("Submitted: {}", other),
    }
}

/// Submit the text of a page.
pub async fn submit_page(paths: &Paths, args: SubmitArgs, format: &OutputFormat) -> Result<bool> {
    let Some(content) = read_content(args.file.as_deref()) else {
        let outcome = Outcome::failure(PAGE_CONTENT_UNAVAILABLE, false);
        return Ok(output::print_outcome(&outcome, format, |_| {}));
    };

    let client = require_daemon(paths).await?;
    let page = page_submission(&args, content);
    let outcome = call(&client, Method::PagesSubmit, serde_json::to_value(&page)?).await?;

    Ok(output::print_outcome(&outcome, format, print_submitted))
}

/// Submit highlighted passages, one per line.
pub async fn submit_highlights(
    paths: &Paths,
    args: SubmitArgs,
    format: &OutputFormat,
) -> Result<bool> {
    let highlights = read_content(args.file.as_deref())
        .map(|text| highlight_lines(&text))
        .unwrap_or_default();
    if highlights.is_empty() {
        let outcome = Outcome::failure(NO_HIGHLIGHTS_SELECTED, false);
        return Ok(output::print_outcome(&outcome, format, |_| {}));
    }

    let client = require_daemon(paths).await?;
    let submission = highlight_submission(&args, highlights);
    let outcome = call(
        &client,
        Method::PagesSubmitHighlights,
        serde_json::to_value(&submission)?,
    )
    .await?;

    Ok(output::print_outcome(&outcome, format, print_submitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndpointArg;
    use serde_json::json;

    fn args(endpoint: Option<EndpointArg>) -> SubmitArgs {
        SubmitArgs {
            url: "https://example.com/a".to_string(),
            title: Some("A".to_string()),
            subject_id: Some(4),
            endpoint,
            file: None,
        }
    }

    #[test]
    fn test_read_content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.txt");
        std::fs::write(&page, "Some article text\n").unwrap();
        assert_eq!(
            read_content(Some(&page)).as_deref(),
            Some("Some article text\n")
        );

        let blank = dir.path().join("blank.txt");
        std::fs::write(&blank, " \n\t\n").unwrap();
        assert_eq!(read_content(Some(&blank)), None);

        assert_eq!(read_content(Some(&dir.path().join("missing.txt"))), None);
    }

    #[test]
    fn test_highlight_lines() {
        assert_eq!(
            highlight_lines("  first \n\n second\n   \n"),
            vec!["first".to_string(), "second".to_string()]
        );
        assert!(highlight_lines("\n \n").is_empty());
    }

    #[test]
    fn test_page_submission_params() {
        let page = page_submission(&args(Some(EndpointArg::HighlightLarge)), "text".into());
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "url": "https://example.com/a",
                "title": "A",
                "content": "text",
                "subjectId": 4,
                "apiEndpoint": "highlight/large"
            })
        );

        let highlights = highlight_submission(&args(None), vec!["x".into()]);
        let value = serde_json::to_value(&highlights).unwrap();
        assert!(value.get("apiEndpoint").is_none());
        assert_eq!(value["highlights"], json!(["x"]));
    }
}
