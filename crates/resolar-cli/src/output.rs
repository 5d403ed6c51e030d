//! Output formatting for the CLI.

use clap::ValueEnum;
use resolar_dispatch::Outcome;
use resolar_ipc::Response;
use serde_json::{json, Value};

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Convert a daemon response into the uniform outcome shape.
///
/// Successful responses carry the outcome itself as their result.
pub fn outcome_from_response(response: Response) -> Outcome {
    if let Some(error) = response.error {
        return Outcome::failure(error.message.clone(), error.should_relogin());
    }
    match response.result {
        Some(result) => serde_json::from_value(result).unwrap_or_else(|e| {
            Outcome::failure(format!("Malformed daemon response: {}", e), false)
        }),
        None => Outcome::success(None),
    }
}

/// Print an outcome and report whether it succeeded.
///
/// In text mode `render` prints successful data; failures go to stderr.
pub fn print_outcome<F>(outcome: &Outcome, format: &OutputFormat, render: F) -> bool
where
    F: FnOnce(&Value),
{
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        },
        OutputFormat::Text => {
            if outcome.success {
                render(outcome.data.as_ref().unwrap_or(&Value::Null));
            } else {
                eprintln!("Error: {}", outcome.error.as_deref().unwrap_or("unknown error"));
                if outcome.should_relogin() {
                    eprintln!("Run 'resolar login' to sign in again.");
                }
            }
        }
    }
    outcome.success
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            eprintln!("{}", json!({ "status": "error", "message": message }));
        }
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolar_ipc::error_codes;

    fn over_the_wire(response: Response) -> Outcome {
        let line = response.to_json().unwrap();
        outcome_from_response(Response::from_json(&line).unwrap())
    }

    #[test]
    fn test_outcome_from_success() {
        let outcome = over_the_wire(Response::success(
            "1",
            json!({"success": true, "data": {"id": 9}}),
        ));
        assert!(outcome.success);
        assert_eq!(outcome.data, Some(json!({"id": 9})));
    }

    #[test]
    fn test_null_and_absent_data_stay_distinct() {
        let null = over_the_wire(Response::success("1", json!({"success": true, "data": null})));
        assert_eq!(
            serde_json::to_value(&null).unwrap(),
            json!({"success": true, "data": null})
        );

        let absent = over_the_wire(Response::success("2", json!({"success": true})));
        assert_eq!(
            serde_json::to_value(&absent).unwrap(),
            json!({"success": true})
        );
    }

    #[test]
    fn test_malformed_result_is_a_failure() {
        let outcome = over_the_wire(Response::success("1", json!([1, 2])));
        assert!(!outcome.success);
        assert!(!outcome.should_relogin());
    }

    #[test]
    fn test_outcome_from_error_keeps_relogin() {
        let response = Response::error_with_data(
            "1",
            error_codes::NOT_AUTHENTICATED,
            "세션이 만료되었습니다. 다시 로그인해주세요.",
            json!({"shouldRelogin": true}),
        );
        let outcome = outcome_from_response(response);
        assert!(!outcome.success);
        assert!(outcome.should_relogin());
        assert_eq!(
            outcome.error.as_deref(),
            Some("세션이 만료되었습니다. 다시 로그인해주세요.")
        );

        let plain = outcome_from_response(Response::error("1", error_codes::HTTP_ERROR, "HTTP 500"));
        assert!(!plain.should_relogin());
    }

    #[test]
    fn test_print_outcome_reports_success() {
        let mut rendered = None;
        let ok = print_outcome(
            &Outcome::success(Some(json!([1]))),
            &OutputFormat::Text,
            |data| rendered = Some(data.clone()),
        );
        assert!(ok);
        assert_eq!(rendered, Some(json!([1])));

        let failed = print_outcome(
            &Outcome::failure("HTTP 404", false),
            &OutputFormat::Json,
            |_| panic!("render is only for successes"),
        );
        assert!(!failed);
    }
}
