//! Authentication commands.

use super::{call, get_ipc_client, require_daemon};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use resolar_config_and_utils::Paths;
use resolar_ipc::Method;
use serde_json::json;
use std::io::{self, Write};

/// Login with username and password.
pub async fn login(paths: &Paths, username: Option<String>, format: &OutputFormat) -> Result<bool> {
    let client = require_daemon(paths).await?;

    let username = match username {
        Some(username) => username,
        None => {
            print!("Username: ");
            io::stdout().flush()?;
            let mut username = String::new();
            io::stdin().read_line(&mut username)?;
            username
        }
    };
    let username = username.trim().to_string();
    if username.is_empty() {
        output::print_error("Username is required", format);
        return Ok(false);
    }

    // Prompt for password (hidden)
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(false);
    }

    let outcome = call(
        &client,
        Method::AuthLogin,
        json!({ "username": username, "password": password }),
    )
    .await?;

    Ok(output::print_outcome(&outcome, format, |_| {
        println!("Logged in as {}", username);
    }))
}

/// Logout and clear the stored session.
pub async fn logout(paths: &Paths, format: &OutputFormat) -> Result<bool> {
    let client = require_daemon(paths).await?;
    let outcome = call(&client, Method::AuthLogout, json!({})).await?;

    Ok(output::print_outcome(&outcome, format, |_| {
        println!("Logged out successfully");
    }))
}

/// Check daemon and authentication status.
pub async fn status(paths: &Paths, format: &OutputFormat) -> Result<bool> {
    let client = get_ipc_client(paths);
    if !client.is_daemon_running().await {
        match format {
            OutputFormat::Text => {
                println!("Daemon:   not running");
                println!("Auth:     unknown");
            }
            OutputFormat::Json => {
                println!(r#"{{"daemonRunning":false,"loggedIn":null}}"#);
            }
        }
        return Ok(true);
    }

    let outcome = call(&client, Method::AuthStatus, json!({})).await?;
    if !outcome.success {
        return Ok(output::print_outcome(&outcome, format, |_| {}));
    }

    let data = outcome.data.unwrap_or_default();
    let logged_in = data
        .get("loggedIn")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let username = data.get("username").and_then(|v| v.as_str());

    match format {
        OutputFormat::Text => {
            println!("Daemon:   running");
            if logged_in {
                println!("Auth:     logged in");
                println!("User:     {}", username.unwrap_or("unknown"));
            } else {
                println!("Auth:     not logged in");
            }
        }
        OutputFormat::Json => {
            let json = json!({
                "daemonRunning": true,
                "loggedIn": logged_in,
                "username": username,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(true)
}
