//! Subject commands.

use super::{call, require_daemon};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use resolar_config_and_utils::Paths;
use resolar_dispatch::Subject;
use resolar_ipc::Method;
use serde_json::{json, Value};

fn print_subjects(data: &Value) {
    match serde_json::from_value::<Vec<Subject>>(data.clone()) {
        Ok(subjects) if subjects.is_empty() => println!("No subjects"),
        Ok(subjects) => {
            for subject in subjects {
                output::print_row(&subject.id.to_string(), &subject.name);
            }
        }
        // Unknown listing shape; show it as-is.
        Err(_) => println!("{}", data),
    }
}

/// List subjects.
pub async fn subjects_list(paths: &Paths, cached: bool, format: &OutputFormat) -> Result<bool> {
    let client = require_daemon(paths).await?;
    let outcome = call(&client, Method::SubjectsList, json!({ "preferCache": cached })).await?;

    Ok(output::print_outcome(&outcome, format, print_subjects))
}

/// Add a subject.
pub async fn subjects_add(paths: &Paths, name: &str, format: &OutputFormat) -> Result<bool> {
    let client = require_daemon(paths).await?;
    let outcome = call(&client, Method::SubjectsAdd, json!({ "name": name })).await?;

    Ok(output::print_outcome(&outcome, format, |data| {
        match data.get("id").and_then(|v| v.as_i64()) {
            Some(id) => println!("Subject added: {} ({})", name, id),
            None => println!("Subject added: {}", name),
        }
    }))
}

/// Remember a subject, or clear the remembered one with `None`.
pub async fn subjects_select(
    paths: &Paths,
    subject_id: Option<i64>,
    format: &OutputFormat,
) -> Result<bool> {
    let client = require_daemon(paths).await?;
    let outcome = call(&client, Method::SubjectsSelect, json!({ "subjectId": subject_id })).await?;

    Ok(output::print_outcome(&outcome, format, |_| match subject_id {
        Some(id) => println!("Selected subject {}", id),
        None => println!("Subject selection cleared"),
    }))
}
