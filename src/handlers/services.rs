use crate::common::output::labeled_success;
use crate::config::types::Config;
use crate::enablement::{checker_from_config, enable_api_link, normalize_service_name};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

pub async fn handle_check(config: &Config, project: &str, service: &str, json: bool) -> Result<()> {
    let service = normalize_service_name(service);
    let checker = checker_from_config(config)?.silent(true);
    let enabled = checker.check(project, &service).await?;

    if json {
        let output = json!({
            "project_id": project,
            "service": service,
            "enabled": enabled,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if enabled {
        println!("{} {} is enabled on {}", "✓".green(), service.bold(), project);
    } else {
        println!("{} {} is not enabled on {}", "✗".red(), service.bold(), project);
        println!("  Enable it with: gcp-apictl ensure {} {}", project, service);
        println!("  Or visit: {}", enable_api_link(project, &service));
    }

    Ok(())
}

pub async fn handle_ensure(
    config: &Config,
    project: &str,
    service: &str,
    best_effort: bool,
    silent: bool,
    prefix: &str,
    json: bool,
) -> Result<()> {
    let service = normalize_service_name(service);
    let silent = silent || json;
    let checker = checker_from_config(config)?
        .with_prefix(prefix)
        .silent(silent);

    if best_effort {
        checker.best_effort_ensure(project, &service).await;
    } else {
        checker.ensure(project, &service).await?;
    }

    if json {
        let output = json!({
            "project_id": project,
            "service": service,
            "best_effort": best_effort,
            "ok": true,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !silent && !best_effort {
        labeled_success(prefix, &format!("{} is ready to use", service.bold()));
    }

    Ok(())
}

pub fn handle_link(project: &str, service: &str, json: bool) -> Result<()> {
    let url = enable_api_link(project, service);

    if json {
        let output = json!({
            "project_id": project,
            "service": normalize_service_name(service),
            "url": url,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", url);
    }

    Ok(())
}
