use crate::config::types::Config;
use crate::enablement::FileCache;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle_cache_show(config: &Config, json: bool) -> Result<()> {
    let cache = FileCache::open(config.cache.path.as_deref())?;
    let entries = cache
        .entries()
        .with_context(|| format!("reading {}", cache.path().display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("📁 {}", cache.path().display().to_string().dimmed());
    if entries.is_empty() {
        println!("No cached API enablement entries.");
        return Ok(());
    }

    for (project, services) in &entries {
        println!("{}", project.bold());
        let mut names: Vec<&String> = services
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name)
            .collect();
        names.sort();
        let last = names.len().saturating_sub(1);
        for (i, name) in names.into_iter().enumerate() {
            let branch = if i == last { "└──" } else { "├──" };
            println!("{} {}", branch, name);
        }
    }

    Ok(())
}

pub fn handle_cache_clear(config: &Config, project: Option<&str>, json: bool) -> Result<()> {
    let cache = FileCache::open(config.cache.path.as_deref())?;
    let removed = cache
        .clear(project)
        .with_context(|| format!("clearing {}", cache.path().display()))?;

    if json {
        let output = serde_json::json!({ "removed": removed, "project_id": project });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match project {
            Some(p) => println!("Cleared {} cached entries for {}", removed, p),
            None => println!("Cleared {} cached entries", removed),
        }
    }

    Ok(())
}
