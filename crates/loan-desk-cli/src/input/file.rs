use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use loan_desk_core::policy::OriginationPolicy;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    Ok(value)
}

/// Load origination policy from JSON, or YAML for `.yaml`/`.yml` files.
/// Defaults when no path is given.
pub fn read_policy(path: Option<&str>) -> Result<OriginationPolicy, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(OriginationPolicy::default());
    };
    let resolved = resolve_path(path)?;
    let is_yaml = matches!(
        resolved.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let policy: OriginationPolicy = if is_yaml {
        let contents = fs::read_to_string(&resolved)
            .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    } else {
        read_json(path)?
    };

    policy.validate()?;
    tracing::debug!(path = %resolved.display(), "Loaded origination policy");
    Ok(policy)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("File not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}
