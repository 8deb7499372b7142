//! Environment substitution
//!
//! Each environment file `<profile>.json` holds a flat JSON object of
//! strings. For the profile it names, any property whose whole value is a
//! placeholder such as `${DB_HOST}` is replaced by the environment entry of
//! that key.
//!
//! Substitution is single pass and whole value only: `prefix-${DB_HOST}` is
//! left as is, as is a placeholder whose key the environment lacks.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::config::Conventions;
use crate::error::{Error, Result};
use crate::property::{ProfileMap, ProfiledProperties, PropertySet, PropertyValue};

/// Placeholder key to replacement string, for one profile
pub type Environment = HashMap<String, String>;

/// Environments by profile name
pub type EnvironmentMap = HashMap<String, Environment>;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder() -> &'static Regex {
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"^\$\{([\w\-.]+)\}$").expect("placeholder pattern is valid"))
}

/// Key of a value that consists of exactly one placeholder
pub fn placeholder_key(text: &str) -> Option<&str> {
    placeholder()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Read every environment file in `env_dir`
pub fn load_environments(env_dir: &Path, conventions: &Conventions) -> Result<EnvironmentMap> {
    if !env_dir.is_dir() {
        return Err(Error::io(
            env_dir,
            &std::io::Error::new(std::io::ErrorKind::NotFound, "environment directory not found"),
        ));
    }

    let pattern = conventions.env_glob(env_dir);
    let entries = glob::glob(&pattern).map_err(|e| {
        Error::invalid_conventions(format!("Invalid glob pattern '{}': {}", pattern, e))
    })?;

    let mut environments = EnvironmentMap::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(e.path(), e.error()))?;
        if !path.is_file() {
            continue;
        }
        let Some(profile) = conventions.env_profile(&path) else {
            continue;
        };

        let environment = load_environment(&path)?;
        log::debug!(
            "Read {} ({} entries) for profile {}",
            path.display(),
            environment.len(),
            profile
        );
        environments.insert(profile, environment);
    }

    Ok(environments)
}

/// Read one environment file
pub fn load_environment(path: &Path) -> Result<Environment> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::malformed_environment_file(path, e.to_string()))
}

/// Substitute placeholders in every profile that has an environment
///
/// Profiles without an environment pass through unchanged.
pub fn resolve(profiles: &ProfileMap, environments: &EnvironmentMap) -> ProfileMap {
    profiles
        .iter()
        .map(|(name, profiled)| {
            let properties = match environments.get(name) {
                Some(env) => resolve_properties(name, &profiled.properties, env),
                None => {
                    log::debug!("No environment for profile {}, leaving it as is", name);
                    profiled.properties.clone()
                }
            };
            (
                name.clone(),
                ProfiledProperties::new(profiled.profile.clone(), properties),
            )
        })
        .collect()
}

/// Load the environments of `env_dir` and substitute them into `profiles`
pub fn resolve_from_dir(
    env_dir: &Path,
    profiles: &ProfileMap,
    conventions: &Conventions,
) -> Result<ProfileMap> {
    let environments = load_environments(env_dir, conventions)?;
    Ok(resolve(profiles, &environments))
}

fn resolve_properties(profile: &str, properties: &PropertySet, env: &Environment) -> PropertySet {
    properties
        .iter()
        .map(|(key, value)| {
            let resolved = resolve_value(value, env);
            if let Some(k) = value.as_str().and_then(placeholder_key) {
                if !env.contains_key(k) {
                    log::debug!(
                        "Profile {}: no environment entry for '{}' used by {}",
                        profile,
                        k,
                        key
                    );
                }
            }
            (key.clone(), resolved)
        })
        .collect()
}

/// Substitute a single value
///
/// Only a string that is exactly one placeholder with a known key changes.
pub fn resolve_value(value: &PropertyValue, env: &Environment) -> PropertyValue {
    let replacement = value
        .as_str()
        .and_then(placeholder_key)
        .and_then(|key| env.get(key));

    match replacement {
        Some(text) => PropertyValue::String(text.clone()),
        None => value.clone(),
    }
}
