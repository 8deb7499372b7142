//! Properties file output

use std::path::{Path, PathBuf};

use crate::config::Conventions;
use crate::error::{Error, Result};
use crate::property::{ProfileMap, PropertySet};

/// Render a property set as `key=value` lines sorted by key
pub fn render(properties: &PropertySet) -> String {
    let mut entries: Vec<_> = properties.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

/// Write one properties file per profile into `output_dir`
///
/// Creates `output_dir` if needed and overwrites existing files. Returns the
/// written paths in profile order.
pub fn write_all(
    output_dir: &Path,
    profiles: &ProfileMap,
    conventions: &Conventions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, &e))?;

    let mut written = Vec::with_capacity(profiles.len());
    for (name, profiled) in profiles {
        let path = output_dir.join(conventions.output_file_name(name));
        std::fs::write(&path, render(&profiled.properties)).map_err(|e| Error::io(&path, &e))?;
        log::info!(
            "Wrote {} ({} properties)",
            path.display(),
            profiled.properties.len()
        );
        written.push(path);
    }

    Ok(written)
}
