//! `list.json` manifest of a sentence-file directory.

use std::path::Path;

use anyhow::Context;
use tracing::info;

pub const MANIFEST_FILE: &str = "list.json";

/// Write the sorted `.txt` file names in `dir` to `output` as a pretty JSON
/// array. Returns the names written.
pub fn write_manifest(dir: &Path, output: &Path) -> anyhow::Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".txt") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    std::fs::write(output, serde_json::to_string_pretty(&names)?)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("✅ {} created with {} articles", output.display(), names.len());
    Ok(names)
}
