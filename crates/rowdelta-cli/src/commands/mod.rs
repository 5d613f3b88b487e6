pub mod diff;
pub mod snapshot;

use rowdelta_core::LetterCaseSettings;
use std::path::Path;

/// Letter-case settings from an optional TOML file, defaults otherwise
pub fn load_settings(
    config: Option<&Path>,
) -> Result<LetterCaseSettings, Box<dyn std::error::Error>> {
    match config {
        None => Ok(LetterCaseSettings::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            Ok(LetterCaseSettings::from_toml_str(&text)?)
        }
    }
}
