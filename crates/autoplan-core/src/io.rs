//! Loading and saving network data files.
//!
//! The format follows the file extension: `.json`, `.yaml`/`.yml` or
//! `.toml`. Unknown extensions are tried as YAML first, then JSON.

use crate::error::{PlanError, PlanResult};
use crate::NetworkData;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
    Unknown,
}

fn format_of(path: &Path) -> Format {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            Format::Yaml
        }
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
        _ => Format::Unknown,
    }
}

/// Read network data from a file
pub fn load_network(path: &Path) -> PlanResult<NetworkData> {
    let text = fs::read_to_string(path)?;
    let data: NetworkData = match format_of(path) {
        Format::Json => serde_json::from_str(&text)?,
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Toml => toml::from_str(&text).map_err(|e| PlanError::Parse(e.to_string()))?,
        Format::Unknown => serde_yaml::from_str(&text)
            .or_else(|_| serde_json::from_str(&text))
            .map_err(|e| PlanError::Parse(format!("{}: {}", path.display(), e)))?,
    };
    debug!(path = %path.display(), rows = data.row_count(), "loaded network data");
    Ok(data)
}

/// Write network data to a file, creating parent directories as needed
pub fn save_network(path: &Path, data: &NetworkData) -> PlanResult<()> {
    let text = match format_of(path) {
        Format::Json => serde_json::to_string_pretty(data)?,
        Format::Toml => toml::to_string_pretty(data).map_err(|e| PlanError::Parse(e.to_string()))?,
        Format::Yaml | Format::Unknown => serde_yaml::to_string(data)?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_every_format() {
        let dir = tempdir().unwrap();
        let data = NetworkData::quarterly_baseline();
        for name in ["net.json", "net.yaml", "net.toml"] {
            let path = dir.path().join(name);
            save_network(&path, &data).unwrap();
            assert_eq!(load_network(&path).unwrap(), data, "{}", name);
        }
    }

    #[test]
    fn unknown_extension_accepts_json_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.data");
        fs::write(&path, r#"{"labor_requirements": [{"model": "basic", "hours": 3.5}]}"#).unwrap();
        let data = load_network(&path).unwrap();
        assert_eq!(data.labor_requirements.len(), 1);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_network(&path), Err(PlanError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = load_network(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
    }
}
