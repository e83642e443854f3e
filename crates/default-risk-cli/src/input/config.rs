use std::path::{Path, PathBuf};

use default_risk_core::config::RiskConfig;
use default_risk_core::scoring::LogisticModel;

use super::file;

/// Load a config document. `.yaml`/`.yml` files are read as YAML, anything
/// else as JSON. The result is validated before it is returned.
pub fn read_config(path: &str) -> Result<RiskConfig, Box<dyn std::error::Error>> {
    let (canonical, contents) = file::read_text(path)?;
    let is_yaml = canonical
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let config: RiskConfig = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    config.validate()?;

    tracing::debug!(
        path = %canonical.display(),
        columns = config.schema.len(),
        "config loaded"
    );
    Ok(config)
}

/// A config's `model_path` is relative to the config file's directory.
pub fn configured_model_path(config_path: &str, model_path: &str) -> PathBuf {
    let model = Path::new(model_path);
    match Path::new(config_path).parent() {
        Some(dir) if model.is_relative() => dir.join(model),
        _ => model.to_path_buf(),
    }
}

/// Load and validate a logistic-regression artifact.
pub fn read_model(path: &str) -> Result<LogisticModel, Box<dyn std::error::Error>> {
    let (canonical, contents) = file::read_text(path)?;
    let model = LogisticModel::from_json(&contents)
        .map_err(|e| format!("'{}': {}", canonical.display(), e))?;

    tracing::debug!(
        path = %canonical.display(),
        features = model.feature_names.len(),
        "model loaded"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use default_risk_core::scoring::Classifier;

    fn shipped(relative: &str) -> String {
        format!("{}/../../{}", env!("CARGO_MANIFEST_DIR"), relative)
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let config = read_config(&shipped("config/default-risk.yaml")).unwrap();
        assert_eq!(config.schema.len(), 20);
        assert_eq!(config.employment_types.code_for("Govt (4)"), Some(4));
        assert_eq!(config.location_types.code_for("semi-urban"), Some(2));
        assert_eq!(config.model_path, None);
    }

    #[test]
    fn test_demo_model_matches_shipped_schema() {
        let config = read_config(&shipped("config/default-risk.yaml")).unwrap();
        let model = read_model(&shipped("models/demo-logit.json")).unwrap();
        let names: Vec<&str> = model.feature_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, config.schema.column_names());
    }

    #[test]
    fn test_relative_model_path_follows_config() {
        let path = configured_model_path("config/default-risk.yaml", "../models/m.json");
        assert_eq!(path, Path::new("config/../models/m.json"));
        let abs = configured_model_path("config/default-risk.yaml", "/opt/m.json");
        assert_eq!(abs, Path::new("/opt/m.json"));
    }
}
