use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A competitor as the scrape pipeline sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    /// Platform → handle map, e.g. `{"twitter": "techcorp"}`.
    pub social_handles: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One entry of `config/competitors.yaml`, used to seed the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorConfig {
    pub name: String,
    pub website: Option<String>,
    #[serde(default)]
    pub social: BTreeMap<String, String>,
}

impl CompetitorConfig {
    /// Social handles in the JSON shape stored on the `competitors` row.
    #[must_use]
    pub fn social_handles_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.social
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CompetitorsFile {
    pub competitors: Vec<CompetitorConfig>,
}

/// Load and validate the competitors configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_competitors(path: &Path) -> Result<CompetitorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompetitorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_competitors(&content)
}

fn parse_competitors(content: &str) -> Result<CompetitorsFile, ConfigError> {
    let file: CompetitorsFile =
        serde_yaml::from_str(content).map_err(ConfigError::CompetitorsFileParse)?;
    validate_competitors(&file)?;
    Ok(file)
}

fn validate_competitors(file: &CompetitorsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for competitor in &file.competitors {
        let name = competitor.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "competitor name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate competitor name: '{name}'"
            )));
        }

        if let Some(website) = &competitor.website {
            if !(website.starts_with("http://") || website.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "competitor '{name}' has website '{website}'; expected an http(s) URL"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
competitors:
  - name: TechCorp Inc
    website: https://example.com
    social:
      twitter: techcorp
  - name: InnovateLabs
    website: https://example.org
"#;

    #[test]
    fn parses_sample_file() {
        let file = parse_competitors(SAMPLE).expect("sample should parse");
        assert_eq!(file.competitors.len(), 2);
        assert_eq!(file.competitors[0].name, "TechCorp Inc");
        assert_eq!(
            file.competitors[0].social.get("twitter").map(String::as_str),
            Some("techcorp")
        );
        assert!(file.competitors[1].social.is_empty());
    }

    #[test]
    fn social_handles_json_is_an_object() {
        let file = parse_competitors(SAMPLE).unwrap();
        let json = file.competitors[0].social_handles_json();
        assert_eq!(json["twitter"], "techcorp");
        assert_eq!(
            file.competitors[1].social_handles_json(),
            serde_json::json!({})
        );
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let yaml = r"
competitors:
  - name: Acme
  - name: ACME
";
        let err = parse_competitors(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate competitor name"));
    }

    #[test]
    fn rejects_empty_name() {
        let yaml = r"
competitors:
  - name: '  '
";
        let err = parse_competitors(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_non_http_website() {
        let yaml = r"
competitors:
  - name: Acme
    website: ftp://acme.test
";
        let err = parse_competitors(yaml).unwrap_err();
        assert!(err.to_string().contains("expected an http(s) URL"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_competitors(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CompetitorsFileIo { ref path, .. } if path.contains("not/here")));
    }
}
