use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "gql-checklist";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// GraphQL endpoint, e.g. https://example.hasura.app/v1/graphql
  pub endpoint: String,
  /// Custom title for header
  pub title: Option<String>,
  /// Extra static request headers (names are case-insensitive)
  #[serde(default, deserialize_with = "deserialize_lowercase_map")]
  pub headers: BTreeMap<String, String>,
  #[serde(default)]
  pub insert_strategy: InsertStrategy,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
  30
}

fn deserialize_lowercase_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let m: BTreeMap<String, String> = BTreeMap::deserialize(deserializer)?;
  Ok(m.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect())
}

/// How the list is brought up to date after a todo is added
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsertStrategy {
  /// Re-run the list query against the server
  #[default]
  Refetch,
  /// Append the record returned by the insert mutation
  Local,
}

impl Config {
  /// Configuration with defaults for everything but the endpoint.
  pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
    Self {
      endpoint: endpoint.into(),
      title: None,
      headers: BTreeMap::new(),
      insert_strategy: InsertStrategy::default(),
      request_timeout_secs: default_request_timeout_secs(),
    }
  }

  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./gql-checklist.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/gql-checklist/config.yaml
  ///
  /// Without a file, an endpoint given on the command line is enough.
  pub fn load(explicit_path: Option<&Path>, endpoint: Option<String>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match (path, endpoint) {
      (Some(p), endpoint) => {
        let config = Self::load_from_path(&p)?;
        match endpoint {
          Some(endpoint) => Config { endpoint, ..config },
          None => config,
        }
      }
      (None, Some(endpoint)) => Self::with_endpoint(endpoint),
      (None, None) => {
        return Err(eyre!(
          "No configuration file found. Create one at ~/.config/{}/config.yaml\n\
                 or pass the GraphQL endpoint with --endpoint.",
          APP_NAME
        ))
      }
    };

    config.endpoint_url()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(format!("{}.yaml", APP_NAME));
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join(APP_NAME).join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Parse the endpoint, accepting only http(s) URLs.
  pub fn endpoint_url(&self) -> Result<Url> {
    let url = Url::parse(&self.endpoint)
      .map_err(|e| eyre!("Invalid GraphQL endpoint {}: {}", self.endpoint, e))?;

    match url.scheme() {
      "http" | "https" => Ok(url),
      scheme => Err(eyre!(
        "Invalid GraphQL endpoint {}: unsupported scheme {}",
        self.endpoint,
        scheme
      )),
    }
  }

  /// Header title, defaulting to the app name.
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("GraphQL Checklist ✅")
  }

  /// Get the admin secret from environment variables.
  ///
  /// Checks GQL_CHECKLIST_ADMIN_SECRET first, then HASURA_GRAPHQL_ADMIN_SECRET.
  pub fn get_admin_secret() -> Option<String> {
    std::env::var("GQL_CHECKLIST_ADMIN_SECRET")
      .or_else(|_| std::env::var("HASURA_GRAPHQL_ADMIN_SECRET"))
      .ok()
  }

  /// Get the bearer token from GQL_CHECKLIST_TOKEN.
  pub fn get_bearer_token() -> Option<String> {
    std::env::var("GQL_CHECKLIST_TOKEN").ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  #[test]
  fn test_load_full_config() {
    let file = write_config(
      "endpoint: https://todos.example.com/v1/graphql\n\
       title: My list\n\
       headers:\n  X-Hasura-Role: user\n\
       insert_strategy: local\n\
       request_timeout_secs: 5\n",
    );

    let config = Config::load(Some(file.path()), None).unwrap();
    assert_eq!(config.endpoint, "https://todos.example.com/v1/graphql");
    assert_eq!(config.title(), "My list");
    assert_eq!(
      config.headers.get("x-hasura-role").map(String::as_str),
      Some("user")
    );
    assert_eq!(config.insert_strategy, InsertStrategy::Local);
    assert_eq!(config.request_timeout_secs, 5);
  }

  #[test]
  fn test_defaults() {
    let file = write_config("endpoint: http://localhost:8080/v1/graphql\n");

    let config = Config::load(Some(file.path()), None).unwrap();
    assert!(config.headers.is_empty());
    assert_eq!(config.insert_strategy, InsertStrategy::Refetch);
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.title(), "GraphQL Checklist ✅");
  }

  #[test]
  fn test_endpoint_override() {
    let file = write_config("endpoint: http://localhost:8080/v1/graphql\n");

    let config = Config::load(
      Some(file.path()),
      Some("https://other.example.com/graphql".to_string()),
    )
    .unwrap();
    assert_eq!(config.endpoint, "https://other.example.com/graphql");
  }

  #[test]
  fn test_missing_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    assert!(Config::load(Some(&missing), None).is_err());
  }

  #[test]
  fn test_rejects_non_http_endpoint() {
    let file = write_config("endpoint: ftp://example.com/graphql\n");
    assert!(Config::load(Some(file.path()), None).is_err());

    assert!(Config::with_endpoint("not a url").endpoint_url().is_err());
    assert!(Config::with_endpoint("https://example.com/graphql")
      .endpoint_url()
      .is_ok());
  }
}
