use serde::Deserialize;
use serde::Serialize;

/// Which backend a [`crate::BytecodeCache`] should bind at construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
  /// The backend this build was compiled with (see the `bytecode` feature).
  #[default]
  Auto,
  /// Always report the capability as unavailable.
  Stub,
}

/// Construction-time cache options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
  pub backend: BackendPreference,
  /// Truncate the output file back to zero bytes when generation fails after it was opened,
  /// so a failed-but-present cache file never holds a partial artifact.
  pub truncate_failed_output: bool,
}

impl Default for CacheOptions {
  fn default() -> Self {
    Self {
      backend: BackendPreference::Auto,
      truncate_failed_output: true,
    }
  }
}

impl CacheOptions {
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }
}
