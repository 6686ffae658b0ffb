//! Collision Configuration
//!
//! Tunables for how the pass treats entities it consumes. Loaded from JSON
//! by the game or left at defaults.

use std::path::Path;
use serde::{Serialize, Deserialize};

use super::error::CollisionError;

/// Configuration for [`CollisionWorld`](super::world::CollisionWorld).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Detach a projectile's entity from the scene when it consumes a hazard.
    pub detach_consumed_projectiles: bool,
    /// Detach a consumed hazard's companion entities from the scene.
    pub detach_companions: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            detach_consumed_projectiles: true,
            detach_companions: true,
        }
    }
}

impl CollisionConfig {
    /// Parse from a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CollisionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CollisionError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollisionConfig::default();
        assert!(config.detach_consumed_projectiles);
        assert!(config.detach_companions);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CollisionConfig::from_json_str(r#"{ "detach_companions": false }"#).unwrap();
        assert!(config.detach_consumed_projectiles);
        assert!(!config.detach_companions);

        let empty = CollisionConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, CollisionConfig::default());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = CollisionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CollisionError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CollisionConfig::from_json_file("/nonexistent/collision.json").unwrap_err();
        assert!(matches!(err, CollisionError::Io(_)));
    }
}
