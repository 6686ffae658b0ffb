//! Collision Errors
//!
//! Only construction and configuration can fail. The per-frame pass never
//! returns an error: malformed data is logged and treated as "no collision".

/// Errors raised while building entries or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum CollisionError {
    /// Polygon exceeds the fixed scratch buffer for its owner.
    #[error("{owner} polygon has {count} vertices, maximum is {max}")]
    TooManyVertices {
        /// "player" or "hazard"
        owner: &'static str,
        /// Vertices supplied
        count: usize,
        /// Buffer capacity
        max: usize,
    },

    /// Radius is negative, NaN or infinite.
    #[error("invalid radius: {0}")]
    InvalidRadius(f32),

    /// Polygon pre-scale is not a positive finite number.
    #[error("invalid polygon scale: {0}")]
    InvalidScale(f32),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Reject negative or non-finite radii.
pub(crate) fn check_radius(radius: f32) -> Result<f32, CollisionError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(CollisionError::InvalidRadius(radius))
    }
}

/// Reject polygons longer than `max`.
pub(crate) fn check_vertex_count(
    owner: &'static str,
    count: usize,
    max: usize,
) -> Result<(), CollisionError> {
    if count > max {
        return Err(CollisionError::TooManyVertices { owner, count, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_radius() {
        assert_eq!(check_radius(0.0).unwrap(), 0.0);
        assert_eq!(check_radius(12.5).unwrap(), 12.5);
        assert!(matches!(check_radius(-1.0), Err(CollisionError::InvalidRadius(_))));
        assert!(check_radius(f32::NAN).is_err());
        assert!(check_radius(f32::INFINITY).is_err());
    }

    #[test]
    fn test_vertex_count_message() {
        let err = check_vertex_count("hazard", 33, 32).unwrap_err();
        assert_eq!(err.to_string(), "hazard polygon has 33 vertices, maximum is 32");
        assert!(check_vertex_count("player", 40, 40).is_ok());
    }
}
