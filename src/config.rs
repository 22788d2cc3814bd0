// config.rs - panorama tuning, loadable from JSON
//
// Every field has a default, so a config file only lists what it overrides:
//
//   { "animation_duration_ms": 800, "intersection_policy": "nearest" }

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LINK_ICON: &str = "assets/icons/arrow.png";

/// Which ray hit becomes the link point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntersectionPolicy {
    /// Far inner surface; right for inward-facing spheres.
    #[default]
    Farthest,
    Nearest,
}

impl IntersectionPolicy {
    pub fn pick<T: Copy>(self, hits: &[T]) -> Option<T> {
        match self {
            IntersectionPolicy::Farthest => hits.last().copied(),
            IntersectionPolicy::Nearest => hits.first().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanoramaConfig {
    pub animation_duration_ms: u64,
    pub default_infospot_size: f32,
    pub default_orbit_radius: f32,
    /// Link points are pulled toward the panorama center by this factor.
    pub link_inset: f32,
    pub intersection_policy: IntersectionPolicy,
    pub link_icon_url: String,
}

impl Default for PanoramaConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: 500,
            default_infospot_size: 350.0,
            default_orbit_radius: 100.0,
            link_inset: 0.99,
            intersection_policy: IntersectionPolicy::Farthest,
            link_icon_url: DEFAULT_LINK_ICON.to_string(),
        }
    }
}

impl PanoramaConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

/// Config path from CLI (`--config <path>`), then `PANOLENS_CONFIG`.
pub fn resolve_config_path_from_args() -> Option<PathBuf> {
    let mut it = std::env::args();
    while let Some(a) = it.next() {
        if a == "--config" {
            if let Some(v) = it.next() {
                return Some(PathBuf::from(v));
            }
        }
    }

    if let Ok(v) = std::env::var("PANOLENS_CONFIG") {
        if !v.trim().is_empty() {
            return Some(PathBuf::from(v));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanoramaError;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PanoramaConfig::from_json_str(
            r#"{ "animation_duration_ms": 800, "intersection_policy": "nearest" }"#,
        )
        .unwrap();
        assert_eq!(cfg.animation_duration(), Duration::from_millis(800));
        assert_eq!(cfg.intersection_policy, IntersectionPolicy::Nearest);
        assert_eq!(cfg.default_infospot_size, 350.0);
        assert_eq!(cfg.link_icon_url, DEFAULT_LINK_ICON);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(
            PanoramaConfig::from_json_str("{}").unwrap(),
            PanoramaConfig::default()
        );
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = PanoramaConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, PanoramaError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PanoramaConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, PanoramaError::Io(_)));
    }

    #[test]
    fn policy_picks_end_of_hit_list() {
        let hits = [1, 2, 3];
        assert_eq!(IntersectionPolicy::Farthest.pick(&hits), Some(3));
        assert_eq!(IntersectionPolicy::Nearest.pick(&hits), Some(1));
        assert_eq!(IntersectionPolicy::Farthest.pick::<i32>(&[]), None);
    }
}
