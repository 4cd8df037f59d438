//! Asset resolution: candidate paths for images and the typeface
//!
//! Relative asset paths in scene documents are resolved against the working
//! directory first, then against its parents, then against the configured
//! fallbacks. The typeface is resolved once at startup; failing to find one
//! is the only fatal startup error.

use super::{AssetResolver, Sprite};
use crate::config::AssetConfig;
use crate::error::{HmiError, Result};
use std::path::{Path, PathBuf};

/// Candidate paths for `requested`, in the order they are tried
///
/// The requested path itself, then `../` prefixed variants up to
/// `search_parents` levels (relative paths only), then the fallbacks.
/// Duplicates are removed, first occurrence wins.
pub fn resolve_candidates(requested: &Path, config: &AssetConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if !requested.as_os_str().is_empty() {
        candidates.push(requested.to_path_buf());
        if requested.is_relative() {
            let mut prefix = PathBuf::new();
            for _ in 0..config.search_parents {
                prefix.push("..");
                candidates.push(prefix.join(requested));
            }
        }
    }
    for fallback in &config.image_fallbacks {
        if !candidates.contains(fallback) {
            candidates.push(fallback.clone());
        }
    }
    candidates
}

/// Try each candidate for `requested` until the resolver loads one
pub fn resolve_image(
    assets: &mut dyn AssetResolver,
    requested: &Path,
    config: &AssetConfig,
) -> Option<Sprite> {
    for candidate in resolve_candidates(requested, config) {
        match assets.load_image(&candidate) {
            Ok(sprite) => {
                tracing::info!("Image loaded from {:?}", candidate);
                return Some(sprite);
            }
            Err(e) => tracing::debug!("Image candidate {:?} rejected: {}", candidate, e),
        }
    }
    tracing::warn!("Could not load image from any path: {:?}", requested);
    None
}

/// A typeface read from disk
#[derive(Debug, Clone)]
pub struct LoadedFont {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Read the first readable, non-empty font candidate
pub fn load_font(candidates: &[PathBuf]) -> Result<LoadedFont> {
    for path in candidates {
        match std::fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => {
                tracing::info!("Font loaded successfully from: {:?}", path);
                return Ok(LoadedFont {
                    path: path.clone(),
                    bytes,
                });
            }
            Ok(_) => tracing::debug!("Font candidate {:?} is empty", path),
            Err(e) => tracing::debug!("Font candidate {:?} unavailable: {}", path, e),
        }
    }

    tracing::error!("Failed to load font from all possible paths");
    Err(HmiError::FontUnavailable {
        tried: candidates.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{SpriteId, StaticAssets};

    #[test]
    fn test_candidates_order() {
        let config = AssetConfig::default();
        let candidates = resolve_candidates(Path::new("img/pump.png"), &config);
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("img/pump.png"),
                PathBuf::from("../img/pump.png"),
                PathBuf::from("../../img/pump.png"),
                PathBuf::from("assets/images/logo.png"),
                PathBuf::from("../assets/images/logo.png"),
            ]
        );
    }

    #[test]
    fn test_candidates_skip_empty_request_and_duplicates() {
        let config = AssetConfig::default();
        let candidates = resolve_candidates(Path::new(""), &config);
        assert_eq!(candidates, config.image_fallbacks);

        let candidates = resolve_candidates(Path::new("assets/images/logo.png"), &config);
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_resolve_image_uses_first_loadable_candidate() {
        let mut assets = StaticAssets::default();
        assets.insert("../img/pump.png", 64, 32);

        let sprite = resolve_image(&mut assets, Path::new("img/pump.png"), &AssetConfig::default())
            .unwrap();
        assert_eq!(sprite.id, SpriteId(0));
        assert_eq!(sprite.width, 64);
        assert_eq!(
            assets.attempts,
            vec![PathBuf::from("img/pump.png"), PathBuf::from("../img/pump.png")]
        );
    }

    #[test]
    fn test_resolve_image_exhausts_candidates() {
        let mut assets = StaticAssets::default();
        let config = AssetConfig::default();
        assert!(resolve_image(&mut assets, Path::new("missing.png"), &config).is_none());
        assert_eq!(assets.attempts.len(), 5);
    }

    #[test]
    fn test_load_font_picks_first_readable() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.ttf");
        let good = dir.path().join("good.ttf");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&good, b"\x00\x01\x00\x00").unwrap();

        let font = load_font(&[dir.path().join("nope.ttf"), empty, good.clone()]).unwrap();
        assert_eq!(font.path, good);
    }

    #[test]
    fn test_load_font_failure_is_fatal_error() {
        let err = load_font(&[PathBuf::from("/definitely/not/here.ttf")]).unwrap_err();
        assert!(matches!(err, HmiError::FontUnavailable { ref tried } if tried.len() == 1));
    }
}
