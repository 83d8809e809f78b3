use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

/// Errors that can occur while resolving an icon
#[derive(Error, Debug)]
pub enum IconError {
    #[error("No icon named {0}")]
    NotFound(String),
    #[error("Failed to decode icon: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid icon dimensions {0}x{1}")]
    InvalidDimensions(usize, usize),
}

/// Resolves an icon identifier to a raster of the requested pixel size.
pub trait IconProvider {
    fn resolve_icon(&self, icon_id: &str, size: [usize; 2]) -> Result<ColorImage, IconError>;
}

/// Loads `<root>/<icon_id>.png` (or `.jpg`) from disk.
#[derive(Debug, Clone)]
pub struct IconDirectory {
    root: PathBuf,
}

impl IconDirectory {
    const EXTENSIONS: [&'static str; 3] = ["png", "jpg", "jpeg"];

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, icon_id: &str) -> Option<PathBuf> {
        Self::EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{icon_id}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl IconProvider for IconDirectory {
    fn resolve_icon(&self, icon_id: &str, size: [usize; 2]) -> Result<ColorImage, IconError> {
        let [width, height] = size;
        if width == 0 || height == 0 {
            return Err(IconError::InvalidDimensions(width, height));
        }

        let path = self
            .find(icon_id)
            .ok_or_else(|| IconError::NotFound(icon_id.to_owned()))?;

        let image = image::open(&path)?
            .resize_exact(
                width as u32,
                height as u32,
                image::imageops::FilterType::Triangle,
            )
            .to_rgba8();

        Ok(ColorImage::from_rgba_unmultiplied(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        ))
    }
}

/// Caches icon textures by (icon id, pixel size).
///
/// Failed lookups are remembered so a missing icon is logged once and then simply painted blank.
pub struct IconCache {
    provider: Box<dyn IconProvider>,
    texture_cache: HashMap<(String, [usize; 2]), TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<(String, [usize; 2]), u64>,
    missing: HashSet<(String, [usize; 2])>,
    current_frame: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for IconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconCache")
            .field("textures", &self.texture_cache.len())
            .field("missing", &self.missing.len())
            .field("current_frame", &self.current_frame)
            .finish()
    }
}

impl IconCache {
    pub fn new(provider: Box<dyn IconProvider>, max_cache_size: usize) -> Self {
        Self {
            provider,
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            missing: HashSet::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for `icon_id` at `size` pixels, or `None` if the provider can't supply it.
    pub fn texture(&mut self, ctx: &Context, icon_id: &str, size: [usize; 2]) -> Option<TextureId> {
        let cache_key = (icon_id.to_owned(), size);

        if self.missing.contains(&cache_key) {
            return None;
        }

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            let id = handle.id();
            self.last_used.insert(cache_key, self.current_frame);
            return Some(id);
        }

        let image = match self.provider.resolve_icon(icon_id, size) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Icon {icon_id} unavailable: {err}");
                self.missing.insert(cache_key);
                return None;
            }
        };

        self.prune_cache_if_needed();

        let name = format!("icon_{}_{}x{}", icon_id, size[0], size[1]);
        let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);
        let id = handle.id();

        self.texture_cache.insert(cache_key.clone(), handle);
        self.last_used.insert(cache_key, self.current_frame);

        Some(id)
    }

    /// Keeps room for one more entry within `max_cache_size`.
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<((String, [usize; 2]), u64)> = self
            .last_used
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();

        // Oldest first
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() + 1 - self.max_cache_size.max(1);
        for (key, _) in entries.into_iter().take(to_remove) {
            self.texture_cache.remove(&key);
            self.last_used.remove(&key);
        }
    }

    /// Forget every texture and every remembered failure.
    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
        self.missing.clear();
    }

    /// Returns the number of textures currently in the cache
    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    pub fn is_missing(&self, icon_id: &str, size: [usize; 2]) -> bool {
        self.missing.contains(&(icon_id.to_owned(), size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct SolidIcons {
        known: Vec<&'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl IconProvider for SolidIcons {
        fn resolve_icon(&self, icon_id: &str, size: [usize; 2]) -> Result<ColorImage, IconError> {
            self.calls.set(self.calls.get() + 1);
            if self.known.contains(&icon_id) {
                Ok(ColorImage::new(size, egui::Color32::WHITE))
            } else {
                Err(IconError::NotFound(icon_id.to_owned()))
            }
        }
    }

    fn cache_with(known: Vec<&'static str>, max: usize) -> (IconCache, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let provider = SolidIcons {
            known,
            calls: calls.clone(),
        };
        (IconCache::new(Box::new(provider), max), calls)
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let (mut cache, calls) = cache_with(vec!["tool_crop"], 10);

        let first = cache.texture(&ctx, "tool_crop", [20, 20]);
        let second = cache.texture(&ctx, "tool_crop", [20, 20]);

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(cache.cache_size(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_missing_icon_is_remembered() {
        let ctx = Context::default();
        let (mut cache, calls) = cache_with(vec![], 10);

        assert!(cache.texture(&ctx, "nope", [20, 20]).is_none());
        assert!(cache.texture(&ctx, "nope", [20, 20]).is_none());
        assert!(cache.is_missing("nope", [20, 20]));
        assert_eq!(calls.get(), 1);

        cache.clear_cache();
        assert!(!cache.is_missing("nope", [20, 20]));
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let (mut cache, _) = cache_with(vec!["a", "b", "c"], 2);

        cache.texture(&ctx, "a", [20, 20]);
        cache.begin_frame();
        cache.texture(&ctx, "b", [20, 20]);
        cache.begin_frame();
        cache.texture(&ctx, "c", [20, 20]);

        assert_eq!(cache.cache_size(), 2);
        assert!(!cache.texture_cache.contains_key(&("a".to_owned(), [20, 20])));
        assert!(cache.texture_cache.contains_key(&("b".to_owned(), [20, 20])));
        assert!(cache.texture_cache.contains_key(&("c".to_owned(), [20, 20])));
    }

    #[test]
    fn test_sizes_cached_separately() {
        let ctx = Context::default();
        let (mut cache, _) = cache_with(vec!["a"], 10);

        cache.texture(&ctx, "a", [20, 20]);
        cache.texture(&ctx, "a", [40, 40]);
        assert_eq!(cache.cache_size(), 2);
    }

    #[test]
    fn test_directory_reports_missing_file() {
        let dir = IconDirectory::new("/definitely/not/here");
        assert!(matches!(
            dir.resolve_icon("tool_zoom", [20, 20]),
            Err(IconError::NotFound(_))
        ));
        assert!(matches!(
            dir.resolve_icon("tool_zoom", [0, 20]),
            Err(IconError::InvalidDimensions(0, 20))
        ));
    }
}
