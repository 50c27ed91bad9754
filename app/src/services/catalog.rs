//! Category folders enumerated into image pools.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use outfit_layout::tables::{DEFAULT_ACCESSORY_CATEGORIES, MANDATORY_CATEGORIES, is_mandatory};

use crate::config::ConfigError;

const VALID_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// One image file; decoded on use, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    /// File stem, shown as the item label.
    pub display_name: String,
}

/// Images of one category, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPool {
    pub name: String,
    pub assets: Vec<ImageAsset>,
}

impl CategoryPool {
    /// Enumerate image files in `dir`. A missing folder is an empty pool.
    pub fn scan(name: &str, dir: &Path) -> Self {
        let mut assets = Vec::new();
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if !path.is_file() || !has_image_extension(&path) {
                        continue;
                    }
                    let display_name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    assets.push(ImageAsset { path, display_name });
                }
            }
            Err(e) => tracing::debug!("Category folder {} not readable: {e}", dir.display()),
        }
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(category = name, count = assets.len(), "Scanned category");

        Self {
            name: name.to_string(),
            assets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }
}

/// All category pools of one run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pools: BTreeMap<String, CategoryPool>,
}

impl Catalog {
    /// Scan `<photos_dir>/<category>` for the mandatory and default
    /// accessory categories, every other sub-folder of `photos_dir`, and
    /// every override in `category_dirs`.
    pub fn scan(photos_dir: &Path, category_dirs: &BTreeMap<String, PathBuf>) -> Self {
        let mut dirs: BTreeMap<String, PathBuf> = MANDATORY_CATEGORIES
            .iter()
            .chain(DEFAULT_ACCESSORY_CATEGORIES.iter())
            .map(|name| (name.to_string(), photos_dir.join(name)))
            .collect();
        if let Ok(entries) = std::fs::read_dir(photos_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.insert(entry.file_name().to_string_lossy().to_lowercase(), path);
                }
            }
        }
        dirs.extend(category_dirs.iter().map(|(k, v)| (k.clone(), v.clone())));

        let pools = dirs
            .into_iter()
            .map(|(name, dir)| {
                let pool = CategoryPool::scan(&name, &dir);
                (name, pool)
            })
            .collect();
        Self { pools }
    }

    /// Build a catalog from ready-made pools.
    pub fn from_pools(pools: impl IntoIterator<Item = CategoryPool>) -> Self {
        Self {
            pools: pools.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    pub fn pool(&self, name: &str) -> Option<&CategoryPool> {
        self.pools.get(name)
    }

    /// Assets of `name`, empty when the category is unknown.
    pub fn assets(&self, name: &str) -> &[ImageAsset] {
        self.pool(name).map(|p| p.assets.as_slice()).unwrap_or(&[])
    }

    /// Fail fast when a mandatory category has no images.
    pub fn ensure_mandatory(&self) -> Result<(), ConfigError> {
        for name in MANDATORY_CATEGORIES {
            if self.assets(name).is_empty() {
                return Err(ConfigError::EmptyCategory(name.to_string()));
            }
        }
        Ok(())
    }

    /// Non-mandatory categories that contain at least one image.
    pub fn populated_accessories(&self) -> Vec<&str> {
        self.pools
            .values()
            .filter(|p| !is_mandatory(&p.name) && !p.is_empty())
            .map(|p| p.name.as_str())
            .collect()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .is_some_and(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_pool_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.JPG");
        touch(dir.path(), "a.png");
        touch(dir.path(), "c.jpeg");
        touch(dir.path(), "readme.md");

        let pool = CategoryPool::scan("shirts", dir.path());
        let names: Vec<_> = pool.assets.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_folder_is_empty_pool() {
        let pool = CategoryPool::scan("shoes", Path::new("/no/such/folder"));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_catalog_scan_with_overrides_and_extra_folders() {
        let photos = tempfile::tempdir().unwrap();
        touch(&photos.path().join("shirts"), "s.png");
        touch(&photos.path().join("pants"), "p.png");
        touch(&photos.path().join("backgrounds"), "bg.jpg");
        touch(&photos.path().join("Hats"), "cap.png");

        let shoes = tempfile::tempdir().unwrap();
        touch(shoes.path(), "boot.png");
        let overrides = BTreeMap::from([("shoes".to_string(), shoes.path().to_path_buf())]);

        let catalog = Catalog::scan(photos.path(), &overrides);
        catalog.ensure_mandatory().unwrap();
        assert_eq!(catalog.populated_accessories(), vec!["hats", "shoes"]);
        assert_eq!(catalog.assets("shoes")[0].display_name, "boot");
        assert!(catalog.pool("glasses").is_some_and(CategoryPool::is_empty));
    }

    #[test]
    fn test_empty_mandatory_category_fails() {
        let photos = tempfile::tempdir().unwrap();
        touch(&photos.path().join("shirts"), "s.png");
        touch(&photos.path().join("backgrounds"), "bg.png");

        let catalog = Catalog::scan(photos.path(), &BTreeMap::new());
        assert!(matches!(
            catalog.ensure_mandatory(),
            Err(ConfigError::EmptyCategory(name)) if name == "pants"
        ));
    }
}
