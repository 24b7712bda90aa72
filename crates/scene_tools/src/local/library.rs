//! Asset registry used as the local resource source
//!
//! The registry maps paths to already-parsed entries. Entries can be inserted
//! directly (tests) or read from RON files on disk (the demo app); either
//! way, lookups through [`ResourceSource`] stay in memory.

use super::template::SceneTemplate;
use crate::assets::{ResourceSource, ResourceView};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// File suffix for scene templates
pub const SCENE_SUFFIX: &str = ".scene.ron";

/// File suffix for material definitions
pub const MATERIAL_SUFFIX: &str = ".mat.ron";

/// Flat material parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Base color (linear RGB)
    pub color: [f32; 3],

    /// Metallic factor, 0.0 dielectric to 1.0 metal
    #[serde(default)]
    pub metallic: f32,

    /// Surface roughness, 0.0 mirror to 1.0 diffuse
    #[serde(default = "default_roughness")]
    pub roughness: f32,
}

fn default_roughness() -> f32 {
    0.5
}

/// Entry stored in an [`AssetLibrary`]
#[derive(Debug, Clone)]
pub enum LocalResource {
    /// A scene blueprint
    Template(Rc<SceneTemplate>),

    /// A material definition
    Material(Rc<MaterialDef>),
}

impl LocalResource {
    fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Material(_) => "material",
        }
    }
}

/// Errors from filling a library from disk
#[derive(Debug, Error)]
pub enum LibraryError {
    /// File could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid entry of its kind
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path that failed
        path: String,
        /// Parser diagnostic
        message: String,
    },
}

/// In-memory registry of named assets
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    entries: HashMap<String, LocalResource>,
}

impl AssetLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene template under `path`
    pub fn insert_template(&mut self, path: impl Into<String>, template: SceneTemplate) {
        self.entries
            .insert(path.into(), LocalResource::Template(Rc::new(template)));
    }

    /// Register a material under `path`
    pub fn insert_material(&mut self, path: impl Into<String>, material: MaterialDef) {
        self.entries
            .insert(path.into(), LocalResource::Material(Rc::new(material)));
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every `*.scene.ron` and `*.mat.ron` file in `dir`
    ///
    /// Entries are registered under their file name. Other files are skipped.
    /// Returns the number of entries loaded.
    ///
    /// # Errors
    ///
    /// [`LibraryError`] on the first unreadable or unparsable asset file.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, LibraryError> {
        let dir = dir.as_ref();
        let read_dir = std::fs::read_dir(dir).map_err(|source| LibraryError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut loaded = 0;
        for entry in read_dir {
            let entry = entry.map_err(|source| LibraryError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            if file_name.ends_with(SCENE_SUFFIX) {
                let template: SceneTemplate = read_ron(&path)?;
                self.insert_template(file_name, template);
                loaded += 1;
            } else if file_name.ends_with(MATERIAL_SUFFIX) {
                let material: MaterialDef = read_ron(&path)?;
                self.insert_material(file_name, material);
                loaded += 1;
            }
        }

        log::info!("Loaded {} assets from {}", loaded, dir.display());
        Ok(loaded)
    }
}

fn read_ron<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LibraryError> {
    let text = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&text).map_err(|e| LibraryError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

impl ResourceSource for AssetLibrary {
    type Resource = LocalResource;

    fn fetch(&self, path: &str) -> Option<LocalResource> {
        let found = self.entries.get(path).cloned();
        if let Some(resource) = &found {
            log::trace!("fetch '{}' -> {}", path, resource.kind());
        }
        found
    }
}

impl ResourceView<AssetLibrary> for Rc<SceneTemplate> {
    fn try_view(resource: LocalResource) -> Option<Self> {
        match resource {
            LocalResource::Template(template) => Some(template),
            LocalResource::Material(_) => None,
        }
    }
}

impl ResourceView<AssetLibrary> for Rc<MaterialDef> {
    fn try_view(resource: LocalResource) -> Option<Self> {
        match resource {
            LocalResource::Material(material) => Some(material),
            LocalResource::Template(_) => None,
        }
    }
}
