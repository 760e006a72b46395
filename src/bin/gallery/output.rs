use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image_gallery::{
    render::{DisplayTarget, Renderer},
    types::ImageVariant,
};

/// Renders by writing each displayed variant to a file in `directory`.
pub struct FileRenderer {
    directory: PathBuf,
    written: Mutex<HashMap<DisplayTarget, PathBuf>>,
}

impl FileRenderer {
    pub fn new(directory: impl Into<PathBuf>) -> std::io::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            written: Mutex::new(HashMap::new()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File last written for `target`.
    pub fn path_of(&self, target: DisplayTarget) -> Option<PathBuf> {
        self.written
            .lock()
            .ok()
            .and_then(|written| written.get(&target).cloned())
    }

    fn file_name(target: &DisplayTarget, variant: &ImageVariant) -> String {
        match target {
            DisplayTarget::Editor => format!("editor.{}", variant.extension()),
            DisplayTarget::Thumbnail(id) => format!("thumb-{id}.{}", variant.extension()),
        }
    }
}

impl Renderer for FileRenderer {
    fn display(&self, variant: &ImageVariant, target: &DisplayTarget) {
        let path = self.directory.join(Self::file_name(target, variant));
        if let Err(err) = fs::write(&path, variant.as_bytes()) {
            log::error!("Failed to write {}: {err}", path.display());
            return;
        }
        log::debug!("Displayed {:?} at {}", target, path.display());
        if let Ok(mut written) = self.written.lock() {
            if let Some(previous) = written.insert(*target, path.clone()) {
                if previous != path {
                    if let Err(err) = fs::remove_file(&previous) {
                        log::warn!("Failed to remove {}: {err}", previous.display());
                    }
                }
            }
        }
    }

    fn clear(&self, target: &DisplayTarget) {
        let Ok(mut written) = self.written.lock() else {
            return;
        };
        if let Some(path) = written.remove(target) {
            if let Err(err) = fs::remove_file(&path) {
                log::warn!("Failed to remove {}: {err}", path.display());
            }
        }
    }
}
