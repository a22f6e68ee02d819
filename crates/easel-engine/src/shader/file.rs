use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ShaderLoadError;

use super::{ShaderFuture, ShaderLoader};

/// Reads shader sources from a directory on disk.
///
/// Ids are relative paths below `root`; ids that are absolute or contain `..`
/// never resolve.
#[derive(Debug, Clone)]
pub struct FileShaderLoader {
    root: PathBuf,
}

impl FileShaderLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let rel = Path::new(id);
        let plain = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        (plain && !id.is_empty()).then(|| self.root.join(rel))
    }
}

impl ShaderLoader for FileShaderLoader {
    fn load<'a>(&'a self, id: &'a str) -> ShaderFuture<'a> {
        Box::pin(async move {
            let path = self
                .resolve(id)
                .ok_or_else(|| ShaderLoadError::NotFound(id.to_owned()))?;

            log::debug!("loading shader {}", path.display());

            std::fs::read_to_string(&path).map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ShaderLoadError::NotFound(id.to_owned()),
                _ => ShaderLoadError::Transport {
                    id: id.to_owned(),
                    source,
                },
            })
        })
    }
}
