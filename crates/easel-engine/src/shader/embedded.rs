use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::ShaderLoadError;
use crate::shapes::standard2d;

use super::{ShaderFuture, ShaderLoader};

/// In-memory shader sources, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct EmbeddedShaderLoader {
    sources: HashMap<String, Cow<'static, str>>,
}

impl EmbeddedShaderLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader preloaded with the shaders shipped in this crate.
    pub fn builtin() -> Self {
        let mut loader = Self::new();
        loader.insert(standard2d::SHADER_ID, standard2d::SHADER_SOURCE);
        loader
    }

    /// Registers (or replaces) the source for `id`.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        source: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.sources.insert(id.into(), source.into());
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }
}

impl ShaderLoader for EmbeddedShaderLoader {
    fn load<'a>(&'a self, id: &'a str) -> ShaderFuture<'a> {
        let result = self
            .sources
            .get(id)
            .map(|src| src.to_string())
            .ok_or_else(|| ShaderLoadError::NotFound(id.to_owned()));

        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_standard2d() {
        let loader = EmbeddedShaderLoader::builtin();
        let src = pollster::block_on(loader.load(standard2d::SHADER_ID)).unwrap();
        assert!(src.contains("vertexMain"));
        assert!(src.contains("fragmentMain"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let loader = EmbeddedShaderLoader::new();
        let err = pollster::block_on(loader.load("nope.wgsl")).unwrap_err();
        assert!(matches!(err, ShaderLoadError::NotFound(id) if id == "nope.wgsl"));
    }

    #[test]
    fn insert_replaces_existing_source() {
        let mut loader = EmbeddedShaderLoader::new();
        loader.insert("a.wgsl", "first").insert("a.wgsl", String::from("second"));

        assert!(loader.contains("a.wgsl"));
        assert_eq!(pollster::block_on(loader.load("a.wgsl")).unwrap(), "second");
    }
}
