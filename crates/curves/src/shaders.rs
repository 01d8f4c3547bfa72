use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name of the vertex stage inside a shader directory.
pub const VERTEX_FILE: &str = "vertex.wgsl";
/// File name of the fragment stage inside a shader directory.
pub const FRAGMENT_FILE: &str = "fragment.wgsl";

/// Entry point the vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point the fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Shader directory shipped with the crate.
pub fn default_shader_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))
}

/// One compiled-shader input. The contents are opaque to the core; only the
/// device looks inside.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderBlob {
    pub name: String,
    pub source: String,
}

/// The vertex + fragment pair the strip pipeline is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderArtifacts {
    pub vertex: ShaderBlob,
    pub fragment: ShaderBlob,
}

impl ShaderArtifacts {
    /// Loads both stages by name from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            vertex: read_blob(dir, VERTEX_FILE)?,
            fragment: read_blob(dir, FRAGMENT_FILE)?,
        })
    }

    pub fn from_sources(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: ShaderBlob { name: VERTEX_FILE.to_string(), source: vertex.into() },
            fragment: ShaderBlob { name: FRAGMENT_FILE.to_string(), source: fragment.into() },
        }
    }
}

fn read_blob(dir: &Path, name: &str) -> Result<ShaderBlob> {
    let path = dir.join(name);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read shader {}", path.display()))?;
    anyhow::ensure!(!source.trim().is_empty(), "shader {} is empty", path.display());

    log::debug!("loaded shader {} ({} bytes)", path.display(), source.len());

    Ok(ShaderBlob {
        name: name.to_string(),
        source,
    })
}
