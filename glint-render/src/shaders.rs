//! Shader program cache.
//!
//! Programs are identified by the closed [`ShaderProgram`] enum and built
//! on first use.  Each program reads `<stem>.vert.wgsl` and
//! `<stem>.frag.wgsl`, binds its attributes to locations in list order
//! and caches the uniform and attribute locations it exposes.
//!
//! A program that fails to load or build becomes *inert*: it is never
//! retried, every later use returns `None`, and the diagnostic stays
//! available through [`ShaderManager::diagnostic`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, error};
use thiserror::Error;

use crate::backend::{AttributeBinding, BackendError, GpuBackend, ProgramDesc, ProgramHandle};
use crate::vertex::{Attribute, SpriteVertex};

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Failed to read shader {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Build(#[from] BackendError),
}

// ── Programs ────────────────────────────────────────────────────────

/// The sprite programs.  Declaration order is the tie-break order used
/// when the batcher sorts sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderProgram {
    /// Solid colour, no texture.
    Flat,
    /// Colour modulated by a single-channel coverage texture.
    Text,
    /// Colour modulated by an RGBA texture.
    Decal,
    /// Anti-aliased disc in texture-coordinate space.
    Circle,
}

impl ShaderProgram {
    pub const ALL: [ShaderProgram; 4] = [
        ShaderProgram::Flat,
        ShaderProgram::Text,
        ShaderProgram::Decal,
        ShaderProgram::Circle,
    ];

    /// File stem of the shader pair.
    pub const fn stem(self) -> &'static str {
        match self {
            ShaderProgram::Flat => "flat",
            ShaderProgram::Text => "text",
            ShaderProgram::Decal => "decal",
            ShaderProgram::Circle => "circle",
        }
    }

    /// Attributes the program consumes; list index is the location.
    pub const fn attributes(self) -> &'static [Attribute] {
        match self {
            ShaderProgram::Flat => &[Attribute::Position, Attribute::Color],
            _ => &[Attribute::Position, Attribute::TexCoord, Attribute::Color],
        }
    }
}

/// Uniforms a program may expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Uniform {
    Mvp,
    BaseColorTexture,
}

impl Uniform {
    pub const ALL: [Uniform; 2] = [Uniform::Mvp, Uniform::BaseColorTexture];

    pub const fn name(self) -> &'static str {
        match self {
            Uniform::Mvp => "mvp",
            Uniform::BaseColorTexture => "base_color_texture",
        }
    }
}

// ── Sources ─────────────────────────────────────────────────────────

/// Where shader sources come from.
#[derive(Clone, Debug)]
pub enum ShaderLoader {
    /// Read `<dir>/<stem>.vert.wgsl` and `<dir>/<stem>.frag.wgsl`.
    Directory(PathBuf),
    /// Use the copies compiled into the crate.
    Embedded,
}

impl ShaderLoader {
    /// Vertex and fragment source for `program`.
    pub fn load(&self, program: ShaderProgram) -> Result<(String, String), ShaderError> {
        match self {
            ShaderLoader::Directory(dir) => {
                let read = |kind: &str| {
                    let path = dir.join(format!("{}.{kind}.wgsl", program.stem()));
                    std::fs::read_to_string(&path).map_err(|source| ShaderError::Io { path, source })
                };
                Ok((read("vert")?, read("frag")?))
            }
            ShaderLoader::Embedded => {
                let (vs, fs) = embedded(program);
                Ok((vs.to_string(), fs.to_string()))
            }
        }
    }

    pub fn directory(dir: impl AsRef<Path>) -> Self {
        ShaderLoader::Directory(dir.as_ref().to_path_buf())
    }
}

fn embedded(program: ShaderProgram) -> (&'static str, &'static str) {
    match program {
        ShaderProgram::Flat => (
            include_str!("../../assets/shaders/flat.vert.wgsl"),
            include_str!("../../assets/shaders/flat.frag.wgsl"),
        ),
        ShaderProgram::Text => (
            include_str!("../../assets/shaders/text.vert.wgsl"),
            include_str!("../../assets/shaders/text.frag.wgsl"),
        ),
        ShaderProgram::Decal => (
            include_str!("../../assets/shaders/decal.vert.wgsl"),
            include_str!("../../assets/shaders/decal.frag.wgsl"),
        ),
        ShaderProgram::Circle => (
            include_str!("../../assets/shaders/circle.vert.wgsl"),
            include_str!("../../assets/shaders/circle.frag.wgsl"),
        ),
    }
}

// ── Cache ───────────────────────────────────────────────────────────

/// A built program with its resolved locations.
#[derive(Clone, Debug)]
pub struct CachedProgram {
    pub handle: ProgramHandle,
    uniforms: HashMap<Uniform, u32>,
    attributes: HashMap<Attribute, u32>,
}

impl CachedProgram {
    pub fn uniform_location(&self, uniform: Uniform) -> Option<u32> {
        self.uniforms.get(&uniform).copied()
    }

    pub fn attribute_location(&self, attribute: Attribute) -> Option<u32> {
        self.attributes.get(&attribute).copied()
    }
}

enum Entry {
    Ready(CachedProgram),
    Inert(String),
}

/// Lazily built, process-lifetime program cache.
pub struct ShaderManager {
    loader: ShaderLoader,
    entries: HashMap<ShaderProgram, Entry>,
    current: Option<ShaderProgram>,
}

impl ShaderManager {
    pub fn new(loader: ShaderLoader) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
            current: None,
        }
    }

    /// Make `program` current on `backend`, building it on first use.
    ///
    /// Returns `None` when the program is inert.
    pub fn use_program(&mut self, backend: &mut dyn GpuBackend, program: ShaderProgram) -> Option<&CachedProgram> {
        if !self.entries.contains_key(&program) {
            let entry = match Self::build(&self.loader, backend, program) {
                Ok(cached) => {
                    debug!("Shader program {:?} ready ({:?})", program, cached.handle);
                    Entry::Ready(cached)
                }
                Err(e) => {
                    error!("Shader program {:?} unavailable: {e}", program);
                    Entry::Inert(e.to_string())
                }
            };
            self.entries.insert(program, entry);
        }

        match self.entries.get(&program) {
            Some(Entry::Ready(cached)) => {
                if self.current != Some(program) {
                    backend.use_program(cached.handle);
                    self.current = Some(program);
                }
                Some(cached)
            }
            _ => None,
        }
    }

    /// Compile diagnostic of an inert program.
    pub fn diagnostic(&self, program: ShaderProgram) -> Option<&str> {
        match self.entries.get(&program) {
            Some(Entry::Inert(message)) => Some(message),
            _ => None,
        }
    }

    /// Program last made current, if any.
    pub fn current(&self) -> Option<ShaderProgram> {
        self.current
    }

    /// Forget which program is current, so the next use re-binds it.
    pub fn reset_current(&mut self) {
        self.current = None;
    }

    fn build(
        loader: &ShaderLoader,
        backend: &mut dyn GpuBackend,
        program: ShaderProgram,
    ) -> Result<CachedProgram, ShaderError> {
        let (vertex_source, fragment_source) = loader.load(program)?;
        let bindings: Vec<AttributeBinding> = program
            .attributes()
            .iter()
            .enumerate()
            .map(|(i, a)| AttributeBinding { name: a.name(), location: i as u32 })
            .collect();

        let handle = backend.create_program(&ProgramDesc {
            label: program.stem(),
            vertex_source: &vertex_source,
            fragment_source: &fragment_source,
            attributes: &bindings,
            layout: SpriteVertex::LAYOUT,
        })?;

        let uniforms = Uniform::ALL
            .iter()
            .filter_map(|u| Some((*u, backend.uniform_location(handle, u.name())?)))
            .collect();
        let attributes = program
            .attributes()
            .iter()
            .filter_map(|a| Some((*a, backend.attribute_location(handle, a.name())?)))
            .collect();

        Ok(CachedProgram { handle, uniforms, attributes })
    }
}

// ===================================================================
// Tests
// ===================================================================
