use std::borrow::Cow;

use rustc_hash::FxHashMap;

use crate::errors::{ArborError, Result};
use crate::render::device::{GraphicsDevice, ProgramHandle};
use crate::render::material::MaterialKind;

const MESH_VERT: &str = include_str!("shaders/mesh.vert");
const BASIC_FRAG: &str = include_str!("shaders/basic.frag");
const LAMBERT_FRAG: &str = include_str!("shaders/lambert.frag");
const NORMAL_FRAG: &str = include_str!("shaders/normal.frag");

/// GLSL source pair for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub name: Cow<'static, str>,
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        vertex: impl Into<Cow<'static, str>>,
        fragment: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Built-in program for a material kind.
    #[must_use]
    pub fn builtin(kind: MaterialKind) -> Self {
        let fragment = match kind {
            MaterialKind::Basic => BASIC_FRAG,
            MaterialKind::Lambert => LAMBERT_FRAG,
            MaterialKind::Normal => NORMAL_FRAG,
        };
        Self::new(kind.name(), MESH_VERT, fragment)
    }
}

/// Shader sources per material kind, compiled on first use.
///
/// Programs are compiled against the device passed to
/// [`program`](Self::program) and cached for the life of the library.
#[derive(Debug, Default)]
pub struct ShaderLibrary {
    sources: FxHashMap<MaterialKind, ShaderSource>,
    programs: FxHashMap<MaterialKind, ProgramHandle>,
}

impl ShaderLibrary {
    /// Empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the built-in program for every material kind.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut library = Self::new();
        for kind in MaterialKind::ALL {
            library.sources.insert(kind, ShaderSource::builtin(kind));
        }
        library
    }

    /// Registers the program for `kind`. A kind can only be registered once.
    pub fn register(&mut self, kind: MaterialKind, source: ShaderSource) -> Result<()> {
        if self.sources.contains_key(&kind) {
            return Err(ArborError::invalid(format!(
                "shader for material kind '{}' is already registered",
                kind.name()
            )));
        }
        log::debug!("Registered shader '{}' for '{}'", source.name, kind.name());
        self.sources.insert(kind, source);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, kind: MaterialKind) -> bool {
        self.sources.contains_key(&kind)
    }

    pub fn source(&self, kind: MaterialKind) -> Result<&ShaderSource> {
        self.sources
            .get(&kind)
            .ok_or_else(|| ArborError::not_found(format!("no shader for material kind '{}'", kind.name())))
    }

    /// Program for `kind`, compiling it on first request.
    pub fn program<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        kind: MaterialKind,
    ) -> Result<ProgramHandle> {
        if let Some(&program) = self.programs.get(&kind) {
            return Ok(program);
        }
        let source = self.source(kind)?;
        log::debug!("Compiling shader program '{}'", source.name);
        let program = device.create_program(source)?;
        self.programs.insert(kind, program);
        Ok(program)
    }

    #[must_use]
    pub fn compiled_count(&self) -> usize {
        self.programs.len()
    }
}
