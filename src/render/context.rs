//! Per-renderer GPU resource state.
//!
//! Holds the shader library and the vertex buffers built from geometries.
//! Buffers are keyed by geometry id and rebuilt when the geometry's version
//! moves on. A buffer lives as long as its geometry is drawn: after each frame
//! the renderer evicts buffers whose geometry no item referenced. Everything
//! here is owned by one renderer; nothing is global.

use rustc_hash::{FxHashMap, FxHashSet};
use uuid::Uuid;

use crate::errors::Result;
use crate::render::device::{BufferHandle, GraphicsDevice, ProgramHandle};
use crate::render::geometry::Geometry;
use crate::render::material::MaterialKind;
use crate::render::shader::ShaderLibrary;

#[derive(Debug, Clone, Copy)]
struct CachedBuffer {
    handle: BufferHandle,
    version: u64,
}

#[derive(Debug, Default)]
pub struct RenderContext {
    shaders: ShaderLibrary,
    buffers: FxHashMap<Uuid, CachedBuffer>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_shaders(ShaderLibrary::with_builtins())
    }

    #[must_use]
    pub fn with_shaders(shaders: ShaderLibrary) -> Self {
        Self {
            shaders,
            buffers: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderLibrary {
        &mut self.shaders
    }

    pub fn program_for<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        kind: MaterialKind,
    ) -> Result<ProgramHandle> {
        self.shaders.program(device, kind)
    }

    /// Buffer holding `geometry`, uploading it if missing or stale.
    pub fn buffer_for<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        geometry: &Geometry,
    ) -> Result<BufferHandle> {
        if let Some(cached) = self.buffers.get(&geometry.id()) {
            if cached.version == geometry.version() {
                return Ok(cached.handle);
            }
        }

        let handle = device.create_buffer(
            geometry.attributes(),
            &geometry.interleave(),
            geometry.indices(),
        )?;
        let stale = self.buffers.insert(
            geometry.id(),
            CachedBuffer {
                handle,
                version: geometry.version(),
            },
        );
        if let Some(stale) = stale {
            log::debug!("Geometry {} changed, rebuilding its buffer", geometry.id());
            device.destroy_buffer(stale.handle);
        }
        Ok(handle)
    }

    /// Drops every buffer whose geometry id is not in `live`. Returns how
    /// many were released.
    pub fn retain_geometries<D: GraphicsDevice + ?Sized>(
        &mut self,
        device: &mut D,
        live: &FxHashSet<Uuid>,
    ) -> usize {
        let before = self.buffers.len();
        self.buffers.retain(|id, cached| {
            let keep = live.contains(id);
            if !keep {
                device.destroy_buffer(cached.handle);
            }
            keep
        });
        let released = before - self.buffers.len();
        if released > 0 {
            log::debug!("Released {released} buffers of geometries no longer drawn");
        }
        released
    }

    pub fn release_all<D: GraphicsDevice + ?Sized>(&mut self, device: &mut D) {
        if !self.buffers.is_empty() {
            log::debug!("Releasing {} geometry buffers", self.buffers.len());
        }
        for (_, cached) in self.buffers.drain() {
            device.destroy_buffer(cached.handle);
        }
    }

    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }
}
