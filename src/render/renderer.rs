//! Frame orchestration.
//!
//! A frame runs in a fixed order:
//!
//! 1. poll input from the current target (resizes update the viewport and
//!    the camera aspect)
//! 2. clear with the background color
//! 3. flatten the scene into render items
//! 4. per item: resolve the program for the material kind, push uniforms,
//!    bind the geometry buffer, draw
//! 5. release buffers of geometries no item drew
//! 6. swap buffers
//!
//! Any error aborts the frame before the swap.

use rustc_hash::FxHashSet;

use crate::color::Color;
use crate::errors::{ArborError, Result};
use crate::render::context::RenderContext;
use crate::render::device::{GraphicsDevice, UniformValue};
use crate::render::input::Input;
use crate::render::settings::RendererSettings;
use crate::render::uniforms;
use crate::render::window::{InputEvent, RenderTarget, WindowId};
use crate::scene::traversal::{self, RenderItem};
use crate::scene::{EntityHandle, Scene};

/// Counters for one rendered frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub triangles: usize,
}

/// Per-frame uniform values shared by every item.
struct FrameUniforms {
    view: [f32; 16],
    projection: [f32; 16],
    ambient: [f32; 3],
}

pub struct Renderer<D: GraphicsDevice> {
    device: D,
    context: RenderContext,
    settings: RendererSettings,
    input: Input,

    current_window: Option<WindowId>,
    viewport: (u32, u32),
    frame_count: u64,
}

impl<D: GraphicsDevice> Renderer<D> {
    pub fn new(device: D, settings: RendererSettings) -> Result<Self> {
        Self::with_context(device, settings, RenderContext::new())
    }

    /// Uses a caller-built context, e.g. one with custom shaders registered.
    pub fn with_context(device: D, settings: RendererSettings, context: RenderContext) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            device,
            context,
            settings,
            input: Input::new(),
            current_window: None,
            viewport: (0, 0),
            frame_count: 0,
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.settings.background
    }

    pub fn set_background(&mut self, color: Color) -> Result<()> {
        color.validate()?;
        self.settings.background = color;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.context
    }

    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[must_use]
    pub fn current_window(&self) -> Option<WindowId> {
        self.current_window
    }

    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Makes `target` current. Does nothing if it already is; otherwise binds
    /// its context and resets the viewport to its size.
    pub fn set_window(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        let id = target.id();
        if self.current_window == Some(id) {
            return Ok(());
        }

        target.make_current()?;
        let (width, height) = target.size();
        self.device.set_viewport(width, height);
        self.device.set_depth_test(self.settings.depth_test);
        self.viewport = (width, height);
        self.input.handle_resize(width, height);
        self.current_window = Some(id);

        log::info!("Render target {id:?} is current ({width}x{height})");
        Ok(())
    }

    /// Renders one frame of `scene` as seen from `camera` into `target`,
    /// which must be the current window.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        camera: EntityHandle,
        target: &mut dyn RenderTarget,
    ) -> Result<FrameStats> {
        match self.current_window {
            None => {
                return Err(ArborError::IllegalState(
                    "no render target is current; call set_window first".into(),
                ));
            }
            Some(id) if id != target.id() => {
                return Err(ArborError::IllegalState(format!(
                    "render target {:?} is not current ({id:?} is)",
                    target.id()
                )));
            }
            Some(_) => {}
        }

        self.poll_input(scene, camera, target)?;

        let frame = FrameUniforms {
            view: scene.view_matrix(camera)?.to_cols_array(),
            projection: scene.projection_matrix(camera)?.to_cols_array(),
            ambient: scene
                .ambient_light()
                .map_or([0.0; 3], |light| light.color().scaled_rgb(light.intensity())),
        };

        self.device.clear(self.settings.background);

        let items = traversal::flatten(scene);
        let mut stats = FrameStats::default();
        let mut live = FxHashSet::default();
        for item in &items {
            self.draw_item(item, &frame)?;
            live.insert(item.mesh.geometry.id());
            stats.draw_calls += 1;
            stats.triangles += item.mesh.geometry.index_count() / 3;
        }
        self.context.retain_geometries(&mut self.device, &live);

        target.swap_buffers()?;
        self.frame_count += 1;

        log::trace!(
            "Frame {}: {} draw calls, {} triangles",
            self.frame_count,
            stats.draw_calls,
            stats.triangles
        );
        Ok(stats)
    }

    /// Renders until `target` closes. `on_frame` runs after every frame and
    /// may update the scene. Returns the number of frames rendered.
    pub fn run<F>(
        &mut self,
        scene: &mut Scene,
        camera: EntityHandle,
        target: &mut dyn RenderTarget,
        mut on_frame: F,
    ) -> Result<u64>
    where
        F: FnMut(&mut Scene, &Input) -> Result<()>,
    {
        self.set_window(target)?;

        let mut frames = 0;
        while target.is_open() {
            self.render(scene, camera, target)?;
            frames += 1;
            if self.input.close_requested {
                log::info!("Close requested after {frames} frames");
                break;
            }
            on_frame(scene, &self.input)?;
        }
        Ok(frames)
    }

    fn poll_input(&mut self, scene: &mut Scene, camera: EntityHandle, target: &mut dyn RenderTarget) -> Result<()> {
        self.input.begin_frame();
        for event in target.poll_events() {
            if let InputEvent::Resized { width, height } = event {
                self.resize(scene, camera, width, height)?;
            }
            self.input.handle_event(&event);
        }
        Ok(())
    }

    fn resize(&mut self, scene: &mut Scene, camera: EntityHandle, width: u32, height: u32) -> Result<()> {
        let camera = scene.camera_mut(camera)?;
        // Minimized windows report zero; keep the last aspect.
        if width > 0 && height > 0 {
            camera.set_aspect(width as f32 / height as f32)?;
        }
        self.device.set_viewport(width, height);
        self.viewport = (width, height);
        log::debug!("Viewport resized to {width}x{height}");
        Ok(())
    }

    fn draw_item(&mut self, item: &RenderItem, frame: &FrameUniforms) -> Result<()> {
        let material = &item.mesh.material;
        let geometry = &item.mesh.geometry;

        let program = self.context.program_for(&mut self.device, material.kind())?;
        self.device.use_program(program)?;

        self.device
            .set_uniform(uniforms::MODEL, UniformValue::Mat4(item.transform.to_cols_array()))?;
        self.device.set_uniform(uniforms::VIEW, UniformValue::Mat4(frame.view))?;
        self.device
            .set_uniform(uniforms::PROJECTION, UniformValue::Mat4(frame.projection))?;

        self.device
            .set_uniform(uniforms::COLOR, UniformValue::Vec4(material.color().to_array()))?;
        self.device.set_uniform(
            uniforms::USE_VERTEX_COLORS,
            UniformValue::Int(i32::from(material.uses_vertex_colors() && geometry.colors().is_some())),
        )?;
        match material.texture().filter(|_| geometry.uvs().is_some()) {
            Some(texture) => {
                let unit = self.settings.texture_unit;
                self.device.bind_texture(texture, unit)?;
                self.device.set_uniform(uniforms::TEXTURE, UniformValue::Int(unit as i32))?;
                self.device.set_uniform(uniforms::USE_TEXTURE, UniformValue::Int(1))?;
            }
            None => self.device.set_uniform(uniforms::USE_TEXTURE, UniformValue::Int(0))?,
        }
        self.device.set_uniform(uniforms::AMBIENT, UniformValue::Vec3(frame.ambient))?;

        let buffer = self.context.buffer_for(&mut self.device, geometry)?;
        self.device.bind_buffer(buffer)?;
        log::trace!("Draw {:?}: {} indices", item.entity, geometry.index_count());
        self.device.draw_indexed(geometry.index_count() as u32)
    }
}

impl<D: GraphicsDevice> Drop for Renderer<D> {
    fn drop(&mut self) {
        self.context.release_all(&mut self.device);
    }
}
