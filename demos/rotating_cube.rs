//! Rotating cube on a headless backend.
//!
//! The device and window here only log what they are asked to do, which is
//! enough to watch a scene go through the renderer without a GPU:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example rotating_cube
//! ```

use std::sync::Arc;

use arbor::color::Color;
use arbor::errors::Result as ArborResult;
use arbor::math::{Matrix3, Vector3};
use arbor::render::{
    BufferHandle, Geometry, GraphicsDevice, InputEvent, Material, ProgramHandle, RenderTarget,
    Renderer, RendererSettings, ShaderSource, TextureHandle, UniformValue, VertexAttributes,
    WindowId,
};
use arbor::scene::{Camera, Mesh, Scene};

const FRAMES: u32 = 120;

#[derive(Default)]
struct LoggingDevice {
    next_id: u32,
    draws: u64,
}

impl LoggingDevice {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsDevice for LoggingDevice {
    fn create_buffer(
        &mut self,
        attributes: VertexAttributes,
        vertices: &[f32],
        indices: &[u32],
    ) -> ArborResult<BufferHandle> {
        let handle = BufferHandle(self.next());
        log::info!(
            "create_buffer {handle:?}: {:?}, {} vertices, {} indices",
            attributes,
            vertices.len() / attributes.stride(),
            indices.len()
        );
        Ok(handle)
    }

    fn bind_buffer(&mut self, _buffer: BufferHandle) -> ArborResult<()> {
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        log::info!("destroy_buffer {buffer:?}");
    }

    fn create_program(&mut self, source: &ShaderSource) -> ArborResult<ProgramHandle> {
        let handle = ProgramHandle(self.next());
        log::info!("create_program '{}' -> {handle:?}", source.name);
        Ok(handle)
    }

    fn use_program(&mut self, _program: ProgramHandle) -> ArborResult<()> {
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> ArborResult<()> {
        log::trace!("uniform {name} = {value:?}");
        Ok(())
    }

    fn bind_texture(&mut self, _texture: TextureHandle, _unit: u32) -> ArborResult<()> {
        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        log::info!("viewport {width}x{height}");
    }

    fn set_depth_test(&mut self, _enabled: bool) {}

    fn clear(&mut self, _color: Color) {}

    fn draw_indexed(&mut self, _index_count: u32) -> ArborResult<()> {
        self.draws += 1;
        Ok(())
    }
}

struct HeadlessWindow {
    frames_left: u32,
    resized: bool,
}

impl RenderTarget for HeadlessWindow {
    fn id(&self) -> WindowId {
        WindowId(0)
    }

    fn is_open(&self) -> bool {
        self.frames_left > 0
    }

    fn size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn make_current(&mut self) -> ArborResult<()> {
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        // Simulate one resize halfway through.
        if !self.resized && self.frames_left == FRAMES / 2 {
            self.resized = true;
            return vec![InputEvent::Resized { width: 800, height: 800 }];
        }
        Vec::new()
    }

    fn swap_buffers(&mut self) -> ArborResult<()> {
        self.frames_left -= 1;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();

    let camera = scene.create_camera("camera", Camera::new_perspective(45.0, 16.0 / 9.0, 0.1, 100.0)?);
    scene.add_to_root(camera)?;
    scene
        .entity_mut(camera)?
        .look_at_from(Vector3::new(3.0, 3.0, 6.0), Vector3::ZERO, Vector3::Y)?;

    let pivot = scene.create_group("pivot");
    scene.add_to_root(pivot)?;

    let cube = scene.create_mesh(
        "cube",
        Mesh::new(
            Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)),
            Arc::new(Material::lambert(Color::from_hex(0x44_88_CC))?),
        ),
    );
    scene.add(pivot, cube)?;

    let satellite = scene.create_mesh(
        "satellite",
        Mesh::new(Arc::new(Geometry::cuboid(0.3, 0.3, 0.3)), Arc::new(Material::normal())),
    );
    scene.add(pivot, satellite)?;
    scene.entity_mut(satellite)?.set_position(Vector3::new(2.0, 0.0, 0.0))?;

    let settings = RendererSettings::from_json(r#"{ "background": { "r": 0.05, "g": 0.05, "b": 0.08, "a": 1.0 } }"#)?;
    let mut renderer = Renderer::new(LoggingDevice::default(), settings)?;
    let mut window = HeadlessWindow {
        frames_left: FRAMES,
        resized: false,
    };

    let spin = Matrix3::rotation_y(0.02);
    let tumble = Matrix3::from_axis_angle(Vector3::new(1.0, 1.0, 0.0), 0.03);
    let frames = renderer.run(&mut scene, camera, &mut window, |scene, _input| {
        scene.entity_mut(pivot)?.add_rotation(&spin)?;
        scene.entity_mut(cube)?.add_rotation(&tumble)
    })?;

    let satellite_at = scene.world_matrix(satellite)?.translation();
    log::info!(
        "Rendered {frames} frames, {} draw calls; satellite ended at ({:.2}, {:.2}, {:.2})",
        renderer.device().draws,
        satellite_at.x,
        satellite_at.y,
        satellite_at.z
    );
    Ok(())
}
