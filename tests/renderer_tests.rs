//! Renderer Tests
//!
//! Drives the renderer against a recording device and a scripted window:
//! - Frame order (clear, per-item program/uniforms/buffer/draw, swap)
//! - Target binding and viewport resets
//! - Resize handling
//! - Lazy, cached GPU buffers and shader programs
//! - Buffers released once their geometry is no longer drawn
//! - Error propagation (missing window, missing shader, device failures)
//! - Resource release on drop

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use arbor::color::Color;
use arbor::errors::{ArborError, Result};
use arbor::math::Vector3;
use arbor::render::{
    BufferHandle, Geometry, GraphicsDevice, InputEvent, Material, MaterialKind, ProgramHandle,
    RenderContext, RenderTarget, Renderer, RendererSettings, ShaderLibrary, ShaderSource,
    TextureHandle, UniformValue, VertexAttributes, WindowId,
};
use arbor::scene::{Camera, EntityHandle, Mesh, Scene};

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateBuffer { stride: usize, vertices: usize, indices: usize },
    BindBuffer(BufferHandle),
    DestroyBuffer(BufferHandle),
    CreateProgram(String),
    UseProgram(ProgramHandle),
    Uniform(String, UniformValue),
    BindTexture(TextureHandle, u32),
    Viewport(u32, u32),
    DepthTest(bool),
    Clear(Color),
    Draw(u32),
}

#[derive(Default)]
struct RecordingDevice {
    calls: Rc<RefCell<Vec<Call>>>,
    next_id: u32,
    fail_programs: bool,
}

impl RecordingDevice {
    fn new() -> (Self, Rc<RefCell<Vec<Call>>>) {
        let device = Self::default();
        let calls = Rc::clone(&device.calls);
        (device, calls)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(
        &mut self,
        attributes: VertexAttributes,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<BufferHandle> {
        self.record(Call::CreateBuffer {
            stride: attributes.stride(),
            vertices: vertices.len(),
            indices: indices.len(),
        });
        Ok(BufferHandle(self.next()))
    }

    fn bind_buffer(&mut self, buffer: BufferHandle) -> Result<()> {
        self.record(Call::BindBuffer(buffer));
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.record(Call::DestroyBuffer(buffer));
    }

    fn create_program(&mut self, source: &ShaderSource) -> Result<ProgramHandle> {
        if self.fail_programs {
            return Err(ArborError::Instantiation {
                resource: format!("program '{}'", source.name),
                reason: "link failed".into(),
            });
        }
        self.record(Call::CreateProgram(source.name.to_string()));
        Ok(ProgramHandle(self.next()))
    }

    fn use_program(&mut self, program: ProgramHandle) -> Result<()> {
        self.record(Call::UseProgram(program));
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()> {
        self.record(Call::Uniform(name.to_owned(), value));
        Ok(())
    }

    fn bind_texture(&mut self, texture: TextureHandle, unit: u32) -> Result<()> {
        self.record(Call::BindTexture(texture, unit));
        Ok(())
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.record(Call::DepthTest(enabled));
    }

    fn clear(&mut self, color: Color) {
        self.record(Call::Clear(color));
    }

    fn draw_indexed(&mut self, index_count: u32) -> Result<()> {
        self.record(Call::Draw(index_count));
        Ok(())
    }
}

struct FakeWindow {
    id: WindowId,
    size: (u32, u32),
    /// Closes after this many swaps.
    frames_left: Option<u32>,
    pending: VecDeque<Vec<InputEvent>>,
    make_current_calls: u32,
    swaps: u32,
}

impl FakeWindow {
    fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id: WindowId(id),
            size: (width, height),
            frames_left: None,
            pending: VecDeque::new(),
            make_current_calls: 0,
            swaps: 0,
        }
    }

    fn closing_after(mut self, frames: u32) -> Self {
        self.frames_left = Some(frames);
        self
    }

    fn queue(&mut self, events: Vec<InputEvent>) {
        self.pending.push_back(events);
    }
}

impl RenderTarget for FakeWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.frames_left != Some(0)
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn make_current(&mut self) -> Result<()> {
        self.make_current_calls += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.pending.pop_front().unwrap_or_default()
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.swaps += 1;
        if let Some(left) = self.frames_left.as_mut() {
            *left = left.saturating_sub(1);
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene_with_camera() -> (Scene, EntityHandle) {
    init_logger();
    let mut scene = Scene::new();
    let camera = scene.create_camera("camera", Camera::new_perspective(60.0, 1.0, 0.1, 100.0).unwrap());
    scene.add_to_root(camera).unwrap();
    scene
        .entity_mut(camera)
        .unwrap()
        .set_position(Vector3::new(0.0, 0.0, 5.0))
        .unwrap();
    (scene, camera)
}

fn add_mesh(scene: &mut Scene, geometry: &Arc<Geometry>, material: Material) -> EntityHandle {
    let mesh = scene.create_mesh("mesh", Mesh::new(Arc::clone(geometry), Arc::new(material)));
    scene.add_to_root(mesh).unwrap();
    mesh
}

fn count(calls: &[Call], pred: impl Fn(&Call) -> bool) -> usize {
    calls.iter().filter(|c| pred(c)).count()
}

// ============================================================================
// Frame
// ============================================================================

#[test]
fn render_without_window_is_illegal_state() {
    let (device, _) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let mut window = FakeWindow::new(1, 800, 600);

    let result = renderer.render(&mut scene, camera, &mut window);
    assert!(matches!(result, Err(ArborError::IllegalState(_))));
    assert_eq!(window.swaps, 0);
}

#[test]
fn render_into_non_current_window_is_illegal_state() {
    let (device, _) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let mut first = FakeWindow::new(1, 800, 600);
    let mut second = FakeWindow::new(2, 640, 480);
    renderer.set_window(&mut first).unwrap();

    let result = renderer.render(&mut scene, camera, &mut second);
    assert!(matches!(result, Err(ArborError::IllegalState(_))));
}

#[test]
fn frame_clears_draws_then_swaps() {
    let (device, calls) = RecordingDevice::new();
    let background = Color::rgb(0.1, 0.2, 0.3).unwrap();
    let settings = RendererSettings {
        background,
        ..Default::default()
    };
    let mut renderer = Renderer::new(device, settings).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    add_mesh(&mut scene, &cube, Material::basic(Color::WHITE).unwrap());

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    let stats = renderer.render(&mut scene, camera, &mut window).unwrap();

    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.triangles, 12);
    assert_eq!(window.swaps, 1);
    assert_eq!(renderer.frame_count(), 1);

    let calls = calls.borrow();
    let clear = calls.iter().position(|c| *c == Call::Clear(background)).unwrap();
    let program = calls.iter().position(|c| matches!(c, Call::UseProgram(_))).unwrap();
    let bind = calls.iter().position(|c| matches!(c, Call::BindBuffer(_))).unwrap();
    let draw = calls.iter().position(|c| *c == Call::Draw(36)).unwrap();
    assert!(clear < program && program < bind && bind < draw);
    assert_eq!(
        calls.iter().find(|c| matches!(c, Call::CreateBuffer { .. })),
        Some(&Call::CreateBuffer { stride: 8, vertices: 24 * 8, indices: 36 })
    );
}

#[test]
fn uniforms_carry_model_view_projection_and_material() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    let red = Color::rgb(1.0, 0.0, 0.0).unwrap();
    let mesh = add_mesh(&mut scene, &cube, Material::lambert(red).unwrap());
    scene
        .entity_mut(mesh)
        .unwrap()
        .set_position(Vector3::new(2.0, 0.0, 0.0))
        .unwrap();

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    let model = scene.world_matrix(mesh).unwrap().to_cols_array();
    let view = scene.view_matrix(camera).unwrap().to_cols_array();
    let projection = scene.projection_matrix(camera).unwrap().to_cols_array();

    let calls = calls.borrow();
    let uniform = |name: &str| {
        calls.iter().find_map(|c| match c {
            Call::Uniform(n, v) if n == name => Some(*v),
            _ => None,
        })
    };
    assert_eq!(uniform("u_model"), Some(UniformValue::Mat4(model)));
    assert_eq!(uniform("u_view"), Some(UniformValue::Mat4(view)));
    assert_eq!(uniform("u_projection"), Some(UniformValue::Mat4(projection)));
    assert_eq!(uniform("u_color"), Some(UniformValue::Vec4(red.to_array())));
    assert_eq!(uniform("u_use_texture"), Some(UniformValue::Int(0)));
    assert_eq!(uniform("u_use_vertex_colors"), Some(UniformValue::Int(0)));

    let UniformValue::Vec3(ambient) = uniform("u_ambient").unwrap() else {
        panic!("ambient uniform is not a vec3");
    };
    assert!(ambient.iter().all(|c| (c - 0.2).abs() < 1e-6));
}

#[test]
fn textured_material_binds_configured_unit() {
    let (device, calls) = RecordingDevice::new();
    let settings = RendererSettings {
        texture_unit: 3,
        ..Default::default()
    };
    let mut renderer = Renderer::new(device, settings).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let plane = Arc::new(Geometry::plane(2.0, 2.0));
    let material = Material::basic(Color::WHITE).unwrap().with_texture(TextureHandle(7));
    add_mesh(&mut scene, &plane, material);

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    let calls = calls.borrow();
    assert!(calls.contains(&Call::BindTexture(TextureHandle(7), 3)));
    assert!(calls.contains(&Call::Uniform("u_texture".into(), UniformValue::Int(3))));
    assert!(calls.contains(&Call::Uniform("u_use_texture".into(), UniformValue::Int(1))));
}

#[test]
fn texture_is_skipped_for_geometry_without_uvs() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let triangle = Geometry::new(vec![Vector3::ZERO, Vector3::X, Vector3::Y], vec![0, 1, 2]).unwrap();
    let material = Material::basic(Color::WHITE).unwrap().with_texture(TextureHandle(7));
    add_mesh(&mut scene, &Arc::new(triangle), material);

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    let calls = calls.borrow();
    assert_eq!(count(&calls, |c| matches!(c, Call::BindTexture(..))), 0);
    assert!(calls.contains(&Call::Uniform("u_use_texture".into(), UniformValue::Int(0))));
    assert_eq!(count(&calls, |c| matches!(c, Call::Draw(3))), 1);
}

#[test]
fn vertex_color_flag_requires_colored_geometry() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let triangle = Geometry::new(vec![Vector3::ZERO, Vector3::X, Vector3::Y], vec![0, 1, 2])
        .unwrap()
        .with_colors(vec![Color::WHITE; 3])
        .unwrap();
    let material = Material::basic(Color::WHITE).unwrap().with_vertex_colors(true);
    add_mesh(&mut scene, &Arc::new(triangle), material);

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    let calls = calls.borrow();
    assert!(calls.contains(&Call::Uniform("u_use_vertex_colors".into(), UniformValue::Int(1))));
    // position + color
    assert!(calls.contains(&Call::CreateBuffer { stride: 7, vertices: 21, indices: 3 }));
}

#[test]
fn empty_scene_still_clears_and_swaps() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();

    let stats = renderer.render(&mut scene, camera, &mut window).unwrap();

    assert_eq!(stats.draw_calls, 0);
    assert_eq!(window.swaps, 1);
    assert!(calls.borrow().contains(&Call::Clear(Color::BLACK)));
}

// ============================================================================
// Targets and resize
// ============================================================================

#[test]
fn set_window_is_noop_for_current_target() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let mut window = FakeWindow::new(1, 800, 600);

    renderer.set_window(&mut window).unwrap();
    renderer.set_window(&mut window).unwrap();

    assert_eq!(window.make_current_calls, 1);
    assert_eq!(count(&calls.borrow(), |c| matches!(c, Call::Viewport(..))), 1);
    assert_eq!(renderer.current_window(), Some(WindowId(1)));
}

#[test]
fn switching_target_resets_viewport() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let mut first = FakeWindow::new(1, 800, 600);
    let mut second = FakeWindow::new(2, 320, 240);

    renderer.set_window(&mut first).unwrap();
    renderer.set_window(&mut second).unwrap();

    assert_eq!(second.make_current_calls, 1);
    assert_eq!(renderer.viewport(), (320, 240));
    assert_eq!(calls.borrow().last(), Some(&Call::DepthTest(true)));
    assert!(calls.borrow().contains(&Call::Viewport(320, 240)));
}

#[test]
fn resize_updates_viewport_and_camera_aspect() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let mut window = FakeWindow::new(1, 800, 600);
    window.queue(vec![InputEvent::Resized { width: 1000, height: 500 }]);

    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    assert_eq!(renderer.viewport(), (1000, 500));
    assert!(calls.borrow().contains(&Call::Viewport(1000, 500)));
    let projection = scene.projection_matrix(camera).unwrap();
    assert!((projection.get(1, 1).unwrap() / projection.get(0, 0).unwrap() - 2.0).abs() < 1e-5);
    assert_eq!(renderer.input().screen_size.x, 1000.0);
}

#[test]
fn resize_with_invalid_camera_leaves_viewport_alone() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, _) = scene_with_camera();
    let group = scene.create_group("not a camera");
    let mut window = FakeWindow::new(1, 800, 600);
    window.queue(vec![InputEvent::Resized { width: 1000, height: 500 }]);

    renderer.set_window(&mut window).unwrap();
    assert!(renderer.render(&mut scene, group, &mut window).is_err());

    assert_eq!(renderer.viewport(), (800, 600));
    assert!(!calls.borrow().contains(&Call::Viewport(1000, 500)));
    assert_eq!(window.swaps, 0);
}

// ============================================================================
// Resource caching
// ============================================================================

#[test]
fn shared_geometry_uploads_once_across_frames() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    add_mesh(&mut scene, &cube, Material::basic(Color::WHITE).unwrap());
    add_mesh(&mut scene, &cube, Material::lambert(Color::WHITE).unwrap());
    add_mesh(&mut scene, &cube, Material::basic(Color::WHITE).unwrap());

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    let calls = calls.borrow();
    assert_eq!(count(&calls, |c| matches!(c, Call::CreateBuffer { .. })), 1);
    assert_eq!(count(&calls, |c| matches!(c, Call::CreateProgram(_))), 2);
    assert_eq!(count(&calls, |c| matches!(c, Call::Draw(_))), 6);
    assert_eq!(renderer.context().buffer_count(), 1);
    assert_eq!(renderer.context().shaders().compiled_count(), 2);
}

#[test]
fn changed_geometry_rebuilds_its_buffer() {
    let (device, calls) = RecordingDevice::new();
    let mut context = RenderContext::new();
    let mut device = device;
    let mut geometry = Geometry::plane(1.0, 1.0);

    let first = context.buffer_for(&mut device, &geometry).unwrap();
    assert_eq!(context.buffer_for(&mut device, &geometry).unwrap(), first);

    geometry.set_uvs(None).unwrap();
    let second = context.buffer_for(&mut device, &geometry).unwrap();

    assert_ne!(first, second);
    assert!(calls.borrow().contains(&Call::DestroyBuffer(first)));
    assert_eq!(context.buffer_count(), 1);
}

#[test]
fn destroyed_mesh_buffers_are_released_next_frame() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();

    for _ in 0..50 {
        let mesh = add_mesh(&mut scene, &Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)), Material::normal());
        renderer.render(&mut scene, camera, &mut window).unwrap();
        scene.destroy(mesh).unwrap();
    }
    assert!(renderer.context().buffer_count() <= 1);

    renderer.render(&mut scene, camera, &mut window).unwrap();

    assert_eq!(renderer.context().buffer_count(), 0);
    assert_eq!(count(&calls.borrow(), |c| matches!(c, Call::DestroyBuffer(_))), 50);
}

#[test]
fn buffers_of_drawn_geometry_survive_frames() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    add_mesh(&mut scene, &cube, Material::normal());
    let plane = add_mesh(&mut scene, &Arc::new(Geometry::plane(1.0, 1.0)), Material::normal());
    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();

    renderer.render(&mut scene, camera, &mut window).unwrap();
    scene.detach(plane);
    renderer.render(&mut scene, camera, &mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();

    let calls = calls.borrow();
    assert_eq!(renderer.context().buffer_count(), 1);
    assert_eq!(count(&calls, |c| matches!(c, Call::CreateBuffer { .. })), 2);
    assert_eq!(count(&calls, |c| matches!(c, Call::DestroyBuffer(_))), 1);
}

#[test]
fn dropping_renderer_releases_buffers() {
    let (device, calls) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    add_mesh(&mut scene, &Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)), Material::normal());
    add_mesh(&mut scene, &Arc::new(Geometry::plane(1.0, 1.0)), Material::normal());

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    renderer.render(&mut scene, camera, &mut window).unwrap();
    drop(renderer);

    assert_eq!(count(&calls.borrow(), |c| matches!(c, Call::DestroyBuffer(_))), 2);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn missing_shader_is_not_found_and_frame_is_not_swapped() {
    let (device, _) = RecordingDevice::new();
    let context = RenderContext::with_shaders(ShaderLibrary::new());
    let mut renderer = Renderer::with_context(device, RendererSettings::default(), context).unwrap();
    let (mut scene, camera) = scene_with_camera();
    add_mesh(&mut scene, &Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)), Material::normal());

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    let result = renderer.render(&mut scene, camera, &mut window);

    assert!(matches!(result, Err(ArborError::NotFound(_))));
    assert_eq!(window.swaps, 0);
}

#[test]
fn program_link_failure_aborts_frame() {
    let (mut device, _) = RecordingDevice::new();
    device.fail_programs = true;
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    add_mesh(&mut scene, &Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)), Material::normal());

    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();
    let result = renderer.render(&mut scene, camera, &mut window);

    assert!(matches!(result, Err(ArborError::Instantiation { .. })));
    assert_eq!(window.swaps, 0);
}

#[test]
fn duplicate_shader_registration_is_rejected() {
    let mut library = ShaderLibrary::with_builtins();
    let custom = ShaderSource::new("custom", "void main() {}", "void main() {}");
    assert!(matches!(
        library.register(MaterialKind::Basic, custom.clone()),
        Err(ArborError::InvalidArgument(_))
    ));

    let mut empty = ShaderLibrary::new();
    empty.register(MaterialKind::Basic, custom).unwrap();
    assert_eq!(empty.source(MaterialKind::Basic).unwrap().name, "custom");
    assert!(empty.source(MaterialKind::Lambert).is_err());
}

#[test]
fn render_with_non_camera_fails() {
    let (device, _) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, _) = scene_with_camera();
    let group = scene.create_group("not a camera");
    let mut window = FakeWindow::new(1, 800, 600);
    renderer.set_window(&mut window).unwrap();

    assert!(renderer.render(&mut scene, group, &mut window).is_err());
}

#[test]
fn invalid_background_is_rejected() {
    let (device, _) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let bad = Color { r: 2.0, g: 0.0, b: 0.0, a: 1.0 };
    assert!(renderer.set_background(bad).is_err());
    assert_eq!(renderer.background(), Color::BLACK);
}

// ============================================================================
// Run loop
// ============================================================================

#[test]
fn run_renders_until_window_closes() {
    let (device, _) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let cube = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    let mesh = add_mesh(&mut scene, &cube, Material::basic(Color::WHITE).unwrap());
    let mut window = FakeWindow::new(1, 800, 600).closing_after(3);

    let mut updates = 0;
    let frames = renderer
        .run(&mut scene, camera, &mut window, |scene, _input| {
            updates += 1;
            scene.entity_mut(mesh)?.add_position(Vector3::X)
        })
        .unwrap();

    assert_eq!(frames, 3);
    assert_eq!(updates, 3);
    assert!(!window.is_open());
    assert_eq!(scene.entity(mesh).unwrap().position(), Vector3::new(3.0, 0.0, 0.0));
}

#[test]
fn run_stops_on_close_request() {
    let (device, _) = RecordingDevice::new();
    let mut renderer = Renderer::new(device, RendererSettings::default()).unwrap();
    let (mut scene, camera) = scene_with_camera();
    let mut window = FakeWindow::new(1, 800, 600);
    window.queue(vec![]);
    window.queue(vec![InputEvent::CloseRequested]);

    let frames = renderer.run(&mut scene, camera, &mut window, |_, _| Ok(())).unwrap();

    assert_eq!(frames, 2);
}
