//! The window the interactive tools draw into

use crate::camera::Camera;
use crate::renderer::{axis_vertices, points_to_vertices, PointRenderer};
use pcannotate_core::{Display, DisplayEvent, Drawable, Error, Instance, PointStyle, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::Key,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowBuilder},
};

const ORBIT_SPEED: f32 = 0.01;
const AXIS_SAMPLES: usize = 64;

/// Window settings
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color, linear RGB
    pub background: [f64; 3],
    /// Draw x/y/z axis strips from the origin next to the points
    pub show_axes: bool,
    /// Longest time one [`Display::pump_events`] call blocks waiting for input
    pub pump_timeout: Duration,
}

impl ViewerConfig {
    pub fn annotator() -> Self {
        Self {
            title: "Point Cloud Annotator".to_string(),
            width: 800,
            height: 600,
            background: [0.9, 0.9, 0.9],
            show_axes: true,
            pump_timeout: Duration::from_millis(16),
        }
    }

    pub fn browser() -> Self {
        Self {
            title: "Point Cloud Visualizer".to_string(),
            ..Self::annotator()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::annotator()
    }
}

/// A [`Display`] backed by a winit window and a wgpu renderer.
///
/// The event loop is pumped from [`Display::pump_events`] instead of being
/// handed control, so the sessions keep their own loop. Must be created on
/// the main thread.
pub struct WindowDisplay {
    config: ViewerConfig,
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    renderer: PointRenderer,
    camera: Camera,
    point_size: f32,
    keys: HashSet<char>,
    mouse_pressed: bool,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    closed: bool,
}

impl WindowDisplay {
    /// Open the window and set up rendering
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.as_str())
                .with_inner_size(LogicalSize::new(config.width, config.height))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let renderer = pollster::block_on(PointRenderer::new(window.clone(), config.background))?;
        let (width, height) = renderer.size();
        let mut camera = Camera::default();
        camera.aspect_ratio = width as f32 / height as f32;

        log::debug!("Opened window '{}' ({}x{})", config.title, width, height);

        Ok(Self {
            config,
            event_loop,
            window,
            renderer,
            camera,
            point_size: PointStyle::default().size,
            keys: HashSet::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
            closed: false,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Display for WindowDisplay {
    fn show_points(&mut self, points: &Instance, style: &PointStyle) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let mut vertices = points_to_vertices(points, style.color);
        if self.config.show_axes {
            let length = if points.is_empty() {
                1.0
            } else {
                points.extent().max(1e-3)
            };
            vertices.extend(axis_vertices(length, AXIS_SAMPLES));
        }

        self.renderer.set_points(&vertices);
        self.camera.frame(points);
        self.point_size = style.size;
        self.window.request_redraw();
        log::debug!("Showing {} points", points.len());
        Ok(())
    }

    fn register_key(&mut self, key: char) {
        self.keys.insert(key);
    }

    fn pump_events(&mut self) -> Result<Vec<DisplayEvent>> {
        if self.closed {
            return Ok(Vec::new());
        }

        let Self {
            config,
            event_loop,
            window,
            renderer,
            camera,
            point_size,
            keys,
            mouse_pressed,
            last_mouse_pos,
            ..
        } = self;

        let mut events = Vec::new();
        let mut render_error = None;

        let status = event_loop.pump_events(Some(config.pump_timeout), |event, _| {
            let Event::WindowEvent { event, window_id } = event else {
                return;
            };
            if window_id != window.id() {
                return;
            }

            match event {
                WindowEvent::CloseRequested => events.push(DisplayEvent::Closed),
                WindowEvent::Resized(new_size) => {
                    renderer.resize(new_size);
                    let (width, height) = renderer.size();
                    camera.aspect_ratio = width as f32 / height as f32;
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    if let Key::Character(text) = &event.logical_key {
                        for key in text.chars().filter(|key| keys.contains(key)) {
                            events.push(DisplayEvent::Key(key));
                        }
                    }
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if button == MouseButton::Left {
                        *mouse_pressed = state == ElementState::Pressed;
                        if !*mouse_pressed {
                            *last_mouse_pos = None;
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if *mouse_pressed {
                        if let Some(last) = *last_mouse_pos {
                            let dx = (position.x - last.x) as f32;
                            let dy = (position.y - last.y) as f32;
                            camera.orbit(dx * ORBIT_SPEED, dy * ORBIT_SPEED);
                            window.request_redraw();
                        }
                        *last_mouse_pos = Some(position);
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let steps = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                    };
                    camera.zoom(steps);
                    window.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    renderer.update_camera(camera.view_projection(), *point_size);
                    if let Err(e) = renderer.render() {
                        render_error = Some(e);
                    }
                }
                _ => {}
            }
        });

        if let PumpStatus::Exit(code) = status {
            log::debug!("Event loop exited with code {}", code);
            if !events.contains(&DisplayEvent::Closed) {
                events.push(DisplayEvent::Closed);
            }
        }

        match render_error {
            Some(e) => Err(e),
            None => Ok(events),
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.window.set_visible(false);
            self.closed = true;
            log::debug!("Closed window '{}'", self.config.title);
        }
    }
}
