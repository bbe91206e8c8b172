use std::ffi::{c_char, CStr, CString};
use std::num::NonZeroU32;
use std::path::Path;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use cgmath::Vector4;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::error::GlCallError;
use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::shader_source::{ShaderProgramSource, ShaderSourceError};
use gl_wrapper::texture::{Texture2D, TextureError, TextureFilter};
use gl_wrapper::{QUAD_INDICES, QUAD_VERTICES};

use crate::animation::ColorPulse;
use crate::config::DemoConfig;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    scene: QuadScene,
}

impl App {
    pub fn new(
        config: &DemoConfig,
        shader_path: &Path,
        texture_path: Option<&Path>,
    ) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.width,
                config.height,
            )))
            .with_title(&config.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| {
                configs.next().expect("display offers no GL configs")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;
        let gl_display = gl_config.display();

        // vertex array objects need a core profile
        let context_attr = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(window.raw_window_handle()));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        if config.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
                log::warn!("Could not enable vsync: {e}");
            }
        }

        gl::load_with(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(s.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        log::info!("Running on OpenGL {}", gl_version());

        let scene = QuadScene::new(config, shader_path, texture_path)?;

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            scene,
        })
    }

    pub fn run(self) -> ! {
        let App {
            event_loop,
            gl_context,
            gl_window,
            mut scene,
        } = self;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::MainEventsCleared => gl_window.window.request_redraw(),
                Event::RedrawRequested(_) => {
                    // failed calls are already logged by the validator
                    let _ = scene.draw_frame();

                    if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                        log::error!("Could not swap buffers: {e}");
                        control_flow.set_exit();
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        if let (Some(width), Some(height)) =
                            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                        {
                            gl_window.surface.resize(&gl_context, width, height);
                            let _ = scene.renderer.resize(size.width, size.height);
                        }
                    }
                    WindowEvent::CloseRequested => {
                        log::info!("Window closed");
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                _ => (),
            }
        })
    }
}

/// GL objects of the demo, created once the context is current.
struct QuadScene {
    renderer: GlRenderer,
    program: Program,
    quad: Geometry,
    texture: Option<Texture2D>,
    pulse: ColorPulse,
    clear_color: [f32; 3],
}

impl QuadScene {
    fn new(
        config: &DemoConfig,
        shader_path: &Path,
        texture_path: Option<&Path>,
    ) -> Result<Self, AppError> {
        let source = ShaderProgramSource::from_path(shader_path)?;
        let mut program = ProgramBuilder::from_source(&source)?.build()?;

        let quad = GeometryBuilder::new(&QUAD_VERTICES)
            .with_attribute(VertexAttribute::Vec2)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&QUAD_INDICES)
            .build()?;

        let texture = texture_path
            .map(|path| Texture2D::from_path(path, TextureFilter::Linear))
            .transpose()?;

        let mut renderer = GlRenderer::new();
        let [r, g, b, a] = config.color;
        let pulse = ColorPulse::new(Vector4::new(r, g, b, a), config.color_step);

        program.bind();
        program.set_uniform_4f("u_Color", pulse.color())?;
        program.set_uniform_1i("u_UseTexture", texture.is_some() as i32)?;
        if let Some(texture) = &texture {
            texture.bind(0);
            program.set_uniform_1i("u_Texture", 0)?;
            renderer.enable_blending()?;
        }

        quad.unbind();
        program.unbind();

        Ok(Self {
            renderer,
            program,
            quad,
            texture,
            pulse,
            clear_color: config.clear_color,
        })
    }

    fn draw_frame(&mut self) -> Result<(), GlCallError> {
        let [r, g, b] = self.clear_color;
        self.renderer.clear_color(r, g, b)?;

        self.program.bind();
        self.program.set_uniform_4f("u_Color", self.pulse.color())?;
        if let Some(texture) = &self.texture {
            texture.bind(0);
        }

        self.renderer.draw(&self.quad, &self.program)?;
        self.pulse.advance();

        Ok(())
    }
}

fn gl_version() -> String {
    unsafe {
        let version = gl::GetString(gl::VERSION);
        if version.is_null() {
            return "unknown".to_string();
        }

        CStr::from_ptr(version as *const c_char)
            .to_string_lossy()
            .into_owned()
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSize)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSize)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not create window: {0}")]
    Display(String),
    #[error("No window was created")]
    NoWindow,
    #[error("Window has zero size")]
    ZeroSize,
    #[error("GL context error: {0}")]
    Context(#[from] glutin::error::Error),
    #[error(transparent)]
    ShaderSource(#[from] ShaderSourceError),
    #[error(transparent)]
    Program(#[from] PBError),
    #[error(transparent)]
    Geometry(#[from] GBError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Gl(#[from] GlCallError),
}
