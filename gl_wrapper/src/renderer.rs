use std::ptr;

use gl::types::{GLsizei, GLuint};

use crate::error::{ErrorChannel, GlCallError, GlErrorChannel};
use crate::geometry::Geometry;
use crate::gl_call;
use crate::program::Program;

pub struct GlRenderer<C: ErrorChannel = GlErrorChannel> {
    current_program: GLuint,
    errors: C,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self::with_channel(GlErrorChannel)
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ErrorChannel> GlRenderer<C> {
    pub fn with_channel(errors: C) -> Self {
        Self {
            current_program: 0,
            errors,
        }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) -> Result<(), GlCallError> {
        let p_id = program.get_id();
        if self.current_program != p_id {
            gl_call!(self.errors, unsafe { gl::UseProgram(p_id) })?;
            self.current_program = p_id;
        }

        geometry.bind();

        if geometry.is_indexed() {
            let count = geometry.indices() as GLsizei;
            gl_call!(self.errors, unsafe {
                gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_INT, ptr::null())
            })
        } else {
            let count = geometry.vertices() as GLsizei;
            gl_call!(self.errors, unsafe { gl::DrawArrays(gl::TRIANGLES, 0, count) })
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), GlCallError> {
        gl_call!(self.errors, unsafe {
            gl::Viewport(0, 0, width as i32, height as i32)
        })
    }

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32) -> Result<(), GlCallError> {
        gl_call!(self.errors, unsafe {
            gl::ClearColor(r, g, b, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        })
    }

    pub fn enable_blending(&mut self) -> Result<(), GlCallError> {
        gl_call!(self.errors, unsafe {
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        })
    }
}
