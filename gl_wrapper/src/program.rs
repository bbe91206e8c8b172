use std::collections::HashMap;
use std::ffi::{c_char, CString, NulError};

use cgmath::Vector4;
use gl::types::{GLenum, GLint, GLuint};
use thiserror::Error;

use crate::error::{GlCallError, GlErrorChannel};
use crate::gl_call;
use crate::shader_source::{Section, ShaderProgramSource};

pub struct ProgramBuilder {
    vert: CString,
    frag: CString,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Result<Self, PBError> {
        Ok(Self {
            vert: CString::new(vert_src).map_err(|e| PBError::Nul(Section::Vertex, e))?,
            frag: CString::new(frag_src).map_err(|e| PBError::Nul(Section::Fragment, e))?,
        })
    }

    pub fn from_source(source: &ShaderProgramSource) -> Result<Self, PBError> {
        Self::new(source.vertex_source(), source.fragment_source())
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert = compile_shader(gl::VERTEX_SHADER, &self.vert)
            .map_err(|log| PBError::Compilation(Section::Vertex, log))?;

        let frag = match compile_shader(gl::FRAGMENT_SHADER, &self.frag) {
            Ok(frag) => frag,
            Err(log) => {
                unsafe { gl::DeleteShader(vert) };
                return Err(PBError::Compilation(Section::Fragment, log));
            }
        };

        let mut success: GLint = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);
            gl::ValidateProgram(program);

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success != gl::TRUE as GLint {
                let log = program_info_log(program);
                gl::DeleteProgram(program);
                return Err(PBError::Linking(log));
            }

            Ok(Program {
                id: program,
                uniforms: HashMap::new(),
                errors: GlErrorChannel,
            })
        }
    }
}

fn compile_shader(kind: GLenum, src: &CString) -> Result<GLuint, String> {
    let mut success: GLint = 0;

    unsafe {
        let shader = gl::CreateShader(kind);
        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );
        gl::CompileShader(shader);

        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        if success != gl::TRUE as GLint {
            let mut len: GLint = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);

            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader,
                buf.len() as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            return Err(info_log_to_string(&buf));
        }

        Ok(shader)
    }
}

unsafe fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);

    let mut buf = vec![0_u8; len.max(1) as usize];
    gl::GetProgramInfoLog(
        program,
        buf.len() as i32,
        std::ptr::null_mut(),
        buf.as_mut_ptr() as *mut c_char,
    );

    info_log_to_string(&buf)
}

/// Info logs come back NUL terminated, everything after the first NUL is garbage.
fn info_log_to_string(buf: &[u8]) -> String {
    let data = buf.split(|b| *b == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("Failed to compile {0} shader: {1}")]
    Compilation(Section, String),
    #[error("Failed to link program: {0}")]
    Linking(String),
    #[error("{0} shader source contains a NUL byte: {1}")]
    Nul(Section, NulError),
}

pub struct Program {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
    errors: GlErrorChannel,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        unsafe { gl::UseProgram(self.id) }
    }

    pub fn unbind(&self) {
        unsafe { gl::UseProgram(0) }
    }

    /// Expects the program to be bound.
    pub fn set_uniform_4f(&mut self, name: &str, value: Vector4<f32>) -> Result<(), GlCallError> {
        let location = self.uniform_location(name);
        gl_call!(self.errors, unsafe {
            gl::Uniform4f(location, value.x, value.y, value.z, value.w)
        })
    }

    /// Expects the program to be bound.
    pub fn set_uniform_1i(&mut self, name: &str, value: i32) -> Result<(), GlCallError> {
        let location = self.uniform_location(name);
        gl_call!(self.errors, unsafe { gl::Uniform1i(location, value) })
    }

    fn uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        // -1 is cached as well, GL silently ignores uploads to it
        let location = match CString::new(name) {
            Ok(c_name) => unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("Uniform '{name}' does not exist in program {}", self.id);
        }

        self.uniforms.insert(name.to_owned(), location);
        location
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let buf = b"0(3) : error C0000: syntax error\n\0\x7f\x7f";

        assert_eq!(info_log_to_string(buf), "0(3) : error C0000: syntax error");
    }

    #[test]
    fn info_log_without_nul() {
        assert_eq!(info_log_to_string(b"link failed"), "link failed");
    }

    #[test]
    fn nul_in_source_is_rejected() {
        let res = ProgramBuilder::new("void main() {}", "void\0main() {}");

        assert!(matches!(res, Err(PBError::Nul(Section::Fragment, _))));
    }

    #[test]
    fn error_names_stage() {
        let err = PBError::Compilation(Section::Vertex, "bad".into());

        assert_eq!(err.to_string(), "Failed to compile vertex shader: bad");
    }
}
