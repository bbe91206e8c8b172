use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use gl::types::GLenum;

/// Source of pending GL error codes.
///
/// `next_error` pops one pending code, `None` means the queue is drained.
pub trait ErrorChannel {
    fn next_error(&mut self) -> Option<GLenum>;
}

/// Error queue of the GL context current on this thread.
#[derive(Debug, Default, Copy, Clone)]
pub struct GlErrorChannel;

impl ErrorChannel for GlErrorChannel {
    fn next_error(&mut self) -> Option<GLenum> {
        match unsafe { gl::GetError() } {
            gl::NO_ERROR => None,
            code => Some(code),
        }
    }
}

impl ErrorChannel for VecDeque<GLenum> {
    fn next_error(&mut self) -> Option<GLenum> {
        self.pop_front()
    }
}

impl<C: ErrorChannel + ?Sized> ErrorChannel for &mut C {
    fn next_error(&mut self) -> Option<GLenum> {
        (**self).next_error()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlCallError {
    pub code: GLenum,
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl Display for GlCallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[OpenGL Error] code {} ({:#x}, {}) from `{}` in {} on line {}",
            self.code,
            self.code,
            error_name(self.code),
            self.function,
            self.file,
            self.line
        )
    }
}

impl std::error::Error for GlCallError {}

/// Conventional name of a `glGetError` code.
pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown error",
    }
}

/// Drains every pending error so a following check only sees errors of the next call.
pub fn clear_errors<C: ErrorChannel + ?Sized>(channel: &mut C) -> usize {
    let mut drained = 0;
    while channel.next_error().is_some() {
        drained += 1;
    }
    drained
}

/// Reports the first pending error, if any, as coming from `function` at `file:line`.
pub fn check_call<C: ErrorChannel + ?Sized>(
    channel: &mut C,
    function: &'static str,
    file: &'static str,
    line: u32,
) -> Result<(), GlCallError> {
    match channel.next_error() {
        Some(code) => {
            let err = GlCallError {
                code,
                function,
                file,
                line,
            };
            log::error!("{err}");
            Err(err)
        }
        None => Ok(()),
    }
}

/// Runs `$call` once between a drain and a check of `$channel`.
///
/// Evaluates to `Result<T, GlCallError>` where `T` is the type of `$call`.
#[macro_export]
macro_rules! gl_call {
    ($channel:expr, $call:expr) => {{
        $crate::error::clear_errors(&mut $channel);
        let value = $call;
        $crate::error::check_call(&mut $channel, stringify!($call), file!(), line!())
            .map(|()| value)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_stale_errors_before_call() {
        let mut channel = VecDeque::from([gl::INVALID_ENUM, gl::INVALID_VALUE]);

        let res = gl_call!(channel, 42);

        assert_eq!(res, Ok(42));
        assert!(channel.is_empty());
    }

    #[test]
    fn reports_error_left_by_call() {
        let mut channel: VecDeque<GLenum> = VecDeque::new();

        let res = gl_call!(channel, channel.push_back(gl::INVALID_OPERATION));

        let err = res.unwrap_err();
        assert_eq!(err.code, gl::INVALID_OPERATION);
        assert_eq!(err.file, file!());
        assert!(err.function.contains("push_back"));
        assert!(channel.is_empty());
    }

    #[test]
    fn reports_only_first_error() {
        let mut channel: VecDeque<GLenum> = VecDeque::new();

        let res = gl_call!(channel, {
            channel.push_back(gl::OUT_OF_MEMORY);
            channel.push_back(gl::INVALID_VALUE);
        });

        assert_eq!(res.unwrap_err().code, gl::OUT_OF_MEMORY);
        assert_eq!(channel, VecDeque::from([gl::INVALID_VALUE]));
    }

    #[test]
    fn clear_counts_drained() {
        let mut channel: VecDeque<GLenum> = VecDeque::from([1, 2, 3]);
        assert_eq!(clear_errors(&mut channel), 3);
        assert_eq!(clear_errors(&mut channel), 0);
    }

    #[test]
    fn display_has_hex_and_location() {
        let err = GlCallError {
            code: 1282,
            function: "gl::DrawElements(...)",
            file: "src/renderer.rs",
            line: 7,
        };

        let msg = err.to_string();
        assert!(msg.contains("1282"));
        assert!(msg.contains("0x502"));
        assert!(msg.contains("GL_INVALID_OPERATION"));
        assert!(msg.contains("src/renderer.rs on line 7"));
    }

    #[test]
    fn unknown_code_name() {
        assert_eq!(error_name(0x1234), "unknown error");
        assert_eq!(error_name(gl::INVALID_ENUM), "GL_INVALID_ENUM");
    }
}
