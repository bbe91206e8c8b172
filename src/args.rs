use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(about = "Renders an animated quad with a shader read from one combined file")]
pub struct Args {
    /// Shader file with `#shader vertex` and `#shader fragment` sections
    #[arg(default_value = "res/shaders/basic.shader")]
    pub shader: PathBuf,
    /// PNG image sampled by the fragment shader
    #[arg(short, long)]
    pub texture: Option<PathBuf>,
    /// json5 file with window and animation settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Window width, overrides the config file
    #[arg(long)]
    pub width: Option<u32>,
    /// Window height, overrides the config file
    #[arg(long)]
    pub height: Option<u32>,
    #[arg(long, value_enum, default_value_t = LogLevelArg::Info)]
    pub log_level: LogLevelArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(l: LogLevelArg) -> Self {
        match l {
            LogLevelArg::Off => Self::Off,
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["glquad"]).unwrap();

        assert_eq!(args.shader, PathBuf::from("res/shaders/basic.shader"));
        assert!(args.texture.is_none());
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "glquad",
            "quad.shader",
            "-t",
            "logo.png",
            "--width",
            "800",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.shader, PathBuf::from("quad.shader"));
        assert_eq!(args.texture, Some(PathBuf::from("logo.png")));
        assert_eq!(args.width, Some(800));
        assert_eq!(args.height, None);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }
}
