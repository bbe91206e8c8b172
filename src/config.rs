use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::args::Args;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Initial `u_Color`, the red channel is animated
    pub color: [f32; 4],
    pub color_step: f32,
    pub clear_color: [f32; 3],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "OpenGL Window".to_string(),
            width: 640,
            height: 480,
            vsync: true,
            color: [0.2, 0.3, 0.8, 1.0],
            color_step: 0.05,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

impl DemoConfig {
    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let config: Self = json5::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_owned(), e))?;

        Self::parse(&src)
    }

    /// Config file named by `args` (or defaults) with the command line overrides applied.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };

        if let Some(width) = args.width {
            config.width = width;
        }
        if let Some(height) = args.height {
            config.height = height;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must not be zero",
                self.width, self.height
            )));
        }

        if !(self.color_step > 0.0 && self.color_step <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "color_step {} must be in (0, 1]",
                self.color_step
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Invalid config format: {0}")]
    Format(#[from] json5::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DemoConfig::parse("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn partial_file() {
        let config = DemoConfig::parse(
            r#"{
                // comments and trailing commas are fine
                title: "quad",
                color_step: 0.1,
            }"#,
        )
        .unwrap();

        assert_eq!(config.title, "quad");
        assert_eq!(config.color_step, 0.1);
        assert_eq!(config.width, 640);
    }

    #[test]
    fn unknown_field() {
        let res = DemoConfig::parse("{ colour: [1, 0, 0, 1] }");

        assert!(matches!(res, Err(ConfigError::Format(_))));
    }

    #[test]
    fn zero_step_is_invalid() {
        let res = DemoConfig::parse("{ color_step: 0 }");

        assert!(matches!(res, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn args_override_defaults() {
        let args = Args::try_parse_from(["glquad", "--width", "1024"]).unwrap();

        let config = DemoConfig::from_args(&args).unwrap();

        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 480);
    }

    #[test]
    fn zero_height_from_args() {
        let args = Args::try_parse_from(["glquad", "--height", "0"]).unwrap();

        assert!(matches!(
            DemoConfig::from_args(&args),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_config_file() {
        let args = Args::try_parse_from(["glquad", "-c", "missing.json5"]).unwrap();

        assert!(matches!(
            DemoConfig::from_args(&args),
            Err(ConfigError::Io(..))
        ));
    }

    #[test]
    fn bundled_config_parses() {
        let config = DemoConfig::parse(include_str!("../res/config.json5")).unwrap();

        assert_eq!(config, DemoConfig::default());
    }
}
