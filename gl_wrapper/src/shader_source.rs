use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

const DIRECTIVE: &str = "#shader";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    Vertex,
    Fragment,
}

impl Section {
    fn from_directive(rest: &str) -> Option<Self> {
        if rest.contains("vertex") {
            Some(Section::Vertex)
        } else if rest.contains("fragment") {
            Some(Section::Fragment)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Vertex => write!(f, "vertex"),
            Section::Fragment => write!(f, "fragment"),
        }
    }
}

/// Vertex and fragment stages read from one combined shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    vertex_source: String,
    fragment_source: String,
}

impl ShaderProgramSource {
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        Self {
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ShaderSourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ShaderSourceError::Io {
            path: path.to_owned(),
            source,
        })?;

        log::info!("Loading shader source from {path:?}");

        Self::parse(BufReader::new(file)).map_err(|e| match e {
            ShaderSourceError::Read(source) => ShaderSourceError::Io {
                path: path.to_owned(),
                source,
            },
            e => e,
        })
    }

    /// Splits `reader`, logging every dropped line.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ShaderSourceError> {
        let outcome = split_source(reader)?;

        for warning in &outcome.warnings {
            log::warn!("{warning}");
        }

        Ok(outcome.source)
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Vertex => &self.vertex_source,
            Section::Fragment => &self.fragment_source,
        }
    }
}

/// A non-blank line found before any section was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line_number: usize,
    pub line: String,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "undefined shader type on line {}, dropping {:?}",
            self.line_number, self.line
        )
    }
}

#[derive(Debug, Default)]
pub struct SplitOutcome {
    pub source: ShaderProgramSource,
    pub warnings: Vec<ParseWarning>,
}

/// Splits a combined shader source at its `#shader vertex` / `#shader fragment` lines.
///
/// A directive line naming neither stage keeps the current section. Lines read
/// before the first section are dropped; the non-blank ones are returned as
/// warnings.
pub fn split_source<R: BufRead>(reader: R) -> Result<SplitOutcome, ShaderSourceError> {
    let mut current: Option<Section> = None;
    let mut vertex = String::new();
    let mut fragment = String::new();
    let mut warnings = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(ShaderSourceError::Read)?;

        if let Some(pos) = line.find(DIRECTIVE) {
            let rest = &line[pos + DIRECTIVE.len()..];
            if let Some(section) = Section::from_directive(rest) {
                current = Some(section);
            }
            continue;
        }

        let target = match current {
            Some(Section::Vertex) => &mut vertex,
            Some(Section::Fragment) => &mut fragment,
            None => {
                if !line.trim().is_empty() {
                    warnings.push(ParseWarning {
                        line_number: i + 1,
                        line,
                    });
                }
                continue;
            }
        };

        target.push_str(&line);
        target.push('\n');
    }

    Ok(SplitOutcome {
        source: ShaderProgramSource::new(vertex, fragment),
        warnings,
    })
}

#[derive(Debug, Error)]
pub enum ShaderSourceError {
    #[error("Cannot read shader source {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot read shader source: {0}")]
    Read(std::io::Error),
}
