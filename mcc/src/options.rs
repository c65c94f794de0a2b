use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use thiserror::Error;

/// Compiler settings, loadable from a YAML file.
///
/// ```yaml
/// comments: false
/// read_buffer: 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Annotate the output with `#` comment lines
    pub comments: bool,
    /// Bytes reserved for each string `read` buffer
    pub read_buffer: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            comments: true,
            read_buffer: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot open config `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config `{path}`: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

impl Options {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn load(path: &str) -> Result<Self, OptionsError> {
        let file = File::open(path).map_err(|source| OptionsError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| OptionsError::Yaml {
            path: path.to_string(),
            source,
        })
    }
}
