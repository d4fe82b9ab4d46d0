use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use cross_xdg::BaseDirs;

use crate::tape::DEFAULT_MEMORY_SIZE;

pub const DEFAULT_SNAPSHOT_SPAN: usize = 2;
pub const DEFAULT_IMAGE_WIDTH: usize = 16;

/// Errors from building a [`RunConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("memory size must be at least 1 cell")]
    ZeroMemory,

    #[error("image width must be at least 1 cell")]
    ZeroImageWidth,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How `.` renders the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Image,
}

impl FromStr for OutputMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputMode::Text),
            "image" => Ok(OutputMode::Image),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Text => write!(f, "text"),
            OutputMode::Image => write!(f, "image"),
        }
    }
}

/// Settings fixed for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub memory_size: usize,
    /// Cells shown before the pointer by `@`.
    pub snapshot_start: usize,
    /// Cells shown after the pointer by `@`.
    pub snapshot_end: usize,
    /// Cells per row in image mode.
    pub image_width: usize,
    pub output_mode: OutputMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            snapshot_start: DEFAULT_SNAPSHOT_SPAN,
            snapshot_end: DEFAULT_SNAPSHOT_SPAN,
            image_width: DEFAULT_IMAGE_WIDTH,
            output_mode: OutputMode::Text,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_size == 0 {
            return Err(ConfigError::ZeroMemory);
        }
        if self.image_width == 0 {
            return Err(ConfigError::ZeroImageWidth);
        }
        Ok(())
    }
}

/// A partial configuration from one source (flags, environment or file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub memory_size: Option<usize>,
    pub snapshot_start: Option<usize>,
    pub snapshot_end: Option<usize>,
    pub image_width: Option<usize>,
    pub output_mode: Option<OutputMode>,
}

impl ConfigLayer {
    /// Fill unset fields from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            memory_size: self.memory_size.or(lower.memory_size),
            snapshot_start: self.snapshot_start.or(lower.snapshot_start),
            snapshot_end: self.snapshot_end.or(lower.snapshot_end),
            image_width: self.image_width.or(lower.image_width),
            output_mode: self.output_mode.or(lower.output_mode),
        }
    }

    /// Apply this layer over the built-in defaults and validate the result.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let d = RunConfig::default();
        let cfg = RunConfig {
            memory_size: self.memory_size.unwrap_or(d.memory_size),
            snapshot_start: self.snapshot_start.unwrap_or(d.snapshot_start),
            snapshot_end: self.snapshot_end.unwrap_or(d.snapshot_end),
            image_width: self.image_width.unwrap_or(d.image_width),
            output_mode: self.output_mode.unwrap_or(d.output_mode),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `BF_MEMORY`, `BF_SNAPX`, `BF_SNAPY`, `BF_IMAGE_WIDTH` and
    /// `BF_OUTPUT_MODE` through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<ConfigLayer, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ConfigLayer {
            memory_size: parse_opt("BF_MEMORY", lookup("BF_MEMORY"))?,
            snapshot_start: parse_opt("BF_SNAPX", lookup("BF_SNAPX"))?,
            snapshot_end: parse_opt("BF_SNAPY", lookup("BF_SNAPY"))?,
            image_width: parse_opt("BF_IMAGE_WIDTH", lookup("BF_IMAGE_WIDTH"))?,
            output_mode: parse_opt("BF_OUTPUT_MODE", lookup("BF_OUTPUT_MODE"))?,
        })
    }

    pub fn from_env() -> Result<ConfigLayer, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Parse the `[defaults]` section of a `bf.toml` file.
    pub fn from_toml_str(content: &str) -> Result<ConfigLayer, ConfigError> {
        // Very small hand-rolled parser: look for [defaults] section and key = value pairs
        let mut in_defaults = false;
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue; }
            if line.starts_with('[') && line.ends_with(']') {
                in_defaults = &line[1..line.len()-1] == "defaults";
                continue;
            }
            if !in_defaults { continue; }
            if let Some(eq) = line.find('=') {
                let key = line[..eq].trim().to_string();
                let val_raw = line[eq+1..].trim();
                // Accept quoted or unquoted
                let quoted = val_raw.len() >= 2 && val_raw.starts_with('"') && val_raw.ends_with('"');
                let val = if quoted {
                    val_raw[1..val_raw.len()-1].to_string()
                } else { val_raw.to_string() };
                map.insert(key, val);
            }
        }

        let mut layer = ConfigLayer::default();

        macro_rules! set {
            ($field:ident, $key:literal) => {
                layer.$field = parse_opt($key, map.get($key).cloned())?;
            };
        }

        set!(memory_size, "memory");
        set!(snapshot_start, "snapx");
        set!(snapshot_end, "snapy");
        set!(image_width, "width");
        set!(output_mode, "mode");

        Ok(layer)
    }

    /// Load `bf.toml` from the XDG config home. A missing file is an empty layer.
    pub fn from_config_file() -> Result<ConfigLayer, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(ConfigLayer::default());
        };
        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigLayer::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }
}

/// `~/.config/bf.toml` on every platform.
pub fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Resolve the run configuration: `flags` → environment → config file → defaults.
pub fn resolve(flags: ConfigLayer) -> Result<RunConfig, ConfigError> {
    flags
        .or(ConfigLayer::from_env()?)
        .or(ConfigLayer::from_config_file()?)
        .build()
}

fn parse_opt<T: FromStr>(key: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
