//! Segmentation configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::chunker::{DelegateSplitter, MarkdownHeaderSplitter, ParagraphSplitter};
use crate::error::SegmentError;
use crate::segment::MergeConfig;

/// Top-level configuration: merge policy, delegate splitter and logging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Image merge policy (`merge_threshold`, `strategy`)
    #[serde(flatten)]
    pub merge: MergeConfig,
    /// Delegate splitter selection and settings
    #[serde(default)]
    pub splitter: SplitterConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<(), SegmentError> {
        let mut errors: Vec<String> = Vec::new();

        match &self.splitter {
            SplitterConfig::Header(header) => header.collect_errors(&mut errors),
            SplitterConfig::Paragraph(paragraph) => paragraph.collect_errors(&mut errors),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SegmentError::InvalidConfig(errors.join("; ")))
        }
    }
}

/// Which delegate splitter to wrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SplitterConfig {
    /// Split on markdown headers
    Header(HeaderSplitterConfig),
    /// Pack paragraphs up to a size limit
    Paragraph(ParagraphSplitterConfig),
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::Header(HeaderSplitterConfig::default())
    }
}

impl SplitterConfig {
    /// Instantiate the configured delegate
    pub fn build(&self) -> Box<dyn DelegateSplitter> {
        match self {
            Self::Header(config) => Box::new(MarkdownHeaderSplitter::from_config(config)),
            Self::Paragraph(config) => Box::new(ParagraphSplitter::from_config(config)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Header(_) => "header",
            Self::Paragraph(_) => "paragraph",
        }
    }
}

/// Markdown header splitter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSplitterConfig {
    /// `(marker, metadata name)` pairs, e.g. `("##", "Header 2")`
    pub headers: Vec<(String, String)>,
    /// Remove header lines from chunk content
    pub strip_headers: bool,
}

impl Default for HeaderSplitterConfig {
    fn default() -> Self {
        Self {
            headers: vec![
                ("#".to_string(), "Header 1".to_string()),
                ("##".to_string(), "Header 2".to_string()),
                ("###".to_string(), "Header 3".to_string()),
            ],
            strip_headers: true,
        }
    }
}

impl HeaderSplitterConfig {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.headers.is_empty() {
            errors.push("splitter.headers must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for (marker, name) in &self.headers {
            let marker = marker.trim();
            let is_atx = !marker.is_empty() && marker.len() <= 6 && marker.chars().all(|c| c == '#');
            if !is_atx {
                errors.push(format!(
                    "splitter.headers marker {:?} must be 1 to 6 '#' characters",
                    marker
                ));
            } else if !seen.insert(marker.len()) {
                errors.push(format!("splitter.headers marker {:?} is listed twice", marker));
            }
            if name.trim().is_empty() {
                errors.push(format!("splitter.headers name for {:?} must not be empty", marker));
            }
        }
    }
}

/// Paragraph splitter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphSplitterConfig {
    /// Target chunk size in characters
    pub max_chars: usize,
    /// Characters of trailing context repeated in the next chunk
    pub overlap: usize,
}

impl Default for ParagraphSplitterConfig {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            overlap: 200,
        }
    }
}

impl ParagraphSplitterConfig {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        if self.max_chars == 0 {
            errors.push("splitter.max_chars must be positive".to_string());
        }
        if self.overlap >= self.max_chars {
            errors.push(format!(
                "splitter.overlap ({}) must be smaller than splitter.max_chars ({})",
                self.overlap, self.max_chars
            ));
        }
    }
}

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Raise verbosity by `steps` levels, saturating at trace
    pub fn raised(self, steps: u8) -> Self {
        let mut level = self;
        for _ in 0..steps {
            level = match level {
                Self::Error => Self::Warn,
                Self::Warn => Self::Info,
                Self::Info => Self::Debug,
                Self::Debug | Self::Trace => Self::Trace,
            };
        }
        level
    }

    pub fn to_tracing(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::MergeStrategy;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.merge.merge_threshold, 100);
        assert_eq!(config.merge.strategy, MergeStrategy::Contextual);
        assert_eq!(config.splitter.kind(), "header");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            r#"
merge_threshold = 40
strategy = "separate"

[splitter]
kind = "paragraph"
max_chars = 500
overlap = 50

[logging]
level = "debug"
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.merge.merge_threshold, 40);
        assert_eq!(config.merge.strategy, MergeStrategy::Separate);
        assert_eq!(
            config.splitter,
            SplitterConfig::Paragraph(ParagraphSplitterConfig {
                max_chars: 500,
                overlap: 50
            })
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let file = write_config("strategy = \"inline\"\n");
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.merge.strategy, MergeStrategy::Inline);
        assert_eq!(config.merge.merge_threshold, 100);
        assert_eq!(config.splitter, SplitterConfig::default());
    }

    #[test]
    fn test_load_header_levels() {
        let file = write_config(
            r###"
[splitter]
kind = "header"
headers = [["#", "Title"], ["##", "Section"]]
strip_headers = false
"###,
        );
        let config = Config::load(file.path()).unwrap();

        let SplitterConfig::Header(header) = &config.splitter else {
            panic!("expected header splitter");
        };
        assert_eq!(header.headers.len(), 2);
        assert_eq!(header.headers[1], ("##".to_string(), "Section".to_string()));
        assert!(!header.strip_headers);
    }

    #[test]
    fn test_load_rejects_unknown_strategy() {
        let file = write_config("strategy = \"smart\"\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("smart"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/imgsplit.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = Config {
            splitter: SplitterConfig::Header(HeaderSplitterConfig {
                headers: vec![
                    ("#".to_string(), "".to_string()),
                    ("#######".to_string(), "Deep".to_string()),
                    ("#".to_string(), "Again".to_string()),
                ],
                strip_headers: true,
            }),
            ..Config::default()
        };

        let Err(SegmentError::InvalidConfig(message)) = config.validate() else {
            panic!("expected invalid config");
        };
        assert!(message.contains("must not be empty"));
        assert!(message.contains("1 to 6"));
        assert!(message.contains("listed twice"));
    }

    #[test]
    fn test_validate_paragraph_overlap() {
        let config = Config {
            splitter: SplitterConfig::Paragraph(ParagraphSplitterConfig {
                max_chars: 100,
                overlap: 100,
            }),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(SegmentError::InvalidConfig(_))));
    }

    #[test]
    fn test_log_level_raised() {
        assert_eq!(LogLevel::Info.raised(0), LogLevel::Info);
        assert_eq!(LogLevel::Info.raised(1), LogLevel::Debug);
        assert_eq!(LogLevel::Warn.raised(5), LogLevel::Trace);
        assert_eq!(LogLevel::Error.to_tracing(), tracing::Level::ERROR);
    }
}
