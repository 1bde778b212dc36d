use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ScrollreelError, ScrollreelResult};
use crate::frame::FrameIndex;
use crate::math::SurfaceSize;
use crate::time::Duration;

/// Where the stills live and how they are named.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    pub directory: PathBuf,
    pub prefix: String,
    /// Zero-padding width of the sequence number.
    pub digits: usize,
    pub extension: String,
    /// Must match the number of files on disk; extra indices render as "not ready".
    pub frame_count: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("frames"),
            prefix: "frame_".to_string(),
            digits: 4,
            extension: "jpg".to_string(),
            frame_count: 251,
        }
    }
}

impl SequenceConfig {
    /// File name for a frame, e.g. `frame_0001.jpg` for index 0.
    pub fn file_name(&self, index: FrameIndex) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index.sequence_number(),
            self.extension,
            width = self.digits
        )
    }

    /// Full path of a frame under `directory`.
    pub fn source_path(&self, index: FrameIndex) -> PathBuf {
        self.directory.join(self.file_name(index))
    }

    /// Ordered list of every frame source, index 0 first.
    pub fn sources(&self) -> Vec<PathBuf> {
        (0..self.frame_count)
            .map(|i| self.source_path(FrameIndex::new(i)))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause between an enter/enter-back event and the recovery render.
    pub settle_delay_ms: f64,
    /// Progress after which hero content starts fading out.
    pub fade_start: f64,
    /// Upward travel of hero content at the end of the fade, in CSS pixels.
    pub fade_offset_px: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50.0,
            fade_start: 0.8,
            fade_offset_px: 50.0,
        }
    }
}

impl PlaybackConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl SurfaceConfig {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// Pre-deployment check settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    pub required_files: Vec<String>,
    pub max_file_size_mb: f64,
    pub workflow: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            required_files: ["index.html", "script.js", "styles.css", "README.md"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size_mb: 5.0,
            workflow: PathBuf::from(".github/workflows/deploy.yml"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ScrollreelConfig {
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
}

impl ScrollreelConfig {
    pub const FILE_NAME: &'static str = "scrollreel.toml";

    pub fn from_toml_str(contents: &str) -> ScrollreelResult<Self> {
        let config: ScrollreelConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> ScrollreelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file(&self, path: &Path) -> ScrollreelResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the engine cannot honour. A zero frame count is allowed:
    /// the player treats it as a no-op sequence.
    pub fn validate(&self) -> ScrollreelResult<()> {
        let seq = &self.sequence;
        if !(1..=9).contains(&seq.digits) {
            return Err(ScrollreelError::config(format!(
                "sequence.digits must be between 1 and 9, got {}",
                seq.digits
            )));
        }
        if seq.extension != "jpg" && seq.extension != "png" {
            return Err(ScrollreelError::config(format!(
                "sequence.extension must be \"jpg\" or \"png\", got {:?}",
                seq.extension
            )));
        }
        let fade = self.playback.fade_start;
        if !(0.0..1.0).contains(&fade) {
            return Err(ScrollreelError::config(format!(
                "playback.fade_start must be in [0, 1), got {}",
                fade
            )));
        }
        if !self.playback.settle_delay_ms.is_finite() || self.playback.settle_delay_ms < 0.0 {
            return Err(ScrollreelError::config(
                "playback.settle_delay_ms must be a non-negative number",
            ));
        }
        Ok(())
    }
}
