//! Pre-deployment checks for a static scroll-sequence site.
//!
//! Verifies the required page files, the frames directory and its naming,
//! per-file size ceilings and the CI workflow. Size overruns and bad frame
//! names are warnings; anything missing makes the site not ready.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scrollreel_core::{DeployConfig, SequenceConfig};
use serde::Serialize;

/// Offending frame names listed in the report; the rest are only counted.
pub const MAX_LISTED_NAMES: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequiredFile {
    pub name: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FramesCheck {
    pub directory: PathBuf,
    pub present: bool,
    /// `.jpg` / `.png` files, sorted by name.
    pub images: Vec<String>,
    pub invalid_names: Vec<String>,
}

impl FramesCheck {
    pub fn is_ok(&self) -> bool {
        self.present && !self.images.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.images.last().map(String::as_str)
    }

    pub fn listed_invalid_names(&self) -> &[String] {
        let n = self.invalid_names.len().min(MAX_LISTED_NAMES);
        &self.invalid_names[..n]
    }

    pub fn unlisted_invalid_count(&self) -> usize {
        self.invalid_names.len().saturating_sub(MAX_LISTED_NAMES)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileSize {
    pub name: String,
    pub size_mb: f64,
    pub over_limit: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckReport {
    pub root: PathBuf,
    pub required: Vec<RequiredFile>,
    pub frames: FramesCheck,
    pub sizes: Vec<FileSize>,
    pub max_file_size_mb: f64,
    pub workflow: PathBuf,
    pub workflow_present: bool,
}

impl CheckReport {
    /// Ready to deploy: every required file, the frames and the workflow exist.
    pub fn is_ready(&self) -> bool {
        self.required.iter().all(|f| f.present) && self.frames.is_ok() && self.workflow_present
    }

    pub fn warning_count(&self) -> usize {
        self.sizes.iter().filter(|s| s.over_limit).count()
            + usize::from(!self.frames.invalid_names.is_empty())
    }
}

/// `<prefix>` + exactly `digits` digits + `.jpg` or `.png`. With the
/// default sequence that is `frame_0001.jpg`.
pub fn is_frame_file_name(name: &str, sequence: &SequenceConfig) -> bool {
    let Some(rest) = name.strip_prefix(sequence.prefix.as_str()) else {
        return false;
    };
    let Some((digits, ext)) = rest.split_once('.') else {
        return false;
    };
    digits.len() == sequence.digits
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (ext == "jpg" || ext == "png")
}

fn is_image_name(name: &str) -> bool {
    name.ends_with(".jpg") || name.ends_with(".png")
}

fn check_frames(directory: PathBuf, sequence: &SequenceConfig) -> Result<FramesCheck> {
    if !directory.is_dir() {
        return Ok(FramesCheck {
            directory,
            present: false,
            images: Vec::new(),
            invalid_names: Vec::new(),
        });
    }

    let entries = std::fs::read_dir(&directory)
        .with_context(|| format!("failed to read frames directory: {}", directory.display()))?;
    let mut images = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if is_image_name(&name) {
            images.push(name);
        }
    }
    images.sort();

    let invalid_names = images
        .iter()
        .filter(|name| !is_frame_file_name(name, sequence))
        .cloned()
        .collect();

    Ok(FramesCheck {
        directory,
        present: true,
        images,
        invalid_names,
    })
}

/// Inspect `root` (the site directory). `sequence.directory` is relative to it.
pub fn run_check(
    root: &Path,
    sequence: &SequenceConfig,
    deploy: &DeployConfig,
) -> Result<CheckReport> {
    let required = deploy
        .required_files
        .iter()
        .map(|name| RequiredFile {
            name: name.clone(),
            present: root.join(name).is_file(),
        })
        .collect::<Vec<_>>();

    let frames = check_frames(root.join(&sequence.directory), sequence)?;

    let mut sizes = Vec::new();
    for file in required.iter().filter(|f| f.present) {
        let path = root.join(&file.name);
        let bytes = std::fs::metadata(&path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len();
        let size_mb = bytes as f64 / (1024.0 * 1024.0);
        sizes.push(FileSize {
            name: file.name.clone(),
            size_mb,
            over_limit: size_mb > deploy.max_file_size_mb,
        });
    }

    let workflow_present = root.join(&deploy.workflow).is_file();

    Ok(CheckReport {
        root: root.to_path_buf(),
        required,
        frames,
        sizes,
        max_file_size_mb: deploy.max_file_size_mb,
        workflow: deploy.workflow.clone(),
        workflow_present,
    })
}
