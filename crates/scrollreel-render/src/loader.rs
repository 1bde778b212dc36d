//! Image set loading.
//!
//! [`LoadTracker`] is the runtime-free bookkeeping: it consumes one
//! resolution per slot and emits [`LoadEvent`]s, firing `Complete` exactly
//! once when every slot has either loaded or failed. Failures count toward
//! completion and are never retried.
//!
//! [`ImageSetLoader`] (feature `runtime`) drives a tracker from tokio's
//! blocking pool. Decodes run concurrently; completions are observed, and
//! callbacks invoked, on the awaiting task only.

use scrollreel_core::FrameIndex;
use tracing::{debug, warn};

use crate::image_set::{DecodedImage, ImageSet};

/// Running completion count of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub completed: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// 0–100, for a loading indicator bar.
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Indicator text, e.g. `"42%"`.
    pub fn label(&self) -> String {
        format!("{}%", self.percent().round() as u32)
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    Loaded { index: FrameIndex },
    Failed { index: FrameIndex, reason: String },
    Progress(LoadProgress),
    Complete(LoadProgress),
}

/// Owns the image set while it is being filled.
#[derive(Debug)]
pub struct LoadTracker {
    set: ImageSet,
    completed: usize,
    complete_sent: bool,
}

impl LoadTracker {
    pub fn new(set: ImageSet) -> Self {
        let completed = set.resolved_count();
        Self {
            set,
            completed,
            complete_sent: false,
        }
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            completed: self.completed,
            total: self.set.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    pub fn image_set(&self) -> &ImageSet {
        &self.set
    }

    pub fn into_image_set(self) -> ImageSet {
        self.set
    }

    /// Emit `Complete` if every slot is already resolved (e.g. an empty set)
    /// and it has not been sent yet.
    pub fn start(&mut self, on_event: &mut dyn FnMut(&LoadEvent)) {
        self.maybe_complete(on_event);
    }

    /// Record one slot's outcome. Duplicate or out-of-range resolutions are
    /// ignored and return `false`.
    pub fn record(
        &mut self,
        index: FrameIndex,
        outcome: Result<DecodedImage, String>,
        on_event: &mut dyn FnMut(&LoadEvent),
    ) -> bool {
        let event = match &outcome {
            Ok(_) => LoadEvent::Loaded { index },
            Err(reason) => LoadEvent::Failed {
                index,
                reason: reason.clone(),
            },
        };

        if !self.set.resolve(index, outcome) {
            debug!("ignoring duplicate resolution for {}", index);
            return false;
        }

        if let LoadEvent::Failed { reason, .. } = &event {
            let source = self.set.get(index).map(|s| s.source()).unwrap_or("?");
            warn!("failed to load frame {}: {}", source, reason);
        }

        self.completed += 1;
        on_event(&event);
        on_event(&LoadEvent::Progress(self.progress()));
        self.maybe_complete(on_event);
        true
    }

    fn maybe_complete(&mut self, on_event: &mut dyn FnMut(&LoadEvent)) {
        if self.complete_sent || !self.is_complete() {
            return;
        }
        self.complete_sent = true;
        let progress = self.progress();
        debug!(
            "image set complete: {} loaded, {} failed",
            self.set.loaded_count(),
            self.set.failed_count()
        );
        on_event(&LoadEvent::Complete(progress));
    }
}

#[cfg(feature = "runtime")]
pub use runtime::ImageSetLoader;

#[cfg(feature = "runtime")]
mod runtime {
    use std::collections::HashMap;
    use std::fmt::Display;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use scrollreel_core::{FrameBuffer, FrameIndex, ScrollreelResult};
    use tokio::task::JoinSet;

    use super::{LoadEvent, LoadTracker};
    use crate::image_loader::load_image;
    use crate::image_set::{DecodedImage, ImageSet};

    /// Loads every source concurrently and resolves once all are accounted for.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ImageSetLoader;

    impl ImageSetLoader {
        pub fn new() -> Self {
            Self
        }

        /// Decode image files from disk.
        pub async fn load<F>(&self, sources: Vec<PathBuf>, on_event: F) -> ImageSet
        where
            F: FnMut(&LoadEvent),
        {
            let sources: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
            self.load_with(sources, |path: &String| load_image(Path::new(path)), on_event)
                .await
        }

        /// Load with a caller-supplied decoder, run on the blocking pool.
        pub async fn load_with<S, D, F>(&self, sources: Vec<S>, decode: D, mut on_event: F) -> ImageSet
        where
            S: Display + Send + 'static,
            D: Fn(&S) -> ScrollreelResult<FrameBuffer> + Send + Sync + 'static,
            F: FnMut(&LoadEvent),
        {
            let set = ImageSet::new(sources.iter().map(|s| s.to_string()));
            let mut tracker = LoadTracker::new(set);
            tracker.start(&mut on_event);
            if tracker.is_complete() {
                return tracker.into_image_set();
            }

            let decode = Arc::new(decode);
            let mut tasks = JoinSet::new();
            let mut pending = HashMap::new();

            for (i, source) in sources.into_iter().enumerate() {
                let index = FrameIndex::new(i);
                let decode = Arc::clone(&decode);
                let handle = tasks.spawn_blocking(move || {
                    (*decode)(&source)
                        .map(DecodedImage::new)
                        .map_err(|e| e.to_string())
                });
                pending.insert(handle.id(), index);
            }

            while let Some(joined) = tasks.join_next_with_id().await {
                let (id, outcome) = match joined {
                    Ok((id, outcome)) => (id, outcome),
                    Err(e) => (e.id(), Err(format!("decode task aborted: {}", e))),
                };
                if let Some(index) = pending.remove(&id) {
                    tracker.record(index, outcome, &mut on_event);
                }
            }

            tracker.into_image_set()
        }
    }
}
