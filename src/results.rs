// src/results.rs
use chrono::{DateTime, Utc};
use std::fmt;
use crate::models::VisualizationResult;

/// Changes on every successful run so media at the same position in two
/// different runs never share an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FreshnessToken(u64);

impl FreshnessToken {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        FreshnessToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for FreshnessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one rendered media element: run token plus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub token: FreshnessToken,
    pub index: usize,
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.token, self.index)
    }
}

/// A media element the presentation layer should show for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSlot {
    pub key: MediaKey,
    /// Service path the video is fetched from, `/video/{index}`.
    pub path: String,
}

/// User-visible notice that a result's video could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLoadFailure {
    pub key: MediaKey,
    pub reason: String,
}

impl MediaLoadFailure {
    pub fn display_message(&self) -> String {
        format!("Failed to load video {} ({})", self.key.index, self.reason)
    }
}

/// Ordered results of the most recent successful run.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    results: Vec<VisualizationResult>,
    token: FreshnessToken,
    rendered_at: Option<DateTime<Utc>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new run's results and moves the freshness token on, even if
    /// the results are identical to the previous run.
    pub fn replace(&mut self, results: Vec<VisualizationResult>) {
        self.results = results;
        self.token = self.token.next();
        self.rendered_at = Some(Utc::now());
    }

    pub fn results(&self) -> &[VisualizationResult] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<&VisualizationResult> {
        self.results.get(index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn token(&self) -> FreshnessToken {
        self.token
    }

    pub fn rendered_at(&self) -> Option<DateTime<Utc>> {
        self.rendered_at
    }

    /// Media identity for the result at `index`, if that result has a video.
    pub fn media_key(&self, index: usize) -> Option<MediaKey> {
        self.results
            .get(index)
            .filter(|r| r.has_video())
            .map(|_| MediaKey { token: self.token, index })
    }

    pub fn media_slots(&self) -> Vec<MediaSlot> {
        (0..self.results.len())
            .filter_map(|index| self.media_key(index))
            .map(|key| MediaSlot {
                key,
                path: format!("/video/{}", key.index),
            })
            .collect()
    }
}
