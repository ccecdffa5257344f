//! Data models for the MediaHome API

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A media title as listed by the server (a movie, or one episode of a show).
///
/// Two medias are the same title when their `(title_id, season, episode)`
/// tuples match; the remaining fields are display data and take no part in
/// equality. `season` and `episode` are -1 for medias that have none
/// (movies).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub title_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default = "no_index")]
    pub season: i32,
    #[serde(default = "no_index")]
    pub episode: i32,
    #[serde(default = "no_index")]
    pub air_year: i32,
    #[serde(default)]
    pub genre: Vec<String>,
}

fn no_index() -> i32 {
    -1
}

impl Media {
    /// The identity tuple this media is keyed by.
    pub fn identity(&self) -> (&str, i32, i32) {
        (&self.title_id, self.season, self.episode)
    }

    /// True when this media is an episode of a show rather than a movie.
    pub fn is_episode(&self) -> bool {
        self.season >= 0 && self.episode >= 0
    }

    /// Human-readable form: the bare title for movies, "Title 2x05" for
    /// episodes.
    pub fn display_title(&self) -> String {
        if self.season < 0 && self.episode < 0 {
            self.title.clone()
        } else {
            format!("{} {}x{:02}", self.title, self.season, self.episode)
        }
    }
}

impl PartialEq for Media {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Media {}

impl Hash for Media {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// Download state of a media on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStatusKind {
    Downloaded,
    Downloading,
    Missing,
    Error,
}

impl MediaStatusKind {
    /// Map the wire integer to a status kind. Values outside the known range
    /// come back as `Error`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => MediaStatusKind::Downloaded,
            1 => MediaStatusKind::Downloading,
            2 => MediaStatusKind::Missing,
            _ => MediaStatusKind::Error,
        }
    }
}

/// Status report for a media, as returned by the getmediastatus operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaStatus {
    pub status: MediaStatusKind,
    pub message: String,
    /// Download progress in percent, always within 0..=100.
    pub progress: i32,
}

impl Default for MediaStatus {
    fn default() -> Self {
        Self {
            status: MediaStatusKind::Error,
            message: String::new(),
            progress: 0,
        }
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
