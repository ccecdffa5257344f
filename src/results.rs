//! Typed results delivered back to the presentation layer
//!
//! One result type per operation family, each carrying an error flag next to
//! its payload. When the flag is set the payload fields hold their
//! empty/default values; callers check the flag before reading anything
//! else. Results also carry the request parameters the presentation layer
//! needs to detect staleness (a result for a category that is no longer the
//! selected one is its to discard).

use crate::models::{Media, MediaStatus};

/// The list of profile names on the server.
#[derive(Debug, Clone, Default)]
pub struct ProfilesResult {
    pub error: bool,
    pub profiles: Vec<String>,
}

/// Raw image bytes for a profile picture or a poster. `id` is the profile
/// name or title id the picture belongs to.
#[derive(Debug, Clone, Default)]
pub struct PictureResult {
    pub error: bool,
    pub id: String,
    pub data: Vec<u8>,
}

/// Acknowledgement of a fire-and-forget operation (create/delete profile,
/// picture upload, download start). `message` carries the server's error
/// string when the operation failed.
#[derive(Debug, Clone, Default)]
pub struct ActionResult {
    pub error: bool,
    pub message: String,
}

/// The list of category names.
#[derive(Debug, Clone, Default)]
pub struct CategoriesResult {
    pub error: bool,
    pub categories: Vec<String>,
}

/// The top medias of one category.
#[derive(Debug, Clone, Default)]
pub struct MediasResult {
    pub error: bool,
    pub category: String,
    pub medias: Vec<Media>,
}

/// The medias matching a search query within one category.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub error: bool,
    pub category: String,
    pub query: String,
    pub medias: Vec<Media>,
}

/// Download status of one media.
#[derive(Debug, Clone, Default)]
pub struct MediaStatusResult {
    pub error: bool,
    pub status: MediaStatus,
}

/// A completed request's result, tagged by operation.
///
/// This is what travels from a request's worker thread to the presentation
/// layer; exactly one event is delivered per issued request.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    Profiles(ProfilesResult),
    ProfilePicture(PictureResult),
    ProfileCreated(ActionResult),
    ProfilePictureSet(ActionResult),
    ProfileDeleted(ActionResult),
    Categories(CategoriesResult),
    Medias(MediasResult),
    Poster(PictureResult),
    Search(SearchResult),
    MediaStatus(MediaStatusResult),
    DownloadStarted(ActionResult),
}

impl CoreEvent {
    /// True when the carried result has its error flag set.
    pub fn is_error(&self) -> bool {
        match self {
            CoreEvent::Profiles(r) => r.error,
            CoreEvent::ProfilePicture(r) | CoreEvent::Poster(r) => r.error,
            CoreEvent::ProfileCreated(r)
            | CoreEvent::ProfilePictureSet(r)
            | CoreEvent::ProfileDeleted(r)
            | CoreEvent::DownloadStarted(r) => r.error,
            CoreEvent::Categories(r) => r.error,
            CoreEvent::Medias(r) => r.error,
            CoreEvent::Search(r) => r.error,
            CoreEvent::MediaStatus(r) => r.error,
        }
    }
}
