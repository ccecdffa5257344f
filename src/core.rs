//! The core façade the presentation layer talks to
//!
//! One method per server operation. Each call constructs the matching
//! request (snapshotting the server address and, where relevant, the
//! current profile), registers it with the request manager and returns
//! immediately; the result arrives later through the listener. The only
//! synchronous failure is a missing profile on a profile-scoped operation.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::CoreConfig;
use crate::error::{Error, Result};
use crate::listener::ResultListener;
use crate::manager::RequestManager;
use crate::models::Media;
use crate::request::Operation;
use crate::transport::Transport;

/// How long the presentation layer waits before re-issuing a recoverable
/// request (profile or category listing) that came back with its error flag
/// set.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Entry point for all server operations. Owns the request manager; created
/// once at startup and shut down with the application.
pub struct Core {
    server_address: String,
    transport: Transport,
    profile: Option<String>,
    manager: RequestManager,
}

impl Core {
    /// A core talking to `server_address` with default timeouts.
    pub fn new(server_address: &str) -> Self {
        let config = CoreConfig {
            server_address: server_address.to_string(),
            ..Default::default()
        };
        Self::with_config(&config)
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            server_address: config.server_address.clone(),
            transport: Transport::new(config),
            profile: None,
            manager: RequestManager::new(),
        }
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// The currently selected profile, if any.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Select or clear the current profile. Pure state mutation: requests
    /// already in flight keep the profile they were constructed with.
    pub fn set_profile(&mut self, profile: Option<&str>) {
        self.profile = profile.map(str::to_string);
    }

    /// Request the list of profiles.
    pub fn request_profiles(&self, listener: impl ResultListener) {
        self.submit(Operation::GetProfiles, listener);
    }

    /// Request the picture of the given profile.
    pub fn request_profile_picture(&self, profile: &str, listener: impl ResultListener) {
        self.submit(
            Operation::GetProfilePicture {
                profile: profile.to_string(),
            },
            listener,
        );
    }

    /// Create a profile, optionally uploading its picture (PNG bytes). The
    /// server's error message, if any, arrives in the result.
    pub fn create_profile(
        &self,
        name: &str,
        picture: Option<Vec<u8>>,
        listener: impl ResultListener,
    ) {
        self.submit(
            Operation::CreateProfile {
                name: name.to_string(),
                picture,
            },
            listener,
        );
    }

    /// Replace the current profile's picture (PNG bytes).
    pub fn set_profile_picture(&self, picture: Vec<u8>, listener: impl ResultListener) -> Result<()> {
        let profile = self.profile_snapshot()?;
        self.submit(Operation::SetProfilePicture { profile, picture }, listener);
        Ok(())
    }

    /// Delete the current profile.
    pub fn delete_profile(&self, listener: impl ResultListener) -> Result<()> {
        let profile = self.profile_snapshot()?;
        self.submit(Operation::DeleteProfile { profile }, listener);
        Ok(())
    }

    /// Request the list of categories.
    pub fn request_categories(&self, listener: impl ResultListener) {
        self.submit(Operation::GetCategories, listener);
    }

    /// Request the top medias of a category for the current profile.
    pub fn request_medias(&self, category: &str, listener: impl ResultListener) -> Result<()> {
        let profile = self.profile_snapshot()?;
        self.submit(
            Operation::GetMedias {
                profile,
                category: category.to_string(),
            },
            listener,
        );
        Ok(())
    }

    /// Request one media's poster image.
    pub fn request_poster(&self, media: &Media, listener: impl ResultListener) {
        self.submit(
            Operation::GetPoster {
                media: media.clone(),
            },
            listener,
        );
    }

    /// Request the posters for a list of medias, once per distinct title
    /// identity. Lists straight from the server routinely repeat a title
    /// (same show in several chart positions); those collapse to a single
    /// fetch.
    pub fn request_posters<L>(&self, medias: &[Media], listener: L)
    where
        L: ResultListener + Clone,
    {
        let mut seen: HashSet<&Media> = HashSet::with_capacity(medias.len());
        for media in medias {
            if seen.insert(media) {
                self.request_poster(media, listener.clone());
            }
        }
    }

    /// Search a category for medias matching `query`.
    pub fn request_search(&self, category: &str, query: &str, listener: impl ResultListener) {
        self.submit(
            Operation::Search {
                category: category.to_string(),
                query: query.to_string(),
            },
            listener,
        );
    }

    /// Request the download status of a media.
    pub fn request_media_status(&self, media: &Media, listener: impl ResultListener) {
        self.submit(
            Operation::GetMediaStatus {
                media: media.clone(),
            },
            listener,
        );
    }

    /// Ask the server to start downloading a media for the current profile.
    pub fn download_media(&self, media: &Media, listener: impl ResultListener) -> Result<()> {
        let profile = self.profile_snapshot()?;
        self.submit(
            Operation::DownloadMedia {
                profile,
                media: media.clone(),
            },
            listener,
        );
        Ok(())
    }

    /// Shut down, joining every outstanding request thread first.
    pub fn shutdown(mut self) {
        self.manager.shutdown();
    }

    fn submit(&self, operation: Operation, listener: impl ResultListener) {
        self.manager.submit(
            &self.server_address,
            self.transport,
            operation,
            Box::new(listener),
        );
    }

    fn profile_snapshot(&self) -> Result<String> {
        self.profile
            .clone()
            .ok_or(Error::Precondition("no profile selected"))
    }
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
