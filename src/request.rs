//! A single asynchronous request against the server
//!
//! Every server operation runs as one [`Request`]: an operation snapshot
//! bound to one worker thread, started eagerly at construction. The thread
//! performs the exchange, decodes the response, hands exactly one
//! [`CoreEvent`] to the bound listener and finally signals the completion
//! channel so the [`RequestManager`](crate::manager::RequestManager) can
//! reclaim it. Errors on the worker thread never propagate out; they become
//! error-flagged results.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use url::Url;

use crate::envelope;
use crate::error::{Error, Result};
use crate::listener::ResultListener;
use crate::models::Media;
use crate::results::{
    ActionResult, CategoriesResult, CoreEvent, MediaStatusResult, MediasResult, PictureResult,
    ProfilesResult, SearchResult,
};
use crate::transport::Transport;

/// One server operation together with the parameter snapshot it runs with.
///
/// Profile-scoped operations carry the profile name that was current when
/// the request was constructed; a later profile switch does not affect
/// requests already in flight.
#[derive(Debug, Clone)]
pub enum Operation {
    GetProfiles,
    GetProfilePicture { profile: String },
    CreateProfile { name: String, picture: Option<Vec<u8>> },
    SetProfilePicture { profile: String, picture: Vec<u8> },
    DeleteProfile { profile: String },
    GetCategories,
    GetMedias { profile: String, category: String },
    GetPoster { media: Media },
    Search { category: String, query: String },
    GetMediaStatus { media: Media },
    DownloadMedia { profile: String, media: Media },
}

impl Operation {
    /// The api function name, used for URLs and log lines.
    fn function(&self) -> &'static str {
        match self {
            Operation::GetProfiles => "getprofiles",
            Operation::GetProfilePicture { .. } => "getprofilepicture",
            Operation::CreateProfile { .. } => "createprofile",
            Operation::SetProfilePicture { .. } => "setprofilepicture",
            Operation::DeleteProfile { .. } => "deleteprofile",
            Operation::GetCategories => "getcategories",
            Operation::GetMedias { .. } => "gettop",
            Operation::GetPoster { .. } => "getposter",
            Operation::Search { .. } => "search",
            Operation::GetMediaStatus { .. } => "getmediastatus",
            Operation::DownloadMedia { .. } => "download",
        }
    }
}

/// An in-flight request. Owns the worker thread executing it.
pub struct Request {
    id: u64,
    thread: JoinHandle<()>,
}

impl Request {
    /// Start a request. The worker thread is running before this returns.
    pub(crate) fn spawn(
        id: u64,
        server_address: String,
        transport: Transport,
        operation: Operation,
        listener: Box<dyn ResultListener>,
        done: Sender<u64>,
    ) -> Self {
        let thread = thread::spawn(move || {
            debug!("request {}: {}", id, operation.function());
            let event = execute(&server_address, &transport, operation);
            listener.on_result(event);
            // Completion signal must be the very last thing this thread
            // does before returning; the reaper joins on it.
            let _ = done.send(id);
        });
        Self { id, thread }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Join the worker thread. Called once, by the reaper.
    pub(crate) fn join(self) {
        if self.thread.join().is_err() {
            warn!("request {} thread panicked", self.id);
        }
    }
}

/// Run the operation to completion and fold any failure into the result's
/// error flag. The staleness tokens (profile name, category, query, title
/// id) are filled in on both paths so the presentation layer can match the
/// result against its current selection.
fn execute(server: &str, transport: &Transport, operation: Operation) -> CoreEvent {
    match operation {
        Operation::GetProfiles => {
            CoreEvent::Profiles(match fetch_strings(server, transport, "getprofiles", "profiles") {
                Ok(profiles) => ProfilesResult {
                    error: false,
                    profiles,
                },
                Err(e) => {
                    warn!("getprofiles: {}", e);
                    ProfilesResult {
                        error: true,
                        profiles: Vec::new(),
                    }
                }
            })
        }
        Operation::GetProfilePicture { profile } => CoreEvent::ProfilePicture(fetch_picture(
            server,
            transport,
            "getprofilepicture",
            "name",
            profile,
        )),
        Operation::CreateProfile { name, picture } => CoreEvent::ProfileCreated(action(
            server,
            transport,
            "createprofile",
            &[("name", &name)],
            picture.as_deref(),
        )),
        Operation::SetProfilePicture { profile, picture } => CoreEvent::ProfilePictureSet(action(
            server,
            transport,
            "setprofilepicture",
            &[("name", &profile)],
            Some(&picture),
        )),
        Operation::DeleteProfile { profile } => CoreEvent::ProfileDeleted(action(
            server,
            transport,
            "deleteprofile",
            &[("name", &profile)],
            None,
        )),
        Operation::GetCategories => CoreEvent::Categories(
            match fetch_strings(server, transport, "getcategories", "categories") {
                Ok(categories) => CategoriesResult {
                    error: false,
                    categories,
                },
                Err(e) => {
                    warn!("getcategories: {}", e);
                    CategoriesResult {
                        error: true,
                        categories: Vec::new(),
                    }
                }
            },
        ),
        Operation::GetMedias { profile, category } => {
            let fetched = fetch_medias(
                server,
                transport,
                "gettop",
                &[("profile", &profile), ("category", &category)],
                "top",
            );
            CoreEvent::Medias(match fetched {
                Ok(medias) => MediasResult {
                    error: false,
                    category,
                    medias,
                },
                Err(e) => {
                    warn!("gettop: {}", e);
                    MediasResult {
                        error: true,
                        category,
                        medias: Vec::new(),
                    }
                }
            })
        }
        Operation::GetPoster { media } => CoreEvent::Poster(fetch_picture(
            server,
            transport,
            "getposter",
            "id",
            media.title_id,
        )),
        Operation::Search { category, query } => {
            let fetched = fetch_medias(
                server,
                transport,
                "search",
                &[("category", &category), ("text", &query)],
                "search",
            );
            CoreEvent::Search(match fetched {
                Ok(medias) => SearchResult {
                    error: false,
                    category,
                    query,
                    medias,
                },
                Err(e) => {
                    warn!("search: {}", e);
                    SearchResult {
                        error: true,
                        category,
                        query,
                        medias: Vec::new(),
                    }
                }
            })
        }
        Operation::GetMediaStatus { media } => {
            let fetched = media_url(server, "getmediastatus", &[("id", &media.title_id)], &media)
                .and_then(|url| transport.perform(&url, None))
                .and_then(|bytes| envelope::decode(&bytes))
                .and_then(|value| envelope::media_status(&value));
            CoreEvent::MediaStatus(match fetched {
                Ok(status) => MediaStatusResult {
                    error: false,
                    status,
                },
                Err(e) => {
                    warn!("getmediastatus: {}", e);
                    MediaStatusResult {
                        error: true,
                        status: Default::default(),
                    }
                }
            })
        }
        Operation::DownloadMedia { profile, media } => {
            let result = media_url(
                server,
                "download",
                &[("profile", &profile), ("id", &media.title_id)],
                &media,
            )
            .and_then(|url| transport.perform(&url, None))
            .and_then(|bytes| envelope::decode(&bytes).map(|_| ()));
            CoreEvent::DownloadStarted(match result {
                Ok(()) => ActionResult::default(),
                Err(e) => {
                    warn!("download: {}", e);
                    ActionResult {
                        error: true,
                        message: e.message().to_string(),
                    }
                }
            })
        }
    }
}

/// Build the target URL for an api function, percent-escaping every query
/// parameter.
fn build_url(server: &str, function: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut url =
        Url::parse(server).map_err(|e| Error::Transport(format!("bad server address: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::Transport("server address cannot be a base".to_string()))?
        .pop_if_empty()
        .push("api")
        .push(function);
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.into())
}

/// URL for a media-scoped function; season and episode ride along only when
/// the media actually has them.
fn media_url(
    server: &str,
    function: &str,
    params: &[(&str, &str)],
    media: &Media,
) -> Result<String> {
    let season = media.season.to_string();
    let episode = media.episode.to_string();
    let mut all = params.to_vec();
    if media.season > 0 && media.episode > 0 {
        all.push(("season", &season));
        all.push(("episode", &episode));
    }
    build_url(server, function, &all)
}

fn fetch_json(
    server: &str,
    transport: &Transport,
    function: &str,
    params: &[(&str, &str)],
) -> Result<serde_json::Value> {
    let url = build_url(server, function, params)?;
    let bytes = transport.perform(&url, None)?;
    envelope::decode(&bytes)
}

fn fetch_strings(
    server: &str,
    transport: &Transport,
    function: &str,
    key: &str,
) -> Result<Vec<String>> {
    let value = fetch_json(server, transport, function, &[])?;
    envelope::string_array(&value, key)
}

fn fetch_medias(
    server: &str,
    transport: &Transport,
    function: &str,
    params: &[(&str, &str)],
    key: &str,
) -> Result<Vec<Media>> {
    let value = fetch_json(server, transport, function, params)?;
    envelope::media_array(&value, key)
}

/// Picture endpoints answer with raw image bytes instead of an envelope.
fn fetch_picture(
    server: &str,
    transport: &Transport,
    function: &str,
    param: &str,
    id: String,
) -> PictureResult {
    let fetched =
        build_url(server, function, &[(param, &id)]).and_then(|url| transport.perform(&url, None));
    match fetched {
        Ok(data) => PictureResult {
            error: false,
            id,
            data,
        },
        Err(e) => {
            warn!("{}: {}", function, e);
            PictureResult {
                error: true,
                id,
                data: Vec::new(),
            }
        }
    }
}

/// Perform an acknowledgement-only operation, optionally uploading a
/// picture. The server's error string ends up in the result's message.
fn action(
    server: &str,
    transport: &Transport,
    function: &str,
    params: &[(&str, &str)],
    picture: Option<&[u8]>,
) -> ActionResult {
    let result = build_url(server, function, params)
        .and_then(|url| transport.perform(&url, picture))
        .and_then(|bytes| envelope::decode(&bytes).map(|_| ()));
    match result {
        Ok(()) => ActionResult::default(),
        Err(e) => {
            warn!("{}: {}", function, e);
            ActionResult {
                error: true,
                message: e.message().to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
