//! A status mapper that records each lookup.

use crate::timeline::Timeline;
use http::StatusCode;
use parking_lot::Mutex;
use phont_core::{HttpStatusMapper, Status, StatusMapper};

/// Delegates to [`HttpStatusMapper`] and records every status it maps.
///
/// With a [`Timeline`], each lookup is also recorded as
/// `"map_to_http_status_code"`, which marks the point a response was built.
#[derive(Debug, Default)]
pub struct RecordingStatusMapper {
    mapped: Mutex<Vec<Status>>,
    timeline: Option<Timeline>,
}

impl RecordingStatusMapper {
    /// Creates the mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapper that also records into `timeline`.
    #[must_use]
    pub fn with_timeline(timeline: Timeline) -> Self {
        Self {
            mapped: Mutex::default(),
            timeline: Some(timeline),
        }
    }

    /// Returns every mapped status, in order.
    #[must_use]
    pub fn mapped(&self) -> Vec<Status> {
        self.mapped.lock().clone()
    }
}

impl StatusMapper for RecordingStatusMapper {
    fn map_to_http_status_code(&self, status: Status) -> StatusCode {
        if let Some(timeline) = &self.timeline {
            timeline.record("map_to_http_status_code");
        }
        self.mapped.lock().push(status);
        HttpStatusMapper.map_to_http_status_code(status)
    }
}
