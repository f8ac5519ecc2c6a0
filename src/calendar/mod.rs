pub mod ical;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;

/// A single calendar event, already localized.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Local>,
    pub end: Option<DateTime<Local>>,
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("fetching {url}: HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Where feed failures go. The shell stays up when a feed is down, so
/// errors are reported out-of-band instead of propagated.
pub trait ErrorSink {
    fn record_error(&self, message: &str);
}

struct CacheEntry {
    fetched_at: Instant,
    body: String,
}

/// Fetches and caches iCal feeds, serving per-day event queries.
///
/// Feed bodies are cached for the configured refresh interval so scrolling
/// the timeline does not hammer the network. Fetching is synchronous; the
/// shell calls in from its own thread.
pub struct Manager {
    urls: Vec<String>,
    refresh: Duration,
    cache: HashMap<String, CacheEntry>,
}

impl Manager {
    pub fn new(urls: Vec<String>, refresh_secs: u64) -> Self {
        Manager {
            urls,
            refresh: Duration::from_secs(refresh_secs),
            cache: HashMap::new(),
        }
    }

    pub fn has_feeds(&self) -> bool {
        !self.urls.is_empty()
    }

    /// All events on `date` across every configured feed, sorted by start
    /// time. A failing feed is reported to `sink` and skipped; the others
    /// still contribute.
    pub fn events_for(&mut self, date: NaiveDate, sink: &dyn ErrorSink) -> Vec<Event> {
        let mut events = Vec::new();
        let urls = self.urls.clone();
        for url in &urls {
            match self.feed_body(url) {
                Ok(body) => events.extend(ical::parse_events(&body, date)),
                Err(err) => sink.record_error(&err.to_string()),
            }
        }
        events.sort_by_key(|ev| ev.start);
        events
    }

    /// The feed body for `url`, from cache when fresh enough.
    fn feed_body(&mut self, url: &str) -> Result<String, CalendarError> {
        if let Some(entry) = self.cache.get(url) {
            if entry.fetched_at.elapsed() < self.refresh {
                return Ok(entry.body.clone());
            }
        }
        let body = fetch(url)?;
        self.cache.insert(
            url.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                body: body.clone(),
            },
        );
        Ok(body)
    }
}

fn fetch(url: &str) -> Result<String, CalendarError> {
    // Apple's subscription links use the webcal scheme; it is plain https.
    let https_url = if let Some(rest) = url.strip_prefix("webcal://") {
        format!("https://{rest}")
    } else {
        url.to_string()
    };
    let response = reqwest::blocking::get(&https_url).map_err(|source| CalendarError::Fetch {
        url: url.to_string(),
        source,
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(CalendarError::Status {
            url: url.to_string(),
            status,
        });
    }
    response.text().map_err(|source| CalendarError::Fetch {
        url: url.to_string(),
        source,
    })
}
