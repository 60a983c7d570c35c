//! In-memory [`HttpTransport`] for tests.
//!
//! Routes are matched by URL prefix, first match wins. Each route replays
//! its scripted replies in order and keeps repeating the last one once
//! the script runs out. Requests to unrouted URLs fail as connection
//! errors.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{FetchError, HttpResponse, HttpTransport};

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Respond with `status` and `body`.
    Respond {
        /// Status code.
        status: u16,
        /// Body text.
        body: String,
    },
    /// Fail at the transport level.
    Fail(String),
}

impl ScriptedReply {
    /// 200 with `body`.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Respond {
            status: 200,
            body: body.into(),
        }
    }

    /// `status` with an empty body.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: String::new(),
        }
    }

    /// Transport failure with `message`.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

struct Route {
    prefix: String,
    replies: VecDeque<ScriptedReply>,
}

/// Scripted transport that records every requested URL.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route for URLs starting with `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if `replies` is empty.
    #[must_use]
    pub fn route(self, prefix: impl Into<String>, replies: Vec<ScriptedReply>) -> Self {
        assert!(!replies.is_empty(), "a route needs at least one reply");
        self.routes.lock().unwrap().push(Route {
            prefix: prefix.into(),
            replies: replies.into(),
        });
        self
    }

    /// Every URL requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    /// Number of requests whose URL starts with `prefix`.
    #[must_use]
    pub fn requests_to(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }

    fn next_reply(&self, url: &str) -> Option<ScriptedReply> {
        let mut routes = self.routes.lock().unwrap();
        let route = routes.iter_mut().find(|r| url.starts_with(&r.prefix))?;
        if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.next_reply(url) {
            Some(ScriptedReply::Respond { status, body }) => Ok(HttpResponse {
                url: url.to_string(),
                status,
                body,
            }),
            Some(ScriptedReply::Fail(message)) => Err(FetchError::Connection { message }),
            None => Err(FetchError::Connection {
                message: format!("no scripted route for {url}"),
            }),
        }
    }
}
