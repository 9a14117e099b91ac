#![allow(dead_code)]

use authoring_core::publishing::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use authoring_core::{
    Clock, ContentId, Notifier, NotifyError, PublishingConfig, PublishingTransport, RoleAssignment,
};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::HashMap;

pub const PUBLISHING_URL: &str = "http://publishing/";
pub const API_KEY: &str = "trusted-publisher";

pub fn config() -> PublishingConfig {
    PublishingConfig::new(PUBLISHING_URL, API_KEY)
        .unwrap()
        .with_webview_url("http://cnx.org/")
}

pub fn roles_url(id: ContentId) -> String {
    format!("http://publishing/contents/{id}/roles")
}

pub fn licensors_url(id: ContentId) -> String {
    format!("http://publishing/contents/{id}/licensors")
}

pub fn permissions_url(id: ContentId) -> String {
    format!("http://publishing/contents/{id}/permissions")
}

/// Scripted transport: one sticky response per `(method, url)`, every
/// request recorded. Unscripted routes fail at the transport level.
#[derive(Default)]
pub struct FakeTransport {
    routes: RefCell<HashMap<(HttpMethod, String), HttpResponse>>,
    calls: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.routes
            .borrow_mut()
            .insert((method, url.to_string()), HttpResponse::new(status, body));
    }

    pub fn respond_json(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.respond(method, url, status, &body.to_string());
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.borrow().clone()
    }

    pub fn calls_with(&self, method: HttpMethod) -> Vec<HttpRequest> {
        self.calls
            .borrow()
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl PublishingTransport for FakeTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, request.url.clone());
        self.calls.borrow_mut().push(request);
        self.routes
            .borrow()
            .get(&key)
            .cloned()
            .ok_or_else(|| TransportError(format!("no route for {} {}", key.0.as_str(), key.1)))
    }
}

/// Parses a recorded JSON body.
pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(String, String, String)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::default(),
            fail: true,
        }
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .map(|(user_id, _, _)| user_id.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn send_message(&self, user_id: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError("accounts service unavailable".to_string()));
        }
        self.sent
            .borrow_mut()
            .push((user_id.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, 17, 12, 30, 0).unwrap()
}

pub fn pending(ids: &[&str]) -> Vec<RoleAssignment> {
    ids.iter().map(|id| RoleAssignment::new(*id)).collect()
}

pub fn accepted(ids: &[&str]) -> Vec<RoleAssignment> {
    ids.iter()
        .map(|id| RoleAssignment::new(*id).with_acceptance(authoring_core::Acceptance::Accepted))
        .collect()
}
