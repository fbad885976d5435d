//! CouchDB delivery of report and crash documents

use std::thread;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RuntimeOptions;

use super::ReportDocument;

/// Delivery errors. Always logged, never escalated to fail the run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("endpoint rejected document ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Document describing an uncaught exception during spec execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashDocument {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Whole seconds since epoch.
    pub timestamp: i64,
}

impl CrashDocument {
    pub fn new(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            message: message.into(),
            stack,
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// Client delivering documents to the configured CouchDB endpoint.
///
/// One client exists per run and owns the per-run crash counter. With a
/// caller-supplied result id, result documents are PUT to a named document
/// (rerun with the same device triple overwrites); without one they are
/// POSTed and the store assigns the identifier. No retries, no
/// authentication.
pub struct CouchClient {
    origin: String,
    result_table: String,
    crash_table: String,
    result_id: Option<String>,
    crash_number: u32,
}

impl CouchClient {
    pub fn from_options(options: &RuntimeOptions) -> Self {
        Self {
            origin: options.endpoint_origin(),
            result_table: options.result_table_name.clone(),
            crash_table: options.crash_table_name.clone(),
            result_id: options.result_id.clone(),
            crash_number: 0,
        }
    }

    /// Deliver a report document on a detached thread.
    ///
    /// Fire-and-forget: the caller never observes the outcome, and a failure
    /// is logged inside the thread only. There is no ordering guarantee
    /// between delivery completion and process exit.
    pub fn send_results(&self, document: ReportDocument) {
        let (method, uri) = self.result_target(&document);
        let body = match serde_json::to_string(&document) {
            Ok(body) => body,
            Err(err) => {
                eprintln!("failed to serialize report document: {}", err);
                return;
            }
        };
        thread::spawn(move || {
            if let Err(err) = deliver(method, &uri, &body) {
                eprintln!("failed to deliver report document: {}", err);
            }
        });
    }

    /// Deliver a report document and wait for the outcome.
    pub fn deliver_results(&self, document: &ReportDocument) -> Result<(), ReportError> {
        let (method, uri) = self.result_target(document);
        let body = serde_json::to_string(document)?;
        deliver(method, &uri, &body)
    }

    /// Deliver a crash document, best effort.
    ///
    /// Each crash in a run gets a fresh counter value so multiple crashes
    /// land as distinct documents. A failure while reporting a crash is
    /// logged and swallowed, never re-thrown.
    pub fn send_crash(&mut self, crash: &CrashDocument) {
        let crash_number = self.crash_number;
        self.crash_number += 1;

        let (method, uri) = self.crash_target(crash_number);
        let body = match serde_json::to_string(crash) {
            Ok(body) => body,
            Err(err) => {
                eprintln!("failed to serialize crash document: {}", err);
                return;
            }
        };
        if let Err(err) = deliver(method, &uri, &body) {
            eprintln!("failed to report crash: {}", err);
        }
    }

    fn result_target(&self, document: &ReportDocument) -> (&'static str, String) {
        match self.result_id {
            Some(_) => (
                "PUT",
                format!(
                    "{}/{}/{}",
                    self.origin,
                    self.result_table,
                    document.document_id()
                ),
            ),
            None => ("POST", format!("{}/{}/", self.origin, self.result_table)),
        }
    }

    fn crash_target(&self, crash_number: u32) -> (&'static str, String) {
        match &self.result_id {
            Some(result_id) => (
                "PUT",
                format!(
                    "{}/{}/{}-crash-{}",
                    self.origin, self.crash_table, result_id, crash_number
                ),
            ),
            None => ("POST", format!("{}/{}/", self.origin, self.crash_table)),
        }
    }
}

/// One synchronous HTTP request; success is any status in [200, 300).
fn deliver(method: &'static str, uri: &str, body: &str) -> Result<(), ReportError> {
    println!("sending {} request to {}", method, uri);

    let request = ureq::request(method, uri).set("Content-Type", "application/json");
    match request.send_string(body) {
        Ok(response) => {
            println!("HTTP SUCCESS: status {}", response.status());
            Ok(())
        }
        Err(ureq::Error::Status(status, response)) => Err(ReportError::Rejected {
            status,
            body: response.into_string().unwrap_or_default(),
        }),
        Err(err) => Err(ReportError::Transport(err.to_string())),
    }
}
