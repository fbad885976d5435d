//! Result reporter: spec lifecycle aggregation and delivery
//!
//! The test-execution environment drives a fixed callback sequence
//! (`run_started`, then per suite `suite_started`/`spec_started`/
//! `spec_done`/`suite_done`, then `run_done`). [`MedicReporter`] registers
//! as one listener on that stream, accumulates counts and failed records,
//! and on `run_done` assembles one [`ReportDocument`] and hands it to the
//! delivery client exactly once. Delivery is fire-and-forget; its failure
//! never affects the run.

mod client;

pub use client::{CouchClient, CrashDocument, ReportError};

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Separator joining document-identifier components.
const DOC_ID_SEPARATOR: &str = "__";

/// Known device-platform aliases, folded to canonical names.
const PLATFORM_ALIASES: &[(&str, &str)] = &[
    ("ipod touch", "ios"),
    ("iphone", "ios"),
];

/// Outcome of a single spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecStatus {
    Passed,
    Failed,
    Pending,
    Disabled,
}

/// One unmet expectation inside a failed spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedExpectation {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Result object handed over by the execution environment, one per spec.
/// Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecResult {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub status: SpecStatus,
    #[serde(rename = "failedExpectations")]
    pub failed_expectations: Vec<FailedExpectation>,
}

/// Environment-supplied metadata about the device running the specs.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Platform name as reported by the device (normalized on delivery).
    pub platform: String,
    /// Device model or name.
    pub model: String,
    /// Platform/app version string.
    pub version: String,
    /// Source revision the app was built from.
    pub sha: String,
}

/// Aggregated spec counts plus the failed records, in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResults {
    pub specs: usize,
    pub failures: usize,
    pub results: Vec<SpecResult>,
}

/// The wire document delivered once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub mobilespec: RunResults,
    pub platform: String,
    pub version: String,
    pub sha: String,
    /// Whole seconds since epoch.
    pub timestamp: i64,
    pub model: String,
}

impl ReportDocument {
    /// The identifier the document is stored under.
    ///
    /// Pure function of (sha, version, model): a rerun with an unchanged
    /// triple maps to the same identifier and overwrites the prior document.
    pub fn document_id(&self) -> String {
        [&self.sha, &self.version, &self.model]
            .map(|part| encode_component(part))
            .join(DOC_ID_SEPARATOR)
    }
}

/// Listener interface over the execution environment's lifecycle events.
///
/// The environment guarantees the order `run_started`, then zero or more
/// suites each wrapping their specs, then `run_done`.
pub trait TestLifecycle {
    /// The run is starting; `total_specs_defined` is informational only.
    fn run_started(&mut self, total_specs_defined: usize);

    /// A suite began. Reserved; implementations must not alter counts here.
    fn suite_started(&mut self, _full_name: &str) {}

    /// A spec began. Reserved; implementations must not alter counts here.
    fn spec_started(&mut self, _full_name: &str) {}

    /// A spec finished.
    fn spec_done(&mut self, result: SpecResult);

    /// A suite finished. Reserved; implementations must not alter counts here.
    fn suite_done(&mut self, _full_name: &str) {}

    /// The run finished; all spec results are in.
    fn run_done(&mut self);
}

/// The reporter registered with the execution environment.
///
/// One value per run owns all reporting state; nothing is shared across
/// runs. The summary document is built and delivered exactly once, from
/// `run_done`.
pub struct MedicReporter {
    device: DeviceInfo,
    client: CouchClient,
    total_specs_defined: usize,
    specs_executed: usize,
    failure_count: usize,
    pending_count: usize,
    results: Vec<SpecResult>,
    started_at: Option<Instant>,
}

impl MedicReporter {
    pub fn new(device: DeviceInfo, client: CouchClient) -> Self {
        Self {
            device,
            client,
            total_specs_defined: 0,
            specs_executed: 0,
            failure_count: 0,
            pending_count: 0,
            results: Vec::new(),
            started_at: None,
        }
    }

    /// Specs executed so far (every status except `disabled`).
    pub fn specs_executed(&self) -> usize {
        self.specs_executed
    }

    /// Failed specs so far.
    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// Pending specs so far.
    pub fn pending_count(&self) -> usize {
        self.pending_count
    }

    /// The failed records accumulated so far, in arrival order.
    pub fn failed_results(&self) -> &[SpecResult] {
        &self.results
    }

    /// Assemble the report document from the accumulated state.
    pub fn build_document(&self) -> ReportDocument {
        ReportDocument {
            mobilespec: RunResults {
                specs: self.specs_executed,
                failures: self.failure_count,
                results: self.results.clone(),
            },
            platform: normalize_platform(&self.device.platform),
            version: self.device.version.clone(),
            sha: self.device.sha.clone(),
            timestamp: Utc::now().timestamp(),
            model: self.device.model.clone(),
        }
    }
}

impl TestLifecycle for MedicReporter {
    fn run_started(&mut self, total_specs_defined: usize) {
        self.total_specs_defined = total_specs_defined;
        self.started_at = Some(Instant::now());
    }

    fn spec_done(&mut self, result: SpecResult) {
        if result.status != SpecStatus::Disabled {
            self.specs_executed += 1;
        }
        match result.status {
            SpecStatus::Failed => {
                self.failure_count += 1;
                self.results.push(result);
            }
            SpecStatus::Pending => {
                self.pending_count += 1;
            }
            _ => {}
        }
    }

    fn run_done(&mut self) {
        let elapsed = self
            .started_at
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        println!(
            "ran {} of {} specs in {:.1}s",
            self.specs_executed, self.total_specs_defined, elapsed
        );
        if self.failure_count == 0 {
            println!("[[[ TEST OK ]]]");
        } else {
            println!("[[[ TEST FAILED ]]]");
        }

        self.client.send_results(self.build_document());
        println!(">>> DONE <<<");
    }
}

/// Fold known platform aliases to canonical names; everything else passes
/// through lowercased.
pub fn normalize_platform(platform: &str) -> String {
    let lowered = platform.to_lowercase();
    for (alias, canonical) in PLATFORM_ALIASES {
        if lowered == *alias {
            return (*canonical).to_string();
        }
    }
    lowered
}

/// Percent-encode one document-identifier component.
///
/// Same escape set as JavaScript's `encodeURIComponent`: ASCII
/// alphanumerics and `- _ . ! ~ * ' ( )` pass through, every other byte of
/// the UTF-8 encoding becomes `%XX`.
pub fn encode_component(component: &str) -> String {
    let mut encoded = String::with_capacity(component.len());
    for byte in component.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => encoded.push(byte as char),
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
