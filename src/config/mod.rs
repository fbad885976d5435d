//! Runtime options baked into a generated app
//!
//! One `RuntimeOptions` value is fixed per app-generation run and serialized
//! verbatim into the app's `test-config.js`, where the on-device runtime
//! reads it back as process-wide configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default CouchDB table receiving run summaries.
pub const DEFAULT_RESULT_TABLE: &str = "mobilespec_results";

/// Default CouchDB table receiving crash documents.
pub const DEFAULT_CRASH_TABLE: &str = "mobilespec_crashes";

/// Options fixed for one app-generation run.
///
/// The wire form (the object assigned to `TEST_CONFIG` in the generated
/// config artifact) is exactly the serde serialization of this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Caller-supplied result identifier. When present, result documents are
    /// PUT to named documents (rerun overwrites); when absent they are POSTed
    /// and the store assigns an identifier.
    pub result_id: Option<String>,

    /// Base URI of the CouchDB server receiving results.
    #[serde(with = "serialize_origin")]
    pub couchdb_uri: Url,

    /// Table (database) name for run summaries.
    pub result_table_name: String,

    /// Table (database) name for crash documents.
    pub crash_table_name: String,
}

impl RuntimeOptions {
    /// Build options pointing at a CouchDB server on `host:port`.
    pub fn new(host: &str, port: u16, result_id: Option<String>) -> Result<Self, url::ParseError> {
        let couchdb_uri = Url::parse(&format!("http://{}:{}", host, port))?;
        Ok(Self {
            result_id,
            couchdb_uri,
            result_table_name: DEFAULT_RESULT_TABLE.to_string(),
            crash_table_name: DEFAULT_CRASH_TABLE.to_string(),
        })
    }

    /// The endpoint's origin (`scheme://host:port`, no trailing slash).
    ///
    /// Used both as the base when composing document URIs and, with a
    /// wildcard suffix, as the manifest whitelist rule.
    pub fn endpoint_origin(&self) -> String {
        self.couchdb_uri.origin().ascii_serialization()
    }

    /// The network-whitelist rule granting the app access to the endpoint.
    pub fn whitelist_rule(&self) -> String {
        format!("{}*", self.endpoint_origin())
    }
}

/// Serialize the endpoint as its bare origin.
///
/// `Url` normalizes `http://host:port` to `http://host:port/`; the on-device
/// reporter concatenates `couchdb_uri + '/' + table`, so the stored form must
/// not carry the trailing slash.
mod serialize_origin {
    use serde::{Deserialize, Deserializer, Serializer};
    use url::Url;

    pub fn serialize<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&url.origin().ascii_serialization())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Url, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Url::parse(&raw).map_err(serde::de::Error::custom)
    }
}
