///! Core data structures for the satellite catalog
///!
///! The wire schema (Redis payload and HTTP response body) uses the
///! Space-Track GP field names as canonical. CelesTrak text parses and
///! Space-Track JSON both normalize into [`GpRecord`].

use serde::{Deserialize, Deserializer, Serialize};

/// NORAD catalog number (satellite unique identifier)
pub type NoradId = u32;

/// One tracked object's most recent orbital element set.
///
/// The same object may appear more than once in a catalog when it belongs
/// to several fetched groups; callers must not assume uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpRecord {
    #[serde(rename = "OBJECT_NAME")]
    pub name: String,

    /// Space-Track emits numeric columns as JSON strings, so accept both.
    #[serde(rename = "NORAD_CAT_ID", deserialize_with = "norad_id_from_value")]
    pub norad_id: NoradId,

    /// First TLE line. `LINE1` is the short key spelling some GP dumps use.
    #[serde(rename = "TLE_LINE1", alias = "LINE1")]
    pub line1: String,

    /// Second TLE line.
    #[serde(rename = "TLE_LINE2", alias = "LINE2")]
    pub line2: String,

    /// Element set epoch; only present for JSON-sourced records.
    #[serde(rename = "EPOCH", default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
}

/// Accept a NORAD id encoded as either a JSON number or a decimal string.
fn norad_id_from_value<'de, D>(deserializer: D) -> Result<NoradId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(NoradId),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(id) => Ok(id),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
