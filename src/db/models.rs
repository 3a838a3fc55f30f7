use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored credential as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub description: String,
    pub tags: Vec<String>,
}

/// Client-supplied fields for insert and update.
/// Server-owned fields (`id`, timestamps) are ignored if present in the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<Credential> for NewCredential {
    fn from(c: Credential) -> Self {
        Self {
            username: c.username,
            password: c.password,
            description: Some(c.description),
            tags: Some(c.tags),
        }
    }
}

/// Serialize tags to a compact JSON array; absent tags become `[]`.
pub fn encode_tags(tags: Option<&[String]>) -> Result<String, serde_json::Error> {
    serde_json::to_string(tags.unwrap_or_default())
}

/// NULL, empty text and the literal `null` all decode to an empty list.
pub fn decode_tags(raw: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(s) => Ok(serde_json::from_str::<Option<Vec<String>>>(s)?.unwrap_or_default()),
    }
}

/// Fixed-width UTC form so that text order matches time order.
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
