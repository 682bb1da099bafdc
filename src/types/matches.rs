use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque match identifier. Clients send it either as a JSON string or as a
/// JSON integer; both forms compare equal once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMatchId {
    Text(String),
    Number(i64),
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawMatchId::deserialize(deserializer)? {
            RawMatchId::Text(text) => MatchId::new(text),
            RawMatchId::Number(number) => MatchId(number.to_string()),
        })
    }
}

/// Point-in-time score and status of one match. Missing or null fields
/// decode as zero scores and an empty status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub id: MatchId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub away_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MatchSnapshot {
    pub fn new(id: &str, home_score: u32, away_score: u32, status: &str) -> Self {
        Self {
            id: MatchId::new(id),
            home_score,
            away_score,
            status: status.to_string(),
        }
    }

    pub fn is_nil_nil(&self) -> bool {
        self.home_score == 0 && self.away_score == 0
    }
}
