//! Response envelopes and lenient field decoders for the matchup backend.
use crate::{DailyTip, LeagueRef, TeamRef};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Default, Debug)]
pub struct LeaguesResponse {
    pub leagues: Option<Vec<LeagueRef>>,
}

#[derive(Deserialize, Default, Debug)]
pub struct TeamsResponse {
    pub teams: Option<Vec<TeamRef>>,
}

#[derive(Deserialize, Default, Debug)]
pub struct TipsResponse {
    pub tips: Option<Vec<DailyTip>>,
}

/// Ids and labels come back as strings from some endpoints and as numbers
/// from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

pub fn flexible_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

pub fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flexible_opt_string(deserializer)?.unwrap_or_default())
}
