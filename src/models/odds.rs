use serde::{Deserialize, Serialize};

/// One event as returned by The Odds API. Events fetched from the
/// `/events` endpoint carry no bookmakers.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OddsEvent {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
}

/// Books surfaced on the NBA odds board; everything else is dropped.
pub const PREFERRED_BOOKMAKERS: [&str; 6] = [
    "fanduel",
    "betmgm",
    "draftkings",
    "betrivers",
    "bovada",
    "williamhill_us",
];

impl OddsEvent {
    /// Keeps only the preferred bookmakers, in the order the API returned them.
    pub fn retain_preferred_bookmakers(&mut self) {
        self.bookmakers
            .retain(|b| PREFERRED_BOOKMAKERS.contains(&b.key.as_str()));
    }
}
