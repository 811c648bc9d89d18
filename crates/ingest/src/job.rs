//! The two ingestion jobs and their static endpoint tables.

use roster_core::{Config, EndpointTable, RosterError};
use roster_source::SourceSettings;

/// SportsDataIO: collection → path.
pub const SPORTSDATA_ENDPOINTS: &[(&str, &str)] = &[
    ("teams", "/fantasy/json/Teams"),
    ("fantasy_players", "/fantasy/json/FantasyPlayers"),
];

/// Sleeper: collection → path. `/players/nfl` answers with an id → player mapping.
pub const SLEEPER_ENDPOINTS: &[(&str, &str)] = &[("players", "/players/nfl")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Job {
    /// Teams and fantasy players from SportsDataIO (needs NFL_API_KEY).
    Sportsdata,
    /// Player directory from the public Sleeper API.
    Sleeper,
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::Sportsdata => "sportsdata",
            Job::Sleeper => "sleeper",
        }
    }

    pub fn endpoints(&self) -> Result<EndpointTable, RosterError> {
        match self {
            Job::Sportsdata => EndpointTable::from_pairs(SPORTSDATA_ENDPOINTS),
            Job::Sleeper => EndpointTable::from_pairs(SLEEPER_ENDPOINTS),
        }
    }

    pub fn source_settings(&self, config: &Config) -> SourceSettings {
        match self {
            Job::Sportsdata => SourceSettings::sportsdata(config),
            Job::Sleeper => SourceSettings::sleeper(config),
        }
    }

    /// Line logged once every endpoint has been processed.
    pub fn completion_message(&self) -> &'static str {
        match self {
            Job::Sportsdata => "NFL data ingestion completed.",
            Job::Sleeper => "Sleeper NFL data ingestion completed.",
        }
    }
}
