use core::fmt;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::bail;

#[derive(Clone, Copy)]
pub enum LeagueID {
    NBA,
}

pub enum Season {
    S(String),
}

#[derive(Clone, Copy)]
pub enum SeasonType {
    RegularSeason,
    Playoffs,
}

#[derive(Clone, Copy)]
pub enum TeamID {
    ID(i64),
}

#[derive(Clone, Copy)]
pub enum PlayerID {
    ID(i64),
}

/// Which statistic the shot chart endpoint counts per shot.
#[derive(Clone, Copy)]
pub enum ContextMeasure {
    Fga,
    Pts,
}

/// Win/loss game filter. `Any` leaves the parameter blank, which the
/// stats server treats as "no filter".
#[derive(Clone, Copy)]
pub enum Outcome {
    Any,
    Wins,
    Losses,
}

/// Home/road game filter.
#[derive(Clone, Copy)]
pub enum Location {
    Any,
    Home,
    Road,
}

#[derive(Clone, Copy)]
pub enum MeasureType {
    Base,
    Scoring,
    Advanced,
    FourFactors,
}

#[derive(Clone, Copy)]
pub enum PerMode {
    PerGame,
    Totals,
}

#[derive(Clone, Copy)]
pub enum LastNGames {
    N(i32),
}

impl Display for LeagueID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeagueID::NBA => write!(f, "LeagueID=00"),
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Season::S(season) => write!(f, "Season={}", season),
        }
    }
}

impl Season {
    pub fn label(&self) -> &str {
        match self {
            Season::S(season) => season,
        }
    }
}

impl Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeasonType::RegularSeason => write!(f, "SeasonType=Regular%20Season"),
            SeasonType::Playoffs => write!(f, "SeasonType=Playoffs"),
        }
    }
}

impl Display for TeamID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamID::ID(id) => write!(f, "TeamID={}", id),
        }
    }
}

impl Display for PlayerID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerID::ID(id) => write!(f, "PlayerID={}", id),
        }
    }
}

impl Display for ContextMeasure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContextMeasure::Fga => write!(f, "ContextMeasure=FGA"),
            ContextMeasure::Pts => write!(f, "ContextMeasure=PTS"),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Any => write!(f, "Outcome="),
            Outcome::Wins => write!(f, "Outcome=W"),
            Outcome::Losses => write!(f, "Outcome=L"),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Location::Any => write!(f, "Location="),
            Location::Home => write!(f, "Location=Home"),
            Location::Road => write!(f, "Location=Road"),
        }
    }
}

impl Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MeasureType::Base => write!(f, "MeasureType=Base"),
            MeasureType::Scoring => write!(f, "MeasureType=Scoring"),
            MeasureType::Advanced => write!(f, "MeasureType=Advanced"),
            MeasureType::FourFactors => write!(f, "MeasureType=Four%20Factors"),
        }
    }
}

impl Display for PerMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PerMode::PerGame => write!(f, "PerMode=PerGame"),
            PerMode::Totals => write!(f, "PerMode=Totals"),
        }
    }
}

impl Display for LastNGames {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LastNGames::N(n) => write!(f, "LastNGames={}", n),
        }
    }
}

impl FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "w" | "win" | "wins" => Ok(Outcome::Wins),
            "l" | "loss" | "losses" => Ok(Outcome::Losses),
            other => bail!("unknown outcome filter '{}', expected w or l", other),
        }
    }
}

impl FromStr for Location {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Location::Home),
            "road" | "away" => Ok(Location::Road),
            other => bail!("unknown location filter '{}', expected home or road", other),
        }
    }
}

impl FromStr for MeasureType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(MeasureType::Base),
            "scoring" => Ok(MeasureType::Scoring),
            "advanced" => Ok(MeasureType::Advanced),
            "four-factors" | "fourfactors" => Ok(MeasureType::FourFactors),
            other => bail!(
                "unknown measure type '{}', expected base, scoring, advanced or four-factors",
                other
            ),
        }
    }
}

impl Default for LeagueID {
    fn default() -> Self {
        LeagueID::NBA
    }
}

impl Default for Season {
    fn default() -> Self {
        let current_date = chrono::Utc::now();
        let prior_date = current_date - chrono::Duration::days(365);
        let first_year = prior_date.format("%Y").to_string();
        let second_year = current_date.format("%y").to_string();
        Season::S(format!("{}-{}", first_year, second_year))
    }
}

impl Default for SeasonType {
    fn default() -> Self {
        SeasonType::RegularSeason
    }
}

impl Default for TeamID {
    fn default() -> Self {
        TeamID::ID(0)
    }
}

impl Default for ContextMeasure {
    fn default() -> Self {
        ContextMeasure::Fga
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Any
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::Any
    }
}

impl Default for MeasureType {
    fn default() -> Self {
        MeasureType::Base
    }
}

impl Default for PerMode {
    fn default() -> Self {
        PerMode::PerGame
    }
}

impl Default for LastNGames {
    fn default() -> Self {
        LastNGames::N(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_url_fragments() {
        assert_eq!(LeagueID::NBA.to_string(), "LeagueID=00");
        assert_eq!(Season::S("2022-23".to_string()).to_string(), "Season=2022-23");
        assert_eq!(SeasonType::Playoffs.to_string(), "SeasonType=Playoffs");
        assert_eq!(
            SeasonType::RegularSeason.to_string(),
            "SeasonType=Regular%20Season"
        );
        assert_eq!(TeamID::ID(1610612749).to_string(), "TeamID=1610612749");
        assert_eq!(
            MeasureType::FourFactors.to_string(),
            "MeasureType=Four%20Factors"
        );
        assert_eq!(Outcome::Any.to_string(), "Outcome=");
        assert_eq!(Location::Road.to_string(), "Location=Road");
    }

    #[test]
    fn parses_cli_filters() {
        assert!(matches!("w".parse::<Outcome>().unwrap(), Outcome::Wins));
        assert!(matches!("Losses".parse::<Outcome>().unwrap(), Outcome::Losses));
        assert!("draw".parse::<Outcome>().is_err());
        assert!(matches!("home".parse::<Location>().unwrap(), Location::Home));
        assert!(matches!("away".parse::<Location>().unwrap(), Location::Road));
        assert!(matches!(
            "four-factors".parse::<MeasureType>().unwrap(),
            MeasureType::FourFactors
        ));
        assert!("hustle".parse::<MeasureType>().is_err());
    }

    #[test]
    fn default_season_is_well_formed() {
        let s = Season::default();
        let label = s.label();
        assert_eq!(label.len(), 7);
        assert_eq!(&label[4..5], "-");
    }
}
