mod nba;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use nba::analysis;
use nba::chart;
use nba::db::{StatsDb, DB_FILE};
use nba::endpoints::{CommonAllPlayers, LeagueDashTeamStats, ShotChartDetail};
use nba::params::{Location, MeasureType, Outcome, PlayerID, Season, SeasonType, TeamID};
use nba::shots::{self, SummaryMode};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct HoopLensCli {
    #[clap(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Zone-aggregated shot chart for one player
    Shotchart {
        player_name: String,

        /// Seasons in YYYY-YY form, defaults to the current season
        #[clap(short, long)]
        seasons: Vec<String>,

        #[clap(long)]
        playoffs: bool,

        /// percentage or ev
        #[clap(short, long, default_value = "percentage")]
        mode: String,

        /// Only wins (w) or losses (l)
        #[clap(long)]
        outcome: Option<String>,

        /// Only home or road games
        #[clap(long)]
        location: Option<String>,

        /// Draw the text-mode court chart
        #[clap(long)]
        court: bool,

        /// Also print make rate per foot of distance
        #[clap(long)]
        distances: bool,
    },
    /// Regress team metrics against win percentage over seasons
    Teamstats {
        /// Team to analyze, all teams when omitted
        #[clap(short, long)]
        team_name: Option<String>,

        #[clap(short, long)]
        seasons: Vec<String>,

        /// base, scoring, advanced or four-factors
        #[clap(short, long, default_value = "scoring")]
        measure: String,

        #[clap(long)]
        playoffs: bool,
    },
    /// Search the cached player and team index
    Lookup {
        #[clap(short, long)]
        player_name: Option<String>,

        #[clap(short, long)]
        team_name: Option<String>,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = HoopLensCli::parse();
    match args.cmd {
        Commands::Shotchart {
            player_name,
            seasons,
            playoffs,
            mode,
            outcome,
            location,
            court,
            distances,
        } => run_shotchart(
            &player_name,
            seasons,
            playoffs,
            &mode,
            outcome,
            location,
            court,
            distances,
        ),
        Commands::Teamstats {
            team_name,
            seasons,
            measure,
            playoffs,
        } => run_teamstats(team_name, seasons, &measure, playoffs),
        Commands::Lookup {
            player_name,
            team_name,
        } => run_lookup(player_name, team_name),
    }
}

fn roster_endpoint() -> CommonAllPlayers {
    CommonAllPlayers {
        league_id: Default::default(),
        season: Default::default(),
    }
}

fn season_type(playoffs: bool) -> SeasonType {
    if playoffs {
        SeasonType::Playoffs
    } else {
        SeasonType::RegularSeason
    }
}

fn requested_seasons(seasons: Vec<String>) -> Vec<String> {
    if seasons.is_empty() {
        vec![Season::default().label().to_string()]
    } else {
        seasons
    }
}

fn run_shotchart(
    player_name: &str,
    seasons: Vec<String>,
    playoffs: bool,
    mode: &str,
    outcome: Option<String>,
    location: Option<String>,
    court: bool,
    distances: bool,
) -> Result<()> {
    let mode: SummaryMode = mode.parse()?;
    let outcome: Outcome = match outcome {
        Some(ref s) => s.parse()?,
        None => Outcome::Any,
    };
    let location: Location = match location {
        Some(ref s) => s.parse()?,
        None => Location::Any,
    };

    let mut db = StatsDb::open(DB_FILE)?;
    db.ensure_players(&roster_endpoint())?;
    let player = db.resolve_player(player_name)?;
    println!(
        "{} ({}) {}",
        player.display_name, player.team_abbreviation, player.years
    );

    let mut records = Vec::new();
    for season in requested_seasons(seasons) {
        let endpoint = ShotChartDetail {
            league_id: Default::default(),
            team_id: Default::default(),
            player_id: PlayerID::ID(player.person_id),
            season: Season::S(season.clone()),
            season_type: season_type(playoffs),
            context_measure: Default::default(),
            outcome,
            location,
            last_n_games: Default::default(),
        };
        let season_shots = endpoint.fetch_shots()?;
        if season_shots.is_empty() {
            log::warn!("no shots for {} in {}", player.display_name, season);
        } else {
            log::info!("{}: {} shots", season, season_shots.len());
        }
        records.extend(season_shots);
    }

    let summaries = shots::summarize(&records, mode);
    if summaries.is_empty() {
        println!("no shots found for the requested seasons");
        return Ok(());
    }
    println!("{}", chart::summary_table(&summaries));
    if court {
        println!("{}", chart::court_text(&summaries));
    }
    if distances {
        let buckets = shots::bucket_by_distance(&records);
        println!("{}", chart::distance_table(&buckets));
    }
    Ok(())
}

fn run_teamstats(
    team_name: Option<String>,
    seasons: Vec<String>,
    measure: &str,
    playoffs: bool,
) -> Result<()> {
    let measure_type: MeasureType = measure.parse()?;
    let team_id = match team_name {
        Some(ref name) => {
            let mut db = StatsDb::open(DB_FILE)?;
            db.ensure_players(&roster_endpoint())?;
            let team = db
                .find_team(name)?
                .with_context(|| format!("no team matching '{}'", name))?;
            println!(
                "({}) {} {}",
                team.team_abbreviation, team.team_city, team.team_name
            );
            TeamID::ID(team.team_id)
        }
        None => TeamID::default(),
    };

    let mut frames = Vec::new();
    for season in requested_seasons(seasons) {
        let endpoint = LeagueDashTeamStats {
            league_id: Default::default(),
            team_id,
            season: Season::S(season.clone()),
            season_type: season_type(playoffs),
            measure_type,
            per_mode: Default::default(),
            location: Default::default(),
            last_n_games: Default::default(),
        };
        frames.push((season, endpoint.fetch_frame()?));
    }

    match analysis::combine_seasons(frames)? {
        Some(combined) => {
            let fits = analysis::fit_scores(&combined)?;
            println!("{}", chart::fits_table(&fits));
        }
        None => println!("no team stats found for the requested seasons"),
    }
    Ok(())
}

fn run_lookup(player_name: Option<String>, team_name: Option<String>) -> Result<()> {
    let mut db = StatsDb::open(DB_FILE)?;
    db.ensure_players(&roster_endpoint())?;
    match (player_name, team_name) {
        (Some(p), _) => {
            for entry in db.find_players(&p)? {
                println!(
                    "{} {} ({}) {}",
                    entry.person_id, entry.display_name, entry.team_abbreviation, entry.years
                );
            }
        }
        (_, Some(t)) => match db.find_team(&t)? {
            Some(team) => println!(
                "{} ({}) {} {}",
                team.team_id, team.team_abbreviation, team.team_city, team.team_name
            ),
            None => println!("no team matching {}", t),
        },
        (_, _) => println!("unsupported args"),
    }
    Ok(())
}
