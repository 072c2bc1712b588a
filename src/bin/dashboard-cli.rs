use std::collections::HashMap;

use clap::{Parser, Subcommand};

use hornets_dashboard::config::StatsApiConfig;
use hornets_dashboard::stats::game_log::build_game_log;
use hornets_dashboard::stats::service::compare_players;
use hornets_dashboard::stats::{Metric, StatsClient};

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Query the stats API the dashboard is built on", long_about = None)]
struct Cli {
    /// Stats API base URL
    #[arg(short, long, default_value = "https://api.balldontlie.io/v1")]
    url: String,

    /// API key; defaults to BALLDONTLIE_API_KEY from the environment or .env
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all teams
    Teams,
    /// Per-game log for one player, with season averages
    Games {
        #[arg(short, long)]
        player: u64,
        #[arg(short, long, default_value_t = 2024)]
        season: u32,
    },
    /// Rank players against each other
    Compare {
        /// Comma-separated player ids
        #[arg(short, long)]
        players: String,
        #[arg(short, long, default_value_t = 2024)]
        season: u32,
        /// Comma-separated metrics; the default set when omitted
        #[arg(short, long)]
        metrics: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = StatsApiConfig {
        base_url: cli.url.trim_end_matches('/').to_string(),
        api_key: cli
            .key
            .or_else(|| std::env::var("BALLDONTLIE_API_KEY").ok())
            .unwrap_or_default(),
        ..StatsApiConfig::default()
    };
    let client = StatsClient::new(&config)?;

    match cli.command {
        Commands::Teams => {
            let teams = client.list_teams().await?;
            println!("{:>4} {:<5} {:<26} {:<5} {}", "ID", "ABBR", "NAME", "CONF", "DIVISION");
            for t in &teams {
                println!(
                    "{:>4} {:<5} {:<26} {:<5} {}",
                    t.id, t.abbreviation, t.full_name, t.conference, t.division
                );
            }
            println!("\n{} teams", teams.len());

            match client.find_team(&config.team_name).await? {
                Some(team) => println!(
                    "{}: id {}, {} ({}), {} Conference, {} Division",
                    team.full_name, team.id, team.abbreviation, team.city, team.conference, team.division
                ),
                None => println!("{} not found", config.team_name),
            }
        }
        Commands::Games { player, season } => {
            let teams: HashMap<u64, String> = client
                .list_teams()
                .await?
                .into_iter()
                .map(|t| (t.id, t.abbreviation))
                .collect();
            let games = client.player_game_stats(player, season).await?;
            if games.is_empty() {
                println!("No games found for player {player} in {season}");
            } else {
                let log = build_game_log(&games, &teams);
                print!("{log}");
                println!("\n{} games, season {season}, player {player}", log.rows.len());
            }
        }
        Commands::Compare { players, season, metrics } => {
            let ids = players
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<u64>)
                .collect::<Result<Vec<_>, _>>()?;
            let mut metrics = match metrics {
                Some(list) => Metric::parse_list(&list)?,
                None => Vec::new(),
            };
            if metrics.is_empty() {
                metrics = Metric::DEFAULTS.to_vec();
            }
            let comparison = compare_players(&client, &ids, &metrics, season).await?;
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
    }

    Ok(())
}
