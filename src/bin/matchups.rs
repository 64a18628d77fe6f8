use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};
use tracing::{debug, info};

use matchup_estimator::bucket::WinBucket;
use matchup_estimator::config::EstimatorConfig;
use matchup_estimator::data::Snapshot;
use matchup_estimator::estimator::Estimator;
use matchup_estimator::file::ReadJsonFile;
use matchup_estimator::posterior::{AgainstRatingPolicy, AgainstSkillPolicy, Scope};
use matchup_estimator::print::{tabulate_buckets, tabulate_summaries};
use matchup_estimator::summary::Summary;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the snapshot from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// estimator config; defaults apply when omitted
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// condition the estimate on this player
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// named opponent of the player
    #[clap(short = 'o', long)]
    opponent: Option<String>,

    /// opponent skill when no opponent is named: 'own' or a quantile such as '25%'
    #[clap(long)]
    against_skill: Option<AgainstSkillPolicy>,

    /// opponent rating when no opponent is named: 'own' or a quantile such as '25%'
    #[clap(long)]
    against_rating: Option<AgainstRatingPolicy>,

    /// break the estimate down by character versions
    #[clap(long)]
    versions: bool,

    /// print the full bucket distribution of each estimate
    #[clap(long)]
    distribution: bool,

    /// list the players by games played and exit
    #[clap(long)]
    players: bool,

    /// the player's character; every roster pair is estimated when omitted
    c1: Option<String>,

    /// the opponent's character
    c2: Option<String>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.c1.is_some() != self.c2.is_some() {
            bail!("either both characters or neither must be specified");
        }
        if self.opponent.is_some() && self.player.is_none() {
            bail!("an opponent requires a player (-p)");
        }
        if self.versions && self.c1.is_none() {
            bail!("--versions requires both characters");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let snapshot = Snapshot::read_from_file(&args.file)?;
    if args.players {
        info!("\n{}", Console::default().render(&tabulate_players(&snapshot)));
        return Ok(());
    }

    let mut config = match &args.config {
        None => EstimatorConfig::default(),
        Some(path) => EstimatorConfig::read_json_file(path)
            .with_context(|| format!("reading config from {}", path.display()))?,
    };
    if let Some(skill) = args.against_skill {
        config.against.skill = skill;
    }
    if let Some(rating) = args.against_rating {
        config.against.rating = rating;
    }
    debug!("config: {config:?}");

    let estimator = Estimator::try_new(snapshot, config)?;
    let scope = match &args.player {
        None => Scope::Global,
        Some(player) => estimator.player_scope(player, args.opponent.as_deref()),
    };

    let series = match (&args.c1, &args.c2) {
        (Some(c1), Some(c2)) if args.versions => {
            let mut series = vec![];
            for versioned in estimator.estimate_versions(c1, c2, &scope)? {
                if let Some((v1, v2)) = &versioned.versions {
                    info!("{c1}@{v1} vs {c2}@{v2}");
                }
                series.push(versioned.buckets);
            }
            series
        }
        (Some(c1), Some(c2)) => vec![estimator.estimate(c1, c2, &scope)?],
        _ => estimator.estimate_roster(&scope)?,
    };

    let summaries = series
        .iter()
        .map(|buckets| estimator.summarize(buckets))
        .collect::<Result<Vec<_>, _>>()?;
    let entries: Vec<(&WinBucket, &Summary)> = series
        .iter()
        .filter_map(|buckets| buckets.first())
        .zip(summaries.iter())
        .collect();

    if args.distribution {
        for buckets in &series {
            info!("\n{}", Console::default().render(&tabulate_buckets(buckets)));
        }
    }
    info!("{scope}:\n{}", Console::default().render(&tabulate_summaries(&entries)));
    Ok(())
}

fn tabulate_players(snapshot: &Snapshot) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Player".into(), "Games".into()],
        ));
    for (player, games) in snapshot.players_by_games() {
        table.push_row(Row::new(
            Styles::default(),
            vec![player.to_string().into(), games.to_string().into()],
        ));
    }
    table
}
