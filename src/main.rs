use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use internship_matcher::allocation::{
    recommend, run_allocation, simulate_skill_gain, skill_gaps, summarize, AllocationRun,
    AllocationThresholds, MatchSummary, Recommendation, SkillGainResult, SkillGap,
};
use internship_matcher::catalog::{provider_from_config, DataProvider, OpportunityFilter};
use internship_matcher::config::{Config, ConfigOverrides};
use internship_matcher::output::csv::{
    allocation_to_csv, candidates_to_csv, ranked_to_csv, recommendations_to_csv,
};
use internship_matcher::output::json::render_json;
use internship_matcher::output::table::{
    render_allocation_table, render_candidates_table, render_opportunities_table,
    render_profiles_table, render_ranked_table, render_recommendations_table,
    render_score_table, render_skill_gaps_table, render_summary_table, render_whatif_table,
};
use internship_matcher::profile::{
    describe_issues, normalize_profile, validate_profile, Opportunity, Profile, ProfileInput,
};
use internship_matcher::scoring::{
    rank_candidates, rank_opportunities, score_matrix, MatchResult, MatchScorer, RankedCandidate,
    RankedMatch, WeightPreset,
};
use internship_matcher::server::run_server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SampleKind {
    Profiles,
    Opportunities,
}

#[derive(Debug, Parser)]
#[command(
    name = "internship-matcher",
    about = "Score, rank and allocate internship matches"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Weight split: enhanced (50/25/15/10) or classic (40/20/20/20).
    #[arg(long)]
    preset: Option<WeightPreset>,
    /// builtin, generated, or a path to a catalog JSON file.
    #[arg(long)]
    catalog: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct ProfileArgs {
    /// Catalog profile id or name.
    #[arg(long)]
    profile: Option<String>,
    /// JSON file holding a single profile.
    #[arg(long = "profile-file")]
    profile_file: Option<PathBuf>,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct FilterArgs {
    #[arg(long = "remote-only")]
    remote_only: bool,
    #[arg(long)]
    domain: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// Fuzzy match against title, company and domain.
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long = "min-score")]
    min_score: Option<u8>,
}

impl From<FilterArgs> for OpportunityFilter {
    fn from(value: FilterArgs) -> Self {
        Self {
            remote_only: value.remote_only,
            domain: value.domain,
            location: value.location,
            query: value.query,
            min_score: value.min_score,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score one profile against one opportunity.
    Score {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        opportunity: String,
    },
    /// Rank every opportunity for a profile.
    Rank {
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        limit: Option<usize>,
        /// Also list the most frequently missing skills.
        #[arg(long, default_value_t = 0)]
        gaps: usize,
    },
    /// Rank every profile for an opportunity.
    Candidates {
        #[arg(long)]
        opportunity: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    Recommend {
        #[arg(long = "min-score")]
        min_score: Option<u8>,
        #[arg(long)]
        top: Option<usize>,
    },
    Allocate {
        #[arg(long)]
        pending: Option<u8>,
        #[arg(long)]
        waitlist: Option<u8>,
        /// Entry ids to approve after the run.
        #[arg(long, value_delimiter = ',')]
        approve: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        reject: Vec<String>,
    },
    Summary,
    /// Re-score a profile as if it had learned extra skills.
    Whatif {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long = "skill", value_delimiter = ',', required = true)]
        skills: Vec<String>,
    },
    /// List the loaded catalog.
    Sample {
        #[arg(value_enum, default_value_t = SampleKind::Opportunities)]
        kind: SampleKind,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        preset: cli.preset,
        catalog_source: cli.catalog.clone(),
        seed: cli.seed,
    });
    init_logging(&config.logging.level);

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let provider = provider_from_config(&config.catalog)?;
    let scorer = MatchScorer::new(&config.weights);

    match &cli.command {
        Commands::Score {
            profile,
            opportunity,
        } => {
            let profile = resolve_profile(provider.as_ref(), profile)?;
            let opportunities = provider.opportunities()?;
            let opportunity = find_opportunity(&opportunities, opportunity)?;
            let result = scorer.score(&profile, opportunity);
            info!(
                profile = %profile.id,
                opportunity = %opportunity.id,
                score = result.score,
                "scored pair"
            );
            print_score(&result, cli.output)?;
        }
        Commands::Rank {
            profile,
            filter,
            limit,
            gaps,
        } => {
            let profile = resolve_profile(provider.as_ref(), profile)?;
            let filter: OpportunityFilter = filter.clone().into();
            let opportunities = filter.apply(&provider.opportunities()?);
            let ranked = rank_opportunities(&scorer, &profile, &opportunities);
            let missing = skill_gaps(&ranked, *gaps);
            let mut ranked = filter.apply_min_score(ranked);
            if let Some(limit) = limit {
                ranked.truncate(*limit);
            }
            print_ranked(&ranked, cli.output)?;
            if *gaps > 0 {
                print_skill_gaps(&missing, cli.output)?;
            }
        }
        Commands::Candidates { opportunity, limit } => {
            let opportunities = provider.opportunities()?;
            let opportunity = find_opportunity(&opportunities, opportunity)?;
            let mut candidates = rank_candidates(&scorer, opportunity, &provider.profiles()?);
            if let Some(limit) = limit {
                candidates.truncate(*limit);
            }
            print_candidates(&candidates, cli.output)?;
        }
        Commands::Recommend { min_score, top } => {
            let recommendations = recommend(
                &scorer,
                &provider.profiles()?,
                &provider.opportunities()?,
                min_score.unwrap_or(config.ranking.min_score),
                top.unwrap_or(config.ranking.top).max(1),
            );
            print_recommendations(&recommendations, cli.output)?;
        }
        Commands::Allocate {
            pending,
            waitlist,
            approve,
            reject,
        } => {
            let defaults = config.thresholds();
            let thresholds = AllocationThresholds {
                pending: pending.unwrap_or(defaults.pending),
                waitlist: waitlist.unwrap_or(defaults.waitlist),
            };
            if thresholds.waitlist > thresholds.pending {
                return Err(anyhow!(
                    "waitlist threshold ({}) cannot exceed pending threshold ({})",
                    thresholds.waitlist,
                    thresholds.pending
                ));
            }
            let mut run = run_allocation(
                &scorer,
                &provider.profiles()?,
                &provider.opportunities()?,
                thresholds,
            );
            for id in approve {
                run.review(id, true)?;
            }
            for id in reject {
                run.review(id, false)?;
            }
            print_allocation(&run, cli.output)?;
        }
        Commands::Summary => {
            let matrix = score_matrix(&scorer, &provider.profiles()?, &provider.opportunities()?);
            print_summary(&summarize(&matrix), cli.output)?;
        }
        Commands::Whatif { profile, skills } => {
            if skills.iter().all(|s| s.trim().is_empty()) {
                return Err(anyhow!("at least one --skill is required for whatif"));
            }
            let profile = resolve_profile(provider.as_ref(), profile)?;
            let result =
                simulate_skill_gain(&scorer, &profile, &provider.opportunities()?, skills);
            print_whatif(&result, cli.output)?;
        }
        Commands::Sample { kind } => print_sample(provider.as_ref(), *kind, cli.output)?,
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn resolve_profile(provider: &dyn DataProvider, args: &ProfileArgs) -> Result<Profile> {
    if let Some(path) = &args.profile_file {
        return load_profile_file(path);
    }
    let Some(key) = args.profile.as_deref() else {
        return Err(anyhow!("either --profile or --profile-file is required"));
    };
    let profiles = provider.profiles()?;
    profiles
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| anyhow!("profile not found in {} catalog: {key}", provider.name()))
}

fn load_profile_file(path: &Path) -> Result<Profile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading profile: {}", path.display()))?;
    let input: ProfileInput = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing profile JSON: {}", path.display()))?;
    let profile = normalize_profile(input, 0);
    validate_profile(&profile)
        .map_err(|issues| anyhow!("invalid profile {}: {}", path.display(), describe_issues(&issues)))?;
    Ok(profile)
}

fn find_opportunity<'a>(opportunities: &'a [Opportunity], id: &str) -> Result<&'a Opportunity> {
    opportunities
        .iter()
        .find(|o| o.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| anyhow!("opportunity not found: {id}"))
}

fn print_score(result: &MatchResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_score_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => {
            warn!("CSV output for score not implemented, using JSON");
            println!("{}", render_json(result)?);
        }
    }
    Ok(())
}

fn print_ranked(matches: &[RankedMatch], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_ranked_table(matches)),
        OutputFormat::Json => println!("{}", render_json(matches)?),
        OutputFormat::Csv => print!("{}", ranked_to_csv(matches)?),
    }
    Ok(())
}

fn print_skill_gaps(gaps: &[SkillGap], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_skill_gaps_table(gaps)),
        OutputFormat::Json => println!("{}", render_json(gaps)?),
        OutputFormat::Csv => {
            warn!("CSV output for skill gaps not implemented, using JSON");
            println!("{}", render_json(gaps)?);
        }
    }
    Ok(())
}

fn print_candidates(candidates: &[RankedCandidate], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_candidates_table(candidates)),
        OutputFormat::Json => println!("{}", render_json(candidates)?),
        OutputFormat::Csv => print!("{}", candidates_to_csv(candidates)?),
    }
    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_recommendations_table(recommendations)),
        OutputFormat::Json => println!("{}", render_json(recommendations)?),
        OutputFormat::Csv => print!("{}", recommendations_to_csv(recommendations)?),
    }
    Ok(())
}

fn print_allocation(run: &AllocationRun, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_allocation_table(run)),
        OutputFormat::Json => println!("{}", render_json(run)?),
        OutputFormat::Csv => print!("{}", allocation_to_csv(run)?),
    }
    Ok(())
}

fn print_summary(summary: &MatchSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_summary_table(summary)),
        OutputFormat::Json => println!("{}", render_json(summary)?),
        OutputFormat::Csv => {
            warn!("CSV output for summary not implemented, using JSON");
            println!("{}", render_json(summary)?);
        }
    }
    Ok(())
}

fn print_whatif(result: &SkillGainResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_whatif_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => {
            warn!("CSV output for whatif not implemented, using JSON");
            println!("{}", render_json(result)?);
        }
    }
    Ok(())
}

fn print_sample(
    provider: &dyn DataProvider,
    kind: SampleKind,
    format: OutputFormat,
) -> Result<()> {
    match kind {
        SampleKind::Profiles => {
            let profiles = provider.profiles()?;
            match format {
                OutputFormat::Table => println!("{}", render_profiles_table(&profiles)),
                _ => println!("{}", render_json(&profiles)?),
            }
        }
        SampleKind::Opportunities => {
            let opportunities = provider.opportunities()?;
            match format {
                OutputFormat::Table => println!("{}", render_opportunities_table(&opportunities)),
                _ => println!("{}", render_json(&opportunities)?),
            }
        }
    }
    Ok(())
}
