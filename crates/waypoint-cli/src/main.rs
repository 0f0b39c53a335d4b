use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use waypoint_lib::{
    find_nearby, fuzzy, has_cycle, ingest, load_map, optimize_tour, plan_route, subgraph,
    BoundingBox, PathAlgorithm, PoiMap, RouteRequest, SearchBudget, TourStrategy,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Point-of-interest map queries and route planning")]
struct Cli {
    /// Path to the point-of-interest CSV file.
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List location names starting with a prefix (case-insensitive).
    Autocomplete {
        /// Name prefix to complete.
        prefix: String,
    },
    /// Print the coordinates of a named location.
    Position {
        /// Exact location name.
        name: String,
    },
    /// List every category tag in the data set.
    Categories,
    /// List the locations carrying a category tag.
    InCategory {
        /// Category tag, matched case-insensitively.
        category: String,
    },
    /// List the locations whose full name matches a regular expression.
    MatchName {
        /// Regular expression matched against the entire name.
        pattern: String,
    },
    /// Find a stored name within edit distance two of the query.
    ClosestName {
        /// Possibly misspelled location name.
        query: String,
    },
    /// Compute the shortest route between two named locations.
    Route {
        /// Starting location name.
        #[arg(long = "from")]
        from: String,
        /// Destination location name.
        #[arg(long = "to")]
        to: String,
        #[arg(long, value_enum, default_value_t = Algorithm::Dijkstra)]
        algorithm: Algorithm,
        /// Abort the search after this many milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Emit the route as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Optimize a closed multi-stop tour over location ids.
    Tour {
        /// Location ids to visit; the tour starts and ends at the first.
        #[arg(required = true)]
        stops: Vec<String>,
        #[arg(long, value_enum, default_value_t = Strategy::Backtracking)]
        strategy: Strategy,
        /// Abort the search after this many milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Emit the search result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Find locations with a category tag near a named origin.
    Nearby {
        /// Category tag, matched case-sensitively.
        category: String,
        /// Origin location name.
        origin: String,
        /// Search radius in miles.
        #[arg(long, default_value_t = 10.0)]
        radius: f64,
        /// Maximum number of results.
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Report whether the locations inside a bounding box form a cycle.
    Cycle {
        #[arg(long, allow_negative_numbers = true)]
        min_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        max_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        max_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        min_lat: f64,
    },
    /// Order locations so every dependency is visited first.
    Schedule {
        /// CSV file of location names.
        #[arg(long)]
        locations: PathBuf,
        /// CSV file of (prerequisite, dependent) chains.
        #[arg(long)]
        dependencies: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Algorithm {
    Dijkstra,
    BellmanFord,
}

impl From<Algorithm> for PathAlgorithm {
    fn from(value: Algorithm) -> Self {
        match value {
            Algorithm::Dijkstra => PathAlgorithm::Dijkstra,
            Algorithm::BellmanFord => PathAlgorithm::BellmanFord,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", PathAlgorithm::from(*self))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    BruteForce,
    Backtracking,
    TwoOpt,
}

impl From<Strategy> for TourStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::BruteForce => TourStrategy::BruteForce,
            Strategy::Backtracking => TourStrategy::Backtracking,
            Strategy::TwoOpt => TourStrategy::TwoOpt,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", TourStrategy::from(*self))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data = cli.data.as_deref();

    match cli.command {
        Command::Autocomplete { prefix } => handle_autocomplete(data, &prefix),
        Command::Position { name } => handle_position(data, &name),
        Command::Categories => handle_categories(data),
        Command::InCategory { category } => handle_in_category(data, &category),
        Command::MatchName { pattern } => handle_match_name(data, &pattern),
        Command::ClosestName { query } => handle_closest_name(data, &query),
        Command::Route {
            from,
            to,
            algorithm,
            timeout_ms,
            json,
        } => handle_route(data, &from, &to, algorithm, timeout_ms, json),
        Command::Tour {
            stops,
            strategy,
            timeout_ms,
            json,
        } => handle_tour(data, &stops, strategy, timeout_ms, json),
        Command::Nearby {
            category,
            origin,
            radius,
            count,
        } => handle_nearby(data, &category, &origin, radius, count),
        Command::Cycle {
            min_lon,
            max_lon,
            max_lat,
            min_lat,
        } => handle_cycle(data, min_lon, max_lon, max_lat, min_lat),
        Command::Schedule {
            locations,
            dependencies,
        } => handle_schedule(&locations, &dependencies),
    }
}

fn load_data(path: Option<&Path>) -> Result<PoiMap> {
    let path = path.context("this command needs --data <FILE> pointing at the point CSV")?;
    load_map(path).with_context(|| format!("failed to load point data from {}", path.display()))
}

fn budget_from(timeout_ms: Option<u64>) -> SearchBudget {
    match timeout_ms {
        Some(ms) => SearchBudget::unlimited().timeout(Duration::from_millis(ms)),
        None => SearchBudget::unlimited(),
    }
}

fn handle_autocomplete(data: Option<&Path>, prefix: &str) -> Result<()> {
    let map = load_data(data)?;
    let names = map.autocomplete(prefix);
    if names.is_empty() {
        println!("No names start with '{prefix}'");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn handle_position(data: Option<&Path>, name: &str) -> Result<()> {
    let map = load_data(data)?;
    let (lat, lon) = map.position_by_name(name)?;
    println!("{name}: ({lat}, {lon})");
    Ok(())
}

fn handle_categories(data: Option<&Path>) -> Result<()> {
    let map = load_data(data)?;
    for category in map.all_categories() {
        println!("{category}");
    }
    Ok(())
}

fn handle_in_category(data: Option<&Path>, category: &str) -> Result<()> {
    let map = load_data(data)?;
    let positions = map.locations_by_category(category);
    if positions.is_empty() {
        println!("No locations tagged '{category}'");
        return Ok(());
    }
    for (lat, lon) in positions {
        println!("({lat}, {lon})");
    }
    Ok(())
}

fn handle_match_name(data: Option<&Path>, pattern: &str) -> Result<()> {
    let map = load_data(data)?;
    for (lat, lon) in map.locations_by_name_pattern(pattern)? {
        println!("({lat}, {lon})");
    }
    Ok(())
}

fn handle_closest_name(data: Option<&Path>, query: &str) -> Result<()> {
    let map = load_data(data)?;
    match fuzzy::closest_name(&map, query) {
        Some(name) => println!("Did you mean '{name}'?"),
        None => println!("No close match for '{query}'"),
    }
    Ok(())
}

fn handle_route(
    data: Option<&Path>,
    from: &str,
    to: &str,
    algorithm: Algorithm,
    timeout_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let map = load_data(data)?;
    let request = RouteRequest {
        start: from.to_string(),
        goal: to.to_string(),
        algorithm: algorithm.into(),
        budget: budget_from(timeout_ms),
    };
    let plan = plan_route(&map, &request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "Route ({}, {} hops, {:.3} miles):",
        plan.algorithm,
        plan.hop_count(),
        plan.length
    );
    for id in &plan.steps {
        println!("- {} ({})", map.name(id)?, id);
    }
    Ok(())
}

fn handle_tour(
    data: Option<&Path>,
    stops: &[String],
    strategy: Strategy,
    timeout_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let map = load_data(data)?;
    let search = optimize_tour(&map, stops, strategy.into(), &budget_from(timeout_ms))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&search)?);
        return Ok(());
    }

    println!("Best tour: {:.3} miles", search.length);
    if let Some(best) = search.best() {
        for id in &best.stops {
            println!("- {} ({})", map.name(id)?, id);
        }
    }
    Ok(())
}

fn handle_nearby(
    data: Option<&Path>,
    category: &str,
    origin: &str,
    radius: f64,
    count: usize,
) -> Result<()> {
    let map = load_data(data)?;
    let found = find_nearby(&map, category, origin, radius, count)?;
    if found.is_empty() {
        println!("No '{category}' locations within {radius} miles of {origin}");
        return Ok(());
    }
    for id in found {
        println!("- {} ({})", map.name(&id)?, id);
    }
    Ok(())
}

fn handle_cycle(
    data: Option<&Path>,
    min_lon: f64,
    max_lon: f64,
    max_lat: f64,
    min_lat: f64,
) -> Result<()> {
    let map = load_data(data)?;
    let bbox = BoundingBox::new(min_lon, max_lon, max_lat, min_lat)?;
    let members = subgraph(&map, &bbox);
    let cyclic = has_cycle(&map, &members);
    println!(
        "{} locations in the region; cycle: {}",
        members.len(),
        if cyclic { "yes" } else { "no" }
    );
    Ok(())
}

fn handle_schedule(locations: &Path, dependencies: &Path) -> Result<()> {
    let names = ingest::read_locations(locations)
        .with_context(|| format!("failed to read locations from {}", locations.display()))?;
    let edges = ingest::read_dependencies(dependencies)
        .with_context(|| format!("failed to read dependencies from {}", dependencies.display()))?;

    let order = waypoint_lib::topological_order(&names, &edges)?;
    for (index, name) in order.iter().enumerate() {
        println!("{}. {}", index + 1, name);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
