use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use solar_tour_planner::config::{TourConfig, load_bodies, load_tour};
use solar_tour_planner::ephemeris::Ephemeris;
use solar_tour_planner::export;
use solar_tour_planner::time::seconds_to_days;
use solar_tour_planner::transfer::{SummaryKind, TourPlan, catalog, plan_tour};
use solar_tour_planner::units::m_to_km;
use tracing::{Level, info};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Plan a constant-acceleration tour of planetary systems"
)]
struct Cli {
    /// Tour definition (TOML or YAML); defaults to the reference Mercury..Neptune tour
    #[arg(long)]
    config: Option<PathBuf>,

    /// Circular-orbit body catalog used by the `circular` ephemeris
    #[arg(long, default_value = "configs/bodies.yaml")]
    bodies: PathBuf,

    /// Ephemeris backend
    #[arg(long, value_enum, default_value_t = Backend::Circular)]
    ephemeris: Backend,

    /// Override the mission start (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    start: Option<String>,

    /// Override the constant acceleration in m/s^2
    #[arg(long)]
    acceleration: Option<f64>,

    /// Write the leg-by-leg itinerary as CSV (`-` for stdout)
    #[arg(long)]
    itinerary_csv: Option<PathBuf>,

    /// Write the system-by-system summary as CSV (`-` for stdout)
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Write the whole plan as JSON (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// More log output (repeat for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Backend {
    Circular,
    Spice,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_tour(path)
            .with_context(|| format!("failed to load tour from {}", path.display()))?,
        None => TourConfig::default(),
    };
    if let Some(start) = &cli.start {
        config.start = start.clone();
    }
    if let Some(acceleration) = cli.acceleration {
        config.solver.acceleration_m_s2 = acceleration;
    }

    let ephemeris = open_ephemeris(cli.ephemeris, &cli.bodies)?;
    info!(
        systems = config.systems.len(),
        start = %config.start,
        backend = ?cli.ephemeris,
        "planning tour"
    );
    let plan = plan_tour(ephemeris.as_ref(), &config).context("tour planning failed")?;

    print_summary(&plan);
    print_candidates(&plan);
    print_itinerary(&plan);

    if let Some(path) = &cli.itinerary_csv {
        export::itinerary::write_to_path(path, &plan.itinerary)
            .with_context(|| format!("failed to write itinerary to {}", path.display()))?;
    }
    if let Some(path) = &cli.summary_csv {
        export::summary::write_to_path(path, &plan.summary)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        export::plan::write_json_to_path(path, &plan)
            .with_context(|| format!("failed to write plan to {}", path.display()))?;
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn open_ephemeris(backend: Backend, bodies: &Path) -> anyhow::Result<Box<dyn Ephemeris>> {
    match backend {
        Backend::Circular => {
            let records = load_bodies(bodies)
                .with_context(|| format!("failed to load body catalog {}", bodies.display()))?;
            let ephemeris = catalog::from_config(&records).context("invalid body catalog")?;
            Ok(Box::new(ephemeris))
        }
        Backend::Spice => open_spice(),
    }
}

#[cfg(feature = "spice")]
fn open_spice() -> anyhow::Result<Box<dyn Ephemeris>> {
    use solar_tour_planner::ephemeris::SpiceEphemeris;

    let ephemeris = SpiceEphemeris::new().context("failed to load SPICE kernels")?;
    Ok(Box::new(ephemeris))
}

#[cfg(not(feature = "spice"))]
fn open_spice() -> anyhow::Result<Box<dyn Ephemeris>> {
    anyhow::bail!("this build has no SPICE support; rebuild with `--features spice`")
}

fn print_summary(plan: &TourPlan) {
    println!("=== SYSTEM-BY-SYSTEM SUMMARY ===");
    println!(
        "{:<34} {:<52} {:<10} {:<10} {:>14}",
        "System", "Route", "Start", "Finish", "Internal days"
    );
    for entry in &plan.summary {
        println!(
            "{:<34} {:<52} {:<10} {:<10} {:>14.2}",
            entry.label,
            entry.route_label(),
            entry.start.to_date_string(),
            entry.finish.to_date_string(),
            seconds_to_days(entry.internal_time_s),
        );
    }
}

fn print_candidates(plan: &TourPlan) {
    let systems = plan
        .summary
        .iter()
        .filter(|entry| entry.kind == SummaryKind::System && entry.candidates.len() > 1);
    for entry in systems {
        println!();
        println!("{}: candidate routes (planet-first, fastest first)", entry.label);
        for candidate in &entry.candidates {
            println!(
                "   {} -> internal travel time: {:.2} days",
                candidate.order.join(" -> "),
                seconds_to_days(candidate.total_s)
            );
        }
    }
}

fn print_itinerary(plan: &TourPlan) {
    println!();
    println!("=== FULL ITINERARY (LEG-BY-LEG) ===");
    println!(
        "{:<28} {:<10} {:<10} {:<19} {:<19} {:>11} {:>12} {:>5}",
        "System", "From", "To", "Departure UTC", "Arrival UTC", "Travel days", "Peak km/s", "Iter"
    );
    for leg in &plan.itinerary {
        let iterations = if leg.converged {
            leg.iterations.to_string()
        } else {
            format!("{}*", leg.iterations)
        };
        println!(
            "{:<28} {:<10} {:<10} {:<19} {:<19} {:>11.3} {:>12.3} {:>5}",
            leg.system,
            leg.from,
            leg.to,
            leg.departure.to_utc_string(),
            leg.arrival.to_utc_string(),
            leg.travel_days(),
            m_to_km(leg.peak_speed_m_s),
            iterations,
        );
    }

    if !plan.diagnostics.is_empty() {
        println!();
        println!("=== DIAGNOSTICS ===");
        for diagnostic in &plan.diagnostics {
            println!("{}: {}", diagnostic.scope, diagnostic.message);
        }
    }

    match plan.final_arrival() {
        Some(arrival) => println!("\nFinal arrival time: {}", arrival.to_utc_string()),
        None => println!("\nNo travel legs recorded!"),
    }
}
