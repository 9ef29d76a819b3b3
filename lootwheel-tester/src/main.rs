mod distribution;
mod reports;
mod simulation;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use lootwheel_core::{Catalog, Category, ConfigStore, MemoryStorage, ReelTiming};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use distribution::sample_category;
use reports::RunReport;
use simulation::simulate_spins;
use util::{parse_categories, parse_weight_overrides, resolve_candidate, split_csv};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimingProfile {
    /// Fast start slowing in steps
    Staged,
    /// One constant scroll speed
    Constant,
}

impl TimingProfile {
    fn timing(self) -> ReelTiming {
        match self {
            Self::Staged => ReelTiming::staged(),
            Self::Constant => ReelTiming::constant(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lootwheel-tester", version = "0.1.0")]
#[command(about = "Checks loot wheel draw distributions and reel settling")]
struct Args {
    /// Categories to sample (comma-separated keys or spinner ids, or "all")
    #[arg(long, default_value = "all")]
    category: String,

    /// Draws per sampled category
    #[arg(long, default_value_t = 10_000)]
    draws: usize,

    /// Seed for the sampling generator
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Base weight multiplier
    #[arg(long, default_value_t = 3.0)]
    multiplier: f64,

    /// Square weights before the multiplier (default)
    #[arg(long, conflicts_with = "linear")]
    quadratic: bool,

    /// Use weights as-is
    #[arg(long)]
    linear: bool,

    /// Candidates to disable: `category:candidate` or a bare label (comma-separated)
    #[arg(long, default_value = "")]
    disable: String,

    /// Weight overrides: `name=value` where name is `category:candidate` or a bare label
    #[arg(long, default_value = "")]
    weights: String,

    /// Spin-all rounds to simulate on a fake clock (0 skips the simulation)
    #[arg(long, default_value_t = 20)]
    spins: usize,

    /// Reel timing profile for the simulation
    #[arg(long, value_enum, default_value_t = TimingProfile::Staged)]
    timing: TimingProfile,

    /// Largest allowed gap between expected and observed shares
    #[arg(long, default_value_t = 0.02)]
    tolerance: f64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let start_time = Instant::now();
    let categories = parse_categories(&args.category)?;
    if categories.is_empty() {
        bail!("no categories selected");
    }
    let mut store = build_store(&args, &categories)?;

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let distributions = categories
        .iter()
        .map(|category| {
            sample_category(&mut store, *category, args.draws, args.tolerance, &mut rng)
        })
        .collect();

    let simulation = if args.spins > 0 {
        let sim_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1));
        Some(
            simulate_spins(store, args.timing.timing(), sim_rng, args.spins)
                .context("spin simulation failed")?,
        )
    } else {
        None
    };

    let report = RunReport::new(args.seed, distributions, simulation);
    write_report(&args, &report, start_time)?;

    if !report.passed {
        std::process::exit(1);
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎰 Loot Wheel Tester".bright_cyan().bold());
    println!("{}", "====================".cyan());
}

/// Apply the command-line shaping, toggles and weights to a fresh store.
fn build_store(args: &Args, categories: &[Category]) -> Result<ConfigStore<MemoryStorage>> {
    let mut store = ConfigStore::load(MemoryStorage::new(), Catalog::builtin());
    store
        .set_base_multiplier(args.multiplier)
        .context("invalid --multiplier")?;
    store.set_quadratic_correction(args.quadratic || !args.linear)?;

    let catalog = store.catalog().clone();
    for token in split_csv(&args.disable) {
        for (category, candidate) in resolve_candidate(&catalog, categories, &token)? {
            store.set_candidate_enabled(category, &candidate, false)?;
        }
    }
    for (name, value) in parse_weight_overrides(&args.weights)? {
        for (category, candidate) in resolve_candidate(&catalog, categories, &name)? {
            store
                .set_weight(category, &candidate, value)
                .with_context(|| format!("invalid weight for {candidate}"))?;
        }
    }
    Ok(store)
}

fn write_report(args: &Args, report: &RunReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, report)?,
        _ => reports::generate_console_report(&mut output_target, report, start_time.elapsed())?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            category: "all".to_string(),
            draws: 100,
            seed: 1,
            multiplier: 1.0,
            quadratic: false,
            linear: true,
            disable: String::new(),
            weights: String::new(),
            spins: 0,
            timing: TimingProfile::Constant,
            tolerance: 0.02,
            report: "json".to_string(),
            output: None,
        }
    }

    #[test]
    fn store_reflects_shaping_and_overrides() {
        let args = Args {
            disable: "F1".to_string(),
            weights: "meleeWeapons:太刀=150".to_string(),
            ..base_args()
        };
        let store = build_store(&args, &Category::ALL).unwrap();
        assert!(!store.randomness().quadratic_correction);
        assert!((store.randomness().base_weight_multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(store.eligible(Category::FSkills), vec!["F2".to_string()]);
        assert!((store.weight(Category::MeleeWeapons, "太刀") - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quadratic_is_the_default() {
        let args = Args {
            linear: false,
            ..base_args()
        };
        assert!(build_store(&args, &Category::ALL).unwrap().randomness().quadratic_correction);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let args = Args {
            multiplier: 0.0,
            ..base_args()
        };
        assert!(build_store(&args, &Category::ALL).is_err());

        let args = Args {
            weights: "F1=900".to_string(),
            ..base_args()
        };
        assert!(build_store(&args, &Category::ALL).is_err());

        let args = Args {
            disable: "太刀".to_string(),
            ..base_args()
        };
        assert!(build_store(&args, &[Category::Heroes]).is_err());
    }

    #[test]
    fn report_is_written_to_the_output_file() {
        let path =
            std::env::temp_dir().join(format!("lootwheel-report-{}.json", std::process::id()));
        let args = Args {
            output: Some(path.clone()),
            ..base_args()
        };
        let report = RunReport::new(1, Vec::new(), None);
        write_report(&args, &report, Instant::now()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"passed\": true"));
        let _ = std::fs::remove_file(path);
    }
}
