use clap::{Parser, ValueEnum};
use nk_landscape::nk::{
    LandscapeMode, NkConfig, NkError, PopulationKeying, Simulation, Ticker, DEFAULT_MAX_TABLE_ENTRIES,
};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "nk-sim",
    version,
    about = "Run an NK fitness landscape simulation and print one log line per generation"
)]
struct Cli {
    /// Genome length N.
    #[arg(short, long, default_value_t = 5)]
    n: usize,

    /// Epistatic neighbors per locus K (must be less than N).
    #[arg(short, long, default_value_t = 1)]
    k: usize,

    /// Allele alphabet size A.
    #[arg(short, long, default_value_t = 2)]
    alleles: usize,

    /// Fraction of selected mass spread over mutants.
    #[arg(short, long, default_value_t = 0.1)]
    mutation_rate: f64,

    /// Tick multiplier; generations run every `speed * 10` milliseconds.
    #[arg(short, long, default_value_t = 10)]
    speed: u64,

    /// Number of generations to run.
    #[arg(short, long, default_value_t = 50)]
    generations: u64,

    /// Landscape sharing strategy.
    #[arg(long, value_enum, default_value_t = ModeArg::Stationary)]
    landscape: ModeArg,

    /// Population keying strategy.
    #[arg(long, value_enum, default_value_t = KeyingArg::Genotype)]
    keying: KeyingArg,

    /// Upper bound on A^N.
    #[arg(long, default_value_t = DEFAULT_MAX_TABLE_ENTRIES)]
    max_table_entries: usize,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw N and K at random instead of using --n and --k.
    #[arg(long)]
    randomize: bool,

    /// Print the final fitness history as comma-separated values.
    #[arg(long)]
    history: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Stationary,
    PerMutant,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyingArg {
    Genotype,
    Identity,
}

impl Cli {
    fn config(&self) -> NkConfig {
        let mut config = NkConfig::new(self.n, self.k)
            .with_alleles(self.alleles)
            .with_mutation_rate(self.mutation_rate)
            .with_speed(self.speed)
            .with_max_table_entries(self.max_table_entries)
            .with_landscape_mode(match self.landscape {
                ModeArg::Stationary => LandscapeMode::Stationary,
                ModeArg::PerMutant => LandscapeMode::PerMutant,
            })
            .with_keying(match self.keying {
                KeyingArg::Genotype => PopulationKeying::ByGenotype,
                KeyingArg::Identity => PopulationKeying::ByIdentity,
            });
        config.seed = self.seed;
        config
    }
}

fn run(cli: &Cli) -> Result<(), NkError> {
    let mut sim = Simulation::new(cli.config())?;
    if cli.randomize {
        sim.randomize()?;
    }
    tracing::info!(n = sim.config().n, k = sim.config().k, "starting simulation");

    let outcome = Ticker::new()
        .with_max_ticks(cli.generations)
        .run(&mut sim, |report| println!("{}", report.message));

    if cli.history {
        let history: Vec<String> = sim
            .fitness_history()
            .iter()
            .map(|f| format!("{f:.4}"))
            .collect();
        println!("{}", history.join(","));
    }

    match outcome.halted {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
