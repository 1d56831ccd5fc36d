//! Simulation driver.
//!
//! [`Simulation`] owns the landscape, the current population and the
//! generation counter. An external scheduler calls
//! [`advance`](Simulation::advance) once per tick; each call commits a whole
//! new population before returning.

use super::config::NkConfig;
use super::error::NkError;
use super::genome::Genome;
use super::landscape::Landscape;
use super::population::Population;
use super::step::next_generation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::instrument;

/// Summary of one generation, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    /// Generation number, starting at 1 for the first step after seeding.
    pub generation: u64,

    /// Mass-weighted mean fitness of the new population.
    pub average_fitness: f64,

    /// Highest fitness among the surviving genomes.
    pub best_fitness: f64,

    /// Number of population entries.
    pub population_size: usize,

    /// Number of distinct genotypes among the entries.
    pub distinct_genotypes: usize,

    /// Log line, e.g. `Generation 3: Average fitness = 0.61`.
    pub message: String,
}

/// Formats the per-generation log line.
pub fn log_line(generation: u64, average_fitness: f64) -> String {
    format!("Generation {generation}: Average fitness = {average_fitness:.2}")
}

/// An NK simulation run.
///
/// # Usage
///
/// ```
/// use nk_landscape::nk::{NkConfig, Simulation};
///
/// let mut sim = Simulation::new(NkConfig::new(5, 1).with_seed(42)).unwrap();
/// let report = sim.advance().unwrap();
/// assert_eq!(report.generation, 1);
/// assert!(report.message.starts_with("Generation 1: Average fitness = "));
/// assert_eq!(sim.fitness_history().len(), 1);
/// ```
#[derive(Debug)]
pub struct Simulation<R: Rng = StdRng> {
    config: NkConfig,
    rng: R,
    landscape: Arc<Landscape>,
    population: Population,
    generation: u64,
    fitness_history: Vec<f64>,
    log: Vec<String>,
    halted: Option<NkError>,
}

impl Simulation<StdRng> {
    /// Creates a seeded simulation.
    ///
    /// Uses [`NkConfig::seed`] when set, otherwise a random seed.
    pub fn new(config: NkConfig) -> Result<Self, NkError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation drawing all randomness from `rng`.
    pub fn with_rng(config: NkConfig, mut rng: R) -> Result<Self, NkError> {
        let (landscape, population) = seed(&config, &mut rng)?;
        Ok(Self {
            config,
            rng,
            landscape,
            population,
            generation: 0,
            fitness_history: Vec::new(),
            log: Vec::new(),
            halted: None,
        })
    }

    pub fn config(&self) -> &NkConfig {
        &self.config
    }

    /// The landscape drawn at the last (re)seeding.
    pub fn landscape(&self) -> &Arc<Landscape> {
        &self.landscape
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations since the last (re)seeding.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Average fitness after each completed generation.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// Log lines, one per completed generation.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The failure that stopped the run, if any.
    pub fn halted(&self) -> Option<&NkError> {
        self.halted.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Mass-weighted mean fitness of the current population.
    pub fn average_fitness(&self) -> f64 {
        self.population.average_fitness()
    }

    /// Runs one generation step and commits its population.
    ///
    /// On failure the previous population is kept, the driver halts, and
    /// every later call returns [`NkError::Halted`] until the simulation is
    /// re-seeded.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation + 1))]
    pub fn advance(&mut self) -> Result<GenerationReport, NkError> {
        if let Some(err) = &self.halted {
            return Err(NkError::Halted(Box::new(err.clone())));
        }

        let generation = self.generation + 1;
        let next = match next_generation(
            &self.population,
            self.config.landscape_mode,
            generation,
            &mut self.rng,
        ) {
            Ok(next) => next,
            Err(err) => {
                tracing::error!(%err, "generation step failed; halting simulation");
                self.halted = Some(err.clone());
                return Err(err);
            }
        };
        self.population = next;
        self.generation = generation;

        let average_fitness = self.population.average_fitness();
        let message = log_line(generation, average_fitness);
        self.fitness_history.push(average_fitness);
        self.log.push(message.clone());

        tracing::debug!(
            average_fitness,
            entries = self.population.len(),
            "generation committed"
        );

        Ok(GenerationReport {
            generation,
            average_fitness,
            best_fitness: self
                .population
                .fittest()
                .map_or(0.0, |(genome, _)| genome.fitness()),
            population_size: self.population.len(),
            distinct_genotypes: self.population.distinct_genotypes(),
            message,
        })
    }

    /// Changes N and K, re-seeding when either differs from the current value.
    ///
    /// A rejected configuration leaves the simulation untouched.
    pub fn reconfigure(&mut self, n: usize, k: usize) -> Result<(), NkError> {
        if n == self.config.n && k == self.config.k {
            return Ok(());
        }
        let config = self.config.clone().with_n(n).with_k(k);
        self.apply_config(config)
    }

    /// Replaces the whole configuration and re-seeds.
    ///
    /// A rejected configuration leaves the simulation untouched.
    pub fn apply_config(&mut self, config: NkConfig) -> Result<(), NkError> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected configuration");
            return Err(err);
        }
        self.config = config;
        self.reset()
    }

    /// Changes the tick speed. Does not re-seed.
    pub fn set_speed(&mut self, speed: u64) -> Result<(), NkError> {
        if speed == 0 {
            return Err(NkError::ZeroSpeed);
        }
        self.config.speed = speed;
        Ok(())
    }

    /// Re-seeds with the current configuration: fresh landscape, one random
    /// genome at mass 1.0, and cleared history, log and counters.
    pub fn reset(&mut self) -> Result<(), NkError> {
        let (landscape, population) = seed(&self.config, &mut self.rng)?;
        self.landscape = landscape;
        self.population = population;
        self.generation = 0;
        self.fitness_history.clear();
        self.log.clear();
        self.halted = None;
        Ok(())
    }

    /// Draws a random N and K (see [`NkConfig::randomized`]) and re-seeds.
    pub fn randomize(&mut self) -> Result<(), NkError> {
        let config = self.config.randomized(&mut self.rng);
        self.apply_config(config)
    }
}

#[instrument(level = "info", skip(config, rng), fields(n = config.n, k = config.k, alleles = config.alleles, mode = ?config.landscape_mode))]
fn seed<R: Rng>(config: &NkConfig, rng: &mut R) -> Result<(Arc<Landscape>, Population), NkError> {
    let landscape = Arc::new(Landscape::generate(config, rng)?);
    let genome = Genome::random(Arc::clone(&landscape), config.mutation_rate, rng)?;
    tracing::info!(genotype = ?genome.genotype(), fitness = genome.fitness(), "seeded population");
    Ok((landscape, Population::seeded(genome, config.keying)))
}
