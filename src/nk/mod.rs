//! NK fitness landscape simulation.
//!
//! Simulates a population of genotypes evolving on a random NK landscape
//! (Kauffman's model), where each of `N` loci contributes a random weight
//! that depends on the allelic state of `K` other loci. `K = 0` gives a
//! smooth additive landscape; larger `K` makes it increasingly rugged.
//!
//! The population is a mass distribution over genomes. Each generation
//! scales every entry by its fitness, spreads a mutation share over its
//! single-locus mutants, drops entries below an extinction threshold and
//! renormalizes.
//!
//! # Key Types
//!
//! - [`NkConfig`]: Landscape shape, mutation rate, keying and tick speed
//! - [`Landscape`]: Fitness table plus epistasis topology
//! - [`Genome`]: A genotype with derived fitness and its mutants
//! - [`Population`]: Genome → mass distribution
//! - [`Simulation`]: Driver advanced once per tick by an external scheduler
//! - [`Ticker`]: Blocking scheduler for [`Simulation`]
//!
//! # References
//!
//! - Kauffman & Levin (1987), "Towards a General Theory of Adaptive Walks on Rugged Landscapes"
//! - Kauffman (1993), *The Origins of Order*

mod config;
mod driver;
mod error;
mod genome;
mod landscape;
mod population;
mod step;
mod ticker;

pub use config::{
    LandscapeMode, NkConfig, PopulationKeying, DEFAULT_MAX_TABLE_ENTRIES, MS_PER_SPEED_UNIT,
};
pub use driver::{log_line, GenerationReport, Simulation};
pub use error::NkError;
pub use genome::{Genome, DEFAULT_MUTATION_RATE};
pub use landscape::{
    decode_hash, generate_landscape, generate_topology, genotype_hash, FitnessTable, Landscape,
    Topology,
};
pub use population::Population;
pub use step::{next_generation, EXTINCTION_THRESHOLD};
pub use ticker::{Ticker, TickerOutcome};
