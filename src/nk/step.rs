//! Mutation-weighted selection step.
//!
//! Each entry's mass is scaled by its fitness. A `1 - mutation_rate` share
//! stays on the genome; the rest is split evenly over its single-locus
//! mutants. Entries below [`EXTINCTION_THRESHOLD`] are then dropped and the
//! survivors renormalized to a total mass of 1.0.

use super::config::LandscapeMode;
use super::error::NkError;
use super::genome::Genome;
use super::landscape::Landscape;
use super::population::Population;
use rand::Rng;
use std::sync::Arc;
use tracing::instrument;

/// Mass below which an entry goes extinct, checked before renormalization.
pub const EXTINCTION_THRESHOLD: f64 = 0.01;

/// Produces the next generation from `population`.
///
/// The input is never modified. `generation` is the number of the
/// generation being produced and only labels a possible
/// [`NkError::EmptyPopulation`].
///
/// Under [`LandscapeMode::PerMutant`] every mutant is evaluated against a
/// freshly drawn landscape of the same shape as its parent's.
#[instrument(level = "debug", skip(population, rng), fields(entries = population.len()))]
pub fn next_generation<R: Rng>(
    population: &Population,
    mode: LandscapeMode,
    generation: u64,
    rng: &mut R,
) -> Result<Population, NkError> {
    let mut next = Population::new(population.keying());

    for (genome, mass) in population.iter() {
        let raw = mass * genome.fitness();
        let rate = genome.mutation_rate();
        next.add(genome.clone(), raw * (1.0 - rate));

        let mutants = genome.mutants();
        if mutants.is_empty() {
            continue;
        }
        let share = raw * rate / mutants.len() as f64;
        for genotype in mutants {
            let landscape = match mode {
                LandscapeMode::Stationary => Arc::clone(genome.landscape()),
                LandscapeMode::PerMutant => Arc::new(Landscape::generate_unchecked(
                    genome.n(),
                    genome.k(),
                    genome.alleles(),
                    rng,
                )),
            };
            next.add(Genome::assemble(genotype, landscape, rate)?, share);
        }
    }

    let candidates = next.len();
    let pruned = next.prune(EXTINCTION_THRESHOLD);
    tracing::debug!(candidates, pruned, survivors = next.len(), "pruned extinct genomes");

    next.renormalize(generation)?;
    Ok(next)
}
