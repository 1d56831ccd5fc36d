//! Error types for the NK simulation.

use thiserror::Error;

/// Errors raised while configuring or advancing an NK simulation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NkError {
    /// Genome length must be at least one locus.
    #[error("genome length N must be at least 1")]
    ZeroLength,

    /// Allele alphabet must contain at least one symbol.
    #[error("allele count A must be at least 1")]
    ZeroAlleles,

    /// Each locus can depend on at most `N - 1` other loci.
    #[error("epistatic neighbor count K={k} must be less than N={n}")]
    TooManyNeighbors { n: usize, k: usize },

    /// Mutation rate is a probability.
    #[error("mutation rate {0} must lie in [0, 1]")]
    InvalidMutationRate(f64),

    /// Tick multiplier must be positive.
    #[error("speed must be at least 1")]
    ZeroSpeed,

    /// `A^N` exceeds the configured enumeration limit.
    #[error("landscape with A={alleles}, N={n} has more than {limit} genotypes")]
    LandscapeTooLarge {
        n: usize,
        alleles: usize,
        limit: usize,
    },

    /// Explicit table weights do not cover `A^N` rows of `N` weights.
    #[error("fitness table needs {expected} weights, got {actual}")]
    TableShape { expected: usize, actual: usize },

    /// A neighbor set is missing, has the wrong size, or names itself or
    /// a locus outside the genome.
    #[error("epistasis topology is malformed at locus {locus}")]
    InvalidTopology { locus: usize },

    /// A genotype does not match the landscape it is evaluated against.
    #[error("genotype {genotype:?} is not a valid length-{n} sequence over {alleles} alleles")]
    InvalidGenotype {
        genotype: Vec<usize>,
        n: usize,
        alleles: usize,
    },

    /// Every entry fell below the extinction threshold in one step.
    #[error("population went extinct at generation {generation}")]
    EmptyPopulation { generation: u64 },

    /// The driver stopped after an earlier failure and must be re-seeded.
    #[error("simulation halted: {0}")]
    Halted(Box<NkError>),
}

impl NkError {
    /// Returns `true` for errors raised by configuration validation.
    ///
    /// These are rejected inputs; they never change driver state.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NkError::ZeroLength
                | NkError::ZeroAlleles
                | NkError::TooManyNeighbors { .. }
                | NkError::InvalidMutationRate(_)
                | NkError::ZeroSpeed
                | NkError::LandscapeTooLarge { .. }
        )
    }
}
