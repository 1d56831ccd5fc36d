//! NK simulation configuration.
//!
//! [`NkConfig`] holds the landscape shape (N, K, A), the mutation rate,
//! the population semantics, and the tick speed used by external schedulers.

use super::error::NkError;
use super::genome::DEFAULT_MUTATION_RATE;
use rand::Rng;
use std::time::Duration;

/// Milliseconds per unit of [`NkConfig::speed`].
pub const MS_PER_SPEED_UNIT: u64 = 10;

/// Default upper bound on `A^N`, the number of enumerated genotypes.
pub const DEFAULT_MAX_TABLE_ENTRIES: usize = 1 << 16;

/// How genomes obtain their fitness landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LandscapeMode {
    /// One landscape and topology per (N, K, A) configuration, shared by
    /// every genome of the run.
    #[default]
    Stationary,

    /// Every mutant gets a freshly generated table and topology.
    ///
    /// The landscape becomes non-stationary and each step costs
    /// `O(mutants * A^N)` random draws.
    PerMutant,
}

/// How the population maps genomes to mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopulationKeying {
    /// Entries with equal genotypes are merged and their masses summed.
    #[default]
    ByGenotype,

    /// Every constructed genome is its own entry, even when another entry
    /// carries the same genotype. Mass fragments across duplicates.
    ByIdentity,
}

/// Configuration for an NK simulation.
///
/// # Defaults
///
/// ```
/// use nk_landscape::nk::NkConfig;
///
/// let config = NkConfig::default();
/// assert_eq!(config.n, 5);
/// assert_eq!(config.k, 1);
/// assert_eq!(config.alleles, 2);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use nk_landscape::nk::{LandscapeMode, NkConfig};
///
/// let config = NkConfig::default()
///     .with_n(8)
///     .with_k(3)
///     .with_mutation_rate(0.05)
///     .with_landscape_mode(LandscapeMode::Stationary)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NkConfig {
    /// Genome length N.
    pub n: usize,

    /// Number of epistatic neighbors per locus. Must be less than `n`.
    pub k: usize,

    /// Allele alphabet size A.
    pub alleles: usize,

    /// Fraction of each genome's selected mass spread over its mutants.
    pub mutation_rate: f64,

    /// Landscape sharing strategy.
    pub landscape_mode: LandscapeMode,

    /// Population keying strategy.
    pub keying: PopulationKeying,

    /// Tick multiplier. The tick interval is `speed * 10` milliseconds.
    pub speed: u64,

    /// Upper bound on `A^N`. Larger landscapes are rejected up front.
    pub max_table_entries: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for NkConfig {
    fn default() -> Self {
        Self {
            n: 5,
            k: 1,
            alleles: 2,
            mutation_rate: DEFAULT_MUTATION_RATE,
            landscape_mode: LandscapeMode::default(),
            keying: PopulationKeying::default(),
            speed: 10,
            max_table_entries: DEFAULT_MAX_TABLE_ENTRIES,
            seed: None,
        }
    }
}

impl NkConfig {
    /// Creates a configuration for the given genome length and neighbor count.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            ..Self::default()
        }
    }

    /// Preset reproducing the observed dynamics of the reference simulator:
    /// per-mutant landscapes and identity-keyed populations.
    pub fn faithful() -> Self {
        Self {
            landscape_mode: LandscapeMode::PerMutant,
            keying: PopulationKeying::ByIdentity,
            ..Self::default()
        }
    }

    /// Sets the genome length N.
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Sets the number of epistatic neighbors K.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the allele alphabet size A.
    pub fn with_alleles(mut self, alleles: usize) -> Self {
        self.alleles = alleles;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the landscape sharing strategy.
    pub fn with_landscape_mode(mut self, mode: LandscapeMode) -> Self {
        self.landscape_mode = mode;
        self
    }

    /// Sets the population keying strategy.
    pub fn with_keying(mut self, keying: PopulationKeying) -> Self {
        self.keying = keying;
        self
    }

    /// Sets the tick multiplier.
    pub fn with_speed(mut self, speed: u64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the upper bound on `A^N`.
    pub fn with_max_table_entries(mut self, limit: usize) -> Self {
        self.max_table_entries = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Interval between two generation ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed.saturating_mul(MS_PER_SPEED_UNIT))
    }

    /// Number of genotypes in the landscape, `A^N`, or `None` on overflow.
    pub fn table_entries(&self) -> Option<usize> {
        u32::try_from(self.n)
            .ok()
            .and_then(|n| self.alleles.checked_pow(n))
    }

    /// Returns a copy with N and K drawn at random.
    ///
    /// N is `max(2, U[0, 8))`, capped at the largest length whose `A^N`
    /// fits [`max_table_entries`](Self::max_table_entries). K is
    /// `max(2, U[0, 8))`, capped at `N - 1`. The result validates whenever
    /// the rest of the configuration does and a two-locus landscape fits.
    pub fn randomized<R: Rng>(&self, rng: &mut R) -> Self {
        let n_cap = (3..8usize)
            .take_while(|&n| {
                self.alleles
                    .checked_pow(n as u32)
                    .is_some_and(|entries| entries <= self.max_table_entries)
            })
            .last()
            .unwrap_or(2);
        let n = rng.random_range(0..8usize).max(2).min(n_cap);
        let k = rng.random_range(0..8usize).max(2).min(n - 1);
        Self {
            n,
            k,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// Checks run before any landscape is allocated, so a rejected
    /// configuration never costs more than this call.
    pub fn validate(&self) -> Result<(), NkError> {
        if self.n == 0 {
            return Err(NkError::ZeroLength);
        }
        if self.alleles == 0 {
            return Err(NkError::ZeroAlleles);
        }
        if self.k >= self.n {
            return Err(NkError::TooManyNeighbors {
                n: self.n,
                k: self.k,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(NkError::InvalidMutationRate(self.mutation_rate));
        }
        if self.speed == 0 {
            return Err(NkError::ZeroSpeed);
        }
        match self.table_entries() {
            Some(entries) if entries <= self.max_table_entries => Ok(()),
            _ => Err(NkError::LandscapeTooLarge {
                n: self.n,
                alleles: self.alleles,
                limit: self.max_table_entries,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_config() {
        let config = NkConfig::default();
        assert_eq!(config.n, 5);
        assert_eq!(config.k, 1);
        assert_eq!(config.alleles, 2);
        assert!((config.mutation_rate - 0.1).abs() < 1e-12);
        assert_eq!(config.landscape_mode, LandscapeMode::Stationary);
        assert_eq!(config.keying, PopulationKeying::ByGenotype);
        assert_eq!(config.speed, 10);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_faithful_preset() {
        let config = NkConfig::faithful();
        assert_eq!(config.landscape_mode, LandscapeMode::PerMutant);
        assert_eq!(config.keying, PopulationKeying::ByIdentity);
        assert_eq!(config.n, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = NkConfig::new(6, 2)
            .with_alleles(3)
            .with_mutation_rate(0.2)
            .with_keying(PopulationKeying::ByIdentity)
            .with_speed(5)
            .with_seed(7);

        assert_eq!(config.n, 6);
        assert_eq!(config.k, 2);
        assert_eq!(config.alleles, 3);
        assert!((config.mutation_rate - 0.2).abs() < 1e-12);
        assert_eq!(config.keying, PopulationKeying::ByIdentity);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_clamp_mutation_rate() {
        assert_eq!(NkConfig::default().with_mutation_rate(1.5).mutation_rate, 1.0);
        assert_eq!(NkConfig::default().with_mutation_rate(-0.5).mutation_rate, 0.0);
    }

    #[test]
    fn test_tick_interval() {
        let config = NkConfig::default().with_speed(10);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    // ---- validation ----

    #[test]
    fn test_validate_zero_length() {
        assert_eq!(NkConfig::new(0, 0).validate(), Err(NkError::ZeroLength));
    }

    #[test]
    fn test_validate_zero_alleles() {
        let config = NkConfig::new(3, 1).with_alleles(0);
        assert_eq!(config.validate(), Err(NkError::ZeroAlleles));
    }

    #[test]
    fn test_validate_k_not_below_n() {
        assert_eq!(
            NkConfig::new(3, 3).validate(),
            Err(NkError::TooManyNeighbors { n: 3, k: 3 })
        );
        assert!(NkConfig::new(3, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_unclamped_rate() {
        let mut config = NkConfig::default();
        config.mutation_rate = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(NkError::InvalidMutationRate(_))
        ));
    }

    #[test]
    fn test_validate_zero_speed() {
        let config = NkConfig::default().with_speed(0);
        assert_eq!(config.validate(), Err(NkError::ZeroSpeed));
    }

    #[test]
    fn test_validate_landscape_limit() {
        let config = NkConfig::new(17, 1);
        assert!(matches!(
            config.validate(),
            Err(NkError::LandscapeTooLarge { n: 17, .. })
        ));

        let config = NkConfig::new(17, 1).with_max_table_entries(1 << 17);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overflowing_landscape() {
        let config = NkConfig::new(200, 1).with_max_table_entries(usize::MAX);
        assert_eq!(config.table_entries(), None);
        assert!(config.validate().is_err());
    }

    // ---- randomized ----

    #[test]
    fn test_randomized_always_valid() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = NkConfig::default().with_seed(11);
        for _ in 0..200 {
            let config = base.randomized(&mut rng);
            assert!((2..8).contains(&config.n));
            assert!(config.k < config.n);
            assert!(config.k >= 1);
            assert_eq!(config.seed, Some(11));
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_randomized_respects_table_limit() {
        let mut rng = StdRng::seed_from_u64(5);
        // 5^7 = 78125 exceeds the default limit; 5^6 = 15625 fits.
        let base = NkConfig::default().with_alleles(5);
        let mut longest = 0;
        for _ in 0..200 {
            let config = base.randomized(&mut rng);
            assert!(config.n <= 6);
            assert_eq!(config.alleles, 5);
            assert!(config.validate().is_ok(), "{config:?}");
            longest = longest.max(config.n);
        }
        assert_eq!(longest, 6);
    }

    #[test]
    fn test_randomized_tight_limit() {
        let mut rng = StdRng::seed_from_u64(8);
        let base = NkConfig::default()
            .with_alleles(4)
            .with_max_table_entries(16);
        for _ in 0..50 {
            let config = base.randomized(&mut rng);
            assert_eq!(config.n, 2);
            assert_eq!(config.k, 1);
            assert!(config.validate().is_ok());
        }
    }
}
