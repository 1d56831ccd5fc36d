//! Genomes on an NK landscape.

use super::error::NkError;
use super::landscape::{genotype_hash, Landscape};
use rand::Rng;
use std::sync::Arc;

/// Default fraction of selected mass redistributed over mutants.
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;

/// A genotype evaluated against a landscape.
///
/// Genomes are immutable. The fitness is derived once at construction from
/// the landscape weights of the genome's own hash.
///
/// # Examples
///
/// ```
/// use nk_landscape::nk::{Genome, NkConfig, Landscape};
/// use rand::{rngs::StdRng, SeedableRng};
/// use std::sync::Arc;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let landscape = Arc::new(Landscape::generate(&NkConfig::new(4, 1), &mut rng).unwrap());
/// let genome = Genome::new(vec![0, 1, 1, 0], landscape, 0.1).unwrap();
///
/// assert_eq!(genome.mutants().len(), 4);
/// assert!(genome.fitness() >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Genome {
    genotype: Vec<usize>,
    hash: usize,
    mutation_rate: f64,
    fitness: f64,
    landscape: Arc<Landscape>,
}

impl Genome {
    /// Creates a genome, checking the genotype against the landscape shape.
    pub fn new(
        genotype: Vec<usize>,
        landscape: Arc<Landscape>,
        mutation_rate: f64,
    ) -> Result<Self, NkError> {
        let (n, alleles) = (landscape.n(), landscape.alleles());
        if genotype.len() != n || genotype.iter().any(|&a| a >= alleles) {
            return Err(NkError::InvalidGenotype {
                genotype,
                n,
                alleles,
            });
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(NkError::InvalidMutationRate(mutation_rate));
        }
        Self::assemble(genotype, landscape, mutation_rate)
    }

    /// Creates a genome with a uniformly random genotype.
    pub fn random<R: Rng>(
        landscape: Arc<Landscape>,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Result<Self, NkError> {
        let alleles = landscape.alleles();
        let genotype = (0..landscape.n())
            .map(|_| rng.random_range(0..alleles))
            .collect();
        Self::new(genotype, landscape, mutation_rate)
    }

    /// Builds a genome from parts already known to be consistent.
    ///
    /// Fails only if the genotype's hash does not fit in `usize`.
    pub(crate) fn assemble(
        genotype: Vec<usize>,
        landscape: Arc<Landscape>,
        mutation_rate: f64,
    ) -> Result<Self, NkError> {
        let alleles = landscape.alleles();
        let Some(hash) = genotype_hash(&genotype, alleles) else {
            return Err(NkError::InvalidGenotype {
                genotype,
                n: landscape.n(),
                alleles,
            });
        };
        let fitness = compute_fitness(&landscape, hash);
        Ok(Self {
            genotype,
            hash,
            mutation_rate,
            fitness,
            landscape,
        })
    }

    /// Allele at every locus.
    pub fn genotype(&self) -> &[usize] {
        &self.genotype
    }

    /// Base-A positional hash of the genotype.
    pub fn hash(&self) -> usize {
        self.hash
    }

    /// Fraction of selected mass this genome spreads over its mutants.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Genome length N.
    pub fn n(&self) -> usize {
        self.landscape.n()
    }

    /// Neighbors per locus K.
    pub fn k(&self) -> usize {
        self.landscape.k()
    }

    /// Allele alphabet size A.
    pub fn alleles(&self) -> usize {
        self.landscape.alleles()
    }

    /// The landscape this genome was evaluated against.
    pub fn landscape(&self) -> &Arc<Landscape> {
        &self.landscape
    }

    /// Table weights of this genome's hash, one per locus.
    pub fn ws(&self) -> &[f64] {
        self.landscape.table().row(self.hash)
    }

    /// Mean per-locus fitness contribution.
    ///
    /// With `k == 0` each locus contributes its own weight. Otherwise locus
    /// `i` contributes `(ws[i] + Σ ws[j] for j in neighbors(i)) / k`, which
    /// can exceed 1.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// All genotypes at Hamming distance 1, `N * (A - 1)` of them.
    ///
    /// Ordered by locus, then by allele, skipping the current allele.
    pub fn mutants(&self) -> Vec<Vec<usize>> {
        let alleles = self.alleles();
        let mut mutants = Vec::with_capacity(self.n() * alleles.saturating_sub(1));
        for (i, &current) in self.genotype.iter().enumerate() {
            for allele in (0..alleles).filter(|&a| a != current) {
                let mut genotype = self.genotype.clone();
                genotype[i] = allele;
                mutants.push(genotype);
            }
        }
        mutants
    }
}

fn compute_fitness(landscape: &Landscape, hash: usize) -> f64 {
    let ws = landscape.table().row(hash);
    let n = ws.len();
    if n == 0 {
        return 0.0;
    }
    let k = landscape.k();
    let topology = landscape.topology();
    let total: f64 = (0..n)
        .map(|i| {
            if k == 0 {
                ws[i]
            } else {
                let epistatic: f64 = topology.neighbors(i).iter().map(|&j| ws[j]).sum();
                (ws[i] + epistatic) / k as f64
            }
        })
        .sum();
    total / n as f64
}
