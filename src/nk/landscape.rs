//! NK fitness landscapes.
//!
//! A landscape pairs a [`FitnessTable`], which assigns every genotype its
//! own vector of `N` uniform weights, with a [`Topology`] naming the `K`
//! epistatic neighbors of each locus.
//!
//! Genotypes are addressed by their base-A positional hash
//! (`hash = Σ genotype[i] * A^i`), a bijection onto `[0, A^N)`.

use super::config::NkConfig;
use super::error::NkError;
use rand::Rng;

/// Encodes a genotype as a base-`alleles` integer, least significant locus first.
///
/// Returns `None` when the genotype space `alleles^n` does not fit in `usize`.
///
/// # Examples
///
/// ```
/// use nk_landscape::nk::genotype_hash;
///
/// assert_eq!(genotype_hash(&[1, 0, 1], 2), Some(5));
/// assert_eq!(genotype_hash(&[2, 1], 3), Some(5));
/// assert_eq!(genotype_hash(&[0; 65], 2), None);
/// ```
pub fn genotype_hash(genotype: &[usize], alleles: usize) -> Option<usize> {
    let mut hash = 0usize;
    let mut place = 1usize;
    for (i, &allele) in genotype.iter().enumerate() {
        if i > 0 {
            place = place.checked_mul(alleles)?;
        }
        hash = hash.checked_add(allele.checked_mul(place)?)?;
    }
    Some(hash)
}

/// Decodes a hash back into its length-`n` genotype.
///
/// Inverse of [`genotype_hash`] for hashes in `[0, alleles^n)`.
pub fn decode_hash(mut hash: usize, n: usize, alleles: usize) -> Vec<usize> {
    let mut genotype = Vec::with_capacity(n);
    for _ in 0..n {
        if alleles <= 1 {
            genotype.push(0);
        } else {
            genotype.push(hash % alleles);
            hash /= alleles;
        }
    }
    genotype
}

/// Random fitness contributions for every genotype of a landscape.
///
/// Row `h` holds the `n` weights of the genotype whose hash is `h`.
#[derive(Debug, Clone)]
pub struct FitnessTable {
    n: usize,
    alleles: usize,
    weights: Vec<f64>,
}

impl FitnessTable {
    /// Builds a table from explicit row-major weights (`alleles^n` rows of `n`).
    pub fn from_weights(n: usize, alleles: usize, weights: Vec<f64>) -> Result<Self, NkError> {
        if n == 0 {
            return Err(NkError::ZeroLength);
        }
        if alleles == 0 {
            return Err(NkError::ZeroAlleles);
        }
        let expected = u32::try_from(n)
            .ok()
            .and_then(|exp| alleles.checked_pow(exp))
            .and_then(|rows| rows.checked_mul(n))
            .ok_or(NkError::LandscapeTooLarge {
                n,
                alleles,
                limit: usize::MAX,
            })?;
        if weights.len() != expected {
            return Err(NkError::TableShape {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self {
            n,
            alleles,
            weights,
        })
    }

    /// Genome length.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Allele alphabet size.
    pub fn alleles(&self) -> usize {
        self.alleles
    }

    /// Number of genotypes (`A^N`).
    pub fn len(&self) -> usize {
        if self.n == 0 {
            0
        } else {
            self.weights.len() / self.n
        }
    }

    /// Whether the table holds no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight vector for a genotype hash, or `None` if out of range.
    pub fn weights(&self, hash: usize) -> Option<&[f64]> {
        let start = hash.checked_mul(self.n)?;
        let end = start.checked_add(self.n)?;
        self.weights.get(start..end)
    }

    /// Weight vector for a hash, empty when out of range.
    pub(crate) fn row(&self, hash: usize) -> &[f64] {
        self.weights(hash).unwrap_or(&[])
    }
}

/// Draws a fresh fitness table with `alleles^n` rows of `n` uniform weights.
///
/// Callers bound `alleles^n` beforehand (see [`NkConfig::validate`]); a shape
/// whose weight count overflows `usize` yields an empty table.
pub fn generate_landscape<R: Rng>(n: usize, alleles: usize, rng: &mut R) -> FitnessTable {
    let len = u32::try_from(n)
        .ok()
        .and_then(|exp| alleles.checked_pow(exp))
        .and_then(|rows| rows.checked_mul(n))
        .unwrap_or(0);
    let weights = (0..len).map(|_| rng.random::<f64>()).collect();
    FitnessTable {
        n,
        alleles,
        weights,
    }
}

/// Epistatic neighbor sets, one per locus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    neighbors: Vec<Vec<usize>>,
}

impl Topology {
    /// Builds a topology from explicit neighbor sets.
    pub fn from_neighbors(neighbors: Vec<Vec<usize>>) -> Self {
        Self { neighbors }
    }

    /// Neighbors of locus `i`.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Number of loci.
    pub fn n(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbor lists in locus order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.neighbors.iter().map(Vec::as_slice)
    }
}

/// Draws `k` neighbors for each of `n` loci.
///
/// Neighbors of locus `i` are sampled uniformly from `{0..n} \ {i}` with
/// replacement, so a set may repeat a locus.
///
/// # Panics
/// Panics if `k > 0` and `n < 2` (no other locus to draw from).
pub fn generate_topology<R: Rng>(n: usize, k: usize, rng: &mut R) -> Topology {
    let neighbors = (0..n)
        .map(|i| {
            (0..k)
                .map(|_| {
                    // Skip over `i` so the draw is uniform over the other loci.
                    let j = rng.random_range(0..n - 1);
                    if j >= i {
                        j + 1
                    } else {
                        j
                    }
                })
                .collect()
        })
        .collect();
    Topology { neighbors }
}

/// A fitness table together with its epistasis topology.
#[derive(Debug, Clone)]
pub struct Landscape {
    table: FitnessTable,
    topology: Topology,
    k: usize,
}

impl Landscape {
    /// Generates a fresh landscape for a validated configuration.
    pub fn generate<R: Rng>(config: &NkConfig, rng: &mut R) -> Result<Self, NkError> {
        config.validate()?;
        Ok(Self::generate_unchecked(config.n, config.k, config.alleles, rng))
    }

    /// Generates a landscape without validating its shape.
    pub(crate) fn generate_unchecked<R: Rng>(
        n: usize,
        k: usize,
        alleles: usize,
        rng: &mut R,
    ) -> Self {
        let table = generate_landscape(n, alleles, rng);
        let topology = generate_topology(n, k, rng);
        Self { table, topology, k }
    }

    /// Assembles a landscape from explicit parts.
    ///
    /// Fails when the topology does not cover every locus of the table or
    /// names a locus outside it.
    pub fn from_parts(table: FitnessTable, topology: Topology, k: usize) -> Result<Self, NkError> {
        let n = table.n();
        if n == 0 {
            return Err(NkError::ZeroLength);
        }
        if k >= n {
            return Err(NkError::TooManyNeighbors { n, k });
        }
        if topology.n() != n {
            return Err(NkError::InvalidTopology { locus: topology.n().min(n) });
        }
        let bad_locus = topology
            .iter()
            .position(|set| set.len() != k)
            .or_else(|| {
                topology
                    .iter()
                    .enumerate()
                    .position(|(i, set)| set.iter().any(|&j| j >= n || j == i))
            });
        if let Some(locus) = bad_locus {
            return Err(NkError::InvalidTopology { locus });
        }
        Ok(Self { table, topology, k })
    }

    /// Fitness weights indexed by genotype hash.
    pub fn table(&self) -> &FitnessTable {
        &self.table
    }

    /// Epistatic neighbors of every locus.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Genome length N.
    pub fn n(&self) -> usize {
        self.table.n()
    }

    /// Neighbors per locus K.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Allele alphabet size A.
    pub fn alleles(&self) -> usize {
        self.table.alleles()
    }
}
