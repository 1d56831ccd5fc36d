//! Weighted genome populations.

use super::config::PopulationKeying;
use super::error::NkError;
use super::genome::Genome;
use std::collections::HashMap;

/// A distribution of mass over genomes.
///
/// Under [`PopulationKeying::ByGenotype`], adding a genome whose genotype is
/// already present accumulates mass on the existing entry (the first genome
/// inserted stays the representative). Under [`PopulationKeying::ByIdentity`]
/// every added genome becomes its own entry.
#[derive(Debug, Clone)]
pub struct Population {
    keying: PopulationKeying,
    entries: Vec<(Genome, f64)>,
    index: HashMap<usize, usize>,
}

impl Population {
    /// Creates an empty population.
    pub fn new(keying: PopulationKeying) -> Self {
        Self {
            keying,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a population holding one genome at mass 1.0.
    pub fn seeded(genome: Genome, keying: PopulationKeying) -> Self {
        let mut population = Self::new(keying);
        population.add(genome, 1.0);
        population
    }

    pub fn keying(&self) -> PopulationKeying {
        self.keying
    }

    /// Adds mass for a genome according to the keying strategy.
    pub fn add(&mut self, genome: Genome, mass: f64) {
        match self.keying {
            PopulationKeying::ByIdentity => self.entries.push((genome, mass)),
            PopulationKeying::ByGenotype => match self.index.get(&genome.hash()) {
                Some(&slot) => self.entries[slot].1 += mass,
                None => {
                    self.index.insert(genome.hash(), self.entries.len());
                    self.entries.push((genome, mass));
                }
            },
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(genome, mass)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Genome, f64)> {
        self.entries.iter().map(|(genome, mass)| (genome, *mass))
    }

    /// Sum of all masses.
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|(_, mass)| mass).sum()
    }

    /// Mass-weighted mean fitness, `Σ fitness * mass`.
    pub fn average_fitness(&self) -> f64 {
        self.entries
            .iter()
            .map(|(genome, mass)| genome.fitness() * mass)
            .sum()
    }

    /// Entry with the highest fitness.
    pub fn fittest(&self) -> Option<(&Genome, f64)> {
        self.iter().max_by(|a, b| {
            a.0.fitness()
                .partial_cmp(&b.0.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Number of distinct genotypes, regardless of keying.
    pub fn distinct_genotypes(&self) -> usize {
        match self.keying {
            PopulationKeying::ByGenotype => self.entries.len(),
            PopulationKeying::ByIdentity => {
                let mut hashes: Vec<usize> = self.entries.iter().map(|(g, _)| g.hash()).collect();
                hashes.sort_unstable();
                hashes.dedup();
                hashes.len()
            }
        }
    }

    /// Removes entries whose mass is strictly below `threshold`.
    ///
    /// Returns the number of removed entries.
    pub fn prune(&mut self, threshold: f64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, mass)| *mass >= threshold);
        if self.entries.len() != before {
            self.reindex();
        }
        before - self.entries.len()
    }

    /// Scales every mass so the total is 1.0.
    ///
    /// Fails with [`NkError::EmptyPopulation`] when nothing is left to scale.
    pub fn renormalize(&mut self, generation: u64) -> Result<(), NkError> {
        let total = self.total_mass();
        if self.entries.is_empty() || !(total.is_finite() && total > 0.0) {
            return Err(NkError::EmptyPopulation { generation });
        }
        for (_, mass) in &mut self.entries {
            *mass /= total;
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.index.clear();
        if self.keying == PopulationKeying::ByGenotype {
            for (slot, (genome, _)) in self.entries.iter().enumerate() {
                self.index.insert(genome.hash(), slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nk::config::NkConfig;
    use crate::nk::landscape::Landscape;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn genome(genotype: Vec<usize>) -> Genome {
        let mut rng = StdRng::seed_from_u64(10);
        let landscape = Arc::new(Landscape::generate(&NkConfig::new(3, 1), &mut rng).unwrap());
        Genome::new(genotype, landscape, 0.1).unwrap()
    }

    #[test]
    fn test_seeded_has_unit_mass() {
        let p = Population::seeded(genome(vec![0, 1, 0]), PopulationKeying::ByGenotype);
        assert_eq!(p.len(), 1);
        assert!((p.total_mass() - 1.0).abs() < 1e-12);
        let (g, _) = p.fittest().unwrap();
        assert!((p.average_fitness() - g.fitness()).abs() < 1e-12);
    }

    #[test]
    fn test_by_genotype_accumulates() {
        let mut p = Population::new(PopulationKeying::ByGenotype);
        p.add(genome(vec![0, 1, 0]), 0.25);
        p.add(genome(vec![1, 1, 0]), 0.25);
        p.add(genome(vec![0, 1, 0]), 0.5);
        assert_eq!(p.len(), 2);
        assert_eq!(p.distinct_genotypes(), 2);
        let masses: Vec<f64> = p.iter().map(|(_, m)| m).collect();
        assert!((masses[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_by_identity_fragments() {
        let mut p = Population::new(PopulationKeying::ByIdentity);
        p.add(genome(vec![0, 1, 0]), 0.25);
        p.add(genome(vec![0, 1, 0]), 0.75);
        assert_eq!(p.len(), 2);
        assert_eq!(p.distinct_genotypes(), 1);
    }

    #[test]
    fn test_prune_is_strict() {
        let mut p = Population::new(PopulationKeying::ByGenotype);
        p.add(genome(vec![0, 0, 0]), 0.009);
        p.add(genome(vec![1, 0, 0]), 0.01);
        p.add(genome(vec![0, 1, 0]), 0.5);
        assert_eq!(p.prune(0.01), 1);
        assert_eq!(p.len(), 2);

        // Index still points at the right slots after pruning.
        p.add(genome(vec![0, 1, 0]), 0.5);
        assert_eq!(p.len(), 2);
        let masses: Vec<f64> = p.iter().map(|(_, m)| m).collect();
        assert!((masses[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_renormalize() {
        let mut p = Population::new(PopulationKeying::ByGenotype);
        p.add(genome(vec![0, 0, 0]), 0.3);
        p.add(genome(vec![1, 0, 0]), 0.1);
        p.renormalize(1).unwrap();
        assert!((p.total_mass() - 1.0).abs() < 1e-12);
        let masses: Vec<f64> = p.iter().map(|(_, m)| m).collect();
        assert!((masses[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_renormalize_empty_fails() {
        let mut p = Population::new(PopulationKeying::ByIdentity);
        assert_eq!(
            p.renormalize(4),
            Err(NkError::EmptyPopulation { generation: 4 })
        );
    }

    #[test]
    fn test_renormalize_zero_mass_fails() {
        let mut p = Population::new(PopulationKeying::ByIdentity);
        p.add(genome(vec![0, 0, 0]), 0.0);
        assert!(p.renormalize(2).is_err());
    }
}
