//! Evolutionary dynamics on NK fitness landscapes.
//!
//! Provides the simulation engine behind an interactive NK landscape
//! explorer:
//!
//! - **Landscape**: random fitness tables keyed by genotype hash, and
//!   random epistasis topologies.
//! - **Genome**: genotype, derived fitness and single-locus mutants.
//! - **Generation step**: mutation-weighted deterministic selection with
//!   an extinction threshold and renormalization.
//! - **Driver**: a tick-driven [`Simulation`](nk::Simulation) reporting the
//!   average fitness and a log line per generation.
//!
//! # Architecture
//!
//! The crate contains no presentation code. A UI (or the `nk-sim` binary)
//! supplies N, K and the tick speed, calls
//! [`Simulation::advance`](nk::Simulation::advance) on its own schedule,
//! and renders the returned [`GenerationReport`](nk::GenerationReport)s.

pub mod nk;
