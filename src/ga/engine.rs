//! Generational GA loop.
//!
//! # Algorithm
//!
//! 1. Build `population_size` random chromosomes.
//! 2. For each of `generations` rounds: score everyone, sort best first,
//!    keep the top `max(2, population_size / 3)` as the breeding pool,
//!    carry the best two over unchanged, and fill the rest with mutated
//!    crossover children of two distinct pool members.
//! 3. Score the final population and return its best individual.
//!
//! There is no early stop; only cancellation ends a run before the
//! configured generation count.
//!
//! # Determinism
//!
//! Every individual and child draws from its own `SmallRng`, seeded from
//! the run's master RNG before any parallel section. A seeded run gives
//! the same result with or without `parallel`.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::chromosome::Chromosome;
use super::fitness::FitnessEvaluator;
use super::operators::GeneticOperators;
use crate::models::ProblemConfig;

/// Individuals copied unchanged into the next generation.
pub const ELITE_COUNT: usize = 2;

/// Lifecycle of a [`GaEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Created, not yet run.
    Initialized,
    /// Running the given generation.
    Evolving {
        /// Zero-based generation index.
        generation: usize,
    },
    /// Finished; the result has been returned.
    Converged,
}

/// Progress report passed to a callback after each generation.
#[derive(Debug, Clone)]
pub struct GaProgress {
    /// Generation just scored (zero-based).
    pub generation: usize,
    /// Configured generation count.
    pub max_generations: usize,
    /// Best fitness in the scored population.
    pub best_fitness: f64,
    /// Mean fitness of the scored population.
    pub avg_fitness: f64,
    /// Time since the run started.
    pub elapsed: Duration,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best chromosome of the final population.
    pub best: Chromosome,
    /// Fitness of `best` (`0.0` is perfect).
    pub fitness: f64,
    /// Generations completed.
    pub generations: usize,
    /// Best fitness per scored generation, ending with the final scoring.
    pub history: Vec<f64>,
    /// Whether the run was stopped through the cancel handle.
    pub cancelled: bool,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

type Scored = (f64, Chromosome);

/// Genetic algorithm engine for one timetable problem.
///
/// # Example
///
/// ```
/// use timetable_ga::ga::GaEngine;
/// use timetable_ga::models::{GaSettings, ProblemConfig, SubjectType, TimetableRequest};
///
/// let request = TimetableRequest::new(2, 5, 6, 4, 4)
///     .with_subject(0, 4, vec![0, 1], SubjectType::Lecture)
///     .with_subject(1, 2, vec![2, 3], SubjectType::Lab)
///     .with_ga(GaSettings::default().with_generations(5).with_seed(42));
/// let config = ProblemConfig::new(request).unwrap();
///
/// let mut engine = GaEngine::new(&config);
/// let result = engine.run();
/// assert!(result.fitness <= 0.0);
/// assert_eq!(result.generations, 5);
/// ```
#[derive(Debug)]
pub struct GaEngine<'a> {
    config: &'a ProblemConfig,
    evaluator: FitnessEvaluator<'a>,
    operators: GeneticOperators<'a>,
    state: EngineState,
    cancelled: Arc<AtomicBool>,
}

impl<'a> GaEngine<'a> {
    /// Creates an engine with default operators.
    pub fn new(config: &'a ProblemConfig) -> Self {
        Self {
            config,
            evaluator: FitnessEvaluator::new(config),
            operators: GeneticOperators::new(config),
            state: EngineState::Initialized,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators<'a>) -> Self {
        self.operators = operators;
        self
    }

    /// Returns a handle that stops the run at the next generation boundary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Runs the GA, seeded from the config or from the OS.
    pub fn run(&mut self) -> GaResult {
        self.run_with_progress(|_| {})
    }

    /// Runs the GA, reporting after each generation.
    pub fn run_with_progress<F>(&mut self, progress: F) -> GaResult
    where
        F: FnMut(&GaProgress),
    {
        let mut rng = match self.config.ga().seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.evolve(&mut rng, progress)
    }

    /// Runs the GA with a caller-supplied master RNG.
    pub fn run_with_rng<R: Rng>(&mut self, rng: &mut R) -> GaResult {
        self.evolve(rng, |_| {})
    }

    fn evolve<R, F>(&mut self, rng: &mut R, mut progress: F) -> GaResult
    where
        R: Rng,
        F: FnMut(&GaProgress),
    {
        let start = Instant::now();
        let settings = self.config.ga();
        let max_generations = settings.generations;

        self.state = EngineState::Initialized;
        log::info!(
            "GA start: {} classes x {} days x {} slots, population {}, generations {}",
            self.config.num_classes(),
            self.config.days(),
            self.config.slots_per_day(),
            settings.population_size,
            max_generations
        );

        let mut population = self.initial_population(rng);
        let mut history = Vec::with_capacity(max_generations + 1);
        let mut completed = 0;
        let mut cancelled = false;

        for generation in 0..max_generations {
            if self.cancelled.load(AtomicOrdering::Relaxed) {
                log::warn!("GA cancelled after {completed} of {max_generations} generations");
                cancelled = true;
                break;
            }
            self.state = EngineState::Evolving { generation };

            let scored = self.score(population);
            let best_fitness = scored[0].0;
            let avg_fitness = mean_fitness(&scored);
            history.push(best_fitness);
            log::debug!("generation {generation}: best {best_fitness:.1}, avg {avg_fitness:.1}");
            progress(&GaProgress {
                generation,
                max_generations,
                best_fitness,
                avg_fitness,
                elapsed: start.elapsed(),
            });

            population = self.next_generation(&scored, rng);
            completed = generation + 1;
        }

        let mut scored = self.score(population);
        // population_size >= 2 is enforced by validation
        let (fitness, best) = scored.swap_remove(0);
        history.push(fitness);
        self.state = EngineState::Converged;

        log::info!(
            "GA done: best fitness {fitness} after {completed} generations in {:?}",
            start.elapsed()
        );

        GaResult {
            best,
            fitness,
            generations: completed,
            history,
            cancelled,
            elapsed: start.elapsed(),
        }
    }

    fn initial_population<R: Rng>(&self, rng: &mut R) -> Vec<Chromosome> {
        let seeds: Vec<u64> = (0..self.config.ga().population_size)
            .map(|_| rng.random())
            .collect();
        let config = self.config;
        let create = |&seed: &u64| Chromosome::random(config, &mut SmallRng::seed_from_u64(seed));

        if self.config.ga().parallel {
            seeds.par_iter().map(create).collect()
        } else {
            seeds.iter().map(create).collect()
        }
    }

    /// Scores a population and sorts it best first.
    fn score(&self, population: Vec<Chromosome>) -> Vec<Scored> {
        let evaluator = self.evaluator;
        let mut scored: Vec<Scored> = if self.config.ga().parallel {
            population
                .into_par_iter()
                .map(|c| (evaluator.fitness(&c), c))
                .collect()
        } else {
            population
                .into_iter()
                .map(|c| (evaluator.fitness(&c), c))
                .collect()
        };
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored
    }

    /// Elites plus crossover children of the breeding pool.
    fn next_generation<R: Rng>(&self, scored: &[Scored], rng: &mut R) -> Vec<Chromosome> {
        let population_size = self.config.ga().population_size;
        let pool_size = (population_size / 3).max(2).min(scored.len());
        let pool = &scored[..pool_size];

        let mut next: Vec<Chromosome> = scored
            .iter()
            .take(ELITE_COUNT.min(population_size))
            .map(|(_, c)| c.clone())
            .collect();

        let jobs: Vec<(usize, usize, u64)> = (next.len()..population_size)
            .map(|_| {
                let parents = index::sample(rng, pool_size, 2);
                (parents.index(0), parents.index(1), rng.random())
            })
            .collect();

        let ops = self.operators;
        let breed = |&(i, j, seed): &(usize, usize, u64)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut child = ops.crossover(&pool[i].1, &pool[j].1, &mut rng);
            ops.mutate(&mut child, &mut rng);
            child
        };

        if self.config.ga().parallel {
            next.par_extend(jobs.par_iter().map(breed));
        } else {
            next.extend(jobs.iter().map(breed));
        }
        next
    }
}

fn mean_fitness(scored: &[Scored]) -> f64 {
    scored.iter().map(|(f, _)| f).sum::<f64>() / scored.len().max(1) as f64
}
