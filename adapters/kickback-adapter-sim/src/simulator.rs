//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};

use kickback_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, ExecutionResult, HalError, HalResult,
    Histogram, ValidationResult,
};
use kickback_ir::{Circuit, Measurement};

use crate::statevector::Statevector;

const DEFAULT_MAX_QUBITS: u32 = 20;

/// Widest register the dense statevector is allowed to allocate.
pub const QUBIT_LIMIT: u32 = 30;

/// Local simulator backend.
///
/// Each circuit is simulated exactly once; shots are then drawn from the
/// final Born distribution. Seeding the sampler makes histograms
/// reproducible.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Shot sampler.
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            StdRng::from_entropy(),
        )
    }

    /// Create a simulator with custom max qubits, capped at [`QUBIT_LIMIT`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            max_qubits,
            StdRng::from_entropy(),
        )
    }

    /// Create a simulator whose sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            StdRng::seed_from_u64(seed),
        )
    }

    fn build(config: BackendConfig, max_qubits: u32, rng: StdRng) -> Self {
        Self {
            config,
            capabilities: Capabilities::simulator(max_qubits.min(QUBIT_LIMIT)),
            rng: Mutex::new(rng),
        }
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.capabilities.num_qubits {
            return Err(HalError::CircuitTooLarge(format!(
                "circuit has {} qubits but simulator only supports {}",
                num_qubits, self.capabilities.num_qubits
            )));
        }

        debug!(
            "Starting simulation: {} qubits, {} operations, {} shots",
            num_qubits,
            circuit.num_ops(),
            shots
        );

        let mut sv = Statevector::new(num_qubits as usize);
        for op in circuit.operations() {
            sv.apply(op);
        }

        let dist = WeightedIndex::new(sv.probabilities())
            .map_err(|e| HalError::ExecutionFailed(format!("degenerate statevector: {e}")))?;

        let mut basis_counts: FxHashMap<usize, u64> = FxHashMap::default();
        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            for _ in 0..shots {
                *basis_counts.entry(dist.sample(&mut *rng)).or_insert(0) += 1;
            }
        }

        let mut result = ExecutionResult::new(self.name(), shots);
        for label in circuit.measurements().iter().map(|m| m.label.as_str()) {
            if result.histogram(label).is_some() {
                continue;
            }
            let readout = Measurement {
                qubits: circuit.measured_qubits(label),
                label: label.to_string(),
            };
            let histogram: Histogram = basis_counts
                .iter()
                .map(|(&index, &count)| (readout.decode(|q| Statevector::is_set(index, q)), count))
                .collect();
            result = result.with_histogram(label, histogram);
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(result.with_execution_time(elapsed.as_millis() as u64))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit, shots: u32) -> HalResult<ValidationResult> {
        Ok(self.capabilities.check(circuit, shots))
    }

    async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be positive".into()));
        }
        self.run_simulation(circuit, shots)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(v) if v <= u64::from(QUBIT_LIMIT) => v as u32,
            Some(v) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits {v} exceeds the simulator limit of {QUBIT_LIMIT}"
                )));
            }
        };
        let rng = match config.extra_u64("seed")? {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::build(config, max_qubits, rng))
    }
}
