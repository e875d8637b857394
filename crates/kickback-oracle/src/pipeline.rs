//! Pipeline orchestration.
//!
//! ```text
//!   RunPlan ──→ assemble() ──→ Backend::run() ──→ PipelineRun
//!   (checked)    (sync)          (async)
//! ```
//!
//! Everything that can fail before execution fails inside [`assemble`] or
//! the capacity check, so a backend never sees a half-built run. Backend
//! errors abort the run unchanged; nothing is retried.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use kickback_hal::{Backend, HalError, Histogram};
use kickback_ir::Circuit;

use crate::amplifier::{
    ANCILLA_LABEL, AmplifierOptions, DATA_LABEL, amplification_fragment, amplify,
};
use crate::assembler::{DeutschJozsaOptions, Verdict, deutsch_jozsa, deutsch_jozsa_oracle, verdict};
use crate::classifier::{ThresholdTable, classify};
use crate::config::RunPlan;
use crate::error::{OracleError, OracleResult};
use crate::layout::RegisterLayout;
use crate::oracle::PhaseFlip;
use crate::predicate::TotalPredicate;

/// Everything built for one run, before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Qubit roles in `circuit`.
    pub layout: RegisterLayout,
    /// The stand-alone Grover circuit.
    pub grover: Circuit,
    /// Threshold labels of the marked set.
    pub threshold_table: ThresholdTable,
    /// The completed predicate the DJ oracle encodes.
    pub predicate: TotalPredicate,
    /// The combined circuit.
    pub circuit: Circuit,
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Identifier for log correlation.
    pub run_id: Uuid,
    /// The executed combined circuit.
    pub circuit: Circuit,
    /// Data-register histogram as returned by the backend.
    pub histogram: Histogram,
    /// Ancilla histogram, when ancillas were measured.
    pub ancilla_histogram: Option<Histogram>,
    /// Data histogram of the stand-alone Grover circuit, when executed.
    pub grover_histogram: Option<Histogram>,
    /// Threshold labels of the marked set.
    pub threshold_table: ThresholdTable,
    /// The completed predicate.
    pub predicate: TotalPredicate,
    /// Constant / not-constant reading of `histogram`.
    pub verdict: Verdict,
}

/// Outcome of [`Pipeline::run_grover`].
#[derive(Debug, Clone)]
pub struct GroverRun {
    /// Identifier for log correlation.
    pub run_id: Uuid,
    /// The executed circuit.
    pub circuit: Circuit,
    /// Data-register histogram.
    pub histogram: Histogram,
    /// Ancilla histogram, when measured.
    pub ancilla_histogram: Option<Histogram>,
}

/// Outcome of [`Pipeline::run_deutsch_jozsa`].
#[derive(Debug, Clone)]
pub struct DeutschJozsaRun {
    /// Identifier for log correlation.
    pub run_id: Uuid,
    /// The executed circuit.
    pub circuit: Circuit,
    /// Threshold labels of the marked set.
    pub threshold_table: ThresholdTable,
    /// The completed predicate.
    pub predicate: TotalPredicate,
    /// Data-register histogram.
    pub histogram: Histogram,
    /// Ancilla histogram, when measured.
    pub ancilla_histogram: Option<Histogram>,
    /// Constant / not-constant reading of `histogram`.
    pub verdict: Verdict,
}

/// Build every circuit of a run without executing anything.
///
/// The combined circuit is: H on the data, the amplification fragment, an
/// optional H layer, DJ ancilla preparation (X, H), the kickback oracle,
/// H on the data and the DJ ancilla, then measurement.
#[instrument(skip_all, fields(width = plan.width(), complement = plan.complement()))]
pub fn assemble(plan: &RunPlan) -> OracleResult<Assembly> {
    let n = plan.width();
    let set = plan.marked_set();
    let layout = RegisterLayout::new(n, plan.flip());
    let data = layout.data();

    let grover = amplify(
        n,
        set,
        plan.grover_iterations(),
        &AmplifierOptions {
            flip: plan.flip(),
            measure_ancilla: plan.measure_ancillas(),
        },
    )?;
    let threshold_table = classify(set, plan.threshold());
    let predicate = TotalPredicate::assemble(set, &threshold_table, plan.complement())?;

    let flip = match layout.grover_ancilla() {
        Some(ancilla) => PhaseFlip::ancilla(ancilla),
        None => PhaseFlip::InPlace,
    };
    let dj = layout.dj_ancilla();

    let mut circuit = Circuit::new("kickback_pipeline", layout.num_qubits());
    circuit
        .h_all(data.iter().copied())?
        .append(&amplification_fragment(
            &data,
            set,
            plan.grover_iterations(),
            flip,
        )?)?;
    if plan.reprepare_superposition() {
        circuit.h_all(data.iter().copied())?;
    }
    circuit
        .x(dj)?
        .h(dj)?
        .append(&deutsch_jozsa_oracle(&data, dj, &predicate)?)?
        .h_all(data.iter().copied())?
        .h(dj)?;
    circuit.measure(data.iter().copied(), DATA_LABEL)?;
    if plan.measure_ancillas() {
        circuit.measure(layout.ancillas(), ANCILLA_LABEL)?;
    }

    debug!(
        ops = circuit.num_ops(),
        qubits = circuit.num_qubits(),
        constant = predicate.is_constant(),
        "assembled pipeline circuit"
    );
    Ok(Assembly {
        layout,
        grover,
        threshold_table,
        predicate,
        circuit,
    })
}

/// Histograms read back from one execution.
struct Readout {
    data: Histogram,
    ancilla: Option<Histogram>,
}

/// Runs plans against a backend.
pub struct Pipeline<B> {
    backend: B,
}

impl<B: Backend> Pipeline<B> {
    /// Create a pipeline over `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The backend circuits are executed on.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reject circuits the backend cannot take, before anything executes.
    fn check_capacity(&self, circuit: &Circuit, shots: u32) -> OracleResult<()> {
        let caps = self.backend.capabilities();
        if circuit.num_qubits() > caps.num_qubits {
            return Err(OracleError::Configuration(format!(
                "'{}' needs {} qubits but backend '{}' supports {}",
                circuit.name(),
                circuit.num_qubits(),
                self.backend.name(),
                caps.num_qubits
            )));
        }
        if shots > caps.max_shots {
            return Err(OracleError::Configuration(format!(
                "{shots} shots exceed the backend limit of {}",
                caps.max_shots
            )));
        }
        Ok(())
    }

    /// Execute `circuit` and require a histogram per declared label, each
    /// accounting for exactly `shots` shots.
    async fn sample(&self, circuit: &Circuit, shots: u32) -> OracleResult<Readout> {
        let mut result = self.backend.run(circuit, shots).await?;
        if let Some(m) = circuit
            .measurements()
            .iter()
            .find(|m| result.histogram(&m.label).is_none())
        {
            return Err(HalError::ExecutionFailed(format!(
                "backend '{}' returned no '{}' histogram",
                self.backend.name(),
                m.label
            ))
            .into());
        }
        if result.shots != shots || !result.is_complete() {
            let totals: Vec<_> = result
                .histograms
                .iter()
                .map(|(label, h)| format!("{label}={}", h.total()))
                .collect();
            return Err(HalError::ExecutionFailed(format!(
                "backend '{}' returned incomplete histograms for {shots} shots ({})",
                self.backend.name(),
                totals.join(", ")
            ))
            .into());
        }
        let data = result.histograms.remove(DATA_LABEL).ok_or_else(|| {
            HalError::ExecutionFailed(format!(
                "backend '{}' returned no '{DATA_LABEL}' histogram",
                self.backend.name()
            ))
        })?;
        Ok(Readout {
            data,
            ancilla: result.histograms.remove(ANCILLA_LABEL),
        })
    }

    /// Assemble and execute the combined circuit for `plan`.
    ///
    /// If the plan asks for it, the stand-alone Grover circuit runs first.
    /// Its measurement is advisory: the configured marked set is what the
    /// later stages use.
    #[instrument(skip_all, fields(width = plan.width(), complement = plan.complement()))]
    pub async fn run(&self, plan: &RunPlan) -> OracleResult<PipelineRun> {
        let run_id = Uuid::new_v4();
        let assembly = assemble(plan)?;
        self.check_capacity(&assembly.circuit, plan.shots())?;
        if plan.execute_grover_stage() {
            self.check_capacity(&assembly.grover, plan.shots())?;
        }

        let grover_histogram = if plan.execute_grover_stage() {
            let readout = self.sample(&assembly.grover, plan.shots()).await?;
            info!(
                %run_id,
                most_frequent = ?readout.data.most_frequent(),
                "grover stage is advisory; the configured marked set is used downstream"
            );
            Some(readout.data)
        } else {
            None
        };

        let readout = self.sample(&assembly.circuit, plan.shots()).await?;
        let verdict = verdict(&readout.data, plan.confidence());
        info!(
            %run_id,
            backend = self.backend.name(),
            shots = plan.shots(),
            zero_share = readout.data.share(0),
            %verdict,
            "pipeline run complete"
        );

        Ok(PipelineRun {
            run_id,
            circuit: assembly.circuit,
            histogram: readout.data,
            ancilla_histogram: readout.ancilla,
            grover_histogram,
            threshold_table: assembly.threshold_table,
            predicate: assembly.predicate,
            verdict,
        })
    }

    /// Execute only the Grover circuit for `plan`.
    #[instrument(skip_all, fields(width = plan.width()))]
    pub async fn run_grover(&self, plan: &RunPlan) -> OracleResult<GroverRun> {
        let run_id = Uuid::new_v4();
        let circuit = amplify(
            plan.width(),
            plan.marked_set(),
            plan.grover_iterations(),
            &AmplifierOptions {
                flip: plan.flip(),
                measure_ancilla: plan.measure_ancillas(),
            },
        )?;
        self.check_capacity(&circuit, plan.shots())?;

        let readout = self.sample(&circuit, plan.shots()).await?;
        info!(
            %run_id,
            most_frequent = ?readout.data.most_frequent(),
            marked_hits = readout.data.count_of(&plan.marked_set().iter().collect::<Vec<_>>()),
            "grover run complete"
        );
        Ok(GroverRun {
            run_id,
            circuit,
            histogram: readout.data,
            ancilla_histogram: readout.ancilla,
        })
    }

    /// Execute only the Deutsch–Jozsa circuit for `plan`.
    #[instrument(skip_all, fields(width = plan.width(), complement = plan.complement()))]
    pub async fn run_deutsch_jozsa(&self, plan: &RunPlan) -> OracleResult<DeutschJozsaRun> {
        let run_id = Uuid::new_v4();
        let threshold_table = classify(plan.marked_set(), plan.threshold());
        let predicate =
            TotalPredicate::assemble(plan.marked_set(), &threshold_table, plan.complement())?;
        let circuit = deutsch_jozsa(
            &predicate,
            &DeutschJozsaOptions {
                ancilla_basis_change: true,
                measure_ancilla: plan.measure_ancillas(),
            },
        )?;
        self.check_capacity(&circuit, plan.shots())?;

        let readout = self.sample(&circuit, plan.shots()).await?;
        let verdict = verdict(&readout.data, plan.confidence());
        info!(%run_id, %verdict, zero_share = readout.data.share(0), "deutsch-jozsa run complete");
        Ok(DeutschJozsaRun {
            run_id,
            circuit,
            threshold_table,
            predicate,
            histogram: readout.data,
            ancilla_histogram: readout.ancilla,
            verdict,
        })
    }

    /// Run the combined pipeline once per complement value, 0 then 1.
    pub async fn run_complement_sweep(&self, plan: &RunPlan) -> OracleResult<Vec<PipelineRun>> {
        let plans = [plan.with_complement(0)?, plan.with_complement(1)?];
        for p in &plans {
            assemble(p)?;
        }
        let mut runs = Vec::with_capacity(plans.len());
        for p in &plans {
            runs.push(self.run(p).await?);
        }
        Ok(runs)
    }
}
