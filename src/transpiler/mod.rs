//! Signal transpiler
//!
//! Turns signal text into a [`SignalConfig`] plus a tokenized rendering and an
//! error report. Resolution runs in four passes:
//!
//! ```text
//! explicit lines ─▶ infer defaults for unset fields ─▶ apply inferred ─▶ validate
//! ```
//!
//! One line failing never stops the others; the caller always receives the
//! complete report together with whatever fields were set. A field whose own
//! line was rejected is left unset rather than defaulted.

mod dates;
mod instruction;
mod matchers;
mod numbers;
mod report;
mod tokens;

pub use dates::try_parse_date;
pub use instruction::{frame_lines, InstructionRecord};
pub use matchers::{MatchOutcome, Matcher, MATCHERS};
pub use numbers::extract_float_sequence;
pub use report::{ReportBuilder, TranspilerOutput};
pub use tokens::{format_float, INFERRED_MARKER};

use signal_types::SignalConfig;
use tracing::{debug, info};

use crate::config::TranspilerConfig;
use crate::error::Field;

/// Transpiler engine. Holds only read-only configuration, so one instance can
/// serve any number of independent calls.
#[derive(Debug, Clone, Default)]
pub struct SignalTranspiler {
    config: TranspilerConfig,
}

impl SignalTranspiler {
    pub fn new(config: TranspilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranspilerConfig {
        &self.config
    }

    pub fn transpile(&self, input: &str) -> TranspilerOutput {
        let mut records = frame_lines(input);
        let line_count = records.len();
        let mut signal = SignalConfig::new();
        let mut report = ReportBuilder::new();

        self.apply_pending(&mut records, &mut signal, &mut report);

        let rejected: Vec<Field> = records
            .iter()
            .filter_map(InstructionRecord::rejected_field)
            .collect();
        let inferred = self.infer_defaults(&signal, &rejected, records.len());
        records.extend(inferred);
        self.apply_pending(&mut records, &mut signal, &mut report);

        report.validate_required(&signal);

        info!(
            lines = line_count,
            inferred = records.len() - line_count,
            errors = report.error_count(),
            "signal transpiled"
        );
        report.build(&records, signal)
    }

    /// Apply every record not yet applied, collecting fresh errors
    fn apply_pending(
        &self,
        records: &mut [InstructionRecord],
        signal: &mut SignalConfig,
        report: &mut ReportBuilder,
    ) {
        for record in records.iter_mut().filter(|r| !r.is_applied()) {
            if let Some(error) = record.apply(signal, &self.config) {
                report.push_error(error.clone());
            }
        }
    }

    /// One synthesized instruction per defaultable field still unset, skipping
    /// fields in `rejected`
    pub fn infer_defaults(
        &self,
        signal: &SignalConfig,
        rejected: &[Field],
        first_index: usize,
    ) -> Vec<InstructionRecord> {
        let defaults = &self.config.defaults;
        let open = |field: Field| !rejected.contains(&field);
        let mut lines = Vec::new();
        if !signal.has_exchange() && open(Field::Exchange) {
            lines.push(format!("EXCHANGE: {}", defaults.exchange));
        }
        if !signal.is_short_set && open(Field::ShortLong) {
            lines.push(if defaults.short { "SHORT" } else { "LONG" }.to_string());
        }
        if !signal.has_invalidate_after() && open(Field::InvalidateAfter) {
            lines.push(format!(
                "INVALIDATE AFTER {} DAYS",
                defaults.invalidate_after_days
            ));
        }
        if !signal.has_enter_range() && open(Field::EnterRange) {
            lines.push("ENTER: IMMEDIATELY".to_string());
        }

        lines
            .into_iter()
            .enumerate()
            .map(|(offset, line)| {
                debug!(default = %line, "inferring default");
                InstructionRecord::inferred(line, first_index + offset)
            })
            .collect()
    }
}

/// Transpile with the built-in registries
pub fn transpile(input: &str) -> TranspilerOutput {
    SignalTranspiler::default().transpile(input)
}
