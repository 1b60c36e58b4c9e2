//! Report builder: per-line errors, global validation and rendering

use serde::Serialize;
use signal_types::{SignalConfig, TokenizedLine};

use super::instruction::InstructionRecord;
use crate::error::{TranspileError, TranspileFailure};

/// Everything a caller gets back from one transpile call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranspilerOutput {
    /// Human-readable error strings, line errors first then validation errors
    pub errors: Vec<String>,
    /// Non-fatal advisories
    pub warnings: Vec<String>,
    /// One token sequence per original line, then one per inferred default
    pub tokenized_input: Vec<TokenizedLine>,
    /// The finished signal, handed verbatim to the signal checker
    pub signal_input: SignalConfig,
    pub has_errors: bool,

    /// Typed form of `errors`, in the same order
    #[serde(skip)]
    pub diagnostics: Vec<TranspileError>,
}

impl TranspilerOutput {
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// `Err` carrying the error strings when anything failed
    pub fn check(&self) -> Result<(), TranspileFailure> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TranspileFailure {
                errors: self.errors.clone(),
            })
        }
    }

    /// Convert into the signal, or the failure if any error was collected
    pub fn into_signal(self) -> Result<SignalConfig, TranspileFailure> {
        self.check()?;
        Ok(self.signal_input)
    }
}

/// Collects errors during the passes and assembles the final output
#[derive(Debug, Default)]
pub struct ReportBuilder {
    diagnostics: Vec<TranspileError>,
    warnings: Vec<String>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, error: TranspileError) {
        self.diagnostics.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Global checks run after every pass; independent of any single line
    pub fn validate_required(&mut self, signal: &SignalConfig) {
        if !signal.has_complete_market() {
            self.push_error(TranspileError::MarketRequired);
        }
        if !signal.has_initial_iso8601() {
            self.push_error(TranspileError::StartAtRequired);
        }
        if !signal.has_enter_range() {
            self.push_error(TranspileError::EnterRangeRequired);
        }
    }

    pub fn build(self, records: &[InstructionRecord], signal: SignalConfig) -> TranspilerOutput {
        let errors: Vec<String> = self.diagnostics.iter().map(|e| e.to_string()).collect();
        TranspilerOutput {
            has_errors: !errors.is_empty(),
            errors,
            warnings: self.warnings,
            tokenized_input: records.iter().map(InstructionRecord::rendered).collect(),
            signal_input: signal,
            diagnostics: self.diagnostics,
        }
    }
}
