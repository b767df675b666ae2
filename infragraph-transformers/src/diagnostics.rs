//! Collection point for recoverable transformation warnings.

use tracing::warn;

use crate::TransformWarning;

/// Warnings raised while transforming one event.
///
/// Every warning is logged when recorded and also kept, so callers can count
/// or forward them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<TransformWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and record a warning.
    pub fn warn(&mut self, warning: TransformWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[TransformWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<TransformWarning> {
        self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
