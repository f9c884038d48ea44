//! Per-extension routing between gates.

use std::sync::Arc;

use camino::Utf8Path;
use tracing::trace;

use super::{DiagnosticCodes, GATE_TARGET, GateError, GateVerdict, ValidationGate, extension_of};

/// Sends checked extensions to one gate and everything else to another.
#[derive(Clone)]
pub struct RoutedGate {
    checked_extensions: Vec<String>,
    checked: Arc<dyn ValidationGate>,
    fallback: Arc<dyn ValidationGate>,
}

impl RoutedGate {
    /// Creates a router. Extensions are compared case-insensitively and
    /// without a leading dot.
    #[must_use]
    pub fn new<I, S>(
        checked_extensions: I,
        checked: Arc<dyn ValidationGate>,
        fallback: Arc<dyn ValidationGate>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            checked_extensions: checked_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            checked,
            fallback,
        }
    }

    fn is_checked(&self, path: &Utf8Path) -> bool {
        extension_of(path).is_some_and(|ext| self.checked_extensions.contains(&ext))
    }
}

impl std::fmt::Debug for RoutedGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutedGate")
            .field("checked_extensions", &self.checked_extensions)
            .finish_non_exhaustive()
    }
}

impl ValidationGate for RoutedGate {
    fn validate(
        &self,
        path: &Utf8Path,
        codes: &DiagnosticCodes,
    ) -> Result<GateVerdict, GateError> {
        if self.is_checked(path) {
            trace!(target: GATE_TARGET, path = %path, "routing to external checker");
            self.checked.validate(path, codes)
        } else {
            trace!(target: GATE_TARGET, path = %path, "routing to syntax gate");
            self.fallback.validate(path, codes)
        }
    }
}
