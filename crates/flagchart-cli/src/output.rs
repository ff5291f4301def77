//! JSON output of chart specifications

use flagchart_core::{ChartRenderer, ChartSpec, RenderError};

/// Serializes a chart specification for a plotting frontend
#[derive(Clone, Debug, Default)]
pub struct JsonRenderer {
    /// Emit a single line instead of indented JSON
    pub compact: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

impl ChartRenderer for JsonRenderer {
    type Output = String;

    fn render(&self, spec: &ChartSpec) -> Result<String, RenderError> {
        let json = if self.compact {
            serde_json::to_string(spec)
        } else {
            serde_json::to_string_pretty(spec)
        };
        json.map_err(|e| RenderError::Format(e.to_string()))
    }
}
