//! JSON rendering.

use crate::error_handling::ExportError;
use crate::pipeline::AnalysisRecord;

/// Renders `record` as pretty-printed JSON bytes.
pub fn render_json(record: &AnalysisRecord) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(record)?)
}
