use crate::dsl::PlanDocument;
use crate::error::PlanError;

/// Parse a JSON plan document.
pub fn parse_json_plan(src: &str) -> Result<PlanDocument, PlanError> {
    Ok(serde_json::from_str(src)?)
}
