use crate::dsl::PlanDocument;
use crate::error::PlanError;

/// Parse a YAML plan document.
pub fn parse_yaml_plan(src: &str) -> Result<PlanDocument, PlanError> {
    Ok(serde_yaml::from_str(src)?)
}
