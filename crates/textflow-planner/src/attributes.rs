//! Typed schema fragments from paired `attributeNames` / `attributeTypes`.

use textflow_core::prelude::{Attribute, FieldType, Schema};
use textflow_core::schema::DuplicateAttribute;

use crate::error::PropertyError;
use crate::properties::{PropertyResolver, ATTRIBUTE_NAMES, ATTRIBUTE_TYPES};

/// Split on `,`, trim, and drop empty tokens, preserving order.
pub(crate) fn split_list(s: &str) -> Vec<&str> {
    s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Build the ordered attribute list declared by an operator.
///
/// Both properties are required. Zero attributes is a valid (empty) schema;
/// operators that need at least one check that themselves.
pub fn build_attribute_list(props: &PropertyResolver) -> Result<Schema, PropertyError> {
    let names = split_list(props.require(ATTRIBUTE_NAMES)?);
    let types = split_list(props.require(ATTRIBUTE_TYPES)?);

    if names.len() != types.len() {
        return Err(PropertyError::SchemaCoherence {
            names: names.len(),
            types: types.len(),
        });
    }

    let field_types = types
        .iter()
        .map(|token| {
            token
                .parse::<FieldType>()
                .map_err(|_| PropertyError::InvalidFieldType {
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let attributes = names
        .into_iter()
        .zip(field_types)
        .map(|(name, ty)| Attribute::new(name, ty))
        .collect();

    Schema::try_new(attributes)
        .map_err(|DuplicateAttribute(name)| PropertyError::DuplicateAttribute { name })
}
