//! Optional `limit` / `offset` properties.

use textflow_operators::Pagination;

use crate::error::{PaginationKey, PropertyError};
use crate::properties::{PropertyResolver, LIMIT, OFFSET};

fn find_bound(props: &PropertyResolver, key: PaginationKey) -> Result<Option<usize>, PropertyError> {
    let name = match key {
        PaginationKey::Limit => LIMIT,
        PaginationKey::Offset => OFFSET,
    };
    let Some(raw) = props.optional(name) else {
        return Ok(None);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| PropertyError::InvalidNumberFormat {
            key: name.to_string(),
            value: raw.to_string(),
        })?;
    if value < 0 {
        return Err(PropertyError::NegativePagination {
            operator_id: props.operator_id().clone(),
            key,
            value,
        });
    }
    usize::try_from(value)
        .map(Some)
        .map_err(|_| PropertyError::InvalidNumberFormat {
            key: name.to_string(),
            value: raw.to_string(),
        })
}

/// `None` when `limit` is absent; otherwise a non-negative integer.
pub fn find_limit(props: &PropertyResolver) -> Result<Option<usize>, PropertyError> {
    find_bound(props, PaginationKey::Limit)
}

/// `None` when `offset` is absent; otherwise a non-negative integer.
pub fn find_offset(props: &PropertyResolver) -> Result<Option<usize>, PropertyError> {
    find_bound(props, PaginationKey::Offset)
}

/// Both bounds. Limit and offset are validated independently.
pub fn find_pagination(props: &PropertyResolver) -> Result<Pagination, PropertyError> {
    Ok(Pagination::new(find_limit(props)?, find_offset(props)?))
}
