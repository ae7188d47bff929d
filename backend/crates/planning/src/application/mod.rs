//! Application Layer
//!
//! Use cases for services, songs and assignments.

pub mod assignments;
pub mod services;
pub mod songs;

pub use assignments::AssignmentsUseCase;
pub use services::{ServiceCatalogUseCase, ServiceDetails, ServiceMember};
pub use songs::SongCatalogUseCase;

use crate::error::{PlanningError, PlanningResult};

/// Trimmed name, `InvalidData` when blank
pub(crate) fn required_name(name: &str) -> PlanningResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PlanningError::InvalidData);
    }
    Ok(name.to_string())
}

/// Ids in first-seen order without repeats, `InvalidData` when empty
pub(crate) fn distinct_ids<T: Copy + PartialEq>(ids: &[T]) -> PlanningResult<Vec<T>> {
    if ids.is_empty() {
        return Err(PlanningError::InvalidData);
    }
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name() {
        assert_eq!(required_name("  Sunday  ").unwrap(), "Sunday");
        assert!(matches!(required_name("   "), Err(PlanningError::InvalidData)));
    }

    #[test]
    fn test_distinct_ids() {
        assert_eq!(distinct_ids(&[3, 1, 3, 2, 1]).unwrap(), vec![3, 1, 2]);
        assert!(matches!(
            distinct_ids::<i64>(&[]),
            Err(PlanningError::InvalidData)
        ));
    }
}
