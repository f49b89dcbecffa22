//! Bulk Operation Validation
//!
//! Selection size limits and the per-entity-type action allow-list.

use serde::Serialize;

use crate::bulk::{BulkAction, EntityType};

/// Largest selection a single operation may process.
pub const MAX_ENTITIES_PER_OPERATION: usize = 1000;

// == Validation Result ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Actions permitted for an entity type.
pub fn allowed_actions(entity_type: EntityType) -> &'static [BulkAction] {
    use BulkAction::*;

    match entity_type {
        EntityType::Beneficiary => &[Delete, Update, Export, Archive, Assign, Tag],
        EntityType::Donation => &[Delete, Update, Export, Archive],
        EntityType::User => &[Delete, Update, Export, Activate, Deactivate],
        EntityType::Task => &[Delete, Update, Export, Archive, Assign, Tag],
    }
}

pub fn is_action_allowed(entity_type: EntityType, action: BulkAction) -> bool {
    allowed_actions(entity_type).contains(&action)
}

// == Validate Operation ==
/// Checks a bulk request and reports every violation, in a fixed order.
pub fn validate_operation(
    entity_type: EntityType,
    action: BulkAction,
    entity_ids: &[String],
) -> ValidationResult {
    let mut errors = Vec::new();

    if entity_ids.is_empty() {
        errors.push("At least one entity must be selected".to_string());
    }

    if entity_ids.len() > MAX_ENTITIES_PER_OPERATION {
        errors.push(format!(
            "Maximum {MAX_ENTITIES_PER_OPERATION} entities can be processed at once"
        ));
    }

    if !is_action_allowed(entity_type, action) {
        errors.push(format!("Action '{action}' is not valid for '{entity_type}'"));
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("id{i}")).collect()
    }

    #[test]
    fn test_empty_selection() {
        let result = validate_operation(EntityType::Beneficiary, BulkAction::Delete, &[]);
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["At least one entity must be selected"]);
    }

    #[test]
    fn test_over_limit_selection() {
        let result = validate_operation(EntityType::Donation, BulkAction::Export, &ids(1001));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Maximum 1000 entities can be processed at once"]
        );
    }

    #[test]
    fn test_limit_is_inclusive() {
        let result = validate_operation(EntityType::Donation, BulkAction::Export, &ids(1000));
        assert!(result.valid);
    }

    #[test]
    fn test_disallowed_pair() {
        let result = validate_operation(EntityType::User, BulkAction::Archive, &ids(1));
        assert_eq!(result.errors, vec!["Action 'archive' is not valid for 'user'"]);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let result = validate_operation(EntityType::Donation, BulkAction::Tag, &[]);
        assert_eq!(
            result.errors,
            vec![
                "At least one entity must be selected",
                "Action 'tag' is not valid for 'donation'",
            ]
        );
    }

    #[test]
    fn test_allow_list_table() {
        use BulkAction::*;
        use EntityType::*;

        let table: [(EntityType, &[BulkAction]); 4] = [
            (Beneficiary, &[Delete, Update, Export, Archive, Assign, Tag]),
            (Donation, &[Delete, Update, Export, Archive]),
            (User, &[Delete, Update, Export, Activate, Deactivate]),
            (Task, &[Delete, Update, Export, Archive, Assign, Tag]),
        ];

        for (entity_type, allowed) in table {
            for action in BulkAction::ALL {
                let result = validate_operation(entity_type, action, &ids(2));
                assert_eq!(
                    result.valid,
                    allowed.contains(&action),
                    "{entity_type}/{action}"
                );
            }
        }
    }
}
