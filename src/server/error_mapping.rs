//! Mapping from domain errors to structured error codes and tips.

use crate::replicate::ReplicateError;

/// Trait for mapping domain errors to structured error codes and optional
/// operator tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);
}

impl ToStructuredError for ReplicateError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            ReplicateError::InvalidSourceUrl => (
                "INVALID_SOURCE_URL",
                Some("Paste the full link of the item to copy"),
            ),
            ReplicateError::SourceUnresolvable => (
                "SOURCE_UNRESOLVABLE",
                Some("Check that the item exists and your account can read it"),
            ),
            ReplicateError::InvalidDestinationUrl => (
                "INVALID_DESTINATION_URL",
                Some("Paste the full link of the destination folder"),
            ),
            ReplicateError::DestinationUnresolvable => (
                "DESTINATION_UNRESOLVABLE",
                Some("Check that the folder exists and your account can read it"),
            ),
            ReplicateError::DestinationNotWritable => (
                "DESTINATION_NOT_WRITABLE",
                Some("Ask for edit access to the destination folder"),
            ),
            ReplicateError::InvalidQuantity(_) => ("INVALID_QUANTITY", None),
            ReplicateError::Provider(_) => ("PROVIDER_FAILURE", None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_a_code() {
        let cases = [
            ReplicateError::InvalidSourceUrl,
            ReplicateError::SourceUnresolvable,
            ReplicateError::InvalidDestinationUrl,
            ReplicateError::DestinationUnresolvable,
            ReplicateError::DestinationNotWritable,
            ReplicateError::InvalidQuantity(0),
        ];
        for case in cases {
            let (code, _) = case.error_code_and_tip();
            assert!(!code.is_empty());
        }
    }

    #[test]
    fn test_not_writable_carries_a_tip() {
        let (code, tip) = ReplicateError::DestinationNotWritable.error_code_and_tip();
        assert_eq!(code, "DESTINATION_NOT_WRITABLE");
        assert!(tip.is_some());
    }
}
