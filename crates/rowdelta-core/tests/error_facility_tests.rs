use rowdelta_core::errors::{ExError, ExErrorKind, RowDeltaError};
use rowdelta_core_types::RequestId;

#[test]
fn test_primary_key_mismatch_verifiable_by_kind() {
    let err = RowDeltaError::PrimaryKeyMismatch {
        data_name: "users".to_string(),
        before: vec!["ID".to_string()],
        after: vec!["CODE".to_string()],
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::PrimaryKeyMismatch);
    assert_eq!(ex_err.code(), "ERR_PRIMARY_KEY_MISMATCH");
    assert_eq!(ex_err.entity_id(), Some("users"));
    assert!(ex_err.message().contains("CODE"));
}

#[test]
fn test_unknown_pk_column_is_column_not_found() {
    let err = RowDeltaError::UnknownPrimaryKeyColumn {
        data_name: "users".to_string(),
        column: "UUID".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::ColumnNotFound);
    assert_eq!(ex_err.column(), Some("UUID"));
    assert!(!ex_err.kind().is_usage_error());
}

#[test]
fn test_row_shape_carries_index() {
    let err = RowDeltaError::RowShape {
        data_name: "t".to_string(),
        row_index: 4,
        expected: 3,
        actual: 2,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::RowShapeMismatch);
    assert_eq!(ex_err.index(), Some(4));
    assert!(ex_err.message().contains("expected 3 values, got 2"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::UnknownPolicy, "ERR_UNKNOWN_POLICY"),
        (ExErrorKind::IndexOutOfBounds, "ERR_INDEX_OUT_OF_BOUNDS"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_display_includes_context() {
    let request_id = RequestId::from_string("req-1".to_string());
    let err = ExError::new(ExErrorKind::ColumnNotFound)
        .with_op("column_named")
        .with_entity_id("users")
        .with_column("AGE")
        .with_request_id(request_id)
        .with_message("Column not found");

    let display = err.to_string();
    assert!(display.starts_with("[ERR_COLUMN_NOT_FOUND] in operation 'column_named': Column not found"));
    assert!(display.contains("(entity: users)"));
    assert!(display.contains("(column: AGE)"));
    assert!(display.contains("(request_id: req-1)"));
}

#[test]
fn test_serialization_from_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let ex_err: ExError = RowDeltaError::from(json_err).into();
    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
    assert!(!ex_err.message().is_empty());
}
