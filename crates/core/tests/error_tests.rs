// ═══════════════════════════════════════════════════════════════════
// Error Tests — display text and user-facing message forwarding
// ═══════════════════════════════════════════════════════════════════

use tourbook_core::errors::CoreError;

#[test]
fn display_formats() {
    assert_eq!(
        CoreError::NotAuthenticated.to_string(),
        "Not authenticated"
    );
    assert_eq!(
        CoreError::Api {
            status: 409,
            message: "Option is sold out".into()
        }
        .to_string(),
        "API error (409): Option is sold out"
    );
    assert_eq!(
        CoreError::Network("connection refused".into()).to_string(),
        "Network error: connection refused"
    );
    assert_eq!(
        CoreError::Validation("No items selected for checkout".into()).to_string(),
        "Validation failed: No items selected for checkout"
    );
    assert_eq!(
        CoreError::ItemNotFound("C9".into()).to_string(),
        "Cart item not found: C9"
    );
}

#[test]
fn api_errors_forward_the_server_message_verbatim() {
    let err = CoreError::Api {
        status: 400,
        message: "Capacity exceeded".into(),
    };
    assert_eq!(err.display_message(), "Capacity exceeded");
}

#[test]
fn non_api_errors_fall_back_to_their_display_text() {
    let err = CoreError::NotAuthenticated;
    assert_eq!(err.display_message(), "Not authenticated");
}

#[test]
fn serde_failures_convert_to_deserialization_errors() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: CoreError = parse_err.into();
    assert!(matches!(err, CoreError::Deserialization(_)));
}
