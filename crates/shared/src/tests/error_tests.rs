use super::*;

#[test]
fn reads_error_envelope_with_label_status() {
    let err = ApiError::from_body(r#"{"status": "error", "message": "Product not found"}"#)
        .expect("error envelope");
    assert_eq!(err.message, "Product not found");
    assert_eq!(ErrorCode::from_http_status(404), ErrorCode::NotFound);
}

#[test]
fn success_envelope_is_not_an_error() {
    assert!(ApiError::from_body(r#"{"status": 200, "message": "success", "cart_length": 2}"#)
        .is_none());
}

#[test]
fn error_code_follows_http_status_not_message_text() {
    let err = ApiError::from_body(r#"{"status": "error", "message": "Invalid JSON body"}"#)
        .expect("error envelope");
    assert_eq!(err.message, "Invalid JSON body");
    assert_eq!(ErrorCode::from_http_status(400), ErrorCode::InvalidRequest);
    assert_eq!(ErrorCode::from_http_status(500), ErrorCode::Unknown);
}

#[test]
fn non_json_body_has_no_envelope() {
    assert!(ApiError::from_body("<html>Server Error</html>").is_none());
}
