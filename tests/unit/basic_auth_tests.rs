// ==============================
// tests/unit/basic_auth_tests.rs
// ==============================
//! Unit tests for Basic credential extraction
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sessiongate_backend::auth::basic::{
    credential_from_header, decode_base64_authorization_header,
    extract_base64_authorization_header, extract_user_credentials,
};

#[test]
fn test_non_basic_headers_yield_nothing() {
    for header in [
        "",
        "Basic",
        "basic Zm9vOmJhcg==",
        "BASIC Zm9vOmJhcg==",
        " Basic Zm9vOmJhcg==",
        "Bearer Zm9vOmJhcg==",
        "Digest username=foo",
        "Zm9vOmJhcg==",
    ] {
        assert_eq!(extract_base64_authorization_header(Some(header)), None, "{header:?}");
    }
}

#[test]
fn test_credentials_round_trip_through_a_header() {
    for (identifier, secret) in [
        ("a@x.com", "pw1"),
        ("bob", ""),
        ("", "secret"),
        ("a@x.com", "with:many:colons"),
        ("ünï", "cødé"),
    ] {
        let header = format!("Basic {}", STANDARD.encode(format!("{identifier}:{secret}")));
        let credential = credential_from_header(Some(&header)).unwrap();
        assert_eq!(credential.identifier, identifier);
        assert_eq!(credential.secret.as_str(), secret);
    }
}

#[test]
fn test_malformed_credentials_degrade_to_none() {
    // not base64
    assert!(credential_from_header(Some("Basic ???")).is_none());
    // url-safe alphabet is not accepted
    assert!(decode_base64_authorization_header(Some("-_-_")).is_none());
    // decodes, but has no colon
    let header = format!("Basic {}", STANDARD.encode("no-colon-here"));
    assert!(credential_from_header(Some(&header)).is_none());
    // decodes to invalid UTF-8
    let header = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
    assert!(credential_from_header(Some(&header)).is_none());
    assert!(credential_from_header(None).is_none());
    assert!(extract_user_credentials(Some("")).is_none());
}
