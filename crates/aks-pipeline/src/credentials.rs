//! Service principal credential extraction from role-creation output.
//!
//! The role-creation command prints a JSON-ish blob whose quoted tokens sit
//! at fixed positions. The stock parser preserves that positional contract
//! (split on `"` and index in) but refuses empty or truncated payloads
//! instead of handing empty credentials downstream. A structured JSON parser
//! is available for upstream versions whose field order can no longer be
//! trusted.

use serde::Deserialize;

use crate::error::CredentialError;
use crate::types::ServicePrincipal;

/// Turns the raw stdout of the role-creation command into credentials.
///
/// Implementations are pure text processing; all I/O has already happened.
pub trait CredentialParser: Send + Sync {
    /// Parse the raw output.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload cannot yield a complete,
    /// non-empty credential pair.
    fn parse(&self, raw: &str) -> Result<ServicePrincipal, CredentialError>;
}

/// The positional quote-split parser.
///
/// Splitting the payload on `"` puts the application id value at token 3
/// and the secret value at token 15, matching the upstream tool's five-key
/// payload (`appId`, `displayName`, `name`, `password`, `tenant`).
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteSplitParser;

impl QuoteSplitParser {
    /// Token position of the application id value.
    pub const APP_ID_INDEX: usize = 3;
    /// Token position of the secret value.
    pub const SECRET_INDEX: usize = 15;
}

impl CredentialParser for QuoteSplitParser {
    fn parse(&self, raw: &str) -> Result<ServicePrincipal, CredentialError> {
        let tokens: Vec<&str> = raw.split('"').collect();
        let needed = Self::SECRET_INDEX + 1;
        if tokens.len() < needed {
            return Err(CredentialError::too_few_tokens(needed, tokens.len()));
        }

        let app_id = tokens[Self::APP_ID_INDEX];
        let secret = tokens[Self::SECRET_INDEX];
        if app_id.is_empty() {
            return Err(CredentialError::empty_field("application id"));
        }
        if secret.is_empty() {
            return Err(CredentialError::empty_field("secret"));
        }

        Ok(ServicePrincipal::new(app_id, secret))
    }
}

#[derive(Debug, Deserialize)]
struct RolePayload {
    #[serde(rename = "appId")]
    app_id: String,
    password: String,
}

/// A structured parser for upstream versions that emit real JSON.
///
/// Field names, not positions: `appId` and `password` are read wherever
/// they sit in the object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCredentialParser;

impl CredentialParser for JsonCredentialParser {
    fn parse(&self, raw: &str) -> Result<ServicePrincipal, CredentialError> {
        let payload: RolePayload = serde_json::from_str(raw)
            .map_err(|e| CredentialError::malformed(e.to_string()))?;
        if payload.app_id.is_empty() {
            return Err(CredentialError::empty_field("application id"));
        }
        if payload.password.is_empty() {
            return Err(CredentialError::empty_field("secret"));
        }
        Ok(ServicePrincipal::new(payload.app_id, payload.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "appId": "a487e4b4-92a0-4795-a0f445bbd21f2472",
  "displayName": "azure-cli-2020-11-30",
  "name": "http://azure-cli-2020-11-30",
  "password": "2f674f52-9e23-47a2-a78613a84c07f6a2",
  "tenant": "72f988bf-86f1-41af-91ab-2d7cd011db47"
}"#;

    mod quote_split {
        use super::*;

        #[test]
        fn well_formed_payload_yields_both_credentials() {
            let sp = QuoteSplitParser
                .parse(SAMPLE)
                .expect("sample payload parses");
            assert_eq!(sp.app_id, "a487e4b4-92a0-4795-a0f445bbd21f2472");
            assert_eq!(sp.secret, "2f674f52-9e23-47a2-a78613a84c07f6a2");
        }

        #[test]
        fn truncated_payload_is_a_distinguishable_failure() {
            let err = QuoteSplitParser
                .parse(r#"{"appId": "abc"}"#)
                .expect_err("truncated payload must fail");
            assert!(matches!(
                err,
                CredentialError::TooFewTokens {
                    needed: 16,
                    found: 5
                }
            ));
        }

        #[test]
        fn empty_output_is_not_an_empty_credential_pair() {
            let err = QuoteSplitParser.parse("").expect_err("empty output must fail");
            assert!(matches!(err, CredentialError::TooFewTokens { found: 1, .. }));
        }

        #[test]
        fn empty_secret_position_is_rejected() {
            let payload = SAMPLE.replace("2f674f52-9e23-47a2-a78613a84c07f6a2", "");
            let err = QuoteSplitParser
                .parse(&payload)
                .expect_err("empty secret must fail");
            assert_eq!(err, CredentialError::empty_field("secret"));
        }

        #[test]
        fn empty_app_id_position_is_rejected() {
            let payload = SAMPLE.replace("a487e4b4-92a0-4795-a0f445bbd21f2472", "");
            let err = QuoteSplitParser
                .parse(&payload)
                .expect_err("empty app id must fail");
            assert_eq!(err, CredentialError::empty_field("application id"));
        }
    }

    mod json {
        use super::*;

        #[test]
        fn reads_by_field_name_regardless_of_order() {
            let reordered = r#"{"password": "s3cret", "tenant": "t", "appId": "the-app"}"#;
            let sp = JsonCredentialParser
                .parse(reordered)
                .expect("reordered payload parses");
            assert_eq!(sp.app_id, "the-app");
            assert_eq!(sp.secret, "s3cret");
        }

        #[test]
        fn non_json_is_malformed() {
            let err = JsonCredentialParser
                .parse("please log in first")
                .expect_err("prose must fail");
            assert!(matches!(err, CredentialError::Malformed { .. }));
        }

        #[test]
        fn empty_fields_are_rejected() {
            let err = JsonCredentialParser
                .parse(r#"{"appId": "", "password": "x"}"#)
                .expect_err("empty app id must fail");
            assert_eq!(err, CredentialError::empty_field("application id"));
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_quote_split_never_panics(raw in ".{0,400}") {
                let _ = QuoteSplitParser.parse(&raw);
            }

            #[test]
            fn prop_success_always_yields_complete_credentials(raw in ".{0,400}") {
                if let Ok(sp) = QuoteSplitParser.parse(&raw) {
                    prop_assert!(sp.is_complete());
                }
            }

            #[test]
            fn prop_json_parser_never_panics(raw in ".{0,400}") {
                let _ = JsonCredentialParser.parse(&raw);
            }
        }
    }
}
