// Property-based tests for request building and signing.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeMap;

use proptest::prelude::*;
use tineye_auth::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

const BASE: &str = "https://api.example.com/rest/";
const AUTH_FIELDS: [&str; 4] = ["api_sig", "api_key", "nonce", "date"];

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Caller parameters that never collide with authentication fields.
fn arb_params() -> impl Strategy<Value = Params> {
    prop::collection::btree_map(r"[a-z_]{1,10}", r"[ -~]{0,20}", 0..6)
        .prop_filter("no auth field names", |m: &BTreeMap<String, String>| {
            !m.keys().any(|k| AUTH_FIELDS.contains(&k.as_str()) || k == "image_upload")
        })
        .prop_map(|m| m.into_iter().collect())
}

fn arb_stamp() -> impl Strategy<Value = RequestStamp> {
    (r"[0-9a-f]{32}", 1_000_000_000u64..2_000_000_000).prop_map(|(n, t)| RequestStamp::new(n, t))
}

fn arb_endpoint() -> impl Strategy<Value = Endpoint> {
    prop_oneof![
        Just(Endpoint::Search),
        Just(Endpoint::RemainingSearches),
        Just(Endpoint::ImageCount),
    ]
}

fn signed_builder() -> RequestBuilder {
    RequestBuilder::new(BASE, strategy_for(Credentials::signed("private", "public")))
}

/// Recompute a GET signature the way the server would: from the caller
/// fields that went over the wire plus the stamp echoed back in the query.
fn server_side_get_signature(request: &RequestSpec) -> String {
    let caller: Params = request
        .query
        .iter()
        .filter(|(k, _)| !AUTH_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let canonical = canonical_query(&caller);
    let nonce = request.query_value("nonce").unwrap_or_default();
    let timestamp = request.query_value("date").and_then(|d| d.parse().ok()).unwrap_or(0);

    compute_signature(
        "private",
        &SigningContext {
            method: SignedMethod::Get,
            nonce,
            timestamp,
            base_url: BASE,
            endpoint: request.endpoint.method_name(),
            canonical_params: &canonical,
        },
    )
}

// ---------------------------------------------------------------------------
// GET
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_get_signature_verifies_from_wire_fields(
        endpoint in arb_endpoint(),
        params in arb_params(),
        stamp in arb_stamp(),
    ) {
        let request = signed_builder().get_with(endpoint, &params, &stamp);
        let expected = server_side_get_signature(&request);
        prop_assert_eq!(request.query_value("api_sig"), Some(expected.as_str()));
    }

    #[test]
    fn prop_get_query_is_sorted_params_then_auth_fields(
        params in arb_params(),
        stamp in arb_stamp(),
    ) {
        let request = signed_builder().get_with(Endpoint::Search, &params, &stamp);
        let names: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();

        let (caller, auth) = names.split_at(params.len());
        prop_assert_eq!(auth, &AUTH_FIELDS[..]);
        let expected: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(caller, &expected[..]);
    }

    #[test]
    fn prop_header_mode_query_is_exactly_caller_params(
        endpoint in arb_endpoint(),
        params in arb_params(),
    ) {
        let builder = RequestBuilder::new(BASE, strategy_for(Credentials::header_key("hk")));
        let request = builder.get(endpoint, &params);

        prop_assert_eq!(&request.query, &params.to_pairs());
        prop_assert_eq!(request.header(API_KEY_HEADER), Some("hk"));
        prop_assert!(request.nonce().is_none());
    }

    #[test]
    fn prop_signature_changes_with_nonce(
        params in arb_params(),
        stamp in arb_stamp(),
    ) {
        let builder = signed_builder();
        let other = RequestStamp::new(format!("{}x", stamp.nonce), stamp.timestamp);
        let a = builder.get_with(Endpoint::Search, &params, &stamp);
        let b = builder.get_with(Endpoint::Search, &params, &other);
        prop_assert_ne!(a.query_value("api_sig"), b.query_value("api_sig"));
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_upload_part_order(
        params in arb_params(),
        stamp in arb_stamp(),
        bytes in prop::collection::vec(any::<u8>(), 0..64),
        file_name in r"[A-Za-z0-9 ._-]{1,16}",
    ) {
        let request = signed_builder().upload_with(
            Endpoint::Search,
            UploadPayload::new(bytes.clone(), file_name.clone()),
            &params,
            &stamp,
            "BOUNDARY".to_string(),
        );
        let form = request.body.as_ref().unwrap();
        let names = form.part_names();

        prop_assert_eq!(names[0], "image_upload");
        prop_assert_eq!(&names[names.len() - 4..], &["api_sig", "api_key", "date", "nonce"][..]);
        prop_assert_eq!(names.len(), params.len() + 5);

        match &form.parts()[0].data {
            PartData::File { file_name: sent, bytes: sent_bytes, .. } => {
                prop_assert_eq!(sent, &normalize_file_name(&file_name));
                prop_assert_eq!(sent_bytes, &bytes);
            }
            other => prop_assert!(false, "expected file part, got {:?}", other),
        }
        prop_assert!(request.query.is_empty());
    }

    #[test]
    fn prop_upload_signature_covers_content_type_and_file_name(
        params in arb_params(),
        stamp in arb_stamp(),
    ) {
        let request = signed_builder().upload_with(
            Endpoint::Search,
            UploadPayload::new(vec![1, 2, 3], "Cat.JPG"),
            &params,
            &stamp,
            "BOUNDARY".to_string(),
        );
        let form = request.body.as_ref().unwrap();

        let canonical = canonical_query(&params);
        let content_type = request.header("content-type").unwrap_or_default();
        let expected = compute_signature(
            "private",
            &SigningContext {
                method: SignedMethod::Post { content_type, file_name: "cat.jpg" },
                nonce: &stamp.nonce,
                timestamp: stamp.timestamp,
                base_url: BASE,
                endpoint: "search",
                canonical_params: &canonical,
            },
        );
        prop_assert_eq!(form.text_field("api_sig"), Some(expected.as_str()));
        prop_assert_eq!(content_type, "multipart/form-data; boundary=BOUNDARY");
    }
}
