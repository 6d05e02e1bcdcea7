#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cloudinit_core::{
    render, render_with_cancellation, Cancellation, EncodeError, EncodingConfig, PartSpec,
    RenderError, ResolutionError, StaticLookup,
};
use common::{config_ref, count_sections, fixture_lookup, secret_ref};
use flate2::read::GzDecoder;
use std::io::Read;

const SCENARIO_A: &str = "Content-Type: multipart/mixed; boundary=\"B1\"\r\n\
                          MIME-Version: 1.0\r\n\
                          \r\n\
                          --B1\r\n\
                          Content-Type: text/plain\r\n\
                          MIME-Version: 1.0\r\n\
                          Content-Transfer-Encoding: 7bit\r\n\
                          \r\n\
                          hello\r\n\
                          --B1--\r\n";

fn scenario_a_parts() -> Vec<PartSpec> {
    vec![PartSpec::inline("hello").with_content_type("text/plain")]
}

// ===== SCENARIOS =====

#[test]
fn test_scenario_a_single_inline_part() {
    let doc = render(
        &scenario_a_parts(),
        &StaticLookup::new(),
        &EncodingConfig::new("B1"),
    )
    .unwrap();

    assert_eq!(doc.as_str(), SCENARIO_A);
    assert_eq!(count_sections(doc.as_str(), "B1"), 1);
}

#[test]
fn test_scenario_b_base64_of_scenario_a() {
    let doc = render(
        &scenario_a_parts(),
        &StaticLookup::new(),
        &EncodingConfig::new("B1").with_base64(true),
    )
    .unwrap();

    assert_eq!(doc.as_str(), STANDARD.encode(SCENARIO_A));
}

#[test]
fn test_scenario_c_gzip_without_base64() {
    let err = render(
        &scenario_a_parts(),
        &StaticLookup::new(),
        &EncodingConfig::new("B1").with_gzip(true),
    )
    .unwrap_err();

    assert_eq!(err, RenderError::Encode(EncodeError::GzipRequiresBase64));
}

#[test]
fn test_scenario_d_only_part_optional_and_missing() {
    let parts = vec![PartSpec::reference(config_ref("absent").optional())];
    let err = render(&parts, &fixture_lookup(), &EncodingConfig::new("B1")).unwrap_err();

    assert_eq!(err, RenderError::Encode(EncodeError::NoParts));
}

#[test]
fn test_scenario_e_optional_missing_part_is_dropped() {
    let parts = vec![
        PartSpec::reference(config_ref("absent").optional()),
        PartSpec::inline("x"),
    ];
    let doc = render(&parts, &fixture_lookup(), &EncodingConfig::new("B1")).unwrap();

    assert_eq!(count_sections(doc.as_str(), "B1"), 1);
    assert!(doc.as_str().contains("\r\n\r\nx\r\n--B1--\r\n"));
}

// ===== ENCODING =====

#[test]
fn test_gzip_base64_round_trips_to_plain_document() {
    let plain = render(
        &scenario_a_parts(),
        &StaticLookup::new(),
        &EncodingConfig::new("B1"),
    )
    .unwrap();
    let packed = render(
        &scenario_a_parts(),
        &StaticLookup::new(),
        &EncodingConfig::new("B1").with_gzip(true).with_base64(true),
    )
    .unwrap();

    let compressed = STANDARD.decode(packed.as_str()).unwrap();
    let mut unpacked = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut unpacked)
        .unwrap();
    assert_eq!(unpacked, plain.as_str());
}

#[test]
fn test_referenced_parts_render_in_declared_order() {
    let parts = vec![
        PartSpec::reference(secret_ref("bootstrap"))
            .with_content_type("text/x-shellscript")
            .with_filename("bootstrap.sh"),
        PartSpec::reference(config_ref("base-config")).with_content_type("text/cloud-config"),
        PartSpec::reference(config_ref("base-config").with_key("users"))
            .with_content_type("text/cloud-config")
            .with_merge_type("list(append)+dict(recurse_array)+str()"),
    ];
    let doc = render(&parts, &fixture_lookup(), &EncodingConfig::new("==BOUNDARY=="))
        .unwrap();
    let text = doc.as_str();

    assert_eq!(count_sections(text, "==BOUNDARY=="), 3);
    let script = text.find("echo bootstrap").unwrap();
    let packages = text.find("- htop").unwrap();
    let users = text.find("name: ops").unwrap();
    assert!(script < packages && packages < users);
    assert!(text.contains("Content-Disposition: attachment; filename=\"bootstrap.sh\"\r\n"));
    assert!(text.contains("X-Merge-Type: list(append)+dict(recurse_array)+str()\r\n"));
}

#[test]
fn test_empty_content_type_defaults_to_text_plain() {
    let parts = vec![PartSpec::inline("a").with_content_type("")];
    let doc = render(&parts, &StaticLookup::new(), &EncodingConfig::new("B")).unwrap();
    assert!(doc.as_str().contains("--B\r\nContent-Type: text/plain\r\n"));
}

#[test]
fn test_part_without_content_or_reference_renders_empty_body() {
    let parts = vec![PartSpec::default()];
    let doc = render(&parts, &StaticLookup::new(), &EncodingConfig::new("B")).unwrap();
    assert!(doc
        .as_str()
        .ends_with("Content-Transfer-Encoding: 7bit\r\n\r\n\r\n--B--\r\n"));
}

// ===== ERRORS =====

#[test]
fn test_missing_required_reference_names_the_part() {
    let parts = vec![PartSpec::inline("a"), PartSpec::reference(config_ref("absent"))];
    let err = render(&parts, &fixture_lookup(), &EncodingConfig::new("B")).unwrap_err();

    assert_eq!(
        err,
        RenderError::Resolution(ResolutionError::ReferenceNotFound {
            index: 1,
            reference: "ConfigObject default/absent".to_string(),
        })
    );
}

#[test]
fn test_missing_required_key() {
    let parts = vec![PartSpec::reference(secret_ref("bootstrap").with_key("other"))];
    let err = render(&parts, &fixture_lookup(), &EncodingConfig::new("B")).unwrap_err();

    assert!(matches!(
        err,
        RenderError::Resolution(ResolutionError::KeyNotFound { index: 0, .. })
    ));
}

#[test]
fn test_empty_boundary_is_rejected_not_generated() {
    let err = render(
        &scenario_a_parts(),
        &StaticLookup::new(),
        &EncodingConfig::new(""),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RenderError::Encode(EncodeError::InvalidBoundary { .. })
    ));
}

#[test]
fn test_cancelled_render_returns_no_document() {
    let (cancel, handle) = Cancellation::token();
    handle.cancel();
    let parts = vec![PartSpec::reference(config_ref("base-config"))];

    let err = render_with_cancellation(
        &parts,
        &fixture_lookup(),
        &EncodingConfig::new("B"),
        &cancel,
    )
    .unwrap_err();

    assert_eq!(
        err,
        RenderError::Resolution(ResolutionError::Cancelled { index: 0 })
    );
}
