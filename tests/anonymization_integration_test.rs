//! Integration tests for the streaming anonymizer
//!
//! These tests drive whole documents through the public engine API and check
//! the output against the guarantees of the rewrite:
//! - Hashed identifier values never appear literally
//! - `DocumentURL` attributes are removed
//! - Stable digests for repeated identifiers, within and across runs
//! - Passport blocks, personal addresses and remarks are dropped
//! - ID mentions in free text are scrubbed

use registry_anonymizer::anonymization::{AnonymizationEngine, SaltStore};
use registry_anonymizer::config::RulesConfig;
use registry_anonymizer::domain::{AnonymizerError, XmlError};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::path::Path;
use tempfile::tempdir;

fn engine() -> AnonymizationEngine {
    AnonymizationEngine::new(&RulesConfig::default()).unwrap()
}

fn anonymize(engine: &AnonymizationEngine, salts: &mut SaltStore, input: &str) -> String {
    let mut output = Vec::new();
    engine
        .process_document(input.as_bytes(), &mut output, salts, Path::new("doc.xml"))
        .unwrap();
    String::from_utf8(output).unwrap()
}

fn expected_digest(salts: &SaltStore, value: &str) -> String {
    let salt = salts.get(value).unwrap().expose_secret().as_str().to_string();
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    format!("{:X}", hasher.finalize())
}

const FILING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Message xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <Header><Date>2012-05-14</Date></Header>
  <Body>
    <Deed UIC="831234567" DocumentURL="https://registry.example/deed/17">
      <Procurator>
        <Person>
          <Name>Иван Петров</Name>
          <IndentType>EGN</IndentType>
          <Indent>7501010010</Indent>
          <Passport><Number>381234567</Number><IssuedOn>2001-02-03</IssuedOn></Passport>
          <Address><Country>България</Country><Street>ул. Шипка 5</Street></Address>
        </Person>
      </Procurator>
      <Partner>
        <Subject>
          <Indent>8002029999</Indent>
          <IndentType>LNCH</IndentType>
          <Name>John Doe</Name>
        </Subject>
      </Partner>
      <Seat><Address><City>София</City></Address></Seat>
      <Description033>Представител с ЕГН 7501010010</Description033>
      <SomeField>Копие на л.к. № 123456789 приложено</SomeField>
    </Deed>
  </Body>
</Message>
"#;

#[test]
fn test_full_filing_is_anonymized() {
    let engine = engine();
    let mut salts = SaltStore::new();
    let output = anonymize(&engine, &mut salts, FILING);

    // Hashed values are gone, digests are in place
    assert!(!output.contains("7501010010"));
    assert!(!output.contains("8002029999"));
    assert!(output.contains(&format!(
        "<Indent>{}</Indent>",
        expected_digest(&salts, "7501010010")
    )));
    assert!(output.contains(&format!(
        "<Indent>{}</Indent>",
        expected_digest(&salts, "8002029999")
    )));

    // Identifier types collapse into the output element
    assert!(!output.contains("IndentType"));

    // Attributes
    assert!(!output.contains("DocumentURL"));
    assert!(output.contains(r#"UIC="831234567""#));

    // Passport and personal address
    assert!(!output.contains("381234567"));
    assert!(!output.contains("<Passport>"));
    assert!(!output.contains("ул. Шипка 5"));
    assert!(output.contains("<Address></Address>"));

    // Company seat address is not personal
    assert!(output.contains("<City>София</City>"));

    // Remarks and free text
    assert!(!output.contains("Description033"));
    assert!(output.contains("<SomeField>Копие на  приложено</SomeField>"));

    // Untouched structure
    assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(output.contains("<Header><Date>2012-05-14</Date></Header>"));
    assert!(output.contains("<Name>Иван Петров</Name>"));
}

#[test]
fn test_identifier_example_is_sha256_of_salt_and_value() {
    let engine = engine();
    let mut salts = SaltStore::new();
    let output = anonymize(
        &engine,
        &mut salts,
        "<Person><IdentifierType>EGN</IdentifierType><IdentifierValue>1234567890</IdentifierValue></Person>",
    );

    let digest = expected_digest(&salts, "1234567890");
    assert_eq!(digest.len(), 64);
    assert!(digest
        .chars()
        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    assert_eq!(
        output,
        format!("<Person><Indent>{digest}</Indent></Person>")
    );
}

#[test]
fn test_free_text_example() {
    let engine = engine();
    let mut salts = SaltStore::new();
    let output = anonymize(
        &engine,
        &mut salts,
        "<SomeField>Копие на л.к. № 123456789 приложено</SomeField>",
    );
    assert_eq!(output, "<SomeField>Копие на  приложено</SomeField>");
}

#[test]
fn test_document_url_example() {
    let engine = engine();
    let mut salts = SaltStore::new();
    let output = anonymize(
        &engine,
        &mut salts,
        r#"<Link DocumentURL="https://example/doc/1">x</Link>"#,
    );
    assert_eq!(output, "<Link>x</Link>");
}

#[test]
fn test_sibling_order_preserved_for_both_orderings() {
    let engine = engine();
    let mut salts = SaltStore::new();

    let type_first = anonymize(
        &engine,
        &mut salts,
        "<Person><A/><IndentType>EGN</IndentType><B/><Indent>1000000000</Indent><C/></Person>",
    );
    let digest = expected_digest(&salts, "1000000000");
    assert_eq!(
        type_first,
        format!("<Person><A/><B/><Indent>{digest}</Indent><C/></Person>")
    );

    let value_first = anonymize(
        &engine,
        &mut salts,
        "<Person><A/><Indent>1000000000</Indent><B/><IndentType>EGN</IndentType><C/></Person>",
    );
    assert_eq!(
        value_first,
        format!("<Person><A/><Indent>{digest}</Indent><B/><C/></Person>")
    );
}

#[test]
fn test_distinct_values_get_distinct_salts() {
    let engine = engine();
    let mut salts = SaltStore::new();
    anonymize(
        &engine,
        &mut salts,
        "<R><Person><IndentType>EGN</IndentType><Indent>1111111111</Indent></Person>\
         <Person><IndentType>EGN</IndentType><Indent>2222222222</Indent></Person></R>",
    );

    assert_eq!(salts.len(), 2);
    let a = salts.get("1111111111").unwrap().expose_secret().as_str();
    let b = salts.get("2222222222").unwrap().expose_secret().as_str();
    assert_ne!(a, b);
}

#[test]
fn test_same_identifier_same_digest_across_runs_sharing_salt_table() {
    let dir = tempdir().unwrap();
    let salts_path = dir.path().join("salts");
    let input = "<Person><IndentType>EGN</IndentType><Indent>7501010010</Indent></Person>";

    let engine = engine();

    let mut first_salts = SaltStore::load(&salts_path).unwrap();
    let first = anonymize(&engine, &mut first_salts, input);
    first_salts.save(&salts_path).unwrap();

    let mut second_salts = SaltStore::load(&salts_path).unwrap();
    let second = anonymize(&engine, &mut second_salts, input);

    assert_eq!(first, second);
    assert_eq!(second_salts.created_count(), 0);
}

#[test]
fn test_separate_salt_tables_give_different_digests() {
    let engine = engine();
    let input = "<Person><IndentType>EGN</IndentType><Indent>7501010010</Indent></Person>";

    let first = anonymize(&engine, &mut SaltStore::new(), input);
    let second = anonymize(&engine, &mut SaltStore::new(), input);
    assert_ne!(first, second);
}

#[test]
fn test_unhashed_identifier_value_passes_through() {
    let engine = engine();
    let mut salts = SaltStore::new();
    let output = anonymize(
        &engine,
        &mut salts,
        "<Person><IndentType>Bulstat</IndentType><Indent>831234567</Indent></Person>",
    );
    assert_eq!(output, "<Person><Indent>831234567</Indent></Person>");
    assert!(salts.is_empty());
}

#[test]
fn test_identifier_type_element_kept_when_configured() {
    let rules = RulesConfig {
        keep_identifier_type: true,
        ..RulesConfig::default()
    };
    let engine = AnonymizationEngine::new(&rules).unwrap();
    let mut salts = SaltStore::new();
    let output = anonymize(
        &engine,
        &mut salts,
        "<Person><IdentifierType>EGN</IdentifierType><IdentifierValue>1234567890</IdentifierValue></Person>",
    );
    let digest = expected_digest(&salts, "1234567890");
    assert_eq!(
        output,
        format!("<Person><IdentifierType>EGN</IdentifierType><Indent>{digest}</Indent></Person>")
    );
}

#[test]
fn test_process_file_round_trip_on_disk() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.xml");
    let dst = dir.path().join("out.xml");
    std::fs::write(
        &src,
        "<Person><IndentType>BirthDate</IndentType><Indent>1975-01-01</Indent></Person>",
    )
    .unwrap();

    let engine = engine();
    let mut salts = SaltStore::new();
    let stats = engine.process_file(&src, &dst, &mut salts).unwrap();

    let output = std::fs::read_to_string(&dst).unwrap();
    assert!(!output.contains("1975-01-01"));
    assert_eq!(stats.identifiers_emitted, 1);
    assert_eq!(stats.identifiers_hashed, 1);
}

#[test]
fn test_malformed_document_is_an_xml_error() {
    let engine = engine();
    let mut salts = SaltStore::new();
    let mut output = Vec::new();
    let result = engine.process_document(
        "<Person><Name a=\"1\" a=\"2\">x</Name></Person>".as_bytes(),
        &mut output,
        &mut salts,
        Path::new("broken.xml"),
    );

    match result {
        Err(AnonymizerError::Xml(XmlError::Malformed { file, .. })) => {
            assert_eq!(file, "broken.xml");
        }
        other => panic!("expected malformed XML error, got {other:?}"),
    }
}

#[test]
fn test_missing_input_file_is_io_error() {
    let dir = tempdir().unwrap();
    let engine = engine();
    let mut salts = SaltStore::new();
    let result = engine.analyze_file(dir.path().join("missing.xml"), &mut salts);
    assert!(matches!(result, Err(AnonymizerError::Io(_))));
}
