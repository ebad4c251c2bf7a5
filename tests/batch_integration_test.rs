//! Integration tests for the batch driver
//!
//! These tests build small `<root>/<year>/<month>/<file>` corpora in
//! temporary directories and verify that:
//! - The partition layout is mirrored into the target
//! - The salt table is persisted and reused across runs
//! - Dry runs write nothing and keep the salt table untouched
//! - A missing partition or a missing root is fatal

use registry_anonymizer::anonymization::{AnonymizationEngine, SaltStore};
use registry_anonymizer::config::RulesConfig;
use registry_anonymizer::core::batch::{BatchDriver, BatchOptions};
use registry_anonymizer::domain::{AnonymizerError, Partition, PartitionRange};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::sync::watch;

const DOC_A: &str = "<Person><IndentType>EGN</IndentType><Indent>7501010010</Indent></Person>";
const DOC_B: &str =
    r#"<Deed DocumentURL="https://registry.example/1"><Subject><Indent>7501010010</Indent><IndentType>EGN</IndentType></Subject></Deed>"#;
const DOC_C: &str = "<Person><IndentType>LNCH</IndentType><Indent>1000000001</Indent></Person>";

struct Corpus {
    dir: TempDir,
}

impl Corpus {
    fn new() -> Self {
        let corpus = Self {
            dir: tempdir().unwrap(),
        };
        corpus.write("2010/1/a.xml", DOC_A);
        corpus.write("2010/1/b.xml", DOC_B);
        corpus.write("2010/3/c.xml", DOC_C);
        fs::create_dir_all(corpus.root().join("2010/2")).unwrap();
        corpus
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("in")
    }

    fn target(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn salts(&self) -> PathBuf {
        self.dir.path().join("salts")
    }

    fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.target().join(relative)).unwrap()
    }
}

fn range(first: (u16, u8), last: (u16, u8)) -> PartitionRange {
    PartitionRange::new(
        Partition::new(first.0, first.1).unwrap(),
        Partition::new(last.0, last.1).unwrap(),
    )
    .unwrap()
}

fn driver(
    root: &Path,
    target: &Path,
    range: PartitionRange,
    dry_run: bool,
) -> (BatchDriver, watch::Sender<bool>) {
    let (tx, rx) = watch::channel(false);
    let engine = AnonymizationEngine::new(&RulesConfig::default()).unwrap();
    let options = BatchOptions {
        root: root.to_path_buf(),
        target: target.to_path_buf(),
        range,
        dry_run,
    };
    (BatchDriver::new(engine, options, rx), tx)
}

#[test]
fn test_batch_mirrors_layout() {
    let corpus = Corpus::new();
    let (driver, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 3)), false);

    let summary = driver.execute(&corpus.salts()).unwrap();

    assert_eq!(summary.partitions_processed, 3);
    assert_eq!(summary.files_processed, 3);
    assert!(!summary.interrupted);
    assert!(corpus.target().join("2010/2").is_dir());

    for relative in ["2010/1/a.xml", "2010/1/b.xml", "2010/3/c.xml"] {
        let output = corpus.read_output(relative);
        assert!(!output.contains("7501010010"), "{relative} leaks an EGN");
        assert!(!output.contains("1000000001"), "{relative} leaks an LNCH");
        assert!(!output.contains("DocumentURL"));
    }
}

#[test]
fn test_same_identifier_same_digest_across_files() {
    let corpus = Corpus::new();
    let (driver, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 1)), false);
    let summary = driver.execute(&corpus.salts()).unwrap();

    assert_eq!(summary.salts_created, 1);
    let digest = extract_indent(&corpus.read_output("2010/1/a.xml"));
    assert_eq!(digest.len(), 64);
    assert_eq!(extract_indent(&corpus.read_output("2010/1/b.xml")), digest);
}

#[test]
fn test_salt_table_persists_across_runs() {
    let corpus = Corpus::new();

    let (first, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 1)), false);
    first.execute(&corpus.salts()).unwrap();
    let first_digest = extract_indent(&corpus.read_output("2010/1/a.xml"));
    assert!(corpus.salts().exists());

    // Second run over a different partition reuses the saved table
    corpus.write("2010/3/d.xml", DOC_A);
    let (second, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 3), (2010, 3)), false);
    let summary = second.execute(&corpus.salts()).unwrap();

    assert_eq!(extract_indent(&corpus.read_output("2010/3/d.xml")), first_digest);
    // Only the LNCH value of c.xml is new
    assert_eq!(summary.salts_created, 1);
    assert_eq!(summary.salt_entries, 2);
    assert_eq!(SaltStore::load(corpus.salts()).unwrap().len(), 2);
}

#[test]
fn test_dry_run_writes_nothing_and_keeps_salts() {
    let corpus = Corpus::new();
    let (driver, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 3)), true);

    let summary = driver.execute(&corpus.salts()).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.files_processed, 3);
    assert_eq!(summary.stats.identifiers_hashed, 3);
    assert!(!corpus.target().exists());
    assert!(!corpus.salts().exists());
}

#[test]
fn test_interrupted_run_still_saves_salts() {
    let corpus = Corpus::new();
    let (driver, tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 3)), false);
    tx.send(true).unwrap();

    let summary = driver.execute(&corpus.salts()).unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.files_processed, 0);
    assert!(corpus.salts().exists());
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let (driver, _tx) = driver(
        &dir.path().join("missing"),
        &dir.path().join("out"),
        range((2010, 1), (2010, 1)),
        false,
    );
    let result = driver.execute(&dir.path().join("salts"));
    assert!(matches!(result, Err(AnonymizerError::Io(_))));
}

#[test]
fn test_missing_partition_aborts_but_saves_salts() {
    let corpus = Corpus::new();
    let (driver, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 4)), false);

    match driver.execute(&corpus.salts()) {
        Err(AnonymizerError::Io(msg)) => assert!(msg.contains("2010/4"), "{msg}"),
        other => panic!("expected Io error, got {other:?}"),
    }

    // Partitions before the gap were written and their salts persisted
    assert!(corpus.target().join("2010/3/c.xml").exists());
    let salts = SaltStore::load(corpus.salts()).unwrap();
    assert!(salts.contains("7501010010"));
    assert!(salts.contains("1000000001"));
}

#[test]
fn test_malformed_document_aborts_but_saves_salts() {
    let corpus = Corpus::new();
    corpus.write("2010/3/z.xml", "<Person><Name a=\"1\" a=\"2\"/></Person>");
    let (driver, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 3)), false);

    let result = driver.execute(&corpus.salts());
    assert!(matches!(result, Err(AnonymizerError::Xml(_))));

    // Salts handed out for documents already written survive the abort
    let salts = SaltStore::load(corpus.salts()).unwrap();
    assert!(salts.contains("7501010010"));
}

#[test]
fn test_corrupt_salt_table_is_fatal() {
    let corpus = Corpus::new();
    fs::write(corpus.salts(), "not json").unwrap();
    let (driver, _tx) = driver(&corpus.root(), &corpus.target(), range((2010, 1), (2010, 1)), false);

    let result = driver.execute(&corpus.salts());
    assert!(matches!(result, Err(AnonymizerError::SaltStore(_))));
    assert_eq!(fs::read_to_string(corpus.salts()).unwrap(), "not json");
}

fn extract_indent(document: &str) -> String {
    let start = document.find("<Indent>").unwrap() + "<Indent>".len();
    let end = document[start..].find("</Indent>").unwrap() + start;
    document[start..end].to_string()
}
