//! Per-identifier salt table
//!
//! Every distinct raw identifier gets its own random salt the first time it is
//! seen. The table is loaded at the start of a run and written back at the
//! end, so the digest of an identifier stays the same across the whole corpus
//! and across repeated runs.
//!
//! Salts are secret material: anyone holding the table can re-identify hashed
//! values by brute force over the identifier space. They are kept in
//! [`secrecy::Secret`] containers that zero their memory on drop and never
//! show up in `Debug` output.

use crate::domain::{AnonymizerError, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

/// Shortest salt length (inclusive)
pub const SALT_MIN_LEN: usize = 30;

/// Longest salt length (exclusive)
pub const SALT_MAX_LEN: usize = 40;

/// First code point of the salt alphabet (space)
const SALT_FIRST_CHAR: u8 = b' ';

/// Number of consecutive code points in the salt alphabet
const SALT_ALPHABET_LEN: u8 = 94;

/// Version tag written into the persisted table
const SALT_TABLE_VERSION: u32 = 1;

/// Newtype wrapper for a salt string that implements the traits `Secret` needs
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SaltValue(String);

impl CloneableSecret for SaltValue {}
impl DebugSecret for SaltValue {}
impl SerializableSecret for SaltValue {}

impl From<String> for SaltValue {
    fn from(s: String) -> Self {
        SaltValue(s)
    }
}

impl AsRef<str> for SaltValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SaltValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SaltValue {
    /// Salt as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl Serialize for SaltValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SaltValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SaltValue)
    }
}

/// A salt, zeroized on drop and redacted in `Debug`
pub type Salt = Secret<SaltValue>;

/// Generates a fresh salt
///
/// The length is drawn uniformly from `[SALT_MIN_LEN, SALT_MAX_LEN)` and every
/// character uniformly from the 94 code points starting at space.
pub fn generate_salt<R: Rng>(rng: &mut R) -> Salt {
    let len = rng.gen_range(SALT_MIN_LEN..SALT_MAX_LEN);
    let value: String = (0..len)
        .map(|_| char::from(SALT_FIRST_CHAR + rng.gen_range(0..SALT_ALPHABET_LEN)))
        .collect();
    Secret::new(SaltValue(value))
}

/// On-disk representation of the salt table
#[derive(Deserialize)]
struct SaltTable {
    version: u32,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    salts: HashMap<String, Salt>,
}

/// Borrowed view used when writing, sorted for stable diffs
#[derive(Serialize)]
struct SaltTableRef<'a> {
    version: u32,
    updated_at: DateTime<Utc>,
    salts: BTreeMap<&'a str, &'a Salt>,
}

/// Mapping from raw identifier to its salt
///
/// Owned by the batch driver and lent to each document by `&mut`. Processing
/// is sequential; a parallel driver must put the store behind a mutex because
/// `get_or_create` is a read-modify-write.
pub struct SaltStore {
    salts: HashMap<String, Salt>,
    created: usize,
    updated_at: Option<DateTime<Utc>>,
    rng: StdRng,
}

impl SaltStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty store drawing salts from the given generator
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            salts: HashMap::new(),
            created: 0,
            updated_at: None,
            rng,
        }
    }

    /// Loads the table from `path`
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// an error: silently starting over would change every digest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No salt table found, starting with an empty one");
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            AnonymizerError::SaltStore(format!(
                "Failed to read salt table {}: {}",
                path.display(),
                e
            ))
        })?;

        let table: SaltTable = serde_json::from_str(&contents).map_err(|e| {
            AnonymizerError::SaltStore(format!(
                "Failed to parse salt table {}: {}",
                path.display(),
                e
            ))
        })?;

        if table.version != SALT_TABLE_VERSION {
            return Err(AnonymizerError::SaltStore(format!(
                "Unsupported salt table version {} in {} (expected {})",
                table.version,
                path.display(),
                SALT_TABLE_VERSION
            )));
        }

        tracing::info!(
            path = %path.display(),
            entries = table.salts.len(),
            "Loaded salt table"
        );

        let mut store = Self::new();
        store.salts = table.salts;
        store.updated_at = table.updated_at;
        Ok(store)
    }

    /// Writes the whole table to `path`
    ///
    /// The table goes to a sibling temporary file first and is renamed over
    /// the target, so an interrupted save leaves the previous table intact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let table = SaltTableRef {
            version: SALT_TABLE_VERSION,
            updated_at: Utc::now(),
            salts: self
                .salts
                .iter()
                .map(|(identifier, salt)| (identifier.as_str(), salt))
                .collect(),
        };

        let json = serde_json::to_string(&table).map_err(|e| {
            AnonymizerError::SaltStore(format!("Failed to serialize salt table: {e}"))
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AnonymizerError::io_at(parent, e))?;
        }

        let tmp_path = temporary_path(path);
        fs::write(&tmp_path, json).map_err(|e| {
            AnonymizerError::SaltStore(format!(
                "Failed to write salt table {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        fs::rename(&tmp_path, path).map_err(|e| {
            AnonymizerError::SaltStore(format!(
                "Failed to replace salt table {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            entries = self.salts.len(),
            created = self.created,
            "Saved salt table"
        );
        Ok(())
    }

    /// Returns the salt for `identifier`, generating and recording one if the
    /// identifier has not been seen before
    pub fn get_or_create(&mut self, identifier: &str) -> &Salt {
        if !self.salts.contains_key(identifier) {
            let salt = generate_salt(&mut self.rng);
            self.salts.insert(identifier.to_string(), salt);
            self.created += 1;
        }
        &self.salts[identifier]
    }

    /// Returns the salt for `identifier` without creating one
    pub fn get(&self, identifier: &str) -> Option<&Salt> {
        self.salts.get(identifier)
    }

    /// Whether `identifier` already has a salt
    pub fn contains(&self, identifier: &str) -> bool {
        self.salts.contains_key(identifier)
    }

    /// Number of identifiers in the table
    pub fn len(&self) -> usize {
        self.salts.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.salts.is_empty()
    }

    /// Number of salts generated since the store was created or loaded
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// When the loaded table was last written, if known
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Default for SaltStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SaltStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltStore")
            .field("entries", &self.salts.len())
            .field("created", &self.created)
            .finish()
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "salts".into());
    name.push(".tmp");
    path.with_file_name(name)
}
