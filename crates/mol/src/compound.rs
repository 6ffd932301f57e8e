use crate::key::InchiKey;
use time::UtcDateTime;

/// A single chemical compound as recorded in the cache.
///
/// Structural identity lives in `inchi_key`; the `smiles` string is the
/// description the compound was originally constructed from and is what
/// downstream decomposition/property collaborators consume. The store is the
/// only party that assigns `id` — a freshly constructed compound carries
/// `None` until it has been staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    /// Store-assigned row identifier. `None` until staged into a session.
    pub id: Option<i64>,
    pub inchi_key: InchiKey,
    pub smiles: String,
    /// Optional human-readable name; not all sources provide one.
    pub name: Option<String>,
    pub created_at: UtcDateTime,
}

impl Compound {
    /// Create an unsaved compound record.
    pub fn new(inchi_key: InchiKey, smiles: impl Into<String>) -> Self {
        Self {
            id: None,
            inchi_key,
            smiles: smiles.into(),
            name: None,
            created_at: UtcDateTime::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The identifier a resolution hands to downstream consumers.
///
/// Thermodynamic property calculators require a non-null integer identifier
/// even for compounds that were never persisted, so an unstaged compound
/// resolves to [`Ephemeral`](CompoundId::Ephemeral) which renders as `-1`
/// rather than carrying a real row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundId {
    /// Identifier assigned by the store (staged or committed).
    Stored(i64),
    /// Placeholder for a compound that exists only in memory.
    Ephemeral,
}

impl CompoundId {
    /// Sentinel integer used in place of a store-assigned identifier.
    pub const EPHEMERAL_SENTINEL: i64 = -1;

    /// Integer form for consumers that cannot represent the distinction.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Stored(id) => id,
            Self::Ephemeral => Self::EPHEMERAL_SENTINEL,
        }
    }

    pub fn is_stored(self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

impl From<Option<i64>> for CompoundId {
    fn from(id: Option<i64>) -> Self {
        match id {
            Some(id) => Self::Stored(id),
            None => Self::Ephemeral,
        }
    }
}
