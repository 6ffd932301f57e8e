//! Table-driven chemistry toolkit for testing.

use crate::compound::Compound;
use crate::error::{ErrorKind, Result};
use crate::key::InchiKey;
use crate::parser::{CompoundBuilder, MoleculeParser};
use std::collections::HashMap;

/// In-memory [`MoleculeParser`] + [`CompoundBuilder`] for testing.
///
/// Maps fixed SMILES strings to fixed InChI keys; anything outside the table
/// fails with [`InvalidSmiles`](ErrorKind::InvalidSmiles), which is how tests
/// exercise the "unparseable molecule" path without a cheminformatics
/// dependency.
///
/// # Examples
///
/// ```
/// use gibbs_mol::{MockChem, MoleculeParser};
///
/// let chem = MockChem::with_entries([
///     ("O", "XLYOFNOQVPJJNP-UHFFFAOYSA-N"),
/// ]);
/// assert!(chem.inchi_key("O").is_ok());
/// assert!(chem.inchi_key("not-smiles").is_err());
/// ```
pub struct MockChem {
    table: HashMap<String, InchiKey>,
}

impl MockChem {
    /// Create a mock toolkit pre-populated with SMILES-to-key mappings.
    ///
    /// Panics if any key fails validation. If test setup is wrong, then the
    /// test should not pass.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<String>, impl AsRef<str>)>) -> Self {
        let mut table = HashMap::new();
        for (smiles, key) in entries {
            let key = key.as_ref();
            let Ok(parsed) = key.parse::<InchiKey>() else {
                // The panic here is DELIBERATE. MockChem is intended to be
                // used in tests; panics are expected. There is no error result.
                panic!("MockChem::with_entries: invalid InChI key {key}");
            };
            table.insert(smiles.into(), parsed);
        }
        Self { table }
    }

    fn lookup(&self, smiles: &str) -> Result<&InchiKey> {
        match self.table.get(smiles) {
            Some(key) => Ok(key),
            None => exn::bail!(ErrorKind::InvalidSmiles(smiles.to_string())),
        }
    }
}

impl Default for MockChem {
    fn default() -> Self {
        let entries: [(&str, &str); 0] = [];
        Self::with_entries(entries)
    }
}

impl MoleculeParser for MockChem {
    fn inchi_key(&self, smiles: &str) -> Result<InchiKey> {
        self.lookup(smiles).cloned()
    }
}

impl CompoundBuilder for MockChem {
    fn build(&self, smiles: &str) -> Result<Compound> {
        let key = self.lookup(smiles)?.clone();
        Ok(Compound::new(key, smiles))
    }
}
