use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Standard InChI key shape: 14-character connectivity block, 10-character
// layer block (stereochemistry/isotopes + flags), 1-character protonation
// block, hyphen-separated. e.g. BSYNRYMUTXBXSQ-UHFFFAOYSA-N
const BLOCK_LENGTHS: [usize; 3] = [14, 10, 1];

/// A full, canonical InChI key for a single molecular structure.
///
/// The key is validated on construction; an `InchiKey` always holds a
/// well-formed `XXXXXXXXXXXXXX-YYYYYYYYYY-Z` string. Construction goes
/// through [`FromStr`] (or serde, which delegates to it).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InchiKey(String);

impl InchiKey {
    /// The full key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncate to the partial key used for cache matching: everything
    /// before the final `-` separator. Dropping the protonation block means
    /// structurally equivalent variants (different protonation states of the
    /// same skeleton) collide on the same partial key, which is exactly what
    /// the compound cache wants.
    pub fn partial(&self) -> PartialInchiKey {
        // Validated shape guarantees a final hyphen-separated block.
        let (head, _) = self.0.rsplit_once('-').unwrap_or((&self.0, ""));
        PartialInchiKey(head.to_string())
    }
}

impl FromStr for InchiKey {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        let blocks = s.split('-').collect::<Vec<_>>();
        if blocks.len() != BLOCK_LENGTHS.len() {
            exn::bail!(ErrorKind::InvalidKey(s.to_string()));
        }
        for (block, expected) in blocks.iter().zip(BLOCK_LENGTHS) {
            if block.len() != expected || !block.bytes().all(|b| b.is_ascii_uppercase()) {
                exn::bail!(ErrorKind::InvalidKey(s.to_string()));
            }
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for InchiKey {
    type Error = crate::error::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<InchiKey> for String {
    fn from(key: InchiKey) -> Self {
        key.0
    }
}

impl fmt::Display for InchiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The leading `connectivity-layers` portion of an [`InchiKey`], with the
/// final protonation block removed.
///
/// This is the lookup key for the compound cache. It is only constructed by
/// [`InchiKey::partial`], so it is always 25 characters of a once-valid key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialInchiKey(String);

impl PartialInchiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a full key collapses onto this partial key.
    pub fn matches(&self, key: &InchiKey) -> bool {
        key.partial() == *self
    }
}

impl fmt::Display for PartialInchiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_valid_key() {
        let key: InchiKey = "BSYNRYMUTXBXSQ-UHFFFAOYSA-N".parse().unwrap();
        assert_eq!(key.as_str(), "BSYNRYMUTXBXSQ-UHFFFAOYSA-N");
    }

    #[rstest]
    #[case::empty("")]
    #[case::two_blocks("BSYNRYMUTXBXSQ-UHFFFAOYSA")]
    #[case::four_blocks("BSYNRYMUTXBXSQ-UHFFFAOYSA-N-N")]
    #[case::short_first_block("BSYNRYMUTXBXS-UHFFFAOYSA-N")]
    #[case::long_last_block("BSYNRYMUTXBXSQ-UHFFFAOYSA-NN")]
    #[case::lowercase("bsynrymutxbxsq-uhfffaoysa-n")]
    #[case::digits("BSYNRYMUTXBXS1-UHFFFAOYSA-N")]
    fn test_parse_invalid_key(#[case] input: &str) {
        let result = input.parse::<InchiKey>();
        let err = result.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidKey(_)));
    }

    #[test]
    fn test_partial_drops_protonation_block() {
        let key: InchiKey = "BSYNRYMUTXBXSQ-UHFFFAOYSA-N".parse().unwrap();
        assert_eq!(key.partial().as_str(), "BSYNRYMUTXBXSQ-UHFFFAOYSA");
    }

    #[test]
    fn test_protonation_variants_share_partial_key() {
        let neutral: InchiKey = "BSYNRYMUTXBXSQ-UHFFFAOYSA-N".parse().unwrap();
        let charged: InchiKey = "BSYNRYMUTXBXSQ-UHFFFAOYSA-M".parse().unwrap();
        assert_eq!(neutral.partial(), charged.partial());
        assert!(neutral.partial().matches(&charged));
    }

    #[test]
    fn test_different_structures_do_not_match() {
        let glucose: InchiKey = "WQZGKKKJIJFFOK-GASJEMHNSA-N".parse().unwrap();
        let water: InchiKey = "XLYOFNOQVPJJNP-UHFFFAOYSA-N".parse().unwrap();
        assert_ne!(glucose.partial(), water.partial());
        assert!(!glucose.partial().matches(&water));
    }

    #[test]
    fn test_serde_round_trip() {
        let key: InchiKey = "XLYOFNOQVPJJNP-UHFFFAOYSA-N".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""XLYOFNOQVPJJNP-UHFFFAOYSA-N""#);
        let back: InchiKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        assert!(serde_json::from_str::<InchiKey>(r#""not a key""#).is_err());
    }
}
