use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use gibbs_mol::{Compound, InchiKey};
use time::UtcDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct CompoundRow {
    pub(crate) id: i64,
    pub(crate) inchi_key: String,
    pub(crate) smiles: String,
    pub(crate) name: Option<String>,
    pub(crate) created_at: i64,
}

impl TryFrom<CompoundRow> for Compound {
    type Error = Error;

    fn try_from(row: CompoundRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(row.id),
            inchi_key: row.inchi_key.parse::<InchiKey>().or_raise(|| ErrorKind::InvalidData("inchi key"))?,
            smiles: row.smiles,
            name: row.name,
            created_at: UtcDateTime::from_unix_timestamp(row.created_at)
                .or_raise(|| ErrorKind::InvalidData("creation date"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_model() {
        let row = CompoundRow {
            id: 7,
            inchi_key: "XLYOFNOQVPJJNP-UHFFFAOYSA-N".to_string(),
            smiles: "O".to_string(),
            name: Some("water".to_string()),
            created_at: 820450800,
        };
        let compound = Compound::try_from(row).unwrap();
        assert_eq!(compound.id, Some(7));
        assert_eq!(compound.inchi_key.as_str(), "XLYOFNOQVPJJNP-UHFFFAOYSA-N");
        assert_eq!(compound.created_at.unix_timestamp(), 820450800);
    }

    #[test]
    fn test_row_with_corrupt_key_fails() {
        let row = CompoundRow {
            id: 1,
            inchi_key: "not-a-key".to_string(),
            smiles: "O".to_string(),
            name: None,
            created_at: 0,
        };
        let err = Compound::try_from(row).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData("inchi key")));
    }
}
