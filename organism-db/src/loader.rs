//! CSV ingestion for the organism table.

use std::io::Read;

use csv::StringRecord;
use tracing::warn;

use crate::{
    errors::{OrganismDbError, Result},
    model::{Classification, NucleicAcid, OrganismRecord, PathogenicLevel, PathogenicProfile},
};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "classification",
    "nucleic_acid",
    "organism_name",
    "pneumonia_level",
    "meningitis_level",
    "bloodstream_level",
];

/// Resolved positions of the required columns in the header row.
struct Columns {
    classification: usize,
    nucleic_acid: usize,
    organism_name: usize,
    pneumonia: usize,
    meningitis: usize,
    bloodstream: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| find(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(OrganismDbError::MissingColumns(missing));
        }

        let idx = |name: &str| find(name).ok_or_else(|| OrganismDbError::MissingColumns(vec![name.into()]));
        Ok(Self {
            classification: idx("classification")?,
            nucleic_acid: idx("nucleic_acid")?,
            organism_name: idx("organism_name")?,
            pneumonia: idx("pneumonia_level")?,
            meningitis: idx("meningitis_level")?,
            bloodstream: idx("bloodstream_level")?,
        })
    }
}

/// Reads all rows from CSV with a header line.
///
/// Unknown classifications are kept and logged. Rows with an unparsable
/// pathogenic level or an empty name are skipped and logged.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<OrganismRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let cols = Columns::resolve(rdr.headers()?)?;
    let mut out = Vec::new();

    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        // header is line 1
        let line = i + 2;
        match parse_row(&cols, &row) {
            Ok(rec) => {
                if !rec.classification.is_known() {
                    warn!(line, classification = %rec.classification, "invalid classification found");
                }
                out.push(rec);
            }
            Err(reason) => warn!(line, %reason, "skipping organism row"),
        }
    }

    Ok(out)
}

fn parse_row(cols: &Columns, row: &StringRecord) -> std::result::Result<OrganismRecord, String> {
    let field = |i: usize| row.get(i).unwrap_or("");

    let name = field(cols.organism_name);
    if name.is_empty() {
        return Err("empty organism_name".into());
    }

    let classification: Classification = match field(cols.classification).parse() {
        Ok(c) => c,
        Err(never) => match never {},
    };

    let nucleic_acid = if classification == Classification::Virus {
        field(cols.nucleic_acid).parse::<NucleicAcid>().ok()
    } else {
        None
    };

    let level = |i: usize| field(i).parse::<PathogenicLevel>().map_err(|e| e.to_string());
    let profile = PathogenicProfile {
        pneumonia_level: level(cols.pneumonia)?,
        meningitis_level: level(cols.meningitis)?,
        bloodstream_level: level(cols.bloodstream)?,
    };

    Ok(OrganismRecord {
        name: name.to_string(),
        classification,
        nucleic_acid,
        profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "classification,nucleic_acid,organism_name,pneumonia_level,meningitis_level,bloodstream_level\n";

    #[test]
    fn reads_rows_and_drops_nucleic_acid_for_non_viruses() {
        let csv = format!(
            "{HEADER}bacteria,DNA,Escherichia coli,M,H,H\nvirus,RNA,Influenza A virus,H,L,L\n"
        );
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nucleic_acid, None);
        assert_eq!(rows[1].nucleic_acid, Some(NucleicAcid::Rna));
        assert_eq!(rows[1].profile.pneumonia_level, PathogenicLevel::H);
    }

    #[test]
    fn missing_columns_are_reported() {
        let csv = "classification,organism_name\nbacteria,X\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            OrganismDbError::MissingColumns(cols) => {
                assert!(cols.contains(&"nucleic_acid".to_string()));
                assert!(cols.contains(&"bloodstream_level".to_string()));
                assert!(!cols.contains(&"organism_name".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_level_skips_row_and_unknown_class_is_kept() {
        let csv = format!("{HEADER}bacteria,,A,Q,H,H\narchaea,,B,L,L,L\n");
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "B");
        assert_eq!(rows[0].classification, Classification::Other("archaea".into()));
    }

    #[test]
    fn extra_columns_and_order_do_not_matter() {
        let csv = "organism_name,notes,bloodstream_level,meningitis_level,pneumonia_level,nucleic_acid,classification\n\
                   Candida auris,emerging,H,M,L,,fungi\n";
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].classification, Classification::Fungi);
        assert_eq!(rows[0].profile.bloodstream_level, PathogenicLevel::H);
        assert_eq!(rows[0].profile.pneumonia_level, PathogenicLevel::L);
    }
}
