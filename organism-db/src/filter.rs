//! Conjunctive row filter shared by statistics and listing queries.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Classification, InfectionType, NucleicAcid, OrganismRecord, PathogenicLevel};

/// Optional equality filters. Absent fields do not narrow the result.
///
/// `infection_type` and `pathogenic_level` only filter when both are set.
/// Deserialization treats empty strings as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganismFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub classification: Option<Classification>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub nucleic_acid: Option<NucleicAcid>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub infection_type: Option<InfectionType>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pathogenic_level: Option<PathogenicLevel>,
}

impl OrganismFilter {
    /// The infection column filter, if both halves are present.
    pub fn infection_pair(&self) -> Option<(InfectionType, PathogenicLevel)> {
        Some((self.infection_type?, self.pathogenic_level?))
    }

    pub fn matches(&self, record: &OrganismRecord) -> bool {
        if let Some(c) = &self.classification {
            if &record.classification != c {
                return false;
            }
        }
        if let Some(n) = self.nucleic_acid {
            if record.nucleic_acid != Some(n) {
                return false;
            }
        }
        if let Some((infection, level)) = self.infection_pair() {
            if record.profile.level(infection) != level {
                return false;
            }
        }
        true
    }

    /// `key=value` clauses joined by `, `, or `"no filters"`.
    pub fn description(&self) -> String {
        let mut clauses = Vec::new();
        if let Some(c) = &self.classification {
            clauses.push(format!("classification={c}"));
        }
        if let Some(n) = self.nucleic_acid {
            clauses.push(format!("nucleic_acid={n}"));
        }
        if let Some((infection, level)) = self.infection_pair() {
            clauses.push(format!("{infection}_level={level}"));
        }

        if clauses.is_empty() {
            "no filters".to_string()
        } else {
            clauses.join(", ")
        }
    }
}

/// Deserializes an optional string field, mapping `""` and `null` to `None`.
pub fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_strings_are_absent() {
        let f: OrganismFilter = serde_json::from_value(json!({
            "classification": "",
            "nucleic_acid": null,
            "infection_type": "pneumonia",
        }))
        .unwrap();
        assert_eq!(f.classification, None);
        assert_eq!(f.nucleic_acid, None);
        assert_eq!(f.infection_type, Some(InfectionType::Pneumonia));
        assert_eq!(f.infection_pair(), None);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = serde_json::from_value::<OrganismFilter>(json!({"pathogenic_level": "Z"}));
        assert!(err.is_err());
    }

    #[test]
    fn description_lists_clauses_in_fixed_order() {
        let f = OrganismFilter {
            classification: Some(Classification::Virus),
            nucleic_acid: Some(NucleicAcid::Rna),
            infection_type: Some(InfectionType::Meningitis),
            pathogenic_level: Some(PathogenicLevel::H),
        };
        assert_eq!(
            f.description(),
            "classification=virus, nucleic_acid=RNA, meningitis_level=H"
        );
        assert_eq!(OrganismFilter::default().description(), "no filters");
    }

    #[test]
    fn lone_level_contributes_nothing() {
        let f = OrganismFilter {
            pathogenic_level: Some(PathogenicLevel::L),
            ..Default::default()
        };
        assert_eq!(f.description(), "no filters");
    }
}
