//! Row types of the organism table.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ParseEnumError;

/// Organism kingdom. Values outside the known set are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    Bacteria,
    Fungi,
    Virus,
    Parasite,
    Other(String),
}

impl Classification {
    pub fn as_str(&self) -> &str {
        match self {
            Classification::Bacteria => "bacteria",
            Classification::Fungi => "fungi",
            Classification::Virus => "virus",
            Classification::Parasite => "parasite",
            Classification::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Classification::Other(_))
    }
}

impl FromStr for Classification {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Ok(match t.to_ascii_lowercase().as_str() {
            "bacteria" => Classification::Bacteria,
            "fungi" => Classification::Fungi,
            "virus" => Classification::Virus,
            "parasite" => Classification::Parasite,
            _ => Classification::Other(t.to_string()),
        })
    }
}

impl From<String> for Classification {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(c) => c,
            Err(never) => match never {},
        }
    }
}

impl From<Classification> for String {
    fn from(c: Classification) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Genome type; only meaningful for viruses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NucleicAcid {
    #[serde(rename = "DNA")]
    Dna,
    #[serde(rename = "RNA")]
    Rna,
}

impl NucleicAcid {
    pub fn as_str(self) -> &'static str {
        match self {
            NucleicAcid::Dna => "DNA",
            NucleicAcid::Rna => "RNA",
        }
    }
}

impl FromStr for NucleicAcid {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DNA" => Ok(NucleicAcid::Dna),
            "RNA" => Ok(NucleicAcid::Rna),
            _ => Err(ParseEnumError {
                kind: "nucleic acid",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NucleicAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level for one infection type.
///
/// H=high, M=medium, L=low, W=contaminant, D=colonizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathogenicLevel {
    H,
    M,
    L,
    W,
    D,
}

impl PathogenicLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            PathogenicLevel::H => "H",
            PathogenicLevel::M => "M",
            PathogenicLevel::L => "L",
            PathogenicLevel::W => "W",
            PathogenicLevel::D => "D",
        }
    }
}

impl FromStr for PathogenicLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" => Ok(PathogenicLevel::H),
            "M" => Ok(PathogenicLevel::M),
            "L" => Ok(PathogenicLevel::L),
            "W" => Ok(PathogenicLevel::W),
            "D" => Ok(PathogenicLevel::D),
            _ => Err(ParseEnumError {
                kind: "pathogenic level",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PathogenicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfectionType {
    Pneumonia,
    Meningitis,
    Bloodstream,
}

impl InfectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            InfectionType::Pneumonia => "pneumonia",
            InfectionType::Meningitis => "meningitis",
            InfectionType::Bloodstream => "bloodstream",
        }
    }
}

impl FromStr for InfectionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pneumonia" => Ok(InfectionType::Pneumonia),
            "meningitis" => Ok(InfectionType::Meningitis),
            "bloodstream" => Ok(InfectionType::Bloodstream),
            _ => Err(ParseEnumError {
                kind: "infection type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for InfectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-infection risk levels of one organism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PathogenicProfile {
    pub pneumonia_level: PathogenicLevel,
    pub meningitis_level: PathogenicLevel,
    pub bloodstream_level: PathogenicLevel,
}

impl PathogenicProfile {
    pub fn level(&self, infection: InfectionType) -> PathogenicLevel {
        match infection {
            InfectionType::Pneumonia => self.pneumonia_level,
            InfectionType::Meningitis => self.meningitis_level,
            InfectionType::Bloodstream => self.bloodstream_level,
        }
    }
}

/// One row of the table.
///
/// `nucleic_acid` is only ever set for viruses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrganismRecord {
    pub name: String,
    pub classification: Classification,
    pub nucleic_acid: Option<NucleicAcid>,
    pub profile: PathogenicProfile,
}

impl OrganismRecord {
    pub fn is_virus(&self) -> bool {
        self.classification == Classification::Virus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_keeps_unknown_values() {
        let c: Classification = "Archaea ".parse().unwrap();
        assert_eq!(c, Classification::Other("Archaea".into()));
        assert!(!c.is_known());
        assert_eq!("VIRUS".parse::<Classification>().unwrap(), Classification::Virus);
    }

    #[test]
    fn classification_serializes_as_plain_string() {
        let v = serde_json::to_value(Classification::Fungi).unwrap();
        assert_eq!(v, serde_json::json!("fungi"));
        let back: Classification = serde_json::from_value(serde_json::json!("parasite")).unwrap();
        assert_eq!(back, Classification::Parasite);
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(" h".parse::<PathogenicLevel>().unwrap(), PathogenicLevel::H);
        assert!("X".parse::<PathogenicLevel>().is_err());
        assert_eq!("rna".parse::<NucleicAcid>().unwrap(), NucleicAcid::Rna);
    }
}
