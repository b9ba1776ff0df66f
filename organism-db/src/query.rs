//! Query result shapes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    filter::OrganismFilter,
    model::{Classification, NucleicAcid, OrganismRecord, PathogenicProfile},
};

/// Counts returned by `OrganismTable::statistics`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsResult {
    pub total_count: usize,
    pub classification_breakdown: BTreeMap<String, usize>,
    /// Present only when the filtered set contains viruses with a known genome type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nucleic_acid_breakdown: Option<BTreeMap<String, usize>>,
    /// Present only when an infection type was requested and rows matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathogenic_level_breakdown: Option<BTreeMap<String, usize>>,
    pub filters_applied: OrganismFilter,
}

/// Outward view of one organism.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrganismSummary {
    pub organism_name: String,
    pub classification: Classification,
    pub pathogenic_profile: PathogenicProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nucleic_acid: Option<NucleicAcid>,
}

impl From<&OrganismRecord> for OrganismSummary {
    fn from(r: &OrganismRecord) -> Self {
        Self {
            organism_name: r.name.clone(),
            classification: r.classification.clone(),
            pathogenic_profile: r.profile,
            nucleic_acid: if r.is_virus() { r.nucleic_acid } else { None },
        }
    }
}

/// Point lookup outcome. A miss is a valid result, not an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SingleLookup {
    pub found: bool,
    pub searched_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub organism: Option<OrganismSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrganismListing {
    pub total_count: usize,
    pub filter_description: String,
    pub classification_summary: BTreeMap<String, usize>,
    pub organisms: Vec<OrganismSummary>,
    pub filters_applied: OrganismFilter,
}

/// Result of `OrganismTable::search_or_list`, tagged by `query_type`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "query_type", rename_all = "snake_case")]
pub enum SearchResult {
    SingleOrganism(SingleLookup),
    OrganismList(OrganismListing),
}

pub(crate) fn count_by<'a, I>(keys: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = BTreeMap::new();
    for k in keys {
        *out.entry(k.to_string()).or_insert(0) += 1;
    }
    out
}
