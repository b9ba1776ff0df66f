//! Read-only pathogen table.
//!
//! Loaded once from CSV and queried through two entry points:
//! [`OrganismTable::statistics`] for filtered counts and
//! [`OrganismTable::search_or_list`] for point lookups and listings.

mod config;
pub mod errors;
mod filter;
mod loader;
mod model;
mod query;

pub use config::{DEFAULT_CSV_PATH, OrganismDbConfig};
pub use errors::{OrganismDbError, ParseEnumError, Result};
pub use filter::{OrganismFilter, empty_as_none};
pub use loader::REQUIRED_COLUMNS;
pub use model::{
    Classification, InfectionType, NucleicAcid, OrganismRecord, PathogenicLevel,
    PathogenicProfile,
};
pub use query::{OrganismListing, OrganismSummary, SearchResult, SingleLookup, StatsResult};

use std::{fs::File, io::Read};

use tracing::{debug, info};

use crate::query::count_by;

#[derive(Clone, Debug, Default)]
pub struct OrganismTable {
    records: Vec<OrganismRecord>,
}

impl OrganismTable {
    /// Loads the table from `cfg.csv_path`.
    ///
    /// # Errors
    /// `Io` when the file cannot be opened, `MissingColumns` when the header
    /// lacks a required column, `Csv` on malformed input.
    pub fn load(cfg: &OrganismDbConfig) -> Result<Self> {
        let file = File::open(&cfg.csv_path).map_err(|source| OrganismDbError::Io {
            path: cfg.csv_path.clone(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(
            path = %cfg.csv_path.display(),
            organisms = table.total_organisms(),
            "loaded organism table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self {
            records: loader::read_records(reader)?,
        })
    }

    pub fn from_records(records: Vec<OrganismRecord>) -> Self {
        Self { records }
    }

    fn filtered<'a>(&'a self, filter: &'a OrganismFilter) -> impl Iterator<Item = &'a OrganismRecord> {
        self.records.iter().filter(move |r| filter.matches(r))
    }

    /// Filtered counts with per-classification breakdowns.
    pub fn statistics(&self, filter: &OrganismFilter) -> StatsResult {
        let rows: Vec<&OrganismRecord> = self.filtered(filter).collect();

        let classification_breakdown = count_by(rows.iter().map(|r| r.classification.as_str()));

        let nucleic = count_by(
            rows.iter()
                .filter(|r| r.is_virus())
                .filter_map(|r| r.nucleic_acid.map(NucleicAcid::as_str)),
        );

        let levels = filter.infection_type.map(|infection| {
            count_by(rows.iter().map(|r| r.profile.level(infection).as_str()))
        });

        debug!(total = rows.len(), filters = %filter.description(), "organism statistics");

        StatsResult {
            total_count: rows.len(),
            classification_breakdown,
            nucleic_acid_breakdown: (!nucleic.is_empty()).then_some(nucleic),
            pathogenic_level_breakdown: levels.filter(|m| !m.is_empty()),
            filters_applied: filter.clone(),
        }
    }

    /// Case-insensitive name lookup, or a filtered listing when `list_mode`.
    ///
    /// # Errors
    /// `InvalidArgument` when `list_mode` is false and no name is given.
    pub fn search_or_list(
        &self,
        organism_name: Option<&str>,
        list_mode: bool,
        filter: &OrganismFilter,
    ) -> Result<SearchResult> {
        if list_mode {
            return Ok(SearchResult::OrganismList(self.list(filter)));
        }

        let name = organism_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                OrganismDbError::InvalidArgument(
                    "organism_name is required when list_mode is false".into(),
                )
            })?;

        Ok(SearchResult::SingleOrganism(self.lookup(name)))
    }

    fn lookup(&self, name: &str) -> SingleLookup {
        let needle = name.to_lowercase();
        match self.records.iter().find(|r| r.name.to_lowercase() == needle) {
            Some(rec) => {
                info!(organism = %rec.name, "organism found");
                SingleLookup {
                    found: true,
                    searched_name: name.to_string(),
                    message: None,
                    organism: Some(rec.into()),
                }
            }
            None => {
                info!(organism = %name, "organism not found");
                SingleLookup {
                    found: false,
                    searched_name: name.to_string(),
                    message: Some(format!("Organism '{name}' not found in database")),
                    organism: None,
                }
            }
        }
    }

    fn list(&self, filter: &OrganismFilter) -> OrganismListing {
        let rows: Vec<&OrganismRecord> = self.filtered(filter).collect();
        let filter_description = filter.description();
        info!(total = rows.len(), filters = %filter_description, "listed organisms");

        OrganismListing {
            total_count: rows.len(),
            classification_summary: count_by(rows.iter().map(|r| r.classification.as_str())),
            organisms: rows.iter().map(|r| OrganismSummary::from(*r)).collect(),
            filter_description,
            filters_applied: filter.clone(),
        }
    }

    pub fn total_organisms(&self) -> usize {
        self.records.len()
    }

    /// Distinct classifications in first-seen order.
    pub fn available_classifications(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for r in &self.records {
            let c = r.classification.as_str();
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        seen
    }
}
