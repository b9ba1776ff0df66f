use std::path::PathBuf;

pub const DEFAULT_CSV_PATH: &str = "data/microbe_database.csv";

/// Location of the organism CSV.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrganismDbConfig {
    pub csv_path: PathBuf,
}

impl Default for OrganismDbConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}
