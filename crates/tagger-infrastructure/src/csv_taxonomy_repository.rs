//! CSV-based TaxonomyRepository implementation.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tagger_core::taxonomy::{Tag, Taxonomy, TaxonomyRepository};
use tagger_core::{Result, TaggerError};

/// One row of the taxonomy dictionary. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct TaxonomyRow {
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Tag")]
    tag: String,
    #[serde(rename = "Definition", default)]
    definition: String,
}

const REQUIRED_COLUMNS: [&str; 3] = ["Category", "Tag", "Definition"];

/// Reads the tag vocabulary from a CSV file with a header row.
pub struct CsvTaxonomyRepository {
    path: PathBuf,
}

impl CsvTaxonomyRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses taxonomy rows from any reader.
    pub fn parse<R: std::io::Read>(reader: R) -> Result<Taxonomy> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(TaggerError::config(format!(
                "taxonomy is missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let mut tags = Vec::new();
        for row in csv_reader.deserialize::<TaxonomyRow>() {
            let row = row?;
            if row.tag.is_empty() {
                continue;
            }
            tags.push(Tag::new(row.tag, row.category, row.definition));
        }

        Taxonomy::new(tags)
    }
}

impl TaxonomyRepository for CsvTaxonomyRepository {
    fn load(&self) -> Result<Taxonomy> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TaggerError::not_found("taxonomy", self.path.display().to_string())
            } else {
                e.into()
            }
        })?;

        let taxonomy = Self::parse(std::io::BufReader::new(file))?;
        tracing::info!(
            path = %self.path.display(),
            tags = taxonomy.len(),
            "Loaded taxonomy"
        );
        Ok(taxonomy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_with_extra_columns_and_quotes() {
        let csv = "\
Category,Tag,Definition,Notes
Habitat,Wetland,\"Saturated soils, seasonally flooded\",x
Method, Survey ,Field observation,
Habitat,Forest,Tree cover,
";
        let taxonomy = CsvTaxonomyRepository::parse(csv.as_bytes()).unwrap();
        assert_eq!(taxonomy.len(), 3);
        assert_eq!(
            taxonomy.get("Wetland").unwrap().definition,
            "Saturated soils, seasonally flooded"
        );
        assert!(taxonomy.contains("Survey"));
        assert_eq!(taxonomy.get("Forest").unwrap().category, "Habitat");
    }

    #[test]
    fn test_rows_without_tag_are_skipped() {
        let csv = "Category,Tag,Definition\nHabitat,,orphan\nHabitat,Forest,Tree cover\n";
        let taxonomy = CsvTaxonomyRepository::parse(csv.as_bytes()).unwrap();
        assert_eq!(taxonomy.names().collect::<Vec<_>>(), vec!["Forest"]);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let csv = "Category,Name,Definition\nHabitat,Forest,Tree cover\n";
        let err = CsvTaxonomyRepository::parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TaggerError::Config(ref msg) if msg.contains("Tag")));
    }

    #[test]
    fn test_header_only_is_rejected() {
        let csv = "Category,Tag,Definition\n";
        assert!(matches!(
            CsvTaxonomyRepository::parse(csv.as_bytes()),
            Err(TaggerError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CsvTaxonomyRepository::new(temp_dir.path().join("missing.csv"));
        assert!(repo.load().unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dictionary.csv");
        std::fs::write(&path, "Category,Tag,Definition\ncat1,A,defA\ncat1,B,defB\n").unwrap();

        let taxonomy = CsvTaxonomyRepository::new(&path).load().unwrap();
        assert_eq!(taxonomy.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
