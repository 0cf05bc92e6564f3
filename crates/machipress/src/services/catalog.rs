//! ProductCatalog - read-only access to the product table
//!
//! Backed by `data/apps.csv`. The table is reloaded on every lookup so an
//! edit between CLI invocations is always picked up; records are immutable
//! once loaded.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{PipelineError, ProductRecord};

const REQUIRED_COLUMNS: [&str; 7] = [
    "name",
    "category",
    "price",
    "target_age",
    "features",
    "affiliate_url",
    "rating",
];

/// Feature lists accept either delimiter convention interchangeably.
const FEATURE_DELIMITERS: [char; 2] = [',', '・'];

/// Read-only product catalog
pub struct ProductCatalog {
    path: PathBuf,
}

impl ProductCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Exact, case-sensitive lookup by product name.
    pub fn lookup(&self, name: &str) -> Result<ProductRecord, PipelineError> {
        let records = self.load()?;
        records
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| {
                PipelineError::Data(format!(
                    "Product '{}' not found in {}",
                    name,
                    self.path.display()
                ))
            })
    }

    /// All products, in table order.
    pub fn load(&self) -> Result<Vec<ProductRecord>, PipelineError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            PipelineError::Data(format!(
                "Failed to read product table {}: {}",
                self.path.display(),
                e
            ))
        })?;
        parse_table(&raw, &self.path)
    }
}

fn parse_table(raw: &str, path: &Path) -> Result<Vec<ProductRecord>, PipelineError> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| PipelineError::Data(format!("Product table {} is empty", path.display())))?;
    let columns = parse_row(header);

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (i, required) in REQUIRED_COLUMNS.iter().enumerate() {
        indices[i] = columns
            .iter()
            .position(|c| c == required)
            .ok_or_else(|| {
                PipelineError::Data(format!(
                    "Product table is missing required column '{}'",
                    required
                ))
            })?;
    }

    let mut records = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let fields = parse_row(line);
        if fields.len() < columns.len() {
            return Err(PipelineError::Data(format!(
                "Product table row {} has {} fields, expected {}",
                line_no + 2,
                fields.len(),
                columns.len()
            )));
        }
        let field = |i: usize| fields[indices[i]].trim().to_string();

        let rating_raw = field(6);
        let rating: f32 = rating_raw.parse().map_err(|_| {
            PipelineError::Data(format!(
                "Rating '{}' for product '{}' is not a decimal",
                rating_raw,
                field(0)
            ))
        })?;
        if !(1.0..=5.0).contains(&rating) {
            return Err(PipelineError::Data(format!(
                "Rating {} for product '{}' is outside [1.0, 5.0]",
                rating,
                field(0)
            )));
        }

        records.push(ProductRecord {
            name: field(0),
            category: field(1),
            price: field(2),
            target_age: field(3),
            features: split_features(&fields[indices[4]]),
            affiliate_url: field(5),
            rating,
        });
    }
    Ok(records)
}

/// Normalize a delimited feature field into an ordered list.
fn split_features(raw: &str) -> Vec<String> {
    raw.split(&FEATURE_DELIMITERS[..])
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

/// Parse one CSV row, honoring double-quoted fields with `""` escapes.
fn parse_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "\
name,category,price,target_age,features,affiliate_url,rating
Tinder,casual,無料(App内課金あり),20-35,\"スワイプ式,位置情報,ブースト\",https://example.com/tinder,4.2
Pairs,serious,月額3700円,25-40,コミュニティ・本人確認・足あと,https://example.com/pairs,4.5
";

    fn catalog(content: &str) -> (NamedTempFile, ProductCatalog) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let catalog = ProductCatalog::new(file.path());
        (file, catalog)
    }

    #[test]
    fn test_lookup_exact_match() {
        let (_f, catalog) = catalog(TABLE);
        let tinder = catalog.lookup("Tinder").unwrap();
        assert_eq!(tinder.category, "casual");
        assert_eq!(tinder.rating, 4.2);
        assert_eq!(
            tinder.features,
            vec!["スワイプ式", "位置情報", "ブースト"]
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let (_f, catalog) = catalog(TABLE);
        assert!(matches!(
            catalog.lookup("tinder").unwrap_err(),
            PipelineError::Data(_)
        ));
    }

    #[test]
    fn test_both_feature_delimiters_normalize() {
        let (_f, catalog) = catalog(TABLE);
        let pairs = catalog.lookup("Pairs").unwrap();
        assert_eq!(pairs.features, vec!["コミュニティ", "本人確認", "足あと"]);
    }

    #[test]
    fn test_missing_column_rejected() {
        let (_f, catalog) = catalog("name,category,price\nTinder,casual,free\n");
        assert!(matches!(
            catalog.load().unwrap_err(),
            PipelineError::Data(_)
        ));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let table = TABLE.replace("4.2", "5.5");
        let (_f, catalog) = catalog(&table);
        assert!(matches!(
            catalog.load().unwrap_err(),
            PipelineError::Data(_)
        ));
    }

    #[test]
    fn test_rating_not_decimal_rejected() {
        let table = TABLE.replace("4.2", "high");
        let (_f, catalog) = catalog(&table);
        assert!(matches!(
            catalog.load().unwrap_err(),
            PipelineError::Data(_)
        ));
    }
}
