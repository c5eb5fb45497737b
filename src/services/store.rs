use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::{ProductRecord, CSV_COLUMNS};

/// Destination for record snapshots. Every write replaces the previous
/// content at `path`.
pub trait RecordSink {
    fn write_records(&self, records: &[ProductRecord], path: &Path) -> Result<()>;

    /// Read back a snapshot written by `write_records`; records come back
    /// finalized.
    fn read_records(&self, path: &Path) -> Result<Vec<ProductRecord>>;
}

/// CSV with a header row and the fixed seven-column schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSink;

impl CsvSink {
    pub fn new() -> Self {
        Self
    }
}

impl RecordSink for CsvSink {
    fn write_records(&self, records: &[ProductRecord], path: &Path) -> Result<()> {
        if records.is_empty() {
            tracing::warn!("No products to save");
            return Ok(());
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(CSV_COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} products to {}", records.len(), path.display());
        Ok(())
    }

    fn read_records(&self, path: &Path) -> Result<Vec<ProductRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let mut record: ProductRecord = row?;
            record.finalize();
            records.push(record);
        }
        Ok(records)
    }
}

/// Progress of a crawl, written next to each checkpoint so an interrupted
/// run can pick up where it stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeManifest {
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Category labels in completion order.
    #[serde(default)]
    pub completed_categories: Vec<String>,
    #[serde(default)]
    pub failed_categories: Vec<String>,
    /// Records in the checkpoint this manifest describes.
    #[serde(default)]
    pub records: usize,
}

impl ResumeManifest {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            updated_at: now,
            completed_categories: Vec::new(),
            failed_categories: Vec::new(),
            records: 0,
        }
    }

    /// `None` when no manifest exists at `path`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(path)?;
        Ok(Some(serde_json::from_reader(file)?))
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.updated_at = Utc::now();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn is_completed(&self, label: &str) -> bool {
        self.completed_categories.iter().any(|c| c == label)
    }

    /// Record a category as done. A category that failed earlier and now
    /// completed is no longer listed as failed.
    pub fn mark_completed(&mut self, label: &str) {
        self.failed_categories.retain(|c| c != label);
        if !self.is_completed(label) {
            self.completed_categories.push(label.to_string());
        }
    }

    pub fn mark_failed(&mut self, label: &str) {
        if !self.failed_categories.iter().any(|c| c == label) {
            self.failed_categories.push(label.to_string());
        }
    }
}

impl Default for ResumeManifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(category: &str, sku: &str) -> ProductRecord {
        ProductRecord {
            category: category.into(),
            sku: sku.into(),
            product_name: format!("Item {sku}"),
            ..Default::default()
        }
    }

    #[test]
    fn csv_has_fixed_header_and_empty_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut pending = ProductRecord::new("Produce", "7".into(), "https://x/product/7".into());
        pending.brand_name = "Brand, Inc.".into();

        CsvSink::new().write_records(&[pending], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("category,brand_name,product_name,packaging_info,sku,picture_url,description")
        );
        assert_eq!(
            lines.next(),
            Some(r#"Produce,"Brand, Inc.",Product Name Not Found,,7,,"#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn write_overwrites_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("checkpoint.csv");
        let sink = CsvSink::new();

        sink.write_records(&[record("A", "1"), record("A", "2")], &path).unwrap();
        sink.write_records(&[record("B", "3")], &path).unwrap();

        let back = sink.read_records(&path).unwrap();
        assert_eq!(back, vec![record("B", "3")]);
        assert!(back[0].is_final());
    }

    #[test]
    fn empty_snapshot_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        CsvSink::new().write_records(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn manifest_round_trip_and_marks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.manifest.json");
        assert_eq!(ResumeManifest::load(&path).unwrap(), None);

        let mut manifest = ResumeManifest::new();
        manifest.mark_failed("Dairy & Eggs");
        manifest.mark_completed("Produce");
        manifest.mark_completed("Dairy & Eggs");
        manifest.mark_completed("Produce");
        manifest.records = 12;
        manifest.save(&path).unwrap();

        let loaded = ResumeManifest::load(&path).unwrap().unwrap();
        assert_eq!(loaded.completed_categories, ["Produce", "Dairy & Eggs"]);
        assert!(loaded.failed_categories.is_empty());
        assert_eq!(loaded.records, 12);
        assert!(loaded.is_completed("Produce"));
        assert!(!loaded.is_completed("Beverages"));
        assert!(fs::read_to_string(&path).unwrap().contains("completedCategories"));
    }
}
