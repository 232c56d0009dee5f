use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};

use super::WardRecord;

/// Read the ward performance records from a JSON array file.
pub fn read_wards(path: &Path) -> Result<Vec<WardRecord>> {
    let file = File::open(path)
        .with_context(|| format!("[data::wards] Failed to open {}", path.display()))?;
    let records: Vec<WardRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[data::wards] Failed to parse {}", path.display()))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::super::WardRecord;

    #[test]
    fn record_json_round_trips() {
        let raw = r#"{
            "id": "ward_1",
            "name": "Agaram",
            "before": { "pressure": 28.0, "demand": 120.0, "supply": 100.0,
                        "shortage": 20.0, "shortage_pct": 16.7, "leakage": 1.4 },
            "after":  { "pressure": 41.5, "demand": 120.0, "supply": 116.0,
                        "shortage": 4.0, "shortage_pct": 3.3, "leakage": 0.9 },
            "explanation": "Valve rebalancing"
        }"#;
        let record: WardRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.name, "Agaram");
        assert_eq!(record.after.supply, 116.0);
        assert!(record.is_improved());
    }

    #[test]
    fn explanation_is_optional() {
        let raw = r#"{
            "id": "w", "name": "W",
            "before": { "pressure": 0, "demand": 0, "supply": 0,
                        "shortage": 0, "shortage_pct": 0, "leakage": 0 },
            "after":  { "pressure": 0, "demand": 0, "supply": 0,
                        "shortage": 0, "shortage_pct": 0, "leakage": 0 }
        }"#;
        let record: WardRecord = serde_json::from_str(raw).unwrap();
        assert!(record.explanation.is_empty());
    }
}
