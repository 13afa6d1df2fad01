use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::models::{GroundId, GroundRow};

/// Read-only ground reference data. Built once at startup and shared without locking.
#[derive(Debug, Clone)]
pub struct GroundCatalog {
    grounds: BTreeMap<GroundId, GroundRow>,
}

impl GroundCatalog {
    pub fn from_rows(rows: Vec<GroundRow>) -> Result<Self, CatalogError> {
        let mut grounds = BTreeMap::new();
        for row in rows {
            if row.price_per_hour <= 0 {
                return Err(CatalogError::InvalidPrice(row.id));
            }
            let id = row.id;
            if grounds.insert(id, row).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { grounds })
    }

    /// Parse a JSON array of grounds.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let rows: Vec<GroundRow> = serde_json::from_str(raw)?;
        Self::from_rows(rows)
    }

    pub fn builtin() -> Self {
        let row = |id, name: &str, location: &str, price_per_hour, amenities: &[&str], rating| {
            GroundRow {
                id,
                name: name.to_string(),
                location: location.to_string(),
                price_per_hour,
                amenities: amenities.iter().map(|a| a.to_string()).collect(),
                rating,
            }
        };

        let grounds = [
            row(
                1,
                "Green Park Cricket Ground",
                "Sector 21, Noida",
                2000,
                &["Floodlights", "Parking", "Changing Rooms", "Scoreboard"],
                4.6,
            ),
            row(
                2,
                "Riverside Turf Arena",
                "Andheri West, Mumbai",
                1500,
                &["Floodlights", "Cafeteria", "Parking"],
                4.3,
            ),
            row(
                3,
                "Royal Willow Oval",
                "Koramangala, Bengaluru",
                2500,
                &["Floodlights", "Pavilion", "Practice Nets", "Parking"],
                4.8,
            ),
            row(
                4,
                "Boundary Line Nets",
                "Salt Lake, Kolkata",
                1200,
                &["Practice Nets", "Bowling Machine"],
                4.1,
            ),
        ];

        Self {
            grounds: grounds.into_iter().map(|g| (g.id, g)).collect(),
        }
    }

    pub fn list(&self) -> Vec<GroundRow> {
        self.grounds.values().cloned().collect()
    }

    pub fn get(&self, id: GroundId) -> Option<&GroundRow> {
        self.grounds.get(&id)
    }

    pub fn len(&self) -> usize {
        self.grounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grounds.is_empty()
    }
}
