//! Read-only image of one market instance as served by the configuration store.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::annotation::category_entry_annotation;
use crate::domain::entities::{Category, MarketInstanceId, Settings, Trader};
use crate::domain::error::ValidationError;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid snapshot: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Categories and traders of one instance. Traders embed their map, maps
/// embed their zone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub instance_id: MarketInstanceId,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub traders: Vec<Trader>,
}

impl MarketSnapshot {
    /// Parses a snapshot. Trader item annotations are checked here.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let data = fs::read_to_string(path)?;
        let snapshot = Self::from_json(&data)?;
        info!(
            instance_id = %snapshot.instance_id,
            categories = snapshot.categories.len(),
            traders = snapshot.traders.len(),
            "loaded market snapshot"
        );
        Ok(snapshot)
    }

    /// Every data-quality problem across items, traders and zones.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for category in &self.categories {
            errors.extend(category.items.iter().filter_map(|item| item.validate().err()));
        }

        for trader in &self.traders {
            errors.extend(
                trader
                    .categories
                    .iter()
                    .filter_map(|entry| category_entry_annotation(trader, entry).err()),
            );
            if let Some(Err(error)) = trader.zone().map(|zone| zone.validate()) {
                errors.push(error);
            }
        }

        errors
    }

    /// Owning category of `class_name`, narrowed so `items[0]` is that item.
    pub fn item_category(&self, class_name: &str) -> Option<Category> {
        self.categories
            .iter()
            .find_map(|category| category.narrowed_to(class_name))
    }

    /// Traders that list the item itself or its category.
    pub fn traders_for(&self, class_name: &str) -> Vec<&Trader> {
        let category = self.item_category(class_name);
        self.traders
            .iter()
            .filter(|trader| {
                trader.items.contains_key(class_name)
                    || category
                        .as_ref()
                        .is_some_and(|category| trader.lists_category(&category.category_name))
            })
            .collect()
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter().map(|item| item.class_name.as_str()))
            .collect()
    }
}
