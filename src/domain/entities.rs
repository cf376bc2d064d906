use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::error::ValidationError;

/// Raw game-engine identifier for an item type.
pub type ClassName = String;

/// Identifier of one market instance (one game server's market).
pub type MarketInstanceId = String;

/// Percent value meaning "inherit from the next level up".
pub const INHERIT_PERCENT: f64 = -1.0;

fn inherit_percent() -> f64 {
    INHERIT_PERCENT
}

/// `None` for the inherit marker, the percent itself when it is at least 0.
fn sell_percent_override(
    entity: &str,
    field: &'static str,
    value: f64,
) -> Result<Option<f64>, ValidationError> {
    if value == INHERIT_PERCENT {
        Ok(None)
    } else if value >= 0.0 {
        Ok(Some(value))
    } else {
        Err(ValidationError::InvalidPercent {
            entity: entity.to_string(),
            field,
            value: value.to_string(),
        })
    }
}

/// A tradeable item as configured in its category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub class_name: ClassName,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub has_static_price: bool,
    #[serde(default)]
    pub has_static_stock: bool,
    pub min_price_threshold: i64,
    pub max_price_threshold: i64,
    #[serde(default)]
    pub min_stock_threshold: i64,
    #[serde(default)]
    pub max_stock_threshold: i64,
    /// `-1` inherits the zone sell percent.
    #[serde(default = "inherit_percent")]
    pub sell_price_percent: f64,
    #[serde(default)]
    pub spawn_attachments: Vec<AttachmentRef>,
    #[serde(default)]
    pub variants: Vec<ClassName>,
}

impl Item {
    /// Own sell percent, `None` when inheriting from the zone.
    pub fn sell_percent_override(&self) -> Result<Option<f64>, ValidationError> {
        sell_percent_override(&self.class_name, "sellPricePercent", self.sell_price_percent)
    }

    /// Checks price and stock thresholds and the sell percent, then every
    /// priced attachment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_price_threshold > self.max_price_threshold {
            return Err(ValidationError::InvertedPriceThresholds {
                entity: self.class_name.clone(),
                min: self.min_price_threshold,
                max: self.max_price_threshold,
            });
        }

        for (field, value) in [
            ("minStockThreshold", self.min_stock_threshold),
            ("maxStockThreshold", self.max_stock_threshold),
        ] {
            if value < 0 {
                return Err(ValidationError::NegativeStock {
                    entity: self.class_name.clone(),
                    field: field.to_string(),
                    value,
                });
            }
        }

        self.sell_percent_override()?;

        for attachment in &self.spawn_attachments {
            if let Some((_, item)) = attachment.priced() {
                item.validate()?;
            }
        }

        Ok(())
    }

    pub fn is_static(&self) -> bool {
        self.has_static_price || self.has_static_stock
    }
}

/// An attachment an item spawns with.
///
/// Either a bare class name, or a full category record whose first item is
/// the attachment's own priced configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentRef {
    ClassName(ClassName),
    Priced { category: Category },
}

impl AttachmentRef {
    /// Category and item for a priced attachment with a configured item.
    pub fn priced(&self) -> Option<(&Category, &Item)> {
        match self {
            Self::ClassName(_) => None,
            Self::Priced { category } => category.item().map(|item| (category, item)),
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::ClassName(name) => Some(name),
            Self::Priced { category } => category.item().map(|item| item.class_name.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_name: String,
    pub display_name: String,
    #[serde(default)]
    pub init_stock_percent: f64,
    /// The addressed item is always `items[0]`.
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub market_instance_id: MarketInstanceId,
}

impl Category {
    pub fn item(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn require_item(&self) -> Result<&Item, ValidationError> {
        self.item().ok_or_else(|| ValidationError::EmptyCategory {
            entity: self.category_name.clone(),
        })
    }

    /// Copy of this category holding only `class_name`, if present.
    pub fn narrowed_to(&self, class_name: &str) -> Option<Category> {
        let item = self.items.iter().find(|item| item.class_name == class_name)?;
        Some(Category {
            items: vec![item.clone()],
            ..self.without_items()
        })
    }

    fn without_items(&self) -> Category {
        Category {
            category_name: self.category_name.clone(),
            display_name: self.display_name.clone(),
            init_stock_percent: self.init_stock_percent,
            items: Vec::new(),
            market_instance_id: self.market_instance_id.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trader {
    pub trader_name: String,
    pub display_name: String,
    /// Bare category names or `"categoryName:N"` with an annotation suffix.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Per-item annotations, taking precedence over category annotations.
    #[serde(default)]
    pub items: HashMap<ClassName, Annotation>,
    #[serde(default)]
    pub currencies: Vec<ClassName>,
    #[serde(default)]
    pub lowest_currency: Option<ClassName>,
    #[serde(default)]
    pub market_instance_id: MarketInstanceId,
    #[serde(default)]
    pub map: Option<TraderMap>,
}

impl Trader {
    /// Zone this trader sits in, if both links are present.
    pub fn zone(&self) -> Option<&TraderZone> {
        self.map.as_ref().and_then(|map| map.zone.as_ref())
    }

    /// Category name part of a `categories` entry, without the suffix.
    pub fn category_entry_name(entry: &str) -> &str {
        match entry.find(':') {
            Some(index) if index >= 1 => &entry[..index],
            _ => entry,
        }
    }

    pub fn lists_category(&self, category_name: &str) -> bool {
        self.categories
            .iter()
            .any(|entry| Self::category_entry_name(entry).eq_ignore_ascii_case(category_name))
    }
}

/// Placement of a trader on a map, linking it to its zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderMap {
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub zone: Option<TraderZone>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderZone {
    pub display_name: String,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub position: [f64; 3],
    /// Valid in `[1, 999]`; anything else means 100%.
    #[serde(default = "inherit_percent")]
    pub buy_price_percent: f64,
    /// `-1` falls back to the global sell percent.
    #[serde(default = "inherit_percent")]
    pub sell_price_percent: f64,
    #[serde(default)]
    pub stock: HashMap<ClassName, i64>,
    #[serde(default)]
    pub init_stock_percent: f64,
}

impl TraderZone {
    /// Zone sell percent, `None` when falling back to the global percent.
    pub fn sell_percent_override(&self) -> Result<Option<f64>, ValidationError> {
        sell_percent_override(&self.display_name, "sellPricePercent", self.sell_price_percent)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some((class_name, value)) = self.stock.iter().find(|(_, value)| **value < 0) {
            return Err(ValidationError::NegativeStock {
                entity: self.display_name.clone(),
                field: format!("stock.{class_name}"),
                value: *value,
            });
        }
        self.sell_percent_override()?;
        Ok(())
    }
}

/// Per-instance display preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Collapse dynamic price ranges to the current price.
    #[serde(default)]
    pub only_show_dynamic_now_price: bool,
}
