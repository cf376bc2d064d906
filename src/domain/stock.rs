use serde::{Deserialize, Serialize};

use super::entities::{Category, Item, TraderZone};
use super::error::ValidationError;
use crate::util::round_half_up;

/// Current stock of an item in a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StockLevel {
    Units(u64),
    /// Zone holds none; the trader only offers what players sold to it.
    SoldByPlayersOnly,
}

impl StockLevel {
    /// Unit count used by the price formula; the sentinel counts as empty.
    pub fn units(self) -> u64 {
        match self {
            Self::Units(units) => units,
            Self::SoldByPlayersOnly => 0,
        }
    }
}

/// Resolves the stock of `item` within `zone`.
///
/// A missing or zero zone entry means "tradable only after a player sells
/// one here", unless the item and category configure an initial stock.
pub fn resolve_stock(
    item: &Item,
    category: &Category,
    zone: &TraderZone,
) -> Result<StockLevel, ValidationError> {
    let configured = zone.stock.get(&item.class_name).copied().unwrap_or(0);

    if configured < 0 {
        return Err(ValidationError::NegativeStock {
            entity: zone.display_name.clone(),
            field: format!("stock.{}", item.class_name),
            value: configured,
        });
    }

    if configured > 0 {
        return Ok(StockLevel::Units(configured as u64));
    }

    let has_init_stock = item.max_stock_threshold != item.min_stock_threshold
        && item.max_stock_threshold >= 1
        && category.init_stock_percent >= 1.0;

    if !has_init_stock {
        return Ok(StockLevel::SoldByPlayersOnly);
    }

    let units = round_half_up(item.max_stock_threshold as f64 / 100.0 * zone.init_stock_percent);
    if units < 0 {
        return Err(ValidationError::NegativeStock {
            entity: zone.display_name.clone(),
            field: "initStockPercent".to_string(),
            value: units,
        });
    }

    Ok(StockLevel::Units(units as u64))
}
