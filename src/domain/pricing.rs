use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::entities::{Category, Item, Settings, TraderZone};
use super::error::ValidationError;
use super::stock::resolve_stock;
use crate::util::{round_half_up, round_percent};

/// Sell percent used when both the item and its zone inherit.
pub const DEFAULT_GLOBAL_SELL_PRICE_PERCENT: f64 = 75.0;

/// Buy percent used when the zone value is outside `[1, 999]`.
pub const DEFAULT_BUY_PRICE_PERCENT: f64 = 100.0;

const MIN_ZONE_BUY_PERCENT: f64 = 1.0;
const MAX_ZONE_BUY_PERCENT: f64 = 999.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub global_sell_price_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            global_sell_price_percent: DEFAULT_GLOBAL_SELL_PRICE_PERCENT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResult {
    pub low: i64,
    pub now: i64,
    pub high: i64,
}

impl PriceResult {
    pub fn single(value: i64) -> Self {
        Self {
            low: value,
            now: value,
            high: value,
        }
    }
}

impl AddAssign for PriceResult {
    fn add_assign(&mut self, rhs: Self) {
        self.low += rhs.low;
        self.now += rhs.now;
        self.high += rhs.high;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// How a price should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceMode {
    /// Static price or stock: one value.
    Static,
    /// Low, now and high.
    Dynamic,
    /// Dynamic item collapsed to its current price.
    NowOnly,
}

pub fn price_mode(settings: &Settings, item: &Item) -> PriceMode {
    if item.is_static() {
        PriceMode::Static
    } else if settings.only_show_dynamic_now_price {
        PriceMode::NowOnly
    } else {
        PriceMode::Dynamic
    }
}

/// Zone buy percent if within `[1, 999]`, else 100.
pub fn active_buy_percent(zone: &TraderZone) -> f64 {
    let percent = zone.buy_price_percent;
    if (MIN_ZONE_BUY_PERCENT..=MAX_ZONE_BUY_PERCENT).contains(&percent) {
        round_percent(percent)
    } else {
        DEFAULT_BUY_PRICE_PERCENT
    }
}

/// Item sell percent, falling back to the zone, then to the global value.
///
/// Only `-1` inherits; any other negative percent is an error.
pub fn active_sell_percent(
    item: &Item,
    zone: &TraderZone,
    config: &PricingConfig,
) -> Result<f64, ValidationError> {
    let percent = match item.sell_percent_override()? {
        Some(percent) => percent,
        None => zone
            .sell_percent_override()?
            .unwrap_or(config.global_sell_price_percent),
    };
    Ok(round_percent(percent))
}

/// Price between `low` and `high`, inversely proportional to fill level.
///
/// Stock percent is capped at 100, so stock above `max_stock` prices at
/// `low` rather than below it as the uncapped formula would. A zero max
/// stock counts as empty.
pub fn interpolate_price(low: i64, high: i64, stock: u64, max_stock: i64) -> i64 {
    let stock_percent = if max_stock > 0 {
        (stock as f64 / max_stock as f64 * 100.0).min(100.0)
    } else {
        0.0
    };
    let range = (high - low) as f64;
    round_half_up(low as f64 + range / 100.0 * (100.0 - stock_percent))
}

#[derive(Clone, Debug, Default)]
pub struct PriceCalculator {
    config: PricingConfig,
}

impl PriceCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn compute_buy(
        &self,
        settings: &Settings,
        item: &Item,
        category: &Category,
        zone: &TraderZone,
    ) -> Result<PriceResult, ValidationError> {
        self.compute(TradeSide::Buy, settings, item, category, zone)
    }

    pub fn compute_sell(
        &self,
        settings: &Settings,
        item: &Item,
        category: &Category,
        zone: &TraderZone,
    ) -> Result<PriceResult, ValidationError> {
        self.compute(TradeSide::Sell, settings, item, category, zone)
    }

    /// Item price plus the prices of all its priced attachments.
    pub fn compute(
        &self,
        side: TradeSide,
        settings: &Settings,
        item: &Item,
        category: &Category,
        zone: &TraderZone,
    ) -> Result<PriceResult, ValidationError> {
        item.validate()?;
        zone.validate()?;
        self.price_with_attachments(side, settings, item, category, zone)
    }

    fn price_with_attachments(
        &self,
        side: TradeSide,
        settings: &Settings,
        item: &Item,
        category: &Category,
        zone: &TraderZone,
    ) -> Result<PriceResult, ValidationError> {
        let mut total = self.base_price(side, settings, item, category, zone)?;

        for (sub_category, sub_item) in item.spawn_attachments.iter().filter_map(|a| a.priced()) {
            total += self.price_with_attachments(side, settings, sub_item, sub_category, zone)?;
        }

        Ok(total)
    }

    /// Price of the item alone, without attachments.
    pub fn base_price(
        &self,
        side: TradeSide,
        settings: &Settings,
        item: &Item,
        category: &Category,
        zone: &TraderZone,
    ) -> Result<PriceResult, ValidationError> {
        let percent = match side {
            TradeSide::Buy => active_buy_percent(zone),
            TradeSide::Sell => active_sell_percent(item, zone, &self.config)?,
        };

        let high = round_half_up(item.max_price_threshold as f64 / 100.0 * percent);
        let low = round_half_up(item.min_price_threshold as f64 / 100.0 * percent);

        if item.is_static() {
            return Ok(PriceResult::single(high));
        }

        let stock = resolve_stock(item, category, zone)?;
        let now = interpolate_price(low, high, stock.units(), item.max_stock_threshold);

        if settings.only_show_dynamic_now_price {
            return Ok(PriceResult::single(now));
        }

        Ok(PriceResult { low, now, high })
    }
}

/// Buy price with the default pricing config.
pub fn compute_buy(
    settings: &Settings,
    item: &Item,
    category: &Category,
    zone: &TraderZone,
) -> Result<PriceResult, ValidationError> {
    PriceCalculator::default().compute_buy(settings, item, category, zone)
}

/// Sell price with the default pricing config.
pub fn compute_sell(
    settings: &Settings,
    item: &Item,
    category: &Category,
    zone: &TraderZone,
) -> Result<PriceResult, ValidationError> {
    PriceCalculator::default().compute_sell(settings, item, category, zone)
}
