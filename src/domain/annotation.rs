//! Trader annotations: which sides of a trade are disabled for an item.

use serde::{Deserialize, Serialize};

use super::entities::{Category, Item, Trader};
use super::error::{UnknownAnnotation, ValidationError};

/// Per-trader restriction on an item or category.
///
/// Wire values: `0` sell disabled, `1` no restriction, `2` buy disabled,
/// `3` both disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Annotation {
    SellDisabled,
    #[default]
    None,
    BuyDisabled,
    BothDisabled,
}

impl Annotation {
    pub fn buy_disabled(self) -> bool {
        matches!(self, Self::BuyDisabled | Self::BothDisabled)
    }

    pub fn sell_disabled(self) -> bool {
        matches!(self, Self::SellDisabled | Self::BothDisabled)
    }
}

impl TryFrom<i64> for Annotation {
    type Error = UnknownAnnotation;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SellDisabled),
            1 => Ok(Self::None),
            2 => Ok(Self::BuyDisabled),
            3 => Ok(Self::BothDisabled),
            other => Err(UnknownAnnotation(other)),
        }
    }
}

impl From<Annotation> for i64 {
    fn from(value: Annotation) -> Self {
        match value {
            Annotation::SellDisabled => 0,
            Annotation::None => 1,
            Annotation::BuyDisabled => 2,
            Annotation::BothDisabled => 3,
        }
    }
}

/// Where the effective annotation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationSource {
    Item,
    Category,
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeAccess {
    pub annotation: Annotation,
    pub source: AnnotationSource,
    pub buy_disabled: bool,
    pub sell_disabled: bool,
}

impl TradeAccess {
    fn new(annotation: Annotation, source: AnnotationSource) -> Self {
        Self {
            annotation,
            source,
            buy_disabled: annotation.buy_disabled(),
            sell_disabled: annotation.sell_disabled(),
        }
    }

    /// Item can be neither bought nor sold at this trader.
    pub fn is_untradeable(&self) -> bool {
        self.buy_disabled && self.sell_disabled
    }
}

/// Resolves the effective annotation for an item at a trader.
///
/// `trader.items` (exact class name) wins over `trader.categories`
/// (case-insensitive category name). A category entry without a `:N`
/// suffix carries no restriction.
pub fn resolve_annotation(
    item: &Item,
    category: &Category,
    trader: &Trader,
) -> Result<TradeAccess, ValidationError> {
    if let Some(annotation) = trader.items.get(&item.class_name) {
        return Ok(TradeAccess::new(*annotation, AnnotationSource::Item));
    }

    let entry = trader.categories.iter().find(|entry| {
        Trader::category_entry_name(entry).eq_ignore_ascii_case(&category.category_name)
    });

    let Some(entry) = entry else {
        return Ok(TradeAccess::new(Annotation::None, AnnotationSource::Default));
    };

    let annotation = category_entry_annotation(trader, entry)?.unwrap_or_default();
    Ok(TradeAccess::new(annotation, AnnotationSource::Category))
}

/// Annotation carried by a `categories` entry, `None` for a bare name.
pub fn category_entry_annotation(
    trader: &Trader,
    entry: &str,
) -> Result<Option<Annotation>, ValidationError> {
    match entry.find(':') {
        Some(index) if index >= 1 => parse_suffix(&entry[index + 1..])
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidAnnotation {
                entity: trader.trader_name.clone(),
                field: "categories",
                value: entry.to_string(),
            }),
        _ => Ok(None),
    }
}

fn parse_suffix(raw: &str) -> Option<Annotation> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| Annotation::try_from(value).ok())
}
