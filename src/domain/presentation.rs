//! Assembles one display-ready record per item and trader.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::annotation::resolve_annotation;
use super::entities::{AttachmentRef, Category, ClassName, Item, Settings, Trader, TraderZone};
use super::error::ValidationError;
use super::pricing::{price_mode, PriceCalculator, PriceMode, PriceResult, TradeSide};
use super::stock::{resolve_stock, StockLevel};
use crate::infra::names::{prettify_class_name, DisplayName, NameResolver, NameService};
use crate::util::config::EngineConfig;

const STRING_TABLE_PREFIX: &str = "#STR_EXPANSION_MARKET";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TradeQuote {
    Price(PriceResult),
    /// This side of the trade is disabled by an annotation.
    NotAvailable,
}

impl TradeQuote {
    pub fn price(&self) -> Option<&PriceResult> {
        match self {
            Self::Price(price) => Some(price),
            Self::NotAvailable => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentLine {
    pub name: String,
    /// Current buy price of the attachment alone, for attachments with their
    /// own price config. Nested attachments are not included.
    pub price_now: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub class_name: ClassName,
    pub display_name: String,
    pub category_name: String,
    pub trader_display_name: String,
    pub zone_display_name: String,
    pub currency: Option<String>,
    pub price_mode: PriceMode,
    pub buy: TradeQuote,
    pub sell: TradeQuote,
    /// Absent for statically stocked items.
    pub stock: Option<StockLevel>,
    pub attachments: Vec<AttachmentLine>,
    pub variants: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationOutcome {
    Presented(Box<Presentation>),
    /// Trader is not placed on any map.
    NoMap,
    /// Trader's map has no zone.
    NoZone,
    /// Item can be neither bought nor sold here.
    Unavailable,
}

/// One trader's result in a multi-trader listing.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingEntry {
    pub trader_name: String,
    pub outcome: Result<PresentationOutcome, ValidationError>,
}

/// `#STR_EXPANSION_MARKET_TRADER_WEAPONS` -> `Weapons Trader`; other names
/// are returned as is.
pub fn trader_display_name(raw: &str) -> String {
    if !raw.starts_with(STRING_TABLE_PREFIX) {
        return raw.to_string();
    }

    let mut parts: Vec<&str> = raw[1..].split('_').skip(3).collect();
    if parts.is_empty() {
        return raw.to_string();
    }
    let first = parts.remove(0);
    parts.push(first);

    parts
        .iter()
        .map(|part| {
            let lower = part.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct PresentationBuilder<S> {
    names: NameResolver<S>,
    prices: PriceCalculator,
    missing_name_tag: String,
}

impl<S: NameService> PresentationBuilder<S> {
    pub fn new(names: NameResolver<S>, prices: PriceCalculator, missing_name_tag: &str) -> Self {
        Self {
            names,
            prices,
            missing_name_tag: missing_name_tag.to_string(),
        }
    }

    pub fn from_config(names: NameResolver<S>, config: &EngineConfig) -> Self {
        Self::new(
            names,
            PriceCalculator::new(config.pricing()),
            &config.missing_name_tag,
        )
    }

    pub fn names(&self) -> &NameResolver<S> {
        &self.names
    }

    pub fn prices(&self) -> &PriceCalculator {
        &self.prices
    }

    /// Resolves `category.items[0]` at `trader`.
    pub async fn build(
        &self,
        settings: &Settings,
        class_name: &str,
        category: &Category,
        trader: &Trader,
    ) -> Result<PresentationOutcome, ValidationError> {
        let item = category.require_item()?;

        let Some(map) = trader.map.as_ref() else {
            return Ok(PresentationOutcome::NoMap);
        };
        let Some(zone) = map.zone.as_ref() else {
            return Ok(PresentationOutcome::NoZone);
        };

        let access = resolve_annotation(item, category, trader)?;
        if access.is_untradeable() {
            return Ok(PresentationOutcome::Unavailable);
        }

        let buy = if access.buy_disabled {
            TradeQuote::NotAvailable
        } else {
            TradeQuote::Price(self.prices.compute_buy(settings, item, category, zone)?)
        };
        let sell = if access.sell_disabled {
            TradeQuote::NotAvailable
        } else {
            TradeQuote::Price(self.prices.compute_sell(settings, item, category, zone)?)
        };

        let stock = if item.has_static_stock {
            None
        } else {
            Some(resolve_stock(item, category, zone)?)
        };

        let priced_attachments = self.price_attachments(settings, item, zone)?;
        let named = named_attachments(item);
        let instance_id = category.market_instance_id.as_str();

        let (currency, attachment_names, variants) = tokio::join!(
            self.currency_name(trader, category),
            self.names.display_names(instance_id, &named),
            self.names.display_names(instance_id, &item.variants),
        );

        let display_name = match &item.display_name {
            Some(name) => name.clone(),
            None => DisplayName::prettified(class_name).tagged(&self.missing_name_tag),
        };

        Ok(PresentationOutcome::Presented(Box::new(Presentation {
            class_name: class_name.to_string(),
            display_name,
            category_name: category.display_name.clone(),
            trader_display_name: trader_display_name(&trader.display_name),
            zone_display_name: zone.display_name.clone(),
            currency,
            price_mode: price_mode(settings, item),
            buy,
            sell,
            stock,
            attachments: merge_attachments(
                item,
                priced_attachments,
                self.tag_all(attachment_names),
            ),
            variants: self.tag_all(variants),
        })))
    }

    /// One entry per trader, in input order. Data-quality failures stay
    /// confined to their entry.
    pub async fn build_listing(
        &self,
        settings: &Settings,
        class_name: &str,
        category: &Category,
        traders: &[Trader],
    ) -> Vec<ListingEntry> {
        join_all(traders.iter().map(|trader| async move {
            let outcome = self.build(settings, class_name, category, trader).await;
            if let Err(error) = &outcome {
                warn!(
                    class_name,
                    trader = %trader.trader_name,
                    %error,
                    "item failed validation"
                );
            }
            ListingEntry {
                trader_name: trader.trader_name.clone(),
                outcome,
            }
        }))
        .await
    }

    fn price_attachments(
        &self,
        settings: &Settings,
        item: &Item,
        zone: &TraderZone,
    ) -> Result<Vec<Option<AttachmentLine>>, ValidationError> {
        item.spawn_attachments
            .iter()
            .map(|attachment| match attachment.priced() {
                Some((sub_category, sub_item)) => {
                    let price = self
                        .prices
                        .base_price(TradeSide::Buy, settings, sub_item, sub_category, zone)?;
                    Ok(Some(AttachmentLine {
                        name: sub_item
                            .display_name
                            .clone()
                            .unwrap_or_else(|| prettify_class_name(&sub_item.class_name)),
                        price_now: Some(price.now),
                    }))
                }
                None => Ok(None),
            })
            .collect()
    }

    async fn currency_name(&self, trader: &Trader, category: &Category) -> Option<String> {
        let currency = trader.lowest_currency.as_deref()?;
        let instance_id = if trader.market_instance_id.is_empty() {
            &category.market_instance_id
        } else {
            &trader.market_instance_id
        };
        let name = self.names.resolve_name(instance_id, currency).await;
        Some(name.tagged(&self.missing_name_tag))
    }

    fn tag_all(&self, names: Vec<DisplayName>) -> Vec<String> {
        names
            .iter()
            .map(|name| name.tagged(&self.missing_name_tag))
            .collect()
    }
}

/// Class names of attachments referenced by name only.
fn named_attachments(item: &Item) -> Vec<ClassName> {
    item.spawn_attachments
        .iter()
        .filter_map(|attachment| match attachment {
            AttachmentRef::ClassName(class_name) => Some(class_name.clone()),
            AttachmentRef::Priced { .. } => None,
        })
        .collect()
}

/// Interleaves priced and name-only attachment lines back into item order.
/// Priced references without a configured item are dropped.
fn merge_attachments(
    item: &Item,
    priced: Vec<Option<AttachmentLine>>,
    named: Vec<String>,
) -> Vec<AttachmentLine> {
    let mut named = named.into_iter();
    item.spawn_attachments
        .iter()
        .zip(priced)
        .filter_map(|(attachment, priced)| match attachment {
            AttachmentRef::ClassName(_) => named.next().map(|name| AttachmentLine {
                name,
                price_now: None,
            }),
            AttachmentRef::Priced { .. } => priced,
        })
        .collect()
}
