//! Resolution pipeline: annotations gate the trade, stock feeds the price,
//! the presentation builder assembles the result.

pub mod annotation;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod presentation;
pub mod pricing;
pub mod stock;

pub use annotation::{resolve_annotation, Annotation, AnnotationSource, TradeAccess};
pub use catalog::{all_currencies, item_choices, lowest_currencies, search_choices, ItemChoice};
pub use entities::{
    AttachmentRef, Category, ClassName, Item, MarketInstanceId, Settings, Trader, TraderMap,
    TraderZone, INHERIT_PERCENT,
};
pub use error::{UnknownAnnotation, ValidationError};
pub use presentation::{
    trader_display_name, AttachmentLine, ListingEntry, Presentation, PresentationBuilder,
    PresentationOutcome, TradeQuote,
};
pub use pricing::{
    active_buy_percent, active_sell_percent, compute_buy, compute_sell, PriceCalculator,
    PriceMode, PriceResult, PricingConfig, TradeSide, DEFAULT_GLOBAL_SELL_PRICE_PERCENT,
};
pub use stock::{resolve_stock, StockLevel};
