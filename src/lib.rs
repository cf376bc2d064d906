//! Pricing and presentation resolution for in-game trader markets.
//!
//! - `domain` holds the pure resolution pipeline: annotations, stock, prices
//!   and the presentation builder that ties them together.
//! - `infra` holds the collaborator seams: the name resolution service, the
//!   per-instance name cache and the configuration-store snapshot.
//! - `util` holds configuration loading and small formatting helpers.

pub mod domain;
pub mod infra;
pub mod util;

pub use domain::{
    compute_buy, compute_sell, resolve_annotation, resolve_stock, Annotation, AttachmentLine,
    AttachmentRef, Category, Item, ListingEntry, Presentation, PresentationBuilder,
    PresentationOutcome, PriceCalculator, PriceMode, PriceResult, PricingConfig, Settings,
    StockLevel, TradeAccess, TradeQuote, Trader, TraderMap, TraderZone, ValidationError,
};
pub use infra::{
    BulkResolution, DisplayName, InMemoryNameService, MarketSnapshot, NameCache, NameResolver,
    NameService, NameServiceError,
};
pub use util::config::EngineConfig;
