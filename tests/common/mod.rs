#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use market_pricing::domain::{
    Annotation, AttachmentRef, Category, Item, Trader, TraderMap, TraderZone, INHERIT_PERCENT,
};
use market_pricing::infra::{InMemoryNameService, NameResolver};
use market_pricing::{EngineConfig, PresentationBuilder};

pub const INSTANCE: &str = "srv-1";

pub fn item(class_name: &str, min_price: i64, max_price: i64) -> Item {
    Item {
        class_name: class_name.to_string(),
        display_name: None,
        has_static_price: false,
        has_static_stock: false,
        min_price_threshold: min_price,
        max_price_threshold: max_price,
        min_stock_threshold: 100,
        max_stock_threshold: 100,
        sell_price_percent: INHERIT_PERCENT,
        spawn_attachments: Vec::new(),
        variants: Vec::new(),
    }
}

pub fn category(name: &str, item: Item) -> Category {
    Category {
        category_name: name.to_string(),
        display_name: name.to_string(),
        init_stock_percent: 0.0,
        items: vec![item],
        market_instance_id: INSTANCE.to_string(),
    }
}

pub fn priced(category_name: &str, item: Item) -> AttachmentRef {
    AttachmentRef::Priced {
        category: category(category_name, item),
    }
}

pub fn zone(buy_percent: f64, sell_percent: f64) -> TraderZone {
    TraderZone {
        display_name: "Green Mountain".to_string(),
        radius: 150.0,
        position: [3700.0, 400.0, 6000.0],
        buy_price_percent: buy_percent,
        sell_price_percent: sell_percent,
        stock: HashMap::new(),
        init_stock_percent: 75.0,
    }
}

pub fn zone_with_stock(stock: &[(&str, i64)]) -> TraderZone {
    let mut zone = zone(100.0, -1.0);
    zone.stock = stock.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    zone
}

pub fn trader(name: &str, categories: &[&str], zone: Option<TraderZone>) -> Trader {
    Trader {
        trader_name: name.to_string(),
        display_name: "#STR_EXPANSION_MARKET_TRADER_WEAPONS".to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        items: HashMap::new(),
        currencies: vec!["coin_1".to_string(), "coin_10".to_string()],
        lowest_currency: Some("coin_1".to_string()),
        market_instance_id: INSTANCE.to_string(),
        map: Some(TraderMap {
            map_name: "chernarusplus".to_string(),
            zone,
        }),
    }
}

pub fn with_item_annotation(mut trader: Trader, class_name: &str, annotation: Annotation) -> Trader {
    trader.items.insert(class_name.to_string(), annotation);
    trader
}

pub async fn name_service(entries: &[(&str, &str)]) -> Arc<InMemoryNameService> {
    let service = Arc::new(InMemoryNameService::new());
    service.replace_names(INSTANCE, table(entries)).await;
    service
}

pub async fn builder(entries: &[(&str, &str)]) -> PresentationBuilder<InMemoryNameService> {
    builder_with_service(entries).await.0
}

/// Builder wired to an in-memory name service whose table changes
/// invalidate the builder's name cache.
pub async fn builder_with_service(
    entries: &[(&str, &str)],
) -> (
    PresentationBuilder<InMemoryNameService>,
    Arc<InMemoryNameService>,
) {
    let config = EngineConfig::default();
    let service = name_service(entries).await;
    let names = NameResolver::from_config(Arc::clone(&service), &config);
    service.subscribe(names.cache().clone()).await;
    (PresentationBuilder::from_config(names, &config), service)
}

pub fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
