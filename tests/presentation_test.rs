//! End-to-end resolution of item presentations.
//!
//! Tests cover:
//! - Missing map / zone and untradeable signals
//! - Annotation precedence as seen through the builder
//! - Full presentations with attachments, variants and currency names
//! - Multi-trader listings with per-trader failures

mod common;

use common::*;
use market_pricing::domain::{
    compute_buy, Annotation, AttachmentRef, PriceMode, PriceResult, Settings, StockLevel,
    TradeQuote,
};
use market_pricing::{PresentationOutcome, ValidationError};

fn presented(outcome: PresentationOutcome) -> market_pricing::Presentation {
    match outcome {
        PresentationOutcome::Presented(presentation) => *presentation,
        other => panic!("expected a presentation, got {other:?}"),
    }
}

mod signals {
    use super::*;

    #[tokio::test]
    async fn trader_without_map() {
        let builder = builder(&[]).await;
        let mut trader = trader("weapons", &["rifles"], Some(zone(100.0, -1.0)));
        trader.map = None;

        let outcome = builder
            .build(&Settings::default(), "akm", &category("rifles", item("akm", 1, 2)), &trader)
            .await
            .unwrap();
        assert_eq!(outcome, PresentationOutcome::NoMap);
    }

    #[tokio::test]
    async fn map_without_zone() {
        let builder = builder(&[]).await;
        let trader = trader("weapons", &["rifles"], None);

        let outcome = builder
            .build(&Settings::default(), "akm", &category("rifles", item("akm", 1, 2)), &trader)
            .await
            .unwrap();
        assert_eq!(outcome, PresentationOutcome::NoZone);
    }

    #[tokio::test]
    async fn item_annotation_three_is_unavailable_regardless_of_category() {
        let builder = builder(&[]).await;
        let trader = with_item_annotation(
            trader("camping", &["tents:1"], Some(zone(100.0, -1.0))),
            "tent",
            Annotation::BothDisabled,
        );

        let outcome = builder
            .build(&Settings::default(), "tent", &category("tents", item("tent", 100, 200)), &trader)
            .await
            .unwrap();
        assert_eq!(outcome, PresentationOutcome::Unavailable);
    }

    #[tokio::test]
    async fn category_annotation_three_is_unavailable() {
        let builder = builder(&[]).await;
        let trader = trader("camping", &["Tents:3"], Some(zone(100.0, -1.0)));

        let outcome = builder
            .build(&Settings::default(), "tent", &category("tents", item("tent", 100, 200)), &trader)
            .await
            .unwrap();
        assert_eq!(outcome, PresentationOutcome::Unavailable);
    }

    #[tokio::test]
    async fn empty_category_is_a_validation_error() {
        let builder = builder(&[]).await;
        let mut rifles = category("rifles", item("akm", 1, 2));
        rifles.items.clear();

        let err = builder
            .build(&Settings::default(), "akm", &rifles, &trader("weapons", &[], Some(zone(100.0, -1.0))))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCategory { .. }));
    }
}

mod presentations {
    use super::*;

    #[tokio::test]
    async fn dynamic_item_with_empty_stock() {
        let builder = builder(&[("coin_1", "Ruble")]).await;
        let rifles = category("rifles", item("akm", 100, 1000));
        let trader = trader("weapons", &["rifles"], Some(zone(50.0, -1.0)));

        let presentation = presented(
            builder
                .build(&Settings::default(), "akm", &rifles, &trader)
                .await
                .unwrap(),
        );

        assert_eq!(presentation.display_name, "Akm (-)");
        assert_eq!(presentation.category_name, "rifles");
        assert_eq!(presentation.trader_display_name, "Weapons Trader");
        assert_eq!(presentation.zone_display_name, "Green Mountain");
        assert_eq!(presentation.currency.as_deref(), Some("Ruble"));
        assert_eq!(presentation.price_mode, PriceMode::Dynamic);
        assert_eq!(
            presentation.buy,
            TradeQuote::Price(PriceResult { low: 50, now: 500, high: 500 })
        );
        // 75% global fallback
        assert_eq!(
            presentation.sell,
            TradeQuote::Price(PriceResult { low: 75, now: 750, high: 750 })
        );
        assert_eq!(presentation.stock, Some(StockLevel::SoldByPlayersOnly));
    }

    #[tokio::test]
    async fn annotation_disables_one_side() {
        let builder = builder(&[]).await;
        let rifles = category("rifles", item("akm", 100, 1000));
        let trader = with_item_annotation(
            trader("weapons", &["rifles:0"], Some(zone(100.0, -1.0))),
            "akm",
            Annotation::BuyDisabled,
        );

        let presentation = presented(
            builder
                .build(&Settings::default(), "akm", &rifles, &trader)
                .await
                .unwrap(),
        );

        assert_eq!(presentation.buy, TradeQuote::NotAvailable);
        assert!(presentation.sell.price().is_some());
    }

    #[tokio::test]
    async fn static_stock_hides_stock_and_collapses_prices() {
        let builder = builder(&[]).await;
        let mut tent = item("tent", 100, 400);
        tent.has_static_stock = true;
        tent.display_name = Some("Car Tent".into());
        let trader = trader("camping", &["tents"], Some(zone(100.0, 50.0)));

        let presentation = presented(
            builder
                .build(&Settings::default(), "tent", &category("tents", tent), &trader)
                .await
                .unwrap(),
        );

        assert_eq!(presentation.display_name, "Car Tent");
        assert_eq!(presentation.price_mode, PriceMode::Static);
        assert_eq!(presentation.buy, TradeQuote::Price(PriceResult::single(400)));
        assert_eq!(presentation.sell, TradeQuote::Price(PriceResult::single(200)));
        assert_eq!(presentation.stock, None);
    }

    #[tokio::test]
    async fn attachments_and_variants_are_named_in_order() {
        let builder = builder(&[("mag_akm_30", "AKM 30rnd Mag"), ("akm_black", "Black AKM")]).await;

        let mut bayonet = item("bayonet_akm", 20, 40);
        bayonet.display_name = Some("AK Bayonet".into());
        bayonet.spawn_attachments = vec![priced("attachments", item("bayonet_sheath", 5, 10))];
        let mut akm = item("akm", 100, 1000);
        akm.spawn_attachments = vec![
            AttachmentRef::ClassName("mag_akm_30".into()),
            priced("attachments", bayonet),
            AttachmentRef::ClassName("akm_wooden_stock".into()),
        ];
        akm.variants = vec!["akm_black".into(), "akm_camo".into()];

        let rifles = category("rifles", akm);
        let zone = zone(100.0, -1.0);
        let trader = trader("weapons", &["rifles"], Some(zone.clone()));

        let presentation = presented(
            builder
                .build(&Settings::default(), "akm", &rifles, &trader)
                .await
                .unwrap(),
        );

        let names: Vec<&str> = presentation.attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["AKM 30rnd Mag", "AK Bayonet", "Akm Wooden Stock (-)"]);
        assert_eq!(presentation.attachments[0].price_now, None);
        // The bayonet line shows its own price, without the sheath.
        assert_eq!(presentation.attachments[1].price_now, Some(40));
        assert_eq!(presentation.variants, vec!["Black AKM", "Akm Camo (-)"]);

        // Priced attachment adds onto the parent price.
        let alone = compute_buy(&Settings::default(), &item("akm", 100, 1000), &rifles, &zone).unwrap();
        let buy = presentation.buy.price().copied().unwrap();
        assert_eq!(buy.high, alone.high + 40 + 10);
        assert_eq!(buy.low, alone.low + 20 + 5);
    }

    #[tokio::test]
    async fn now_only_setting_collapses_dynamic_prices() {
        let builder = builder(&[]).await;
        let rifles = category("rifles", item("akm", 100, 1000));
        let trader = trader("weapons", &["rifles"], Some(zone_with_stock(&[("akm", 50)])));
        let settings = Settings {
            only_show_dynamic_now_price: true,
        };

        let presentation = presented(builder.build(&settings, "akm", &rifles, &trader).await.unwrap());

        assert_eq!(presentation.price_mode, PriceMode::NowOnly);
        assert_eq!(presentation.buy, TradeQuote::Price(PriceResult::single(550)));
        assert_eq!(presentation.stock, Some(StockLevel::Units(50)));
    }

    #[tokio::test]
    async fn renamed_currency_is_picked_up_after_table_replacement() {
        let (builder, service) = builder_with_service(&[("coin_1", "Ruble")]).await;
        let rifles = category("rifles", item("akm", 100, 1000));
        let trader = trader("weapons", &["rifles"], Some(zone(100.0, -1.0)));

        let first = presented(builder.build(&Settings::default(), "akm", &rifles, &trader).await.unwrap());
        assert_eq!(first.currency.as_deref(), Some("Ruble"));

        service.replace_names(INSTANCE, table(&[("coin_1", "Rouble")])).await;
        let second = presented(builder.build(&Settings::default(), "akm", &rifles, &trader).await.unwrap());
        assert_eq!(second.currency.as_deref(), Some("Rouble"));

        service.clear_names(INSTANCE).await;
        let third = presented(builder.build(&Settings::default(), "akm", &rifles, &trader).await.unwrap());
        assert_eq!(third.currency.as_deref(), Some("Coin 1 (-)"));
    }
}

mod listings {
    use super::*;

    #[tokio::test]
    async fn entries_follow_trader_order_and_isolate_failures() {
        let builder = builder(&[]).await;
        let rifles = category("rifles", item("akm", 100, 1000));
        let mut no_map = trader("nomad", &["rifles"], None);
        no_map.map = None;
        let traders = vec![
            trader("broken", &["rifles:9"], Some(zone(100.0, -1.0))),
            trader("weapons", &["rifles"], Some(zone(100.0, -1.0))),
            no_map,
            trader("zoneless", &["rifles"], None),
        ];

        let listing = builder
            .build_listing(&Settings::default(), "akm", &rifles, &traders)
            .await;

        let order: Vec<&str> = listing.iter().map(|e| e.trader_name.as_str()).collect();
        assert_eq!(order, vec!["broken", "weapons", "nomad", "zoneless"]);
        assert!(matches!(
            listing[0].outcome,
            Err(ValidationError::InvalidAnnotation { .. })
        ));
        assert!(matches!(listing[1].outcome, Ok(PresentationOutcome::Presented(_))));
        assert_eq!(listing[2].outcome, Ok(PresentationOutcome::NoMap));
        assert_eq!(listing[3].outcome, Ok(PresentationOutcome::NoZone));
    }

    #[tokio::test]
    async fn no_traders_means_empty_listing() {
        let builder = builder(&[]).await;
        let listing = builder
            .build_listing(&Settings::default(), "akm", &category("rifles", item("akm", 1, 2)), &[])
            .await;
        assert!(listing.is_empty());
    }
}
