use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use kika::adapter::outbound::therminos::ITherminos;
use kika::application::Therminos;
use kika::domain::format::{fmt_band, fmt_price_e8, fmt_signed_bps};
use kika::domain::parse_price_e8;
use kika::error::{CallError, ConfigError, Error, ValidationError};
use kika::infrastructure::connector::bind_contract;
use kika::testkit::{MockChainClient, MockSymbol};

fn contract() -> Address {
    Address::repeat_byte(0x42)
}

fn updater() -> Address {
    Address::repeat_byte(0x11)
}

fn therminos(mock: &MockChainClient) -> Therminos<MockChainClient> {
    bind_contract(mock.clone(), contract())
}

fn btc() -> MockSymbol {
    MockSymbol::new()
        .with_prices(&[
            (6_400_000_000_000, 100),
            (6_425_050_000_000, 105),
            (6_500_000_000_000, 110),
        ])
        .with_bands(&[(0, 100), (2, 110)])
        .with_volatility_e8(150_000_000)
}

#[tokio::test]
async fn symbol_hash_comes_from_contract() {
    let mock = MockChainClient::new();
    let hash = therminos(&mock).symbol_hash("BTC").await.unwrap();
    assert_eq!(hash, MockChainClient::hash_of("BTC"));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn invalid_symbol_is_rejected_without_network() {
    let mock = MockChainClient::new();
    let too_long = "X".repeat(33);
    for bad in ["", "   ", too_long.as_str(), "BT\u{7}C"] {
        let err = therminos(&mock).symbol_hash(bad).await.unwrap_err();
        assert!(
            matches!(err, Error::Validation(ValidationError::InvalidSymbol { .. })),
            "{bad:?}: {err}"
        );
    }
    assert_eq!(mock.network_count(), 0);
}

#[tokio::test]
async fn heat_summary_is_index_aligned() {
    let mock = MockChainClient::new()
        .with_symbol("BTC", btc())
        .with_symbol("ETH", MockSymbol::new().with_band(4));
    let summary = therminos(&mock).heat_summary().await.unwrap();

    assert_eq!(summary.len(), 2);
    assert!(summary.is_consistent());
    let entries: Vec<_> = summary.entries().collect();
    assert_eq!(entries[0].symbol_hash, MockChainClient::hash_of("BTC"));
    assert_eq!(fmt_band(entries[0].band).unwrap(), "warm");
    assert_eq!(fmt_price_e8(entries[0].price_e8), "65000.00000000");
    assert_eq!(fmt_band(entries[1].band).unwrap(), "critical");
}

#[tokio::test]
async fn empty_contract_has_empty_summary() {
    let mock = MockChainClient::new();
    let summary = therminos(&mock).heat_summary().await.unwrap();
    assert!(summary.is_empty());
    assert!(therminos(&mock).registered_symbols().await.unwrap().is_empty());
}

#[tokio::test]
async fn thermometer_reports_history_length() {
    let mock = MockChainClient::new().with_symbol("BTC", btc());
    let facade = therminos(&mock);
    let hash = facade.symbol_hash("BTC").await.unwrap();
    let thermo = facade.thermometer(hash).await.unwrap();

    assert!(thermo.is_registered());
    assert_eq!(thermo.history_len(), 3);
    assert_eq!(thermo.current_band, 2);
    assert_eq!(thermo.last_report_block, U256::from(110u64));
}

#[tokio::test]
async fn price_history_pages_and_stops_past_the_end() {
    let mock = MockChainClient::new().with_symbol("BTC", btc());
    let facade = therminos(&mock);
    let hash = MockChainClient::hash_of("BTC");

    let first = facade.price_history(hash, 0, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].block, U256::from(105u64));

    let tail = facade.price_history(hash, 2, 2).await.unwrap();
    assert_eq!(tail.len(), 1);

    assert!(facade.price_history(hash, 3, 10).await.unwrap().is_empty());
    assert!(facade.price_history(hash, 50, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn band_history_decodes_codes() {
    let mock = MockChainClient::new().with_symbol("BTC", btc());
    let points = therminos(&mock)
        .band_history(MockChainClient::hash_of("BTC"), 0, 10)
        .await
        .unwrap();
    let bands: Vec<u8> = points.iter().map(|p| p.band).collect();
    assert_eq!(bands, [0, 2]);
}

#[tokio::test]
async fn price_at_block_uses_latest_point_at_or_before() {
    let mock = MockChainClient::new().with_symbol("BTC", btc());
    let facade = therminos(&mock);
    let hash = MockChainClient::hash_of("BTC");

    let at = facade.price_at_block(hash, 107).await.unwrap();
    assert_eq!(at.price(), Some(U256::from(6_425_050_000_000u64)));

    let before = facade.price_at_block(hash, 50).await.unwrap();
    assert!(!before.found);
    assert_eq!(before.price(), None);
}

#[tokio::test]
async fn price_change_is_signed_and_exact() {
    let mock = MockChainClient::new().with_symbol(
        "ETH",
        MockSymbol::new().with_prices(&[(200_000_000_000, 10), (150_000_000_000, 20)]),
    );
    let change = therminos(&mock)
        .price_change_bps(MockChainClient::hash_of("ETH"), 10, 20)
        .await
        .unwrap();
    assert!(change.is_complete());
    assert_eq!(fmt_signed_bps(change.change_bps), "-25.00%");
}

#[tokio::test]
async fn price_change_with_missing_endpoint_is_not_a_failure() {
    let mock = MockChainClient::new().with_symbol("BTC", btc());
    let change = therminos(&mock)
        .price_change_bps(MockChainClient::hash_of("BTC"), 5, 110)
        .await
        .unwrap();
    assert!(!change.from_found);
    assert!(change.to_found);
    assert_eq!(change.change(), None);
    assert!(change.change_bps.is_zero());
}

#[tokio::test]
async fn band_stats_count_symbols_per_band() {
    let mock = MockChainClient::new()
        .with_symbol("BTC", btc())
        .with_symbol("ETH", MockSymbol::new().with_band(2))
        .with_symbol("SOL", MockSymbol::new().with_band(4));
    let stats = therminos(&mock).band_stats().await.unwrap();
    assert_eq!(stats.warm, U256::from(2u64));
    assert_eq!(stats.critical, U256::from(1u64));
    assert_eq!(stats.total(), U256::from(3u64));
}

#[tokio::test]
async fn thresholds_round_trip() {
    let mock = MockChainClient::new().with_thresholds(50, 250, 600, 1_200);
    let thresholds = therminos(&mock).thresholds().await.unwrap();
    assert_eq!(thresholds.cold_bps, U256::from(50u64));
    assert_eq!(thresholds.hot_bps, U256::from(1_200u64));
}

#[tokio::test]
async fn gates_reflect_contract_state() {
    let mock = MockChainClient::new()
        .with_symbol("BTC", btc())
        .with_symbol("ETH", MockSymbol::new().halted())
        .with_symbol("SOL", MockSymbol::new().cooling_down());
    let facade = therminos(&mock);

    assert!(!facade.platform_paused().await.unwrap());
    assert!(facade.can_report(MockChainClient::hash_of("BTC")).await.unwrap());
    assert!(facade.is_halted(MockChainClient::hash_of("ETH")).await.unwrap());
    assert!(!facade.can_report(MockChainClient::hash_of("SOL")).await.unwrap());
}

#[tokio::test]
async fn report_pays_the_fee_and_records_the_price() {
    let mock = MockChainClient::new()
        .with_signer(updater())
        .with_fee(1_000)
        .with_symbol("BTC", btc());
    let facade = therminos(&mock);
    let hash = facade.symbol_hash("BTC").await.unwrap();
    let price = parse_price_e8("66000.125").unwrap();

    let receipt = facade.report_price(hash, price).await.unwrap();

    assert!(receipt.success);
    assert_eq!(receipt.block_number, Some(1_001));
    let sent = mock.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, U256::from(1_000u64));
    assert_eq!(sent[0].to, contract());
    assert_eq!(
        mock.symbol("BTC").unwrap().price_e8,
        U256::from(6_600_012_500_000u64)
    );
}

#[tokio::test]
async fn report_without_signer_never_reaches_the_network() {
    let mock = MockChainClient::new().with_symbol("BTC", btc());
    let err = therminos(&mock)
        .report_price(MockChainClient::hash_of("BTC"), U256::from(1u64))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField {
            field: "private_key",
            ..
        })
    ));
    assert_eq!(mock.network_count(), 0);
}

#[tokio::test]
async fn report_revert_reason_is_surfaced() {
    let mock = MockChainClient::new()
        .with_signer(updater())
        .with_symbol("BTC", btc().cooling_down());
    let err = therminos(&mock)
        .report_price(MockChainClient::hash_of("BTC"), U256::from(1u64))
        .await
        .unwrap_err();
    match err {
        Error::Call(CallError::Reverted { method, reason }) => {
            assert_eq!(method, "reportPrice");
            assert_eq!(reason, "Therminos: cooldown");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn paused_platform_rejects_reports() {
    let mock = MockChainClient::new()
        .with_signer(updater())
        .paused()
        .with_symbol("BTC", btc());
    let err = therminos(&mock)
        .report_price(MockChainClient::hash_of("BTC"), U256::from(1u64))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Therminos: paused"));
}

#[tokio::test]
async fn batch_length_mismatch_is_rejected_before_any_request() {
    let mock = MockChainClient::new().with_signer(updater());
    let hashes = [
        MockChainClient::hash_of("BTC"),
        MockChainClient::hash_of("ETH"),
    ];
    let err = therminos(&mock)
        .batch_report_prices(&hashes, &[U256::from(1u64)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::BatchLengthMismatch {
            symbols: 2,
            prices: 1
        })
    ));
    assert_eq!(mock.network_count(), 0);
}

#[tokio::test]
async fn empty_batch_is_rejected_before_any_request() {
    let mock = MockChainClient::new().with_signer(updater());
    let err = therminos(&mock)
        .batch_report_prices(&[], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::EmptyBatch)));
    assert_eq!(mock.network_count(), 0);
}

#[tokio::test]
async fn batch_pays_fee_per_symbol() {
    let mock = MockChainClient::new()
        .with_signer(updater())
        .with_fee(250)
        .with_symbol("BTC", btc())
        .with_symbol("ETH", MockSymbol::new());
    let facade = therminos(&mock);
    let hashes = facade.symbol_hashes(&["BTC", "ETH"]).await.unwrap();
    let prices = [
        parse_price_e8("65100").unwrap(),
        parse_price_e8("3120.5").unwrap(),
    ];

    facade.batch_report_prices(&hashes, &prices).await.unwrap();

    let sent = mock.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, U256::from(500u64));
    assert_eq!(
        mock.symbol("ETH").unwrap().price_e8,
        U256::from(312_050_000_000u64)
    );
}

#[tokio::test]
async fn abi_drift_is_reported_as_mismatch() {
    let mock = MockChainClient::new()
        .with_raw_response::<ITherminos::getThresholdsCall>(Bytes::from_static(&[0u8; 7]));
    let err = therminos(&mock).thresholds().await.unwrap_err();
    match err {
        Error::Call(CallError::AbiMismatch { method, .. }) => assert_eq!(method, "getThresholds"),
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn out_of_range_band_surfaces_when_formatted() {
    let mock = MockChainClient::new().with_symbol("BTC", MockSymbol::new().with_band(9));
    let band = therminos(&mock)
        .current_band(MockChainClient::hash_of("BTC"))
        .await
        .unwrap();
    assert_eq!(band, 9);
    assert!(matches!(
        fmt_band(band),
        Err(ValidationError::BandOutOfRange(9))
    ));
}

#[test]
fn write_calls_are_payable_signatures() {
    assert_eq!(
        ITherminos::reportPriceCall::SIGNATURE,
        "reportPrice(bytes32,uint256)"
    );
    assert_eq!(
        ITherminos::batchReportPricesCall::SIGNATURE,
        "batchReportPrices(bytes32[],uint256[])"
    );
}
