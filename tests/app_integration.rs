use std::fs;
use stockview::chart::ChartStyle;
use stockview::cli::view::ViewOptions;
use stockview::core::LookbackPeriod;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const CHART_RESPONSE: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "currency": "INR", "gmtoffset": 19800 },
                "timestamp": [1704080700, 1704167100],
                "indicators": {
                    "quote": [{
                        "open":   [3700.0, 3790.0],
                        "high":   [3810.0, 3820.0],
                        "low":    [3690.0, 3750.0],
                        "close":  [3795.5, 3760.25],
                        "volume": [1500000, 1200000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    pub const QUOTE_SUMMARY_RESPONSE: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": { "longName": "Tata Consultancy Services Limited" },
                "summaryDetail": {
                    "trailingPE": { "raw": 31.2, "fmt": "31.20" },
                    "dividendYield": { "raw": 0.013, "fmt": "1.30%" },
                    "beta": { "raw": 0.55, "fmt": "0.55" }
                },
                "defaultKeyStatistics": {
                    "heldPercentInstitutions": { "raw": 0.24, "fmt": "24%" }
                },
                "assetProfile": { "sector": "Technology", "industry": "IT Services" }
            }],
            "error": null
        }
    }"#;

    pub async fn create_mock_server(symbol: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{symbol}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHART_RESPONSE))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cookie"))
            .respond_with(ResponseTemplate::new(404).insert_header("set-cookie", "A3=session; Path=/"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/test/getcrumb"))
            .respond_with(ResponseTemplate::new(200).set_body_string("crumb-42"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/v10/finance/quoteSummary/{symbol}")))
            .and(query_param("crumb", "crumb-42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(QUOTE_SUMMARY_RESPONSE))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
            providers:
              yahoo:
                base_url: {base_url}
                cookie_url: {base_url}/cookie
            period: "1y"
            history_rows: 5
            indices:
              - name: "NIFTY IT"
                symbols: ["TCS.NS", "INFY.NS"]
        "#
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

fn view(symbol: &str, html: Option<std::path::PathBuf>) -> stockview::AppCommand {
    stockview::AppCommand::View(ViewOptions {
        symbol: symbol.to_string(),
        index: Some("NIFTY IT".to_string()),
        style: ChartStyle::Candlestick,
        period: None,
        html,
    })
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("TCS.NS").await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());
    let report_path = temp_dir.path().join("tcs.html");

    let result = stockview::run_command(
        view("TCS.NS", Some(report_path.clone())),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );

    let html = fs::read_to_string(&report_path).expect("Report should be written");
    assert!(html.contains("<p>Displaying data for TCS.NS</p>"));
    assert!(html.contains("<td>Tata Consultancy Services Limited</td>"));
    assert!(html.contains("<td>3795.50</td>"));
    assert!(html.contains("<td>Stable Dividend Yield</td>"));
    assert!(html.contains("<td>High PE Ratio</td>"));
    assert!(html.contains("<svg"));

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec![
            "/v8/finance/chart/TCS.NS",
            "/cookie",
            "/v1/test/getcrumb",
            "/v10/finance/quoteSummary/TCS.NS"
        ]
    );
    assert!(
        requests[0].url.query().unwrap().contains("range=1y"),
        "Configured period should be used"
    );
}

#[test_log::test(tokio::test)]
async fn test_stock_outside_index_is_rejected() {
    let mock_server = test_utils::create_mock_server("TCS.NS").await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let err = stockview::run_command(view("RELIANCE.NS", None), Some(config_path.to_str().unwrap()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "RELIANCE.NS is not a member of NIFTY IT");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_unavailable_symbol_fails() {
    let mock_server = wiremock::MockServer::start().await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let err = stockview::run_command(view("INFY.NS", None), Some(config_path.to_str().unwrap()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch price history for INFY.NS");
}

#[test_log::test(tokio::test)]
async fn test_listing_commands() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), "http://localhost");
    let config_path = config_path.to_str().unwrap();

    stockview::run_command(stockview::AppCommand::Indices, Some(config_path))
        .await
        .unwrap();
    stockview::run_command(
        stockview::AppCommand::Stocks {
            index: "NIFTY IT".to_string(),
        },
        Some(config_path),
    )
    .await
    .unwrap();

    let err = stockview::run_command(
        stockview::AppCommand::Stocks {
            index: "NIFTY BANK".to_string(),
        },
        Some(config_path),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Unknown index: NIFTY BANK");
}

#[test_log::test(tokio::test)]
#[ignore = "requires network access to Yahoo Finance"]
async fn test_real_yahoo_finance_api() {
    use stockview::core::MarketDataProvider;
    use stockview::core::fundamentals::normalize;
    use stockview::core::{FieldValue, FundamentalField};
    use stockview::providers::YahooFinanceProvider;

    let provider = YahooFinanceProvider::new("https://query1.finance.yahoo.com")
        .expect("Failed to build provider");

    let symbol = "RELIANCE.NS";
    info!(?symbol, "Fetching price history from Yahoo Finance");

    match provider
        .fetch_price_history(symbol, LookbackPeriod::OneMonth)
        .await
    {
        Ok(history) => {
            info!(rows = history.len(), "Received price history");
            assert!(!history.is_empty(), "Price history should not be empty");
            assert!(history.bars().iter().all(|b| b.close > 0.0));
        }
        Err(e) => {
            error!("API request failed: {e}\n{e:?}");
            panic!("API request failed: {e}");
        }
    }

    info!(?symbol, "Fetching fundamentals from Yahoo Finance");
    match provider.fetch_fundamentals(symbol).await {
        Ok(raw) => {
            let record = normalize(&raw);
            info!(?record, "Received fundamentals");
            assert!(matches!(
                record.get(FundamentalField::CompanyName),
                FieldValue::Text(_)
            ));
            assert!(matches!(
                record.get(FundamentalField::MarketCap),
                FieldValue::Number(_)
            ));
        }
        Err(e) => {
            error!("Fundamentals request failed: {e}\n{e:?}");
            panic!("Fundamentals request failed: {e}");
        }
    }
}
