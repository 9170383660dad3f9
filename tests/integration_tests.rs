use anyhow::Result;
use httpmock::prelude::*;
use poi_harvest::core::Waiter;
use poi_harvest::{HarvestConfig, HarvestEngine, LocalStorage, OverpassClient};
use std::time::Duration;
use tempfile::TempDir;

struct NoWait;

#[async_trait::async_trait]
impl Waiter for NoWait {
    async fn wait(&self, _delay: Duration) {}
}

#[derive(Debug, serde::Deserialize, PartialEq)]
struct Row {
    id: String,
    lat: f64,
    lon: f64,
}

fn read_rows(dir: &std::path::Path, name: &str) -> Result<Vec<Row>> {
    let data = std::fs::read(dir.join(name))?;
    Ok(serde_json::from_slice(&data)?)
}

fn config(endpoint: String, output_path: &str, regions: &[&str]) -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.source.endpoint = endpoint;
    config.source.timeout_seconds = 10;
    config.output.output_path = output_path.to_string();
    config.run.regions = regions.iter().map(|r| r.to_string()).collect();
    config
}

#[tokio::test]
async fn test_end_to_end_harvest_with_real_http() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let narnia_mock = server.mock(|when, then| {
        when.method(POST).path("/api/interpreter").body_contains("Narnia");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "version": 0.6,
                "elements": [
                    {"type": "node", "id": 101, "lat": 10.0, "lon": 20.0,
                     "tags": {"amenity": "fast_food", "brand": "Burger King"}},
                    {"type": "way", "id": 102, "center": {"lat": 30.0, "lon": 40.0}}
                ]
            }));
    });
    let gondor_mock = server.mock(|when, then| {
        when.method(POST).path("/api/interpreter").body_contains("Gondor");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "elements": [
                    {"type": "relation", "id": 7},
                    {"type": "relation", "id": 8, "center": {"lat": 50.5, "lon": -0.25}}
                ]
            }));
    });

    let engine = HarvestEngine::new(
        OverpassClient::new(server.url("/api/interpreter")),
        LocalStorage::new(output_path.clone()),
        NoWait,
        config(server.url("/api/interpreter"), &output_path, &["Narnia", "Gondor"]),
    );

    let summary = engine.run().await?;

    narnia_mock.assert();
    gondor_mock.assert();
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.regions_failed, 0);

    let narnia = read_rows(temp_dir.path(), "burgerking_Narnia.json")?;
    assert_eq!(
        narnia,
        vec![
            Row { id: "bk_0".to_string(), lat: 10.0, lon: 20.0 },
            Row { id: "bk_1".to_string(), lat: 30.0, lon: 40.0 },
        ]
    );
    let gondor = read_rows(temp_dir.path(), "burgerking_Gondor.json")?;
    assert_eq!(gondor, vec![Row { id: "bk_2".to_string(), lat: 50.5, lon: -0.25 }]);

    let worldwide = read_rows(temp_dir.path(), "burgerking_worldwide.json")?;
    assert_eq!(worldwide.len(), 3);
    assert_eq!(worldwide[2].id, "bk_2");

    // 縮排輸出
    let text = std::fs::read_to_string(temp_dir.path().join("burgerking_worldwide.json"))?;
    assert!(text.contains("\n  {\n    \"id\": \"bk_0\","));

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_with_region_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let failing_mock = server.mock(|when, then| {
        when.method(POST).path("/api/interpreter").body_contains("Atlantis");
        then.status(500);
    });
    let ok_mock = server.mock(|when, then| {
        when.method(POST).path("/api/interpreter").body_contains("Gondor");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "elements": [{"type": "node", "id": 1, "lat": 1.0, "lon": 2.0}]
            }));
    });

    let engine = HarvestEngine::new(
        OverpassClient::new(server.url("/api/interpreter")),
        LocalStorage::new(output_path.clone()),
        NoWait,
        config(server.url("/api/interpreter"), &output_path, &["Atlantis", "Gondor"]),
    );

    let summary = engine.run().await?;

    failing_mock.assert();
    ok_mock.assert();
    assert_eq!(summary.regions_processed, 2);
    assert_eq!(summary.regions_failed, 1);
    assert_eq!(summary.total_records, 1);
    assert!(!temp_dir.path().join("burgerking_Atlantis.json").exists());

    let worldwide = read_rows(temp_dir.path(), "burgerking_worldwide.json")?;
    assert_eq!(worldwide, vec![Row { id: "bk_0".to_string(), lat: 1.0, lon: 2.0 }]);

    Ok(())
}

#[tokio::test]
async fn test_all_regions_failing_still_writes_worldwide() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/interpreter");
        then.status(200).body("not json");
    });

    let engine = HarvestEngine::new(
        OverpassClient::new(server.url("/api/interpreter")),
        LocalStorage::new(output_path.clone()),
        NoWait,
        config(server.url("/api/interpreter"), &output_path, &["Narnia", "Gondor"]),
    );

    let summary = engine.run().await?;

    assert_eq!(summary.regions_failed, 2);
    assert_eq!(summary.total_records, 0);
    let text = std::fs::read_to_string(temp_dir.path().join("burgerking_worldwide.json"))?;
    assert_eq!(text, "[]");

    Ok(())
}

#[tokio::test]
async fn test_custom_prefixes_from_toml() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/interpreter")
            .body_contains("McDonald");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "elements": [{"type": "node", "lat": 59.9, "lon": 10.7}]
            }));
    });

    let toml_content = format!(
        r#"
[source]
endpoint = "{}"
timeout_seconds = 10

[filter]
brand = "McDonald's"

[run]
regions = ["Norway"]
delay_seconds = 0

[output]
output_path = "{}"
file_prefix = "mcdonalds"
id_prefix = "mcd"
"#,
        server.url("/api/interpreter"),
        output_path
    );
    let config = HarvestConfig::from_toml_str(&toml_content)?;

    let engine = HarvestEngine::new(
        OverpassClient::new(config.source.endpoint.clone()),
        LocalStorage::new(config.output_path()),
        NoWait,
        config,
    );
    let summary = engine.run().await?;

    api_mock.assert();
    assert_eq!(summary.total_records, 1);
    let rows = read_rows(temp_dir.path(), "mcdonalds_Norway.json")?;
    assert_eq!(rows, vec![Row { id: "mcd_0".to_string(), lat: 59.9, lon: 10.7 }]);
    assert!(temp_dir.path().join("mcdonalds_worldwide.json").exists());

    Ok(())
}
