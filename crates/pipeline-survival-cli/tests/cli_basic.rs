//! Basic CLI E2E tests.
//!
//! Tests run the built binary against fixture files, each with its own
//! config directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tempfile::TempDir;

const RECORDS_CSV: &str = "duration,event\n10,won\n10,lost\n20,open\n";

const DEALS_CSV: &str = "\
ProductId,SQLDate,WonDate
1,1/6/2020,1/20/2020
1,1/6/2020,2/3/2020
1,1/6/2020,
2,1/6/2020,1/13/2020
2,1/6/2020,1/13/2020
";

const DEAL_VALUES_JSON: &str = r#"{
  "prod1": [60, 40, 55, 45, 50],
  "prod2": [10, 10, 12, 11, 500]
}"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_pipeline-survival"))
            .args(args)
            .env("PIPELINE_SURVIVAL_HOME", self.home())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
        stdout
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[derive(Deserialize)]
struct Point {
    time: f64,
    survival: f64,
}

#[derive(Deserialize)]
struct CurveJson {
    median: Option<f64>,
    points: Vec<Point>,
    record_count: usize,
}

#[test]
fn test_estimate_text() {
    let sb = Sandbox::new();
    let file = sb.write("records.csv", RECORDS_CSV);
    let stdout = sb.run_success(&["estimate", path_arg(&file)]);
    assert!(stdout.contains("3 deals, 2 closed"));
    assert!(stdout.contains("Median time to close: 10 units"));
}

#[test]
fn test_estimate_json() {
    let sb = Sandbox::new();
    let file = sb.write("records.csv", RECORDS_CSV);
    let stdout = sb.run_success(&["estimate", path_arg(&file), "--json"]);
    let curve: CurveJson = serde_json::from_str(&stdout).expect("Failed to parse JSON output");

    assert_eq!(curve.record_count, 3);
    assert_eq!(curve.median, Some(10.0));
    assert_eq!(curve.points[0].time, 0.0);
    assert_eq!(curve.points[0].survival, 1.0);
    let at_ten = curve.points.iter().find(|p| p.time == 10.0).unwrap();
    assert!((at_ten.survival - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_estimate_empty_file_fails() {
    let sb = Sandbox::new();
    let file = sb.write("empty.csv", "duration,event\n");
    let (_, stderr, code) = sb.run(&["estimate", path_arg(&file)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_estimate_negative_duration_fails() {
    let sb = Sandbox::new();
    let file = sb.write("bad.csv", "duration,event\n3,1\n-2,1\n");
    let (_, stderr, code) = sb.run(&["estimate", path_arg(&file)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("index 1"), "unexpected stderr: {stderr}");
}

#[test]
fn test_estimate_missing_file_fails() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run(&["estimate", "/nonexistent/records.csv"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_products_json() {
    #[derive(Deserialize)]
    struct Product {
        product_id: String,
        deal_count: usize,
        won_count: usize,
    }

    let sb = Sandbox::new();
    let file = sb.write("deals.csv", DEALS_CSV);
    let stdout = sb.run_success(&[
        "products",
        path_arg(&file),
        "--cutoff",
        "2020-03-02",
        "--unit",
        "week",
        "--json",
    ]);
    let products: Vec<Product> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_id, "1");
    assert_eq!(products[0].deal_count, 3);
    assert_eq!(products[0].won_count, 2);
    assert_eq!(products[1].product_id, "2");
}

#[test]
fn test_products_text() {
    let sb = Sandbox::new();
    let file = sb.write("deals.csv", DEALS_CSV);
    let stdout = sb.run_success(&["products", path_arg(&file), "--cutoff", "3/2/2020"]);
    assert!(stdout.contains("Cutoff: 2020-03-02"));
    assert!(stdout.contains("Product 1"));
    assert!(stdout.contains("Product 2"));
}

#[test]
fn test_products_skip_deals_opened_after_cutoff() {
    #[derive(Deserialize)]
    struct Product {
        product_id: String,
    }

    let sb = Sandbox::new();
    let csv = format!("{DEALS_CSV}3,6/1/2020,6/8/2020\n");
    let file = sb.write("deals.csv", &csv);
    let stdout = sb.run_success(&[
        "products",
        path_arg(&file),
        "--cutoff",
        "2020-03-01",
        "--json",
    ]);
    let products: Vec<Product> = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn test_products_bad_cutoff_fails() {
    let sb = Sandbox::new();
    let file = sb.write("deals.csv", DEALS_CSV);
    let (_, _, code) = sb.run(&["products", path_arg(&file), "--cutoff", "yesterday"]);
    assert_ne!(code, 0);
}

#[test]
fn test_conditional_json() {
    #[derive(Deserialize)]
    struct Row {
        elapsed: f64,
        look_ahead: f64,
        survival: Option<f64>,
    }
    #[derive(Deserialize)]
    struct Table {
        product_id: String,
        look_ahead: u32,
        rows: Vec<Row>,
    }

    let sb = Sandbox::new();
    let file = sb.write("deals.csv", DEALS_CSV);
    let stdout = sb.run_success(&[
        "conditional",
        path_arg(&file),
        "--look-ahead",
        "2",
        "--cutoff",
        "2020-03-02",
        "--json",
    ]);
    let tables: Vec<Table> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tables.len(), 2);

    let prod1 = &tables[0];
    assert_eq!(prod1.product_id, "1");
    assert_eq!(prod1.look_ahead, 2);
    // S(0) = 1, S(2) = 2/3
    let first = &prod1.rows[0];
    assert_eq!(first.elapsed, 0.0);
    assert_eq!(first.look_ahead, 2.0);
    assert!((first.survival.unwrap() - 2.0 / 3.0).abs() < 1e-9);

    // Every deal of product 2 closed at week 1.
    let prod2_last = tables[1].rows.last().unwrap();
    assert_eq!(prod2_last.survival, None);
}

#[test]
fn test_deals_describe_values() {
    let sb = Sandbox::new();
    let stdout = sb.run_success(&["deals", "describe", "--values", "60,40,55,45,50"]);
    assert!(stdout.contains("Mean (ACV)"));
    assert!(stdout.contains("50.0"));
    assert!(stdout.contains("Histogram"));
}

#[test]
fn test_deals_describe_file_json() {
    #[derive(Deserialize)]
    struct Summary {
        count: usize,
        median: f64,
    }
    #[derive(Deserialize)]
    struct Bin {
        count: usize,
    }
    #[derive(Deserialize)]
    struct Describe {
        summary: Summary,
        histogram: Vec<Bin>,
    }

    let sb = Sandbox::new();
    let file = sb.write("values.json", DEAL_VALUES_JSON);
    let stdout = sb.run_success(&[
        "deals",
        "describe",
        "--file",
        path_arg(&file),
        "--product",
        "prod2",
        "--bins",
        "5",
        "--json",
    ]);
    let out: Describe = serde_json::from_str(&stdout).unwrap();
    assert_eq!(out.summary.count, 5);
    assert_eq!(out.summary.median, 11.0);
    assert_eq!(out.histogram.len(), 5);
    assert_eq!(out.histogram.iter().map(|b| b.count).sum::<usize>(), 5);
}

#[test]
fn test_deals_describe_unknown_product_fails() {
    let sb = Sandbox::new();
    let file = sb.write("values.json", DEAL_VALUES_JSON);
    let (_, stderr, code) = sb.run(&[
        "deals",
        "describe",
        "--file",
        path_arg(&file),
        "--product",
        "prod9",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("prod9"));
}

#[test]
fn test_deals_forecast_seeded_is_reproducible() {
    let sb = Sandbox::new();
    let args = [
        "deals",
        "forecast",
        "--values",
        "10,20,30,150,40",
        "--deals",
        "5",
        "--futures",
        "2000",
        "--seed",
        "7",
        "--json",
    ];
    let first = sb.run_success(&args);
    let second = sb.run_success(&args);
    assert_eq!(first, second);

    let forecast: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(forecast["deals_to_close"], 5);
    assert_eq!(forecast["futures"], 2000);
    let p5 = forecast["p5"].as_f64().unwrap();
    let p95 = forecast["p95"].as_f64().unwrap();
    assert!(p5 <= p95);
    assert!(p5 >= 50.0 && p95 <= 750.0);
}

#[test]
fn test_deals_forecast_file_requires_product() {
    let sb = Sandbox::new();
    let file = sb.write("values.json", DEAL_VALUES_JSON);
    let (_, _, code) = sb.run(&["deals", "forecast", "--file", path_arg(&file)]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_get_roundtrip() {
    let sb = Sandbox::new();
    assert_eq!(sb.run_success(&["config", "get", "analysis.unit"]).trim(), "week");

    sb.run_success(&["config", "set", "analysis.look_ahead", "12"]);
    assert_eq!(sb.run_success(&["config", "get", "analysis.look_ahead"]).trim(), "12");
    assert!(sb.home().join("config.toml").exists());

    sb.run_success(&["config", "reset"]);
    assert_eq!(sb.run_success(&["config", "get", "analysis.look_ahead"]).trim(), "8");
}

#[test]
fn test_config_rejects_bad_values() {
    let sb = Sandbox::new();
    let (_, stderr, code) = sb.run(&["config", "set", "analysis.confidence_level", "1.5"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("confidence_level"));

    let (_, stderr, code) = sb.run(&["config", "get", "analysis.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_json_output_default() {
    let sb = Sandbox::new();
    let file = sb.write("records.csv", RECORDS_CSV);
    sb.run_success(&["config", "set", "output.json", "true"]);
    let stdout = sb.run_success(&["estimate", path_arg(&file)]);
    let curve: CurveJson = serde_json::from_str(&stdout).unwrap();
    assert_eq!(curve.record_count, 3);
}

#[test]
fn test_dev_env_selects_dev_config_dir() {
    let sb = Sandbox::new();
    let home = sb.dir.path().join("user");
    std::fs::create_dir_all(&home).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pipeline-survival"))
        .args(["config", "list"])
        .env_remove("PIPELINE_SURVIVAL_HOME")
        .env("PIPELINE_SURVIVAL_ENV", "dev")
        .env("HOME", &home)
        .output()
        .expect("Failed to execute CLI command");
    assert!(output.status.success());

    let config_dir = home.join(".config");
    assert!(config_dir.join("pipeline-survival-dev").join("config.toml").exists());
    assert!(!config_dir.join("pipeline-survival").exists());
}

#[test]
fn test_config_list() {
    let sb = Sandbox::new();
    let stdout = sb.run_success(&["config", "list"]);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["analysis"]["confidence_level"], 0.95);
    assert_eq!(config["forecast"]["futures"], 100000);
    assert_eq!(config["output"]["histogram_bins"], 50);
}
