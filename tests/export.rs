//! Tests for JSON and CSV export.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use web_analyzer::error_handling::ExportError;
use web_analyzer::parse::{
    Content, ExtractionResult, Image, ImageInventory, Link, LinkInventory, Metadata,
};
use web_analyzer::pipeline::RecordStats;
use web_analyzer::{AnalysisRecord, AnalysisSettings, ExportFormat, Exporter, FileExporter};

fn record() -> AnalysisRecord {
    let link = Link {
        text: "About, us".to_string(),
        href: "/about".to_string(),
        url: Some("https://shop.example/about".to_string()),
        internal: true,
        ..Default::default()
    };
    let image = Image {
        src: "/logo.png".to_string(),
        alt: "Logo".to_string(),
        ..Default::default()
    };

    AnalysisRecord {
        url: "https://shop.example/widgets".to_string(),
        final_url: "https://shop.example/widgets".to_string(),
        status_code: 200,
        title: "Widgets".to_string(),
        timestamp: Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid date"),
        headers: None,
        settings: AnalysisSettings::default(),
        extraction: ExtractionResult {
            metadata: Some(Metadata {
                title: "Widgets".to_string(),
                ..Default::default()
            }),
            links: Some(LinkInventory {
                all: vec![link.clone()],
                internal: vec![link],
                external: Vec::new(),
                total: 1,
                total_internal: 1,
                total_external: 0,
            }),
            images: Some(ImageInventory {
                images: vec![image],
                total: 1,
                with_alt: 1,
                without_alt: 0,
            }),
            content: Some(Content {
                text: "Widgets".to_string(),
                length: 7,
                truncated: false,
                word_count: 1,
            }),
            ..Default::default()
        },
        seo_analysis: None,
        ai_analysis: None,
        stats: RecordStats {
            processing_time: 0.25,
            content_length: 7,
            links_count: 1,
            images_count: 1,
        },
    }
}

#[tokio::test]
async fn test_json_export_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let exporter = FileExporter::new(dir.path());
    let record = record();

    let path = exporter
        .export(&record, ExportFormat::Json)
        .await
        .expect("export");
    assert!(path.starts_with(dir.path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));

    let text = std::fs::read_to_string(&path).expect("read export");
    assert!(text.contains("\n  \"url\""), "pretty-printed");
    let decoded: AnalysisRecord = serde_json::from_str(&text).expect("decode");
    assert_eq!(decoded, record);
}

#[tokio::test]
async fn test_csv_export_rows() {
    let dir = TempDir::new().expect("temp dir");
    let exporter = FileExporter::new(dir.path().join("nested"));

    let path = exporter
        .export(&record(), ExportFormat::Csv)
        .await
        .expect("export");
    let mut reader = csv::Reader::from_path(&path).expect("open csv");

    let headers = reader.headers().expect("headers").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Type", "Metric", "Value", "Details"]
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.expect("row").iter().map(str::to_string).collect())
        .collect();
    let row = |t: &str, m: &str| {
        rows.iter()
            .find(|r| r[0] == t && r[1] == m)
            .unwrap_or_else(|| panic!("missing row {t}/{m}"))
            .clone()
    };

    assert_eq!(row("Info", "URL")[2], "https://shop.example/widgets");
    assert_eq!(row("Info", "Status Code")[2], "200");
    assert_eq!(row("Stats", "Content Length")[3], "characters");
    assert_eq!(row("Stats", "Links Count")[2], "1");
    assert_eq!(row("Link", "Link 1")[2..], ["About, us", "/about"]);
    assert_eq!(row("Image", "Image 1")[2..], ["Logo", "/logo.png"]);
    assert_eq!(rows.len(), 9);
}

#[tokio::test]
async fn test_unsupported_formats() {
    let dir = TempDir::new().expect("temp dir");
    let exporter = FileExporter::new(dir.path());

    for format in [ExportFormat::Pdf, ExportFormat::Excel] {
        let err = exporter
            .export(&record(), format)
            .await
            .expect_err("not rendered");
        assert!(matches!(err, ExportError::UnsupportedFormat(f) if f == format));
    }
    assert_eq!(
        std::fs::read_dir(dir.path()).expect("list").count(),
        0,
        "nothing written"
    );
}
