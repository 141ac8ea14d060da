//! CSV rendering.
//!
//! One row per fact with columns `Type, Metric, Value, Details`: page info,
//! derived stats, then one row per returned link and image.

use csv::Writer;

use crate::error_handling::ExportError;
use crate::pipeline::AnalysisRecord;

const HEADER: [&str; 4] = ["Type", "Metric", "Value", "Details"];

/// Renders `record` as CSV bytes.
pub fn render_csv(record: &AnalysisRecord) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    writer.write_record(["Info", "URL", record.url.as_str(), ""])?;
    writer.write_record(["Info", "Title", record.title.as_str(), ""])?;
    writer.write_record(["Info", "Status Code", &record.status_code.to_string(), ""])?;

    let stats = &record.stats;
    writer.write_record([
        "Stats",
        "Processing Time",
        &format!("{:.3}", stats.processing_time),
        "seconds",
    ])?;
    writer.write_record([
        "Stats",
        "Content Length",
        &stats.content_length.to_string(),
        "characters",
    ])?;
    writer.write_record(["Stats", "Links Count", &stats.links_count.to_string(), ""])?;
    writer.write_record(["Stats", "Images Count", &stats.images_count.to_string(), ""])?;

    if let Some(links) = &record.extraction.links {
        for (i, link) in links.all.iter().enumerate() {
            writer.write_record([
                "Link",
                &format!("Link {}", i + 1),
                link.text.as_str(),
                link.href.as_str(),
            ])?;
        }
    }

    if let Some(images) = &record.extraction.images {
        for (i, image) in images.images.iter().enumerate() {
            writer.write_record([
                "Image",
                &format!("Image {}", i + 1),
                image.alt.as_str(),
                image.src.as_str(),
            ])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
