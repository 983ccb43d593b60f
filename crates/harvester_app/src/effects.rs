use std::path::PathBuf;

use chrono::Utc;
use harvest_logging::{harvest_info, harvest_warn};
use harvester_core::{ExtractorEffect, ExtractorMsg};
use harvester_engine::{
    csv_filename, csv_from_json, extract_links, links_to_json, write_csv, ExtractError,
};

/// Today's UTC date as `YYYY-MM-DD`.
pub(crate) fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Executes extractor-session effects against the engine and reports back as messages.
pub struct EffectRunner {
    out_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn run(&self, effects: Vec<ExtractorEffect>) -> Vec<ExtractorMsg> {
        effects
            .into_iter()
            .map(|effect| match effect {
                ExtractorEffect::ExtractLinks { html } => self.extract(&html),
                ExtractorEffect::ExportCsv { json } => self.export(&json),
            })
            .collect()
    }

    fn extract(&self, html: &str) -> ExtractorMsg {
        let links = match extract_links(html) {
            Ok(links) => links,
            Err(err @ ExtractError::NoLinksFound) => {
                harvest_info!("Extraction rejected: {}", err);
                return ExtractorMsg::ExtractionFailed {
                    message: err.to_string(),
                };
            }
            Err(err) => {
                harvest_warn!("Extraction failed: {}", err);
                return ExtractorMsg::ExtractionFailed {
                    message: format!("Error parsing HTML: {err}"),
                };
            }
        };

        match links_to_json(&links) {
            Ok(json) => {
                harvest_info!("Extracted {} PDF links", links.len());
                ExtractorMsg::LinksExtracted {
                    json,
                    count: links.len(),
                }
            }
            Err(err) => ExtractorMsg::ExtractionFailed {
                message: format!("Error parsing HTML: {err}"),
            },
        }
    }

    fn export(&self, json: &str) -> ExtractorMsg {
        let written = csv_from_json(json).and_then(|document| {
            write_csv(&self.out_dir, &csv_filename(&today_utc()), &document)
        });
        match written {
            Ok(path) => ExtractorMsg::CsvExported {
                path: path.display().to_string(),
            },
            Err(err) => {
                harvest_warn!("CSV export failed: {}", err);
                ExtractorMsg::CsvExportFailed {
                    message: err.to_string(),
                }
            }
        }
    }
}
