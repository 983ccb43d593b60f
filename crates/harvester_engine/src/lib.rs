//! Harvester engine: page fetching, the harvest driver, PDF link extraction
//! and the files they produce.
mod decode;
mod export;
mod fetch;
mod harvest;
mod links;
mod persist;
mod types;

pub use decode::{decode_records, records_from_response, RECORD_KEYS};
pub use export::{
    csv_filename, csv_from_json, links_from_json, links_to_json, to_csv, write_csv, CsvDocument,
    ExportError, CSV_HEADER, CSV_MIME_TYPE,
};
pub use fetch::{
    default_headers, page_form, FetchSettings, PageFetcher, ReqwestPageFetcher, DEFAULT_ENDPOINT,
    DEFAULT_PAGE_LENGTH,
};
pub use harvest::{run_harvest_blocking, HarvestError, HarvestSummary, Harvester};
pub use links::{
    extract_links, ExtractError, LinkExtractor, LinkMatch, LinkRule, LinkSet, PDF_LINK_RULES,
};
pub use persist::{
    ensure_output_dir, AtomicFileWriter, JsonFileSink, PersistError, RecordSink,
    DEFAULT_RECORDS_FILENAME,
};
pub use types::{FailureKind, FetchError, Record};
