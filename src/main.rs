use anyhow::Result;
use log::{error, info};

use dataset_fetch::{logging, DatasetRequest, Diagnostics, Pipeline};

const ACCESS_URL: &str = "https://borealisdata.ca/api/access/dataset/:persistentId";
const PERSISTENT_ID: &str = "doi:10.5683/SP3/GOZAJE";
const ARCHIVE_PATH: &str = "foo.zip";
const EXTRACT_DIR: &str = "foo";

fn main() -> Result<()> {
    let diagnostics = Diagnostics { wire_trace: true };
    logging::init_terminal(diagnostics)?;

    info!("dataset-fetch starting");
    info!("Access URL: {}", ACCESS_URL);

    let pipeline = Pipeline::new(
        DatasetRequest::new(ACCESS_URL, PERSISTENT_ID),
        ARCHIVE_PATH,
        EXTRACT_DIR,
    )
    .with_diagnostics(diagnostics);

    match pipeline.run() {
        Ok(report) => {
            info!(
                "Fetched {} bytes (sha256 {}) into {:?}",
                report.fetch.bytes_written, report.fetch.sha256, report.extract_dir
            );
            Ok(())
        }
        Err(e) => {
            error!("Dataset download failed: {:#}", e);
            eprintln!("download failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
