use anyhow::{Result, anyhow};
use matokeo_browser::{BrowserSession, ChromeFinder, LaunchOptions, SchoolScraper};
use matokeo_core::results::{PerformanceData, QuoteStyle, ResultsWriter, RowFlattener};
use std::path::PathBuf;

/// Settings for one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub index_url: String,
    pub base_url: String,
    pub output: PathBuf,
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// Skip schools that fail instead of aborting the run
    pub keep_going: bool,
    pub quote: QuoteStyle,
}

/// What happened to a single school link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchoolOutcome {
    Written { school: String },
    Skipped(SkippedSchool),
}

/// A school left out of the results file under `--keep-going`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSchool {
    pub url: String,
    pub reason: String,
}

/// Totals for a finished run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: Vec<SkippedSchool>,
}

impl RunSummary {
    fn record(&mut self, outcome: SchoolOutcome) {
        match outcome {
            SchoolOutcome::Written { .. } => self.written += 1,
            SchoolOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }
}

/// Scrape, flatten and append one school
///
/// Scrape and flatten failures come back as `Skipped` when `keep_going` is
/// set; write failures are always returned as errors.
async fn process_school<F, Fut>(
    url: &str,
    writer: &mut ResultsWriter,
    keep_going: bool,
    scrape: &mut F,
) -> Result<SchoolOutcome>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<PerformanceData>>,
{
    let flattened = scrape(url.to_string())
        .await
        .and_then(|data| RowFlattener::flatten(&data).map_err(anyhow::Error::from));

    let row = match flattened {
        Ok(row) => row,
        Err(e) if keep_going => {
            tracing::warn!("Skipping {}: {}", url, e);
            return Ok(SchoolOutcome::Skipped(SkippedSchool {
                url: url.to_string(),
                reason: e.to_string(),
            }));
        }
        Err(e) => return Err(e.context(format!("Failed to process {}", url))),
    };

    tracing::info!("Writing school {}", row.school_name());
    tracing::debug!("Row: {:?}", row.fields());
    writer.append(&row)?;

    Ok(SchoolOutcome::Written {
        school: row.school_name().to_string(),
    })
}

/// Run every link through `scrape` in order, appending rows to `writer`
pub async fn process_links<F, Fut>(
    links: &[String],
    writer: &mut ResultsWriter,
    keep_going: bool,
    mut scrape: F,
) -> Result<RunSummary>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<PerformanceData>>,
{
    let mut summary = RunSummary::default();

    for (index, url) in links.iter().enumerate() {
        tracing::debug!("School {}/{}", index + 1, links.len());
        let outcome = process_school(url, writer, keep_going, &mut scrape).await?;
        summary.record(outcome);
    }

    Ok(summary)
}

/// Full pipeline: index, links, browser, rows
pub async fn run(options: &ScrapeOptions) -> Result<RunSummary> {
    // Resolve the binary before touching the network
    let chrome_path = ChromeFinder::new(options.chrome_path.clone()).find()?;

    let links = super::links::collect(&options.index_url, &options.base_url).await?;

    let launch = LaunchOptions::new(chrome_path).headless(options.headless);
    let session = BrowserSession::launch(&launch).await?;

    let outcome: Result<RunSummary> = async {
        let mut writer = ResultsWriter::create(&options.output, options.quote)?;
        let scraper = SchoolScraper::new(&session);
        let scraper = &scraper;

        process_links(&links, &mut writer, options.keep_going, |url| async move {
            Ok::<_, anyhow::Error>(scraper.scrape(&url).await?)
        })
        .await
    }
    .await;

    // The browser goes away on every path
    let closed = session.close().await;
    let summary = outcome?;
    closed?;

    Ok(summary)
}

pub fn execute(options: ScrapeOptions) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run(&options));

    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    let summary = result?;

    println!(
        "✅ Wrote {} schools to {}",
        summary.written,
        options.output.display()
    );
    if !summary.skipped.is_empty() {
        println!("⚠️  Skipped {} schools:", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("   {} ({})", skipped.url, skipped.reason);
        }
    }

    if summary.written == 0 && !summary.skipped.is_empty() {
        return Err(anyhow!("No schools could be processed"));
    }

    Ok(())
}
