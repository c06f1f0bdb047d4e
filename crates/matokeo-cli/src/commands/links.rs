use anyhow::Result;
use matokeo_core::fetch::IndexFetcher;
use matokeo_core::links::LinkExtractor;

/// Fetch the index page and list the school result links on it
pub async fn collect(index_url: &str, base_url: &str) -> Result<Vec<String>> {
    let body = IndexFetcher::new().fetch(index_url).await?;
    let links = LinkExtractor::new(base_url).extract(&body);

    if links.is_empty() {
        tracing::warn!("No school result links found on {}", index_url);
    } else {
        tracing::info!("Found {} school result links", links.len());
    }

    Ok(links)
}

/// Print one absolute link per line, without launching a browser
pub fn execute(index_url: &str, base_url: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let links = runtime.block_on(collect(index_url, base_url))?;
    for link in links {
        println!("{}", link);
    }

    Ok(())
}
