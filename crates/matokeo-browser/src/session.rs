use crate::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::task::JoinHandle;

/// How the browser process is started
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub chrome_path: PathBuf,
    /// Run without a visible window; the portal scrape runs headful by default
    pub headless: bool,
}

impl LaunchOptions {
    pub fn new(chrome_path: PathBuf) -> Self {
        Self {
            chrome_path,
            headless: false,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    fn to_config(&self) -> Result<BrowserConfig> {
        // The OS sandbox is always disabled
        let mut builder = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .no_sandbox();

        if !self.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(Error::Browser)
    }
}

/// The single browser process of a run
///
/// Pages are opened per school through [`BrowserSession::open_page`]; the
/// process lives until [`BrowserSession::close`] is called.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chrome and start driving its CDP connection
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        tracing::info!(
            "Launching browser: {} ({})",
            options.chrome_path.display(),
            if options.headless { "headless" } else { "headful" }
        );

        let config = options.to_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))?;

        // Must keep running for any page command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        tracing::debug!("Browser launched, CDP handler running");

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a blank tab
    pub async fn open_page(&self) -> Result<Page> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(page)
    }

    /// Close the browser and wait for its process to exit
    ///
    /// If the close command fails, the process is killed before it is waited on.
    pub async fn close(mut self) -> Result<()> {
        tracing::info!("Closing browser");

        let closed = shut_down(&mut self.browser).await;
        self.handler_task.abort();

        closed
    }
}

/// Process control used during teardown
trait BrowserProcess {
    async fn close(&mut self) -> Result<()>;
    async fn kill(&mut self) -> Option<io::Result<()>>;
    async fn wait(&mut self) -> io::Result<Option<ExitStatus>>;
}

impl BrowserProcess for Browser {
    async fn close(&mut self) -> Result<()> {
        Browser::close(self).await?;
        Ok(())
    }

    async fn kill(&mut self) -> Option<io::Result<()>> {
        Browser::kill(self).await
    }

    async fn wait(&mut self) -> io::Result<Option<ExitStatus>> {
        Browser::wait(self).await
    }
}

async fn shut_down<P: BrowserProcess>(process: &mut P) -> Result<()> {
    let closed = process.close().await;

    if let Err(e) = &closed {
        tracing::warn!("Browser close failed, killing process: {}", e);
        match process.kill().await {
            Some(Ok(())) => tracing::debug!("Browser process killed"),
            Some(Err(e)) => tracing::warn!("Failed to kill browser process: {}", e),
            None => tracing::warn!("No browser process to kill"),
        }
    }

    match process.wait().await {
        Ok(Some(status)) => tracing::debug!("Browser exited with {}", status),
        Ok(None) => tracing::debug!("Browser process already reaped"),
        Err(e) => tracing::warn!("Failed waiting for browser exit: {}", e),
    }

    closed
}
