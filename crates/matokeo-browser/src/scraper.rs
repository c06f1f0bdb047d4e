use crate::{BrowserSession, Error, Result};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use matokeo_core::results::{PerformanceData, Table};
use serde::Deserialize;

/// Runs inside the page. Absent elements come back as `null` so the shape
/// check happens on the Rust side instead of as a JavaScript exception.
const EXTRACT_SCRIPT: &str = r#"(() => {
    const rows = (table) => table
        ? Array.from(table.getElementsByTagName("tr")).map((tr) =>
            Array.from(tr.getElementsByTagName("td")).map((td) => td.innerText))
        : null;
    const heading = document.getElementsByTagName("h3")[0];
    const tables = document.getElementsByTagName("table");
    return {
        schoolName: heading ? heading.innerText : null,
        divisionPerformance: rows(tables[0]),
        overallPerformance: rows(tables[4]),
    };
})()"#;

/// Payload returned by [`EXTRACT_SCRIPT`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerformance {
    school_name: Option<String>,
    division_performance: Option<Table>,
    overall_performance: Option<Table>,
}

impl RawPerformance {
    fn into_performance(self, url: &str) -> Result<PerformanceData> {
        let school_name = self
            .school_name
            .ok_or_else(|| Error::DomShape(format!("no <h3> school name on {}", url)))?;
        let division = self
            .division_performance
            .ok_or_else(|| Error::DomShape(format!("division table (table 0) missing on {}", url)))?;
        let overall = self
            .overall_performance
            .ok_or_else(|| Error::DomShape(format!("overall table (table 4) missing on {}", url)))?;

        Ok(PerformanceData::new(school_name, division, overall))
    }
}

fn extract_params() -> Result<EvaluateParams> {
    EvaluateParams::builder()
        .expression(EXTRACT_SCRIPT)
        .return_by_value(true)
        .build()
        .map_err(Error::Cdp)
}

/// Extracts one school's performance tables from its rendered result page
pub struct SchoolScraper<'a> {
    session: &'a BrowserSession,
}

impl<'a> SchoolScraper<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    /// Open a page, load `url`, read the tables, and close the page
    ///
    /// The page is closed whether or not extraction succeeded. A failed close
    /// is logged and does not replace the extraction result.
    pub async fn scrape(&self, url: &str) -> Result<PerformanceData> {
        tracing::info!("Scraping {}", url);

        let page = self.session.open_page().await?;

        let result: Result<PerformanceData> = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;

            let raw: RawPerformance = page
                .evaluate_expression(extract_params()?)
                .await?
                .into_value()?;
            raw.into_performance(url)
        }
        .await;

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close page for {}: {}", url, e);
        }

        let data = result?;
        tracing::debug!(
            "Scraped {}: {} division rows, {} overall rows",
            data.school_name,
            data.division_performance.len(),
            data.overall_performance.len()
        );

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://matokeo.necta.go.tz/csee2022/results/s0101.htm";

    fn parse(value: serde_json::Value) -> Result<PerformanceData> {
        let raw: RawPerformance = serde_json::from_value(value)?;
        raw.into_performance(URL)
    }

    #[test]
    fn test_complete_payload_converts() {
        let data = parse(json!({
            "schoolName": "S0101 - AZANIA SECONDARY SCHOOL",
            "divisionPerformance": [
                ["SEX", "I", "II", "III", "IV", "0"],
                ["F", "10", "20", "5", "2", "1"]
            ],
            "overallPerformance": [
                ["EXAMINATION CENTRE REGION", "DAR ES SALAAM"]
            ]
        }))
        .unwrap();

        assert_eq!(data.school_name, "S0101 - AZANIA SECONDARY SCHOOL");
        assert_eq!(data.division_performance.len(), 2);
        assert_eq!(data.overall_performance[0][1], "DAR ES SALAAM");
    }

    #[test]
    fn test_missing_heading_is_dom_shape_error() {
        let result = parse(json!({
            "schoolName": null,
            "divisionPerformance": [],
            "overallPerformance": []
        }));

        let err = result.unwrap_err();
        assert!(matches!(err, Error::DomShape(_)));
        assert!(err.to_string().contains("<h3>"));
    }

    #[test]
    fn test_missing_overall_table_names_index_and_url() {
        let result = parse(json!({
            "schoolName": "S0101",
            "divisionPerformance": [["F", "1", "2", "3", "4", "5"]],
            "overallPerformance": null
        }));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("table 4"));
        assert!(message.contains(URL));
    }

    #[test]
    fn test_rows_without_cells_are_kept() {
        // Header rows use <th>, so they come back empty
        let data = parse(json!({
            "schoolName": "S0101",
            "divisionPerformance": [[], ["F", "1", "2", "3", "4", "5"]],
            "overallPerformance": [[]]
        }))
        .unwrap();

        assert!(data.division_performance[0].is_empty());
        assert!(data.division_row("F").is_some());
    }

    #[test]
    fn test_malformed_payload_is_rejected() {
        let result = parse(json!({ "schoolName": 42 }));

        assert!(matches!(result, Err(Error::Payload(_))));
    }

    #[test]
    fn test_extract_params_return_by_value() {
        let params = extract_params().unwrap();

        assert_eq!(params.expression, EXTRACT_SCRIPT);
        assert_eq!(params.return_by_value, Some(true));
    }

    #[test]
    fn test_script_reads_expected_elements() {
        assert!(EXTRACT_SCRIPT.contains(r#"getElementsByTagName("h3")[0]"#));
        assert!(EXTRACT_SCRIPT.contains("tables[0]"));
        assert!(EXTRACT_SCRIPT.contains("tables[4]"));
    }
}
