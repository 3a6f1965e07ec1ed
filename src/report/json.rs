// src/report/json.rs
// =============================================================================
// Renders a VerificationReport as a JSON summary, for tools that would rather
// not parse XML. Same data as the JUnit report plus totals at the top.
// =============================================================================

use serde::Serialize;

use super::writer::ReportFormat;
use super::{TestSuite, VerificationReport};

/// JSON summary renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSummary;

#[derive(Serialize)]
struct Summary<'a> {
    passed: bool,
    tests: usize,
    failures: usize,
    suites: Vec<SuiteSummary<'a>>,
}

#[derive(Serialize)]
struct SuiteSummary<'a> {
    name: &'a str,
    tests: usize,
    failures: usize,
    time_seconds: f64,
    cases: &'a [super::TestCase],
}

impl<'a> From<&'a TestSuite> for SuiteSummary<'a> {
    fn from(suite: &'a TestSuite) -> Self {
        SuiteSummary {
            name: &suite.name,
            tests: suite.tests(),
            failures: suite.failures(),
            time_seconds: suite.time_seconds(),
            cases: &suite.cases,
        }
    }
}

impl ReportFormat for JsonSummary {
    fn render(&self, report: &VerificationReport) -> String {
        let summary = Summary {
            passed: report.total_failures() == 0,
            tests: report.suites.iter().map(TestSuite::tests).sum(),
            failures: report.total_failures(),
            suites: report.suites.iter().map(SuiteSummary::from).collect(),
        };

        // Only plain strings and numbers in here, so serialization cannot fail
        serde_json::to_string_pretty(&summary).unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetCheck, AssetOutcome, CrawlOutcome, PageCheck};
    use crate::report::build_report;

    #[test]
    fn test_json_summary_totals() {
        let pages = CrawlOutcome::from_checks(vec![PageCheck::new("http://site.test/", None, 200, 120)]);
        let assets = AssetOutcome::from_checks(vec![AssetCheck::new("http://site.test/a.png", 404, 30)]);
        let rendered = JsonSummary.render(&build_report(&pages, Some(&assets)));

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["tests"], 2);
        assert_eq!(value["failures"], 1);
        assert_eq!(value["suites"][0]["name"], "Crawled pages");
        assert_eq!(value["suites"][1]["cases"][0]["failure_message"], "The asset http://site.test/a.png got Not Found");
        assert!(value["suites"][0]["cases"][0].get("failure_message").is_none());
    }
}
