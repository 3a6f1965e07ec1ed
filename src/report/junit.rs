// src/report/junit.rs
// =============================================================================
// Renders a VerificationReport as JUnit-style XML.
//
// Output shape:
//
//   <?xml version="1.0" encoding="UTF-8"?>
//   <testsuites name="the crawler suites">
//     <testsuite name="Crawled pages" tests="2" failures="1" time="0.15">
//       <testcase name="http://site.test/" status="OK" time="0.1" />
//       <testcase name="http://site.test/x" status="Not Found" time="0.05">
//         <failure message="The url ... got Not Found and is linked from ..." />
//       </testcase>
//     </testsuite>
//   </testsuites>
//
// We build the string by hand - the format is tiny and fixed. Attribute
// values go through html_escape so quotes and angle brackets stay legal.
// =============================================================================

use html_escape::encode_double_quoted_attribute;
use std::fmt::{self, Write};

use super::writer::ReportFormat;
use super::{TestCase, TestSuite, VerificationReport};

const ROOT_NAME: &str = "the crawler suites";
const INDENT: &str = "  ";

/// JUnit XML renderer (the default report format)
#[derive(Debug, Clone, Copy, Default)]
pub struct JunitXml;

impl ReportFormat for JunitXml {
    fn render(&self, report: &VerificationReport) -> String {
        let mut out = String::new();
        // Writing into a String never fails
        let _ = render_document(&mut out, report);
        out
    }

    fn name(&self) -> &'static str {
        "junit"
    }
}

fn render_document(out: &mut String, report: &VerificationReport) -> fmt::Result {
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<testsuites name=\"{}\">", attr(ROOT_NAME))?;
    for suite in &report.suites {
        render_suite(out, suite)?;
    }
    writeln!(out, "</testsuites>")
}

fn render_suite(out: &mut String, suite: &TestSuite) -> fmt::Result {
    write!(
        out,
        "{}<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"{}\"",
        INDENT,
        attr(&suite.name),
        suite.tests(),
        suite.failures(),
        format_seconds(suite.time_seconds())
    )?;

    if suite.cases.is_empty() {
        return writeln!(out, " />");
    }

    writeln!(out, ">")?;
    for case in &suite.cases {
        render_case(out, case)?;
    }
    writeln!(out, "{}</testsuite>", INDENT)
}

fn render_case(out: &mut String, case: &TestCase) -> fmt::Result {
    write!(
        out,
        "{0}{0}<testcase name=\"{1}\" status=\"{2}\" time=\"{3}\"",
        INDENT,
        attr(&case.name),
        attr(&case.status),
        format_seconds(case.time_seconds())
    )?;

    match &case.failure_message {
        None => writeln!(out, " />"),
        Some(message) => {
            writeln!(out, ">")?;
            writeln!(out, "{0}{0}{0}<failure message=\"{1}\" />", INDENT, attr(message))?;
            writeln!(out, "{0}{0}</testcase>", INDENT)
        }
    }
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    encode_double_quoted_attribute(value)
}

// Seconds as the shortest decimal that round-trips, always with a
// fractional part: 0.65, 1.234, 2.0
pub(crate) fn format_seconds(seconds: f64) -> String {
    format!("{:?}", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetOutcome, CrawlOutcome, PageCheck};
    use crate::report::build_report;

    fn render(pages: Vec<PageCheck>, assets: Option<AssetOutcome>) -> String {
        let report = build_report(&CrawlOutcome::from_checks(pages), assets.as_ref());
        JunitXml.render(&report)
    }

    #[test]
    fn test_suite_attributes() {
        let xml = render(
            vec![
                PageCheck::new("http://site.test/", None, 200, 100),
                PageCheck::new("http://site.test/a", Some("http://site.test/".into()), 200, 200),
                PageCheck::new("http://site.test/b", Some("http://site.test/".into()), 200, 300),
                PageCheck::new("http://site.test/c", Some("http://site.test/".into()), 404, 50),
            ],
            None,
        );

        assert!(xml.contains(r#"<testsuite name="Crawled pages" tests="4" failures="1" time="0.65">"#));
    }

    #[test]
    fn test_full_document_layout() {
        let xml = render(
            vec![
                PageCheck::new("http://site.test/", None, 200, 100),
                PageCheck::new("http://site.test/x", Some("http://site.test/".into()), 404, 50),
            ],
            None,
        );

        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<testsuites name=\"the crawler suites\">
  <testsuite name=\"Crawled pages\" tests=\"2\" failures=\"1\" time=\"0.15\">
    <testcase name=\"http://site.test/\" status=\"OK\" time=\"0.1\" />
    <testcase name=\"http://site.test/x\" status=\"Not Found\" time=\"0.05\">
      <failure message=\"The url http://site.test/x got Not Found and is linked from http://site.test/\" />
    </testcase>
  </testsuite>
</testsuites>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_empty_assets_suite_is_self_closing() {
        let xml = render(vec![PageCheck::new("http://site.test/", None, 200, 0)], Some(AssetOutcome::default()));

        assert!(xml.contains(r#"<testsuite name="Crawled assets" tests="0" failures="0" time="0.0" />"#));
        assert_eq!(xml.matches("<testsuite ").count(), 2);
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let xml = render(
            vec![PageCheck::new("http://site.test/?q=\"x\"&a=<b>", None, 500, 0)],
            None,
        );

        // '&' was already replaced in the case name, but survives in the message
        assert!(xml.contains(r#"name="http://site.test/?q=&quot;x&quot;_a=&lt;b"#));
        assert!(xml.contains("&quot;&amp;a=&lt;b"));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.65), "0.65");
        assert_eq!(format_seconds(1.234), "1.234");
        assert_eq!(format_seconds(2.0), "2.0");
        assert_eq!(format_seconds(0.0), "0.0");
    }
}
