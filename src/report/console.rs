use crate::report::report_model::{Classification, PageReport};

// ============================================================================
// Console reporter — formatted terminal summary
// ============================================================================

/// Format a page report for terminal output.
///
/// Produces output like:
/// ```text
/// === Page Analysis: https://example.com/login ===
/// Page type: login
///
/// [form_1a2b3c4d] login: 3 fields (2 required, 0 optional, 1 hidden), submit "Sign In"
///
/// === Totals: 1 forms, 3 fields, 2 required ===
/// ```
pub fn format_console_report(report: &PageReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Page Analysis: {} ===\n", report.url()));
    if !report.title().is_empty() {
        out.push_str(&format!("Title: {}\n", report.title()));
    }
    out.push_str(&format!("Page type: {}\n", report.page_type()));
    if let Some(ms) = report.analysis_duration_ms() {
        out.push_str(&format!("Analysis time: {:.2}ms\n", ms));
    }
    out.push('\n');

    if report.forms().is_empty() {
        out.push_str("No input fields found.\n");
    }

    for form in report.forms() {
        let submit = match form.submit() {
            Some(s) if !s.text.is_empty() => format!("submit \"{}\"", s.text),
            Some(s) => format!("submit <{} type={}>", s.tag, s.control_type),
            None => "no submit control".to_string(),
        };
        out.push_str(&format!(
            "[{}] {}: {} fields ({} required, {} optional, {} hidden), {}\n",
            form.form_id(),
            form.purpose(),
            form.fields().len(),
            form.count_by(Classification::Required),
            form.count_by(Classification::Optional),
            form.count_by(Classification::Hidden),
            submit
        ));
    }

    for note in report.notes() {
        out.push_str(&format!("  note: {}\n", note));
    }

    out.push_str(&format!(
        "\n=== Totals: {} forms, {} fields, {} required ===\n",
        report.total_forms(),
        report.total_fields(),
        report.total_required()
    ));

    out
}
