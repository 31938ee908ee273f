/// Fixed-layout PDF rendering for clinical reports.
///
/// Single A4 page: clinic header, patient/doctor/date table, one section
/// per clinical field (absent values render as "N/A"), generation footer.
use crate::error::{ClinicError, ClinicResult};
use crate::reports::ReportWithUser;
use chrono::Utc;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;

/// Attachment filename for a rendered report.
pub fn attachment_filename(report: &ReportWithUser) -> String {
    format!("Treatment_Report_{}.pdf", report.user_name.replace(' ', "_"))
}

/// Render a report to PDF bytes.
pub fn render_report(report: &ReportWithUser) -> ClinicResult<Vec<u8>> {
    let (doc, page1, layer1) =
        PdfDocument::new("Dental Examination Report", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ClinicError::Pdf(format!("font: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ClinicError::Pdf(format!("font: {}", e)))?;

    let mut y = Mm(280.0);

    // Header
    layer.use_text("Dental Examination Report", 16.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        "Dental Experts Clinic | www.dentalexperts.com",
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    // Patient / doctor / date table
    let info_rows = [
        (
            "Patient:",
            format!("{} ({})", report.user_name, report.user_email),
        ),
        ("Doctor:", report.doctor_name.clone()),
        ("Date:", report.report_date.to_string()),
        ("Report ID:", format!("#{}", report.id)),
    ];
    for (label, value) in &info_rows {
        layer.use_text(*label, 10.0, Mm(20.0), y, &bold);
        layer.use_text(value, 10.0, Mm(50.0), y, &font);
        y -= Mm(5.5);
    }
    y -= Mm(4.0);

    // Clinical sections
    let sections = [
        ("Chief Complaint", &report.chief_complaint),
        ("Clinical Findings", &report.clinical_findings),
        ("Oral Hygiene", &report.oral_hygiene),
        ("Gums", &report.gums),
        ("Teeth Condition", &report.teeth_condition),
        ("Diagnosis", &report.diagnosis),
        ("Treatment Plan", &report.treatment_plan),
        ("Medications", &report.medications),
        ("Advice / Remarks", &report.advice),
    ];
    for (title, content) in &sections {
        layer.use_text(*title, 11.0, Mm(20.0), y, &bold);
        y -= Mm(5.0);
        let text = content.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("N/A");
        for line in wrap_text(text, 90) {
            layer.use_text(&line, 9.0, Mm(25.0), y, &font);
            y -= Mm(4.5);
        }
        y -= Mm(3.0);
    }

    // Footer
    layer.use_text(
        format!("Generated securely on {}", Utc::now().format("%Y-%m-%d %H:%M:%S")),
        7.0,
        Mm(20.0),
        Mm(12.0),
        &font,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ClinicError::Pdf(format!("save: {}", e)))?;
    buf.into_inner()
        .map_err(|e| ClinicError::Pdf(format!("buffer: {}", e)))
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
