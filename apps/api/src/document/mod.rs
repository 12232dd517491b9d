//! Document formatter: `Resume` → a self-contained printable HTML document.
//!
//! Pure and infallible. Sections render only when they have content, and
//! every field value is HTML-escaped before interpolation — the fields are
//! plain text, never markup. The formatter does not dedup skills; that
//! invariant belongs to the store, and a directly constructed aggregate
//! with duplicates renders every tag as-is.

use std::fmt::Write;

use crate::models::resume::Resume;

const DOCUMENT_STYLE: &str = r#"
body {
    font-family: Arial, sans-serif;
    margin: 40px;
    line-height: 1.6;
    color: #333;
}
.header {
    text-align: center;
    margin-bottom: 30px;
    border-bottom: 2px solid #0066cc;
    padding-bottom: 20px;
}
.name {
    font-size: 28px;
    font-weight: bold;
    margin-bottom: 10px;
    color: #0066cc;
}
.contact {
    font-size: 14px;
    color: #666;
}
.section {
    margin: 25px 0;
}
.section-title {
    font-size: 18px;
    font-weight: bold;
    color: #0066cc;
    border-bottom: 1px solid #ddd;
    padding-bottom: 5px;
    margin-bottom: 15px;
}
.experience-item, .education-item {
    margin-bottom: 20px;
}
.job-title {
    font-weight: bold;
    font-size: 16px;
}
.company {
    font-style: italic;
    color: #666;
}
.duration {
    font-size: 14px;
    color: #888;
}
.skills {
    display: flex;
    flex-wrap: wrap;
    gap: 10px;
}
.skill {
    background: #f0f0f0;
    padding: 4px 8px;
    border-radius: 4px;
    font-size: 14px;
}
@media print {
    body { margin: 0; }
}
"#;

/// Escapes a plain-text field for interpolation into markup.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Joins the non-empty contact fields with " | " separators.
fn contact_line(resume: &Resume) -> String {
    let info = &resume.personal_info;
    [&info.email, &info.phone, &info.location, &info.linkedin]
        .into_iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(escape_html)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Renders the complete styled document for printing/export.
pub fn format_document(resume: &Resume) -> String {
    let info = &resume.personal_info;
    let name = match info.full_name.trim() {
        "" => "Your Name".to_string(),
        full_name => escape_html(full_name),
    };
    let title = match info.full_name.trim() {
        "" => "Resume".to_string(),
        full_name => escape_html(full_name),
    };

    let mut doc = String::new();
    let _ = write!(
        doc,
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{title}</title>\n<style>{DOCUMENT_STYLE}</style>\n</head>\n<body>\n"
    );

    let _ = write!(
        doc,
        "<div class=\"header\">\n<div class=\"name\">{name}</div>\n<div class=\"contact\">{}</div>\n</div>\n",
        contact_line(resume)
    );

    if !info.summary.trim().is_empty() {
        let _ = write!(
            doc,
            "<div class=\"section\">\n<div class=\"section-title\">PROFESSIONAL SUMMARY</div>\n<p>{}</p>\n</div>\n",
            escape_html(&info.summary)
        );
    }

    if !resume.experiences.is_empty() {
        doc.push_str("<div class=\"section\">\n<div class=\"section-title\">EXPERIENCE</div>\n");
        for exp in &resume.experiences {
            let _ = write!(
                doc,
                "<div class=\"experience-item\">\n<div class=\"job-title\">{}</div>\n<div class=\"company\">{}</div>\n<div class=\"duration\">{}</div>\n<p>{}</p>\n</div>\n",
                escape_html(&exp.title),
                escape_html(&exp.company),
                escape_html(&exp.duration),
                escape_html(&exp.description)
            );
        }
        doc.push_str("</div>\n");
    }

    if !resume.education.is_empty() {
        doc.push_str("<div class=\"section\">\n<div class=\"section-title\">EDUCATION</div>\n");
        for edu in &resume.education {
            let _ = write!(
                doc,
                "<div class=\"education-item\">\n<div class=\"job-title\">{}</div>\n<div class=\"company\">{}</div>\n<div class=\"duration\">{}</div>\n",
                escape_html(&edu.degree),
                escape_html(&edu.school),
                escape_html(&edu.duration)
            );
            if !edu.description.trim().is_empty() {
                let _ = write!(doc, "<p>{}</p>\n", escape_html(&edu.description));
            }
            doc.push_str("</div>\n");
        }
        doc.push_str("</div>\n");
    }

    if !resume.skills.is_empty() {
        doc.push_str("<div class=\"section\">\n<div class=\"section-title\">SKILLS</div>\n<div class=\"skills\">\n");
        for skill in &resume.skills {
            let _ = write!(doc, "<span class=\"skill\">{}</span>\n", escape_html(skill));
        }
        doc.push_str("</div>\n</div>\n");
    }

    doc.push_str("</body>\n</html>\n");
    doc
}
