//! Server-side HTML for the upload form and the analysis page.

use std::fmt::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hydrosense_core::{Field, SensorReadings};
use hydrosense_model::{Advice, Prediction};
use hydrosense_ocr::OcrResult;

use crate::form::{Upload, IMAGE_FIELD, MANUAL_FIELD};

const TITLE: &str = "Hydration and Seasonal Context Analyzer";

const STYLE: &str = "body{font-family:sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem}\
pre{background:#f4f4f4;padding:.75rem;overflow-x:auto}\
.warning{background:#fff4e5;border-left:4px solid #f0a020;padding:.5rem .75rem}\
.info{background:#e8f4fd;border-left:4px solid #2080d0;padding:.5rem .75rem}\
.metrics{display:flex;gap:3rem}\
label{display:block;margin:.4rem 0}\
figure img{max-width:100%;border:1px solid #ddd}";

/// What one `/analyze` round produced, ready to be rendered.
pub struct AnalysisView<'a> {
    /// The screenshot as submitted, echoed back above the OCR text.
    pub upload: Option<&'a Upload>,
    pub ocr: Option<&'a OcrResult>,
    /// Values after manual entries were applied on top of OCR results.
    pub readings: &'a SensorReadings,
    pub show_manual: bool,
    pub manual_requested: bool,
    /// Fields holding prediction back (missing or zero).
    pub blocked: &'a [Field],
    pub outcome: Option<&'a Outcome>,
}

pub struct Outcome {
    pub prediction: Prediction,
    pub chart_svg: String,
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn input_label(field: Field) -> &'static str {
    match field {
        Field::BodyTemp => "Enter Body Temp (°C)",
        Field::Gsr => "Enter GSR Value",
        Field::EnvTemp => "Enter Environmental Temp (°C)",
        Field::Humidity => "Enter Humidity (%)",
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "not found".to_string(), |v| v.to_string())
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{TITLE}</title><style>{STYLE}</style></head>\
         <body><h1>{TITLE}</h1>{body}</body></html>"
    )
}

fn entry_form(readings: &SensorReadings, show_manual: bool, manual_requested: bool) -> String {
    let mut html = String::new();
    html.push_str("<form method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">");
    let _ = write!(
        html,
        "<label>Upload Screenshot from Serial Monitor \
         <input type=\"file\" name=\"{IMAGE_FIELD}\" accept=\".png,.jpg,.jpeg,image/png,image/jpeg\"></label>"
    );
    let _ = write!(
        html,
        "<label><input type=\"checkbox\" name=\"{MANUAL_FIELD}\"{}> Manually Input Data (For Verification)</label>",
        if manual_requested { " checked" } else { "" }
    );

    if show_manual {
        html.push_str("<fieldset><p class=\"warning\">Please enter values manually:</p>");
        for field in Field::ALL {
            let value = readings.get(field).map(|v| v.to_string()).unwrap_or_default();
            let _ = write!(
                html,
                "<label>{} <input type=\"number\" step=\"any\" name=\"{}\" value=\"{}\"></label>",
                escape_html(input_label(field)),
                field.form_name(),
                escape_html(&value)
            );
        }
        html.push_str("</fieldset>");
    }

    html.push_str("<button type=\"submit\">Analyze</button></form>");
    html
}

fn upload_figure(upload: &Upload) -> String {
    format!(
        "<figure><img src=\"data:{};base64,{}\" alt=\"Uploaded screenshot\">\
         <figcaption>Uploaded Image</figcaption></figure>",
        escape_html(&upload.content_type),
        STANDARD.encode(&upload.data)
    )
}

fn advice_block(advice: &Advice) -> String {
    format!("<p class=\"{}\">{}</p>", advice.severity, escape_html(advice.message))
}

pub fn index_page() -> String {
    layout(&entry_form(&SensorReadings::default(), false, false))
}

pub fn analysis_page(view: &AnalysisView<'_>) -> String {
    let mut body = String::new();

    if let Some(upload) = view.upload {
        body.push_str(&upload_figure(upload));
    }

    if let Some(ocr) = view.ocr {
        body.push_str("<h2>OCR Grouped Text</h2><pre><code>");
        for line in &ocr.grouped_lines {
            let _ = writeln!(body, "{}", escape_html(line));
        }
        body.push_str("</code></pre><h2>Extracted Values</h2><ul>");
        for field in Field::ALL {
            let _ = write!(
                body,
                "<li>{field}: <code>{}</code></li>",
                format_value(ocr.readings.get(field))
            );
        }
        body.push_str("</ul>");
    }

    body.push_str(&entry_form(view.readings, view.show_manual, view.manual_requested));

    match view.outcome {
        Some(outcome) => {
            let p = &outcome.prediction;
            let _ = write!(
                body,
                "<h2>Prediction Results</h2><div class=\"metrics\">\
                 <div><h3>Hydration Status</h3><p>{}</p></div>\
                 <div><h3>Seasonal Context</h3><p>{}</p></div></div>\
                 <h2>Recommendations</h2>{}{}\
                 <h2>Sensor Readings</h2><figure>{}</figure>",
                escape_html(&p.hydration),
                escape_html(&p.season),
                advice_block(&p.hydration_advice),
                advice_block(&p.season_advice),
                outcome.chart_svg
            );
        }
        None if !view.blocked.is_empty() => {
            let names: Vec<String> = view.blocked.iter().map(ToString::to_string).collect();
            let _ = write!(
                body,
                "<p class=\"info\">Prediction needs non-zero values for: {}</p>",
                escape_html(&names.join(", "))
            );
        }
        None => {}
    }

    layout(&body)
}
