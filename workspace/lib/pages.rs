//! HTML views: the parameter form, the results page, and the error page.
//!
//! Raw form values are always echoed back HTML-escaped.

use std::collections::HashMap;
use tiltbec::{
    error::ValidationError,
    params::{ Field, FIELDS },
    pipeline::Report,
    render::PANEL_TITLES,
};

/// Raw form values, keyed by field.
pub type FormValues = HashMap<String, String>;

const STYLE: &str = r#"
      body { font-family: sans-serif; max-width: 960px; margin: 2em auto; color: #222; }
      .field { margin-bottom: 1em; }
      .field label { display: block; font-weight: bold; }
      .form-control { width: 10em; padding: 0.2em; }
      .help { color: #666; font-size: 0.9em; }
      .errorlist { color: #b00; margin: 0.2em 0; padding-left: 1.2em; }
      .alert { border: 1px solid #b00; background: #fee; padding: 0.8em; }
      figure { margin: 0; }
      figure img { max-width: 100%; }
      dl.params { display: grid; grid-template-columns: max-content auto; gap: 0.2em 1em; }
"#;

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape(s: &str) -> String {
    s.chars()
        .fold(String::with_capacity(s.len()), |mut acc, c| {
            match c {
                '&' => acc.push_str("&amp;"),
                '<' => acc.push_str("&lt;"),
                '>' => acc.push_str("&gt;"),
                '"' => acc.push_str("&quot;"),
                '\'' => acc.push_str("&#x27;"),
                _ => acc.push(c),
            }
            acc
        })
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n  <head>\n    \
        <meta charset=\"utf-8\" />\n    \
        <title>{title}</title>\n    <style>{STYLE}    </style>\n  </head>\n  \
        <body>\n{body}  </body>\n</html>\n",
        title = escape(title),
    )
}

// the value to show in a field: whatever was submitted, else the initial value
fn field_value(field: &Field, values: &FormValues) -> String {
    values.get(field.key)
        .cloned()
        .unwrap_or_else(|| field.initial.to_string())
}

fn field_html(field: &Field, values: &FormValues, errors: Option<&ValidationError>)
    -> String
{
    let messages: String
        = errors.into_iter()
        .flat_map(|err| err.for_field(field.key))
        .map(|err| format!("<li>{}</li>", escape(&err.to_string())))
        .collect();
    let errorlist
        = if messages.is_empty() {
            String::new()
        } else {
            format!("      <ul class=\"errorlist\">{messages}</ul>\n")
        };
    format!(
        "    <div class=\"field\">\n      \
        <label for=\"id_{key}\">{label}</label>\n{errorlist}      \
        <input type=\"number\" class=\"form-control\" name=\"{key}\" \
        id=\"id_{key}\" value=\"{value}\" min=\"{min}\" max=\"{max}\" \
        step=\"{step}\" required />\n      \
        <div class=\"help\">{help}</div>\n    </div>\n",
        key = field.key,
        label = escape(field.label),
        value = escape(&field_value(field, values)),
        min = field.min,
        max = field.max,
        step = field.step,
        help = escape(field.help),
    )
}

fn form_html(values: &FormValues, errors: Option<&ValidationError>) -> String {
    let fields: String
        = FIELDS.iter()
        .map(|field| field_html(field, values, errors))
        .collect();
    format!(
        "  <form method=\"post\" action=\"/\">\n{fields}    \
        <button type=\"submit\">Run Simulation</button>\n  </form>\n"
    )
}

/// Render the parameter form, optionally with per-field validation errors.
///
/// Fields missing from `values` show their initial values.
pub fn form_page(values: &FormValues, errors: Option<&ValidationError>)
    -> String
{
    let body = format!(
        "  <h1>BEC Simulator</h1>\n  \
        <p>Thomas-Fermi condensate in a tilted trap.</p>\n{}",
        form_html(values, errors),
    );
    layout("BEC Simulator", &body)
}

/// Render the results of a successful run.
pub fn results_page(report: &Report) -> String {
    let captions: String
        = PANEL_TITLES.iter().enumerate()
        .map(|(i, title)| format!("<li>Panel {}: {}</li>", i + 1, escape(title)))
        .collect();
    let body = format!(
        "  <h1>Simulation Results</h1>\n  \
        <dl class=\"params\">\n    \
        <dt>Tilt Strength (α)</dt><dd>{alpha}</dd>\n    \
        <dt>Interaction Strength (g)</dt><dd>{g}</dd>\n    \
        <dt>Chemical Potential (μ)</dt><dd>{mu}</dd>\n    \
        <dt>Peak Density (n₀)</dt><dd>{n0}</dd>\n  </dl>\n  \
        <figure>\n    <img src=\"{src}\" alt=\"BEC simulation plots\" />\n    \
        <figcaption><ol>{captions}</ol></figcaption>\n  </figure>\n  \
        <p><a href=\"/\">Run another simulation</a></p>\n",
        alpha = report.params.alpha,
        g = report.params.g,
        mu = report.params.mu,
        n0 = report.n0_display(),
        src = report.data_url(),
    );
    layout("BEC Simulation Results", &body)
}

/// Render an error message above the (re-populated) parameter form.
pub fn error_page(message: &str, values: &FormValues) -> String {
    let body = format!(
        "  <h1>Simulation Error</h1>\n  \
        <div class=\"alert\">{}</div>\n{}",
        escape(message),
        form_html(values, None),
    );
    layout("BEC Simulation Error", &body)
}
