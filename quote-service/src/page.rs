//! Server-rendered form page.

use quote_flow::{Control, FIELDS, FormState, Presentation, options::FIELDS_PER_ROW};

pub const PAGE_TITLE: &str = "Health Insurance Cost Estimator";
pub const SUBTITLE: &str =
    "Enter your details below to estimate your expected health insurance premium.";
pub const BUTTON_LABEL: &str = "Predict Insurance Cost";
pub const FOOTER: &str = "Health Insurance Cost Estimator | © 2025";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_control(control: &Control) -> String {
    match control {
        Control::Number(input) => {
            let field = input.field;
            format!(
                r#"<label for="{key}">{label}</label>
<input type="number" id="{key}" name="{key}" min="{min}" max="{max}" step="{step}" value="{value}" required>"#,
                key = field.key(),
                label = escape_html(field.label()),
                min = input.min,
                max = input.max,
                step = input.step,
                value = input.value(),
            )
        }
        Control::Select(select) => {
            let field = select.field;
            let options: String = select
                .options
                .iter()
                .map(|option| {
                    let selected = if *option == select.value() { " selected" } else { "" };
                    format!(
                        r#"<option value="{value}"{selected}>{value}</option>"#,
                        value = escape_html(option)
                    )
                })
                .collect();
            format!(
                r#"<label for="{key}">{label}</label>
<select id="{key}" name="{key}">{options}</select>"#,
                key = field.key(),
                label = escape_html(field.label()),
            )
        }
    }
}

fn render_form(form: &FormState) -> String {
    debug_assert_eq!(form.controls().len(), FIELDS.len());
    let rows: String = form
        .controls()
        .chunks(FIELDS_PER_ROW)
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|control| format!("<div class=\"cell\">{}</div>", render_control(control)))
                .collect();
            format!("<div class=\"row\">{cells}</div>\n")
        })
        .collect();

    format!(
        r#"<form method="post" action="/" onsubmit="var b=this.querySelector('button');b.disabled=true;b.textContent='Calculating...';">
{rows}<button type="submit">{BUTTON_LABEL}</button>
</form>"#
    )
}

fn render_outcome(presentation: &Presentation) -> String {
    match presentation {
        Presentation::Estimate {
            display,
            label,
            summary,
            ..
        } => format!(
            r#"<div class="result-card">
<div class="result-value">{display}</div>
<div>{label}</div>
</div>
<div class="section-header">Summary</div>
<div class="summary-box">
<div class="summary-item"><strong>Age Group:</strong> {age_group}</div>
<div class="summary-item"><strong>Medical History:</strong> {medical_history}</div>
<div class="summary-item"><strong>Region:</strong> {region}</div>
<div class="summary-item"><strong>Selected Plan:</strong> {plan}</div>
</div>"#,
            display = escape_html(display),
            label = escape_html(label),
            age_group = escape_html(summary.age_group),
            medical_history = escape_html(summary.medical_history),
            region = escape_html(summary.region),
            plan = escape_html(summary.selected_plan),
        ),
        Presentation::Error { message } => format!(
            r#"<div class="error" role="alert">{}</div>"#,
            escape_html(message)
        ),
    }
}

/// Full page: the form with its current values, then the outcome of the last press.
pub fn render_page(form: &FormState, outcome: Option<&Presentation>) -> String {
    let outcome = outcome.map(render_outcome).unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{PAGE_TITLE}</title>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
<p class="subtitle">{SUBTITLE}</p>
{form}
{outcome}
<hr>
<p class="caption">{FOOTER}</p>
</body>
</html>
"#,
        form = render_form(form),
    )
}
