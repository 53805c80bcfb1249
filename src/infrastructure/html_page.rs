// HTML page generation - Embeds chart specifications for Plotly.js

use crate::domain::dashboard::{Dashboard, PageLayout};
use crate::domain::error::{DashboardError, LoadFailureReason};

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Render a built dashboard: status list, then one section per chart.
pub fn render_dashboard_page(dashboard: &Dashboard) -> Result<String, serde_json::Error> {
    let specs = serde_json::to_string(&dashboard.charts)?;

    let statuses: String = dashboard
        .datasets
        .iter()
        .map(|s| {
            format!(
                r#"<li class="ok">✅ {} <span class="muted">{} ({} rows)</span></li>"#,
                escape(&s.name),
                escape(&s.path.display().to_string()),
                s.rows
            )
        })
        .collect();

    let sections: String = dashboard
        .charts
        .iter()
        .map(|c| {
            format!(
                r#"<section><h2>{section}</h2><div class="chart" id="chart-{id}"></div></section>"#,
                section = escape(&c.section),
                id = escape(&c.id),
            )
        })
        .collect();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    <script src="{plotly}"></script>
</head>
<body>
    <main class="{layout}">
        <h1>{title}</h1>
        <ul class="status">{statuses}</ul>
        {sections}
    </main>
    <script id="chart-specs" type="application/json">{specs}</script>
    <script>{js}</script>
</body>
</html>"#,
        title = escape(&dashboard.title),
        css = inline_css(),
        plotly = PLOTLY_SRC,
        layout = layout_class(dashboard.layout),
        statuses = statuses,
        sections = sections,
        specs = specs.replace("</", "<\\/"),
        js = inline_javascript(),
    ))
}

/// Render the status page shown instead of a partial dashboard.
pub fn render_error_page(title: &str, error: &DashboardError) -> String {
    let body = match error {
        DashboardError::MissingInputs(failures) => {
            let items: String = failures
                .iter()
                .map(|f| {
                    let reason = match &f.reason {
                        LoadFailureReason::Missing => "file not found".to_string(),
                        LoadFailureReason::Unreadable(detail) => format!("unreadable: {}", detail),
                    };
                    format!(
                        r#"<li class="error">❌ {} <span class="muted">{}: {}</span></li>"#,
                        escape(&f.name),
                        escape(&f.path.display().to_string()),
                        escape(&reason)
                    )
                })
                .collect();
            format!(
                r#"<p class="error">Required data files are missing. No charts were built.</p><ul class="status">{}</ul>"#,
                items
            )
        }
        DashboardError::Shape(shape) => format!(
            r#"<p class="error">A chart could not be bound to its data. No charts were built.</p><pre>{}</pre>"#,
            escape(&shape.to_string())
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <main class="wide">
        <h1>{title}</h1>
        {body}
    </main>
</body>
</html>"#,
        title = escape(title),
        css = inline_css(),
        body = body,
    )
}

fn layout_class(layout: PageLayout) -> &'static str {
    match layout {
        PageLayout::Wide => "wide",
        PageLayout::Centered => "centered",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #fafafa; color: #222; }
main { padding: 1.5rem 2rem; }
main.centered { max-width: 960px; margin: 0 auto; }
h1 { margin-top: 0; }
h2 { font-size: 1.2rem; margin: 2rem 0 0.5rem; }
.status { list-style: none; padding: 0; font-size: 0.9rem; }
.status li { margin: 0.2rem 0; }
.muted { color: #777; }
.error { color: #b00020; }
.chart { width: 100%; min-height: 420px; background: #fff; border: 1px solid #eee; }
pre { background: #fff; border: 1px solid #eee; padding: 1rem; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
(function () {
  var specs = JSON.parse(document.getElementById('chart-specs').textContent);
  specs.forEach(function (spec) {
    var labels = spec.labels ? spec.labels.values : undefined;
    var traces;
    if (spec.kind === 'pie') {
      traces = [{ type: 'pie', labels: spec.x.values, values: spec.series[0].values, name: spec.series[0].field }];
    } else if (spec.kind === 'bar') {
      traces = spec.series.map(function (s) {
        return { type: 'bar', x: spec.x.values, y: s.values, name: s.field, text: labels, textposition: 'auto' };
      });
    } else {
      traces = spec.series.map(function (s) {
        return {
          type: 'scatter',
          mode: spec.kind === 'line' ? 'lines' : 'markers',
          x: spec.x.values, y: s.values, name: s.field, text: labels
        };
      });
    }
    var layout = {
      title: { text: spec.title },
      xaxis: { title: { text: spec.x.field } },
      yaxis: { title: { text: spec.series.length === 1 ? spec.series[0].field : 'value' } },
      showlegend: spec.series.length > 1 || spec.kind === 'pie'
    };
    Plotly.newPlot('chart-' + spec.id, traces, layout, { responsive: true });
  });
})();
"#
}
