//! Server-rendered HTML pages
//!
//! Each page is a self-contained document; the forms post back to the JSON
//! endpoints with `fetch` and print the returned message.

use ecoflow_lib::encoding::{DayOfWeek, Zone};
use ecoflow_lib::models::WasteInsights;
use ecoflow_lib::predictor::format_kg;
use ecoflow_lib::reference;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;max-width:48rem}\
nav a{margin-right:1rem}label{display:block;margin-top:.75rem}\
#result{margin-top:1rem;font-weight:bold}table{border-collapse:collapse}\
td,th{border:1px solid #999;padding:.25rem .75rem}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | EcoFlow</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a><a href=\"/predict_waste\">Forecast</a>\
         <a href=\"/optimize_route\">Routes</a><a href=\"/get_insights\">Insights</a>\
         <a href=\"/bins\">Bins</a><a href=\"/maps\">Map</a></nav>\n\
         <h1>{title}</h1>\n{body}\n</body>\n</html>\n"
    )
}

fn options<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values.into_iter().fold(String::new(), |mut out, value| {
        let value = value.as_ref();
        let _ = write!(out, "<option value=\"{value}\">{value}</option>");
        out
    })
}

/// Submit `form` as JSON to `endpoint` and show `field` (or `error`)
fn json_form_script(endpoint: &str, field: &str) -> String {
    format!(
        "<script>\n\
         document.getElementById('form').addEventListener('submit', async (event) => {{\n\
           event.preventDefault();\n\
           const data = Object.fromEntries(new FormData(event.target).entries());\n\
           const response = await fetch('{endpoint}', {{\n\
             method: 'POST', headers: {{'Content-Type': 'application/json'}},\n\
             body: JSON.stringify(data)\n\
           }});\n\
           const body = await response.json();\n\
           document.getElementById('result').textContent = body.{field} ?? body.error;\n\
         }});\n\
         </script>"
    )
}

pub fn home() -> String {
    layout(
        "EcoFlow Waste Management",
        "<p>Forecast waste generation, look up collection routes, review \
         historical insights and check bin fill levels.</p>",
    )
}

pub fn predict_form() -> String {
    let body = format!(
        "<form id=\"form\">\n\
         <label>Location <select name=\"location\">{zones}</select></label>\n\
         <label>Temperature <input name=\"temperature\" type=\"number\" step=\"any\"></label>\n\
         <label>Humidity <input name=\"humidity\" type=\"number\" step=\"any\"></label>\n\
         <label>Day of week <select name=\"day_of_week\">{days}</select></label>\n\
         <button type=\"submit\">Predict</button>\n</form>\n<div id=\"result\"></div>\n{script}",
        zones = options(Zone::ALL.iter().map(|zone| zone.name())),
        days = options(DayOfWeek::ALL.iter().map(|day| day.name())),
        script = json_form_script("/predict_waste", "predicted_waste"),
    );
    layout("Waste Generation Forecast", &body)
}

pub fn route_form() -> String {
    let body = format!(
        "<form id=\"form\">\n\
         <label>Location <select name=\"location\">{zones}</select></label>\n\
         <button type=\"submit\">Optimize</button>\n</form>\n<div id=\"result\"></div>\n{script}",
        zones = options(Zone::ALL.iter().map(|zone| zone.name())),
        script = json_form_script("/optimize_route", "optimized_route"),
    );
    layout("Route Optimization", &body)
}

pub fn insights(insights: &WasteInsights) -> String {
    let body = format!(
        "<table>\n<tr><th>Average waste</th><td>{}</td></tr>\n\
         <tr><th>Maximum waste</th><td>{}</td></tr>\n\
         <tr><th>Minimum waste</th><td>{}</td></tr>\n</table>",
        format_kg(insights.mean_kg),
        format_kg(insights.max_kg),
        format_kg(insights.min_kg),
    );
    layout("Waste Insights", &body)
}

pub fn bins() -> String {
    let body = format!(
        "<form id=\"form\">\n\
         <label>Bin <select name=\"bin\">{bins}</select></label>\n\
         <button type=\"submit\">Show</button>\n</form>\n<div id=\"result\"></div>\n\
         <script>\n\
         document.getElementById('form').addEventListener('submit', async (event) => {{\n\
           event.preventDefault();\n\
           const response = await fetch('/get_bin_data', {{\n\
             method: 'POST', body: new URLSearchParams(new FormData(event.target))\n\
           }});\n\
           const body = await response.json();\n\
           document.getElementById('result').textContent = body.error ??\n\
             `${{body.bin}}: filled ${{body.filled}}, empty ${{body.empty}}, capacity ${{body.capacity}}`;\n\
         }});\n\
         </script>",
        bins = options(reference::bins().iter().map(|bin| bin.id)),
    );
    layout("Bin Status", &body)
}

pub fn maps() -> String {
    let rows = reference::zones()
        .iter()
        .fold(String::new(), |mut out, record| {
            let _ = write!(
                out,
                "<tr><td>{}</td><td>{} km</td><td>{}</td></tr>",
                record.zone,
                record.average_distance_km,
                format_kg(record.waste_generated_kg)
            );
            out
        });
    let body = format!(
        "<table>\n<tr><th>Zone</th><th>Average distance</th><th>Waste generated</th></tr>\n\
         {rows}\n</table>"
    );
    layout("Collection Zones", &body)
}
