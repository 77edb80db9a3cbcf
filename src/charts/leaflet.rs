//! Leaflet map page for the station view.
//! Station data is embedded as JSON and turned into markers by the page script.

use crate::charts::RenderError;
use crate::pipeline::StationMap;
use serde::Serialize;
use std::path::Path;

const ZOOM_START: u8 = 7;
const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Serialize)]
struct Marker<'a> {
    lat: f64,
    lon: f64,
    name: &'a str,
    kind: &'a str,
}

/// A self-contained HTML page showing one marker per station.
pub struct LeafletMap {
    html: String,
}

impl LeafletMap {
    /// Build the page, or refuse when there is nothing to center on.
    pub fn build(map: &StationMap, title: &str) -> Result<Self, RenderError> {
        let center = map.center().ok_or(RenderError::EmptyMap)?;
        if !center.is_finite() {
            return Err(RenderError::OutOfRange(format!(
                "map center ({}, {})",
                center.latitude, center.longitude
            )));
        }

        let markers: Vec<Marker<'_>> = map
            .stations
            .stations()
            .iter()
            .map(|s| Marker {
                lat: s.latitude,
                lon: s.longitude,
                name: &s.name,
                kind: &s.location_type,
            })
            .collect();
        // `</` would end the script element early
        let markers_json = serde_json::to_string(&markers)?.replace("</", "<\\/");

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var stations = {markers_json};
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
function esc(text) {{
  var d = document.createElement("div");
  d.textContent = text;
  return d.innerHTML;
}}
stations.forEach(function (s) {{
  L.marker([s.lat, s.lon])
    .bindPopup(esc(s.name) + "<br>Type: " + esc(s.kind))
    .bindTooltip(esc(s.name))
    .addTo(map);
}});
</script>
</body>
</html>
"#,
            title = escape_html(title),
            version = LEAFLET_VERSION,
            markers_json = markers_json,
            lat = center.latitude,
            lon = center.longitude,
            zoom = ZOOM_START,
        );

        Ok(Self { html })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, &self.html)?;
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
