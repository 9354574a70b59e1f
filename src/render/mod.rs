//! Server-side HTML for the e-reader page.
//!
//! The target browser is a Kindle: no scripts, fixed 758px viewport, icon
//! fonts from the Weather Icons set served under `/css` and `/font`.

pub mod icons;

use crate::forecast::types::{CurrentConditions, DailySummary, HourlySample, Launch, TideReport, WeatherReport};
use icons::{icon_class_name, wind_direction_class};

/// Everything the page shows for one request.
pub struct PageContext<'a> {
    pub weather: &'a WeatherReport,
    pub tides: &'a TideReport,
    pub forecast: &'a [&'a HourlySample],
    pub moon_phase_icon: &'a str,
    pub summary: &'a str,
    pub launch: Option<&'a Launch>,
}

pub fn render_page(page: &PageContext<'_>) -> String {
    let current = &page.weather.current;
    let today = page.weather.today();
    let mut html = String::with_capacity(4096);

    html.push_str(HEAD);
    html.push_str("<body>\n    <div id=\"page\">\n");

    if let Some(condition) = &current.condition {
        html.push_str(&format!(
            "        <div id=\"iconWrapper\">\n            <i id=\"icon\" class=\"{}\"></i>\n        </div>\n",
            escape(&icon_class_name(&condition.icon, condition.id))
        ));
    }

    html.push_str(&format!(
        "        <div class=\"tempWrapper\">\n            <div id=\"temp\">{}</div>\n        </div>\n",
        current.temp
    ));

    if let Some(day) = today {
        render_high_low(&mut html, day);
    }
    render_conditions(&mut html, current);

    html.push_str(&format!(
        "        <div id=\"description\">\n            <p>{}</p>\n        </div>\n",
        escape(page.summary)
    ));

    if let Some(launch) = page.launch {
        render_launch(&mut html, launch);
    }

    html.push_str("        <div class=\"forecast\">\n");
    for hour in page.forecast {
        render_forecast_column(&mut html, hour);
    }
    html.push_str("        </div>\n");

    html.push_str("        <div class=\"tide-section\">\n");
    for prediction in &page.tides.predictions {
        let level = prediction
            .level
            .map(|level| format!("<span class=\"tide-level\">{:.1} ft</span> ", level))
            .unwrap_or_default();
        html.push_str(&format!(
            "            <div class=\"tide-item\"> {} at {} {}</div>\n",
            escape(prediction.kind.label()),
            escape(&prediction.time_label),
            level
        ));
    }
    html.push_str("        </div>\n");

    html.push_str(&format!(
        "        <div id=\"moon\">\n            <i class=\"{}\"></i>\n",
        escape(page.moon_phase_icon)
    ));
    if let Some(day) = today {
        if let Some(moonrise) = &day.moonrise_label {
            html.push_str(&format!("            <i class=\"wi wi-moonrise\"></i> {}\n", escape(moonrise)));
        }
        if let Some(moonset) = &day.moonset_label {
            html.push_str(&format!("            <i class=\"wi wi-moonset\"></i> {}\n", escape(moonset)));
        }
    }
    html.push_str("        </div>\n");

    html.push_str(&format!(
        "        <div id=\"sun\">\n            <i class=\"wi wi-sunrise\"></i> {}\n            <i class=\"wi wi-sunset\"></i> {}\n        </div>\n",
        escape(&current.sunrise_label),
        escape(&current.sunset_label)
    ));

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

fn render_high_low(html: &mut String, day: &DailySummary) {
    if day.temp_max.is_none() && day.temp_min.is_none() {
        return;
    }

    html.push_str("        <div id=\"hilo\">");
    if let Some(max) = day.temp_max {
        html.push_str(&format!("H {}&deg;", max));
    }
    if let (Some(_), Some(_)) = (day.temp_max, day.temp_min) {
        html.push(' ');
    }
    if let Some(min) = day.temp_min {
        html.push_str(&format!("L {}&deg;", min));
    }
    html.push_str("</div>\n");
}

fn render_conditions(html: &mut String, current: &CurrentConditions) {
    html.push_str("        <div id=\"conditions\">\n");
    html.push_str(&format!(
        "            <p>Feels like {}&deg; &middot; Dew point {}&deg; &middot; Humidity {}%</p>\n",
        current.feels_like, current.dew_point, current.humidity
    ));

    let gust = if current.wind_gust > 0 {
        format!(" gusting {}", current.wind_gust)
    } else {
        String::new()
    };
    html.push_str(&format!(
        "            <p><i class=\"{}\"></i> {}{}</p>\n",
        wind_direction_class(current.wind_deg),
        current.wind_speed,
        gust
    ));

    html.push_str(&format!(
        "            <p>Pressure {} hPa &middot; UV {:.1} &middot; Clouds {:.0}%</p>\n",
        current.pressure, current.uvi, current.clouds
    ));
    if let Some(visibility) = current.visibility {
        html.push_str(&format!(
            "            <p>Visibility {:.1} km</p>\n",
            visibility as f64 / 1000.0
        ));
    }
    html.push_str("        </div>\n");
}

fn render_launch(html: &mut String, launch: &Launch) {
    html.push_str(&format!(
        "        <div id=\"launches\">\n            <p>{}</p>\n",
        escape(&launch.name)
    ));
    if let Some(start) = &launch.window_start_label {
        html.push_str(&format!("            <p>{}</p>\n", escape(start)));
    }
    if let Some(end) = launch
        .window_end_label
        .as_ref()
        .filter(|end| launch.window_start_label.as_ref() != Some(*end))
    {
        html.push_str(&format!("            <p>until {}</p>\n", escape(end)));
    }
    html.push_str("        </div>\n");
}

fn render_forecast_column(html: &mut String, hour: &HourlySample) {
    let (icon, description) = match &hour.condition {
        Some(condition) => (
            icon_class_name(&condition.icon, condition.id),
            condition.description.as_str(),
        ),
        None => (String::new(), ""),
    };
    let rain = if hour.rain_1h > 0 {
        format!("                <div class=\"colRain\">{} rain</div>\n", hour.rain_1h)
    } else {
        String::new()
    };

    html.push_str(&format!(
        concat!(
            "            <div class=\"col\">\n",
            "                <div class=\"colTime\">{}</div>\n",
            "                <div class=\"forecastIconWrapper\">\n",
            "                    <i class=\"colIcon {}\"></i>\n",
            "                </div>\n",
            "                <div class=\"colTemp\">{}</div>\n",
            "                <div class=\"colDesc\">{}</div>\n",
            "                <div class=\"colFeels\">feels {}&deg; &middot; {}%</div>\n",
            "                <div class=\"colPop\">{}% chance</div>\n",
            "{}",
            "                <div class=\"colWind\"><i class=\"{}\"></i> {}/{}</div>\n",
            "            </div>\n",
        ),
        escape(&hour.time_label),
        escape(&icon),
        hour.temp,
        escape(description),
        hour.feels_like,
        hour.humidity,
        hour.pop,
        rain,
        wind_direction_class(hour.wind_deg),
        hour.wind_speed,
        hour.wind_gust
    ));
}

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Weather & Tide</title>
    <meta http-equiv="Content-Type" content="text/html;charset=utf-8">
    <meta name="viewport" content="width=758, initial-scale=1, maximum-scale=1, user-scalable=no">
    <link rel="stylesheet" href="/css/kindle.css">
    <link rel="stylesheet" href="/css/weather-icons.min.css">
    <link rel="stylesheet" href="/css/weather-icons-wind.min.css">
    <link rel="icon" href="data:,">
</head>
"#;

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
