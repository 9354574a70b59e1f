/// Weather Icons class for an OpenWeather condition.
///
/// OpenWeather icon codes end in `d` or `n`; clear nights get the dedicated
/// moon glyph instead of the generic night variant.
pub fn icon_class_name(icon: &str, id: i32) -> String {
    let is_night = icon.ends_with('n');
    if is_night && id == 800 {
        return "wi wi-night-clear".to_string();
    }
    if is_night {
        return format!("wi wi-owm-night-{}", id);
    }
    format!("wi wi-owm-day-{}", id)
}

/// Weather Icons class for a lunar phase in `[0, 1)`, where 0 and 1 are new
/// moon, 0.25 first quarter, 0.5 full moon and 0.75 last quarter.
pub fn moon_phase_icon(moon_phase: f64) -> &'static str {
    match moon_phase {
        p if p == 0.0 => "wi-moon-new",
        p if p < 0.25 => "wi-moon-waxing-crescent-3",
        p if p == 0.25 => "wi-moon-first-quarter",
        p if p < 0.5 => "wi-moon-waxing-gibbous-3",
        p if p == 0.5 => "wi-moon-full",
        p if p < 0.75 => "wi-moon-waning-gibbous-3",
        p if p == 0.75 => "wi-moon-third-quarter",
        _ => "wi-moon-waning-crescent-3",
    }
}

/// Wind arrow class from `weather-icons-wind`, pointing where the wind comes from.
pub fn wind_direction_class(wind_deg: i64) -> String {
    format!("wi wi-wind from-{}-deg", wind_deg.rem_euclid(360))
}
