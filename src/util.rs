pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
