pub mod calendar;
pub mod date;
pub mod init;
pub mod latitude;
pub mod moons;
pub mod show;
pub mod sun;
pub mod time;

/// Glyph for a phase name from the default eight-phase table.
pub fn phase_icon(phase: &str) -> &'static str {
    match phase {
        "full" => "🌕",
        "waning gibbous" => "🌖",
        "third quarter" => "🌗",
        "waning crescent" => "🌘",
        "new" => "🌑",
        "waxing crescent" => "🌒",
        "first quarter" => "🌓",
        "waxing gibbous" => "🌔",
        _ => "🌙",
    }
}
