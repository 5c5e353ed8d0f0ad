use std::path::Path;

use alm_core::Almanac;

use crate::session::{Session, parse_query_date};

pub fn run(dir: &Path, date: &[String]) -> Result<(), String> {
    let session = Session::load(dir)?;
    let calendar = &session.calendar;
    let date = parse_query_date(date, calendar)?;

    let moons = calendar.definition().moons();
    if moons.is_empty() {
        println!("  This calendar has no moons.");
        return Ok(());
    }

    let almanac = Almanac::for_calendar(calendar).map_err(|e| e.to_string())?;
    println!("Moons on {}", calendar.definition().format_date(&date));
    for moon in moons {
        let phase = almanac
            .moon_phase(&moon.key, &date)
            .map_err(|e| e.to_string())?;
        println!(
            "  {} {} — {}",
            super::phase_icon(&phase.phase),
            moon.name,
            phase.phase
        );
    }

    Ok(())
}
