use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use crate::session::Session;

pub fn run(dir: &Path, year: Option<i64>) -> Result<(), String> {
    let session = Session::load(dir)?;
    let calendar = &session.calendar;
    let definition = calendar.definition();
    let year = year.unwrap_or(calendar.current_date().year);
    let leap = definition.is_leap_year(year);

    let title = if leap {
        format!("{} — {year} (leap year)", definition.name())
    } else {
        format!("{} — {year}", definition.name())
    };
    println!("  {}", title.bold());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Month", "Days", "Notes"]);

    for month in definition.months() {
        let days = month.days_in(leap);

        let mut notes = Vec::new();
        if let Some(alt) = &month.alt_name {
            notes.push(alt.clone());
        }
        if days == 1 {
            notes.push("festival day".to_string());
        }
        for season in definition.seasonal_dates_in_month(&month.key) {
            if days > 1 {
                notes.push(format!("{} on day {}", season.name, season.day));
            } else {
                notes.push(season.name.clone());
            }
        }

        table.add_row(vec![
            month.name.clone(),
            days.to_string(),
            notes.join("; "),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} days", definition.days_in_year(year));

    Ok(())
}
