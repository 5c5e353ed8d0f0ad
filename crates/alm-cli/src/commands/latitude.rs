use std::path::Path;

use crate::session::Session;

pub fn run(dir: &Path, value: Option<f64>) -> Result<(), String> {
    let mut session = Session::load(dir)?;

    if let Some(latitude) = value {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!(
                "latitude must be between -90 and 90 degrees, got {latitude}"
            ));
        }
        session.latitude = latitude;
        session.save()?;
    }

    let hemisphere = if session.latitude < 0.0 { "S" } else { "N" };
    println!("{}°{hemisphere}", session.latitude.abs());
    Ok(())
}
