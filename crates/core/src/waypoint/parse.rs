//! GPS clipboard text parsing

use heapless::Vec;

use super::{Position, Waypoint};
use crate::error::ConfigError;

/// Maximum number of entries kept from one block of configuration text
pub const MAX_PARSED_WAYPOINTS: usize = 8;

const GPS_PREFIX: &str = "GPS:";

/// Extract every `GPS:<label>:<x>:<y>:<z>:` entry from `text`, in order.
///
/// Returns `Err` if an entry has a missing or non-numeric coordinate, or if
/// there are more than [`MAX_PARSED_WAYPOINTS`] entries.
pub fn parse_gps(text: &str) -> Result<Vec<Waypoint, MAX_PARSED_WAYPOINTS>, ConfigError> {
    let mut waypoints = Vec::new();
    let mut found = 0;
    let mut rest = text;

    while let Some(start) = rest.find(GPS_PREFIX) {
        let body = &rest[start + GPS_PREFIX.len()..];
        let mut fields = body.splitn(5, ':');

        let label = fields.next();
        let x = fields.next();
        let y = fields.next();
        let z = fields.next();
        // The trailing colon after z is part of the format
        let tail = fields.next();

        let (label, x, y, z) = match (label, x, y, z, tail) {
            (Some(label), Some(x), Some(y), Some(z), Some(_)) => (label, x, y, z),
            _ => return Err(ConfigError::MalformedWaypoint { index: found }),
        };

        let coords = Position::new(
            parse_coord(x, found)?,
            parse_coord(y, found)?,
            parse_coord(z, found)?,
        );
        let waypoint = Waypoint::new(label, coords)?;

        let consumed = label.len() + x.len() + y.len() + z.len() + 4;
        rest = &body[consumed..];

        found += 1;
        // Past capacity we keep counting so the error reports the real total
        let _ = waypoints.push(waypoint);
    }

    if found > MAX_PARSED_WAYPOINTS {
        return Err(ConfigError::WaypointCount { found });
    }

    Ok(waypoints)
}

/// Parse one coordinate; `NaN` and infinities are malformed
fn parse_coord(field: &str, index: usize) -> Result<f64, ConfigError> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ConfigError::MalformedWaypoint { index })
}
