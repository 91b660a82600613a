//! Formatting utilities

use obstacle_anim::animation::Bounds2;

/// Format a duration in seconds
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.2} s")
}

/// Format a ground-plane position
pub fn format_xy(x: f64, y: f64) -> String {
    format!("({x:.2}, {y:.2})")
}

/// Format an angle given in radians as degrees
pub fn format_degrees(radians: f64) -> String {
    format!("{:.1}°", radians.to_degrees())
}

/// Format optional bounds
pub fn format_bounds(bounds: Option<Bounds2>) -> String {
    bounds.map_or_else(|| "N/A".to_string(), |b| b.to_string())
}

/// Parse a `DX,DY` offset
pub fn parse_offset(value: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid offset component '{part}': {e}"))
    };
    Ok((parse(dx)?, parse(dy)?))
}
