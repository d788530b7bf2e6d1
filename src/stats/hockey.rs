/// Differentials beyond four goals are folded into the ±4 buckets.
pub const MAX_DIFFERENTIAL: i32 = 4;

pub fn clamp_differential(diff: i32) -> i32 {
    diff.clamp(-MAX_DIFFERENTIAL, MAX_DIFFERENTIAL)
}

/// Slot shots, or close-range tips and deflections.
pub fn is_danger_zone(distance: f64, angle: f64, shot_type: &str) -> bool {
    let angle = angle.abs();
    if distance <= 20.0 && angle <= 45.0 {
        return true;
    }
    if distance <= 30.0 && angle <= 35.0 {
        return true;
    }
    let shot_type = shot_type.to_ascii_lowercase();
    (shot_type == "tip" || shot_type == "deflection") && distance <= 25.0
}

pub fn is_power_play(home_skaters: u32, away_skaters: u32, shooter_is_home: bool) -> bool {
    if shooter_is_home {
        home_skaters > away_skaters
    } else {
        away_skaters > home_skaters
    }
}

/// Accepts `true`/`false` in any case as well as integer flags.
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => value.parse::<i64>().ok().map(|n| n != 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differential_is_clamped() {
        assert_eq!(clamp_differential(7), 4);
        assert_eq!(clamp_differential(-5), -4);
        assert_eq!(clamp_differential(2), 2);
    }

    #[test]
    fn danger_zone_thresholds() {
        assert!(is_danger_zone(15.0, -40.0, "WRIST"));
        assert!(is_danger_zone(28.0, 30.0, "SLAP"));
        assert!(!is_danger_zone(28.0, 40.0, "SLAP"));
        assert!(is_danger_zone(24.0, 80.0, "TIP"));
        assert!(!is_danger_zone(26.0, 80.0, "deflection"));
    }

    #[test]
    fn power_play_depends_on_shooting_side() {
        assert!(is_power_play(5, 4, true));
        assert!(!is_power_play(5, 4, false));
        assert!(!is_power_play(5, 5, true));
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("yes"), None);
    }
}
