/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "-";

const FILLED: &str = "█";
const EMPTY: &str = "░";

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// `"43%"` for 42.6, `"-"` when the value is missing or NaN.
pub fn format_percent(value: Option<f64>) -> String {
    match present(value) {
        Some(v) => format!("{v:.0}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Fixed-decimal rendering of an optional number, `"-"` when missing.
pub fn format_decimal(value: Option<f64>, places: usize) -> String {
    match present(value) {
        Some(v) => format!("{v:.places$}"),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_odd(odd: f64) -> String {
    format!("{odd:.2}")
}

/// Width in whole percent for a value that already is a percentage.
pub fn clamped_bar_width(value: Option<f64>) -> u16 {
    present(value).unwrap_or(0.0).clamp(0.0, 100.0).round() as u16
}

/// Width in whole percent for an absolute quantity measured against `base`,
/// e.g. average corners against 14. Saturates at 100.
pub fn scaled_bar_width(value: Option<f64>, base: f64) -> u16 {
    if base <= 0.0 || base.is_nan() {
        return 0;
    }
    let ratio = (present(value).unwrap_or(0.0) / base).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u16
}

/// Number of terminal cells a percentage width occupies in a bar of `width`.
pub fn bar_cells(percent: u16, width: u16) -> u16 {
    let ratio = f64::from(percent.min(100)) / 100.0;
    (ratio * f64::from(width)).round() as u16
}

pub fn bar_string(percent: u16, width: u16) -> String {
    let filled = bar_cells(percent, width) as usize;
    let empty = (width as usize).saturating_sub(filled);
    format!("{}{}", FILLED.repeat(filled), EMPTY.repeat(empty))
}

/// Distribute `total` cells across segments proportionally to `weights`
/// using largest remainders, so the parts always add up to `total` exactly.
/// All-zero weights yield all-zero cells.
pub fn split_cells(weights: &[f64], total: u16) -> Vec<u16> {
    let sum: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if sum <= 0.0 {
        return vec![0; weights.len()];
    }

    let exact: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { w / sum * f64::from(total) } else { 0.0 })
        .collect();
    let mut cells: Vec<u16> = exact.iter().map(|e| e.floor() as u16).collect();

    let assigned: u16 = cells.iter().sum();
    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then_with(|| a.cmp(&b))
    });
    for idx in order.into_iter().take(total.saturating_sub(assigned) as usize) {
        cells[idx] += 1;
    }
    cells
}

/// First two characters of a team name, upper-cased; `"?"` for an empty name.
pub fn abbreviation(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "?".to_string();
    }
    trimmed.chars().take(2).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_placeholder_for_missing_and_nan() {
        assert_eq!(format_percent(None), "-");
        assert_eq!(format_percent(Some(f64::NAN)), "-");
    }

    #[test]
    fn percent_rounds_to_whole_number() {
        assert_eq!(format_percent(Some(42.6)), "43%");
        assert_eq!(format_percent(Some(0.0)), "0%");
        assert_eq!(format_percent(Some(100.0)), "100%");
    }

    #[test]
    fn decimal_formatting() {
        assert_eq!(format_decimal(Some(10.26), 1), "10.3");
        assert_eq!(format_decimal(Some(3.0), 1), "3.0");
        assert_eq!(format_decimal(None, 1), "-");
        assert_eq!(format_odd(9.0), "9.00");
    }

    #[test]
    fn clamped_width_bounds() {
        assert_eq!(clamped_bar_width(Some(150.0)), 100);
        assert_eq!(clamped_bar_width(Some(-5.0)), 0);
        assert_eq!(clamped_bar_width(None), 0);
        assert_eq!(clamped_bar_width(Some(64.4)), 64);
    }

    #[test]
    fn scaled_width_against_base() {
        assert_eq!(scaled_bar_width(Some(7.0), 14.0), 50);
        assert_eq!(scaled_bar_width(Some(20.0), 14.0), 100);
        assert_eq!(scaled_bar_width(None, 8.0), 0);
        assert_eq!(scaled_bar_width(Some(3.0), 6.0), 50);
        assert_eq!(scaled_bar_width(Some(3.0), 0.0), 0);
    }

    #[test]
    fn bar_string_has_requested_width() {
        assert_eq!(bar_string(50, 10), "█████░░░░░");
        assert_eq!(bar_string(100, 4), "████");
        assert_eq!(bar_string(0, 3), "░░░");
    }

    #[test]
    fn split_cells_fills_total_exactly() {
        let cells = split_cells(&[50.0, 20.0, 40.0], 30);
        assert_eq!(cells.iter().sum::<u16>(), 30);
        assert_eq!(cells, vec![14, 5, 11]);
    }

    #[test]
    fn split_cells_all_zero() {
        assert_eq!(split_cells(&[0.0, 0.0, 0.0], 20), vec![0, 0, 0]);
    }

    #[test]
    fn abbreviation_takes_two_chars() {
        assert_eq!(abbreviation("Flamengo"), "FL");
        assert_eq!(abbreviation("ñu"), "ÑU");
        assert_eq!(abbreviation(""), "?");
        assert_eq!(abbreviation("X"), "X");
    }
}
