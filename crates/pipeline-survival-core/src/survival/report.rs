//! Plain-text tables for curves and conditional estimates.

use super::conditional::ConditionalRow;
use super::curve::SurvivalCurve;

/// Render a curve as an ASCII table, one row per step.
pub fn render_curve(label: &str, unit: &str, curve: &SurvivalCurve) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{label}: {} deals, {} closed\n",
        curve.record_count(),
        curve.event_count()
    ));
    output.push_str(&"=".repeat(72));
    output.push('\n');

    let with_bands = curve.confidence_level().is_some();
    output.push_str(&format!(
        "{:>8} {:>8} {:>7} {:>9} {:>10} {:>9}",
        unit, "At risk", "Closed", "Censored", "Survival", "Win prob"
    ));
    if with_bands {
        output.push_str(&format!(" {:>17}", "Win prob CI"));
    }
    output.push('\n');
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for p in curve.points() {
        output.push_str(&format!(
            "{:>8} {:>8} {:>7} {:>9} {:>10.3} {:>8.1}%",
            format_time(p.time),
            p.at_risk,
            p.events,
            p.censored,
            p.survival,
            p.win_probability() * 100.0
        ));
        if let Some(band) = p.confidence {
            // Flipping survival to win probability swaps the bounds.
            output.push_str(&format!(
                "  [{:>5.1}%, {:>5.1}%]",
                (1.0 - band.upper) * 100.0,
                (1.0 - band.lower) * 100.0
            ));
        }
        output.push('\n');
    }

    match curve.median_survival() {
        Some(median) => output.push_str(&format!(
            "\nMedian time to close: {} {unit}s\n",
            format_time(median)
        )),
        None => output.push_str("\nMedian time to close: not reached\n"),
    }
    output
}

/// Render a conditional survival table.
pub fn render_conditional(
    label: &str,
    unit: &str,
    look_ahead: f64,
    rows: &[ConditionalRow],
) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{label}: probability of closing within the next {} {unit}s\n",
        format_time(look_ahead)
    ));
    output.push_str(&"=".repeat(48));
    output.push('\n');
    output.push_str(&format!("{:>10} {:>12} {:>14}\n", "Elapsed", "Until", "Win prob"));
    output.push_str(&"-".repeat(48));
    output.push('\n');

    for row in rows {
        let win = match row.win_probability {
            Some(p) => format!("{:.1}%", p * 100.0),
            None => "n/a".to_string(),
        };
        output.push_str(&format!(
            "{:>10} {:>12} {:>14}\n",
            format_time(row.elapsed),
            format_time(row.look_ahead),
            win
        ));
    }
    output
}

fn format_time(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{}", t as i64)
    } else {
        format!("{t:.2}")
    }
}
