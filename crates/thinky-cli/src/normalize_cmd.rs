use std::io::Write;

use thinky_core::time::normalize_time;

/// Print each time normalized to `HH:MM`, one per line. Inputs that cannot
/// be parsed are printed unchanged.
pub fn run_normalize(times: &[String], out: &mut impl Write) -> anyhow::Result<()> {
    for time in times {
        writeln!(out, "{}", normalize_time(time))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_one_line_per_input() {
        let times = ["2:30 PM", "9am", "17:05", "later"].map(String::from);
        let mut out = Vec::new();
        run_normalize(&times, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "14:30\n09:00\n17:05\nlater\n");
    }
}
