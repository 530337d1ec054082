//! Rendering the global table as `{key=min/mean/max, ...}`

use brc_core::{StatsTable, Tenths};
use std::fmt;

/// Display adapter over a finished table.
///
/// Keys are emitted in ascending byte-wise order; min, mean and max each carry
/// exactly one fractional digit. An empty table renders as `{}`.
pub struct Report<'a>(pub &'a StatsTable);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, stats)) in self.0.sorted().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={}/{}/{}",
                String::from_utf8_lossy(key),
                Tenths(stats.min.into()),
                Tenths(stats.mean()),
                Tenths(stats.max.into()),
            )?;
        }
        f.write_str("}")
    }
}

/// Render a table to its summary line
pub fn render(table: &StatsTable) -> String {
    Report(table).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&StatsTable::new()), "{}");
    }

    #[test]
    fn test_render_sorted_with_mean() {
        let table: StatsTable = vec![("Hamburg", 120), ("Hamburg", 80), ("Berlin", 50)]
            .into_iter()
            .collect();
        assert_eq!(render(&table), "{Berlin=5.0/5.0/5.0, Hamburg=8.0/10.0/12.0}");
    }

    #[test]
    fn test_render_negative_half_rounds_away() {
        let table: StatsTable = vec![("Oslo", -35), ("Oslo", -10)].into_iter().collect();
        assert_eq!(render(&table), "{Oslo=-3.5/-2.3/-1.0}");
    }

    #[test]
    fn test_render_never_shows_negative_zero() {
        let table: StatsTable = vec![("Nuuk", -1), ("Nuuk", 0), ("Nuuk", 0)]
            .into_iter()
            .collect();
        assert_eq!(render(&table), "{Nuuk=-0.1/0.0/0.0}");
    }

    #[test]
    fn test_render_non_utf8_key_is_lossy() {
        let mut table = StatsTable::new();
        table.record(b"bad\xffkey", 10);
        assert_eq!(render(&table), "{bad\u{fffd}key=1.0/1.0/1.0}");
    }
}
