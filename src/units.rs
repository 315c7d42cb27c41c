// Metric conversion out of font design units. Output widths are in
// 1/1000 em; positioning values additionally collapse to device units at
// the configured resolution. Rounding is half away from zero in both
// steps, which downstream font descriptions depend on.

/// Converts a design-unit width to 1/1000 em.
pub fn owid(w: i32, upm: i32) -> i32 {
    if w < 0 {
        (w * 1000 - upm / 2) / upm
    } else {
        (w * 1000 + upm / 2) / upm
    }
}

/// Converts a design-unit width to device units at `res` dots per inch.
pub fn uwid(w: i32, upm: i32, res: i32) -> i32 {
    let d = (7200 / res).max(1);
    let w = owid(w, upm);
    if w < 0 {
        (w - d / 2) / d
    } else {
        (w + d / 2) / d
    }
}

#[cfg(test)]
mod tests {
    use super::{owid, uwid};

    #[test]
    fn test_owid_em_units() {
        assert_eq!(owid(0, 1000), 0);
        assert_eq!(owid(1000, 1000), 1000);
        assert_eq!(owid(-1000, 1000), -1000);
        assert_eq!(owid(500, 1000), 500);
    }

    #[test]
    fn test_owid_rounds_half_away_from_zero() {
        assert_eq!(owid(1024, 2048), 500);
        assert_eq!(owid(1, 2048), 0); // 0.488 rounds down
        assert_eq!(owid(2, 2048), 1); // 0.977 rounds up
        assert_eq!(owid(-2, 2048), -1);
        assert_eq!(owid(3, 2000), 2); // exactly 1.5
        assert_eq!(owid(-3, 2000), -2);
    }

    #[test]
    fn test_owid_error_bound() {
        let upm = 2048;
        for w in -3000..3000 {
            let exact = f64::from(w) * 1000.0 / f64::from(upm);
            let got = f64::from(owid(w, upm));
            assert!((got - exact).abs() <= 1.0, "w={w} got={got} exact={exact}");
        }
    }

    #[test]
    fn test_uwid() {
        // res 720 gives d = 10.
        assert_eq!(uwid(10, 1000, 720), 1);
        assert_eq!(uwid(20, 1000, 720), 2);
        assert_eq!(uwid(-5, 1000, 720), -1); // owid -5, (-5 - 5) / 10
        assert_eq!(uwid(4, 1000, 720), 0);
        assert_eq!(uwid(5, 1000, 720), 1);
    }

    #[test]
    fn test_uwid_high_resolution() {
        // d clamps to 1 above 7200 dpi, so uwid degenerates to owid.
        assert_eq!(uwid(250, 1000, 14400), 250);
    }
}
