use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for money and item movement so that a tick produces bit-identical
/// results on every platform.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Fraction `num / den` as Fixed64. Returns zero for a zero denominator.
#[inline]
pub fn ratio(num: u64, den: u64) -> Fixed64 {
    if den == 0 {
        return Fixed64::ZERO;
    }
    Fixed64::from_num(num) / Fixed64::from_num(den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(fixed64_to_f64(a + b), 3.5);
    }

    #[test]
    fn tenth_reaches_one_in_ten_steps() {
        let step = f64_to_fixed64(0.1);
        let mut acc = Fixed64::ZERO;
        let mut steps = 0;
        while acc < Fixed64::ONE {
            acc += step;
            steps += 1;
        }
        assert_eq!(steps, 10);
    }

    #[test]
    fn ratio_handles_zero_denominator() {
        assert_eq!(ratio(5, 0), Fixed64::ZERO);
        assert_eq!(ratio(1, 4), f64_to_fixed64(0.25));
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(1.0 / 3.0);
        let b = f64_to_fixed64(1.0 / 3.0);
        assert_eq!(a, b);
        assert_eq!(a * f64_to_fixed64(3.0), b * f64_to_fixed64(3.0));
    }
}
