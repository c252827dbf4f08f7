/*!
Helpers for the double-precision tests.

Doubles that went through the GL are compared by bit pattern: a value that is "close enough"
means that the implementation converted it to single precision somewhere on the way.

*/
use std::iter;

/// An increment small enough to be lost if a value goes through a `float`.
pub const LSB: f64 = 0.00000000010000111022302462516E0;

/// Renders the bit pattern of a double, most significant word first (`0x4014000000000212`).
pub fn double_to_hex(value: f64) -> String {
    format!("0x{:016X}", value.to_bits())
}

/// Renders the bit pattern of a float (`0x3F800000`).
pub fn float_to_hex(value: f32) -> String {
    format!("0x{:08X}", value.to_bits())
}

/// Returns true if both doubles have the same bit pattern.
#[inline]
pub fn bits_equal(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

/// Formats like C's `%.14g`.
pub fn format_g14(value: f64) -> String {
    format_g(value, 14)
}

/// Formats like C's `%.<precision>g`: the shortest of fixed and scientific notation for that
/// many significant digits, without trailing zeros.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    let precision = precision.max(1);

    // the exponent must be the one of the rounded value
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        format!("{}e{}{:02}", strip_trailing_zeros(mantissa),
                if exponent < 0 { '-' } else { '+' }, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_owned()
    }
}

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// The `n` samples `1 + LSB`, `2 + LSB`, and so on.
pub fn lsb_samples(n: usize) -> Vec<f64> {
    (0 .. n).map(|i| i as f64 + 1.0 + LSB).collect()
}

/// Column-major `dmat3` whose elements all have the `LSB` bit set.
pub fn dmat3_samples() -> [f64; 9] {
    let mut data = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 100.0, 101.0, 102.0];
    for value in data.iter_mut() {
        *value += 1.0 + LSB;
    }
    data
}

/// Formats one line comparing an original and a fetched value.
pub fn comparison_line(index: usize, original: f64, fetched: f64) -> String {
    format!("{} - Original = {}[{}] Fetched = {}[{}]", index, format_g14(original),
            double_to_hex(original), format_g14(fetched), double_to_hex(fetched))
}

/// Formats the doubles of a buffer in rows of four, each value followed by its bit pattern.
pub fn dump_rows(values: &[f64]) -> Vec<String> {
    values.chunks(4)
          .enumerate()
          .map(|(row, chunk)| {
              let cells = chunk.iter()
                               .map(|&v| format!("{} [{}]", format_g14(v), double_to_hex(v)))
                               .collect::<Vec<_>>();
              format!("read[{}] = ({})", row * 4, cells.join(",  "))
          })
          .collect()
}

/// Returns the indices at which `fetched` differs from `expected`, bit for bit. Missing
/// values count as different.
pub fn mismatches(expected: &[f64], fetched: &[f64]) -> Vec<usize> {
    let fetched = fetched.iter().map(Some).chain(iter::repeat(None));

    expected.iter()
            .zip(fetched)
            .enumerate()
            .filter(|&(_, (&e, f))| !f.map_or(false, |&f| bits_equal(e, f)))
            .map(|(i, _)| i)
            .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_patterns() {
        assert_eq!(double_to_hex(3.50000000000727684579260312603E2), "0x4075E00000003202");
        assert_eq!(double_to_hex(5.00000000000047073456244106637E0), "0x4014000000000212");
        assert_eq!(double_to_hex(0.0), "0x0000000000000000");
        assert_eq!(float_to_hex(1.0), "0x3F800000");
    }

    #[test]
    fn bit_equality() {
        assert!(bits_equal(1.0 + LSB, 1.0 + LSB));
        assert!(!bits_equal(1.0 + LSB, 1.0));
        assert!(!bits_equal(0.0, -0.0));
        assert!(bits_equal(f64::NAN, f64::NAN));
    }

    #[test]
    fn lsb_is_lost_in_single_precision() {
        for value in lsb_samples(8) {
            assert!(!bits_equal(value, value as f32 as f64));
        }
    }

    #[test]
    fn g14() {
        assert_eq!(format_g14(3.50000000000727684579260312603E2), "350.00000000073");
        assert_eq!(format_g14(5.00000000000047073456244106637E0), "5.0000000000005");
        assert_eq!(format_g14(1.0 + LSB), "1.0000000001");
        assert_eq!(format_g14(100.0), "100");
        assert_eq!(format_g14(0.0001), "0.0001");
        assert_eq!(format_g14(1.5e-5), "1.5e-05");
        assert_eq!(format_g14(123456789012344.0), "1.2345678901234e+14");
        assert_eq!(format_g14(0.0), "0");
    }

    #[test]
    fn samples() {
        let samples = lsb_samples(5);
        assert_eq!(samples.len(), 5);
        assert_eq!(double_to_hex(samples[0]), "0x3FF000000006DF3D");

        let dmat3 = dmat3_samples();
        assert!(bits_equal(dmat3[0], 1.0 + LSB));
        assert_eq!(double_to_hex(dmat3[8]), "0x4059C00000001B7D");
    }

    #[test]
    fn mismatch_indices() {
        let expected = [1.0, 2.0, 3.0];
        assert!(mismatches(&expected, &[1.0, 2.0, 3.0]).is_empty());
        assert_eq!(mismatches(&expected, &[1.0, 2.5, 3.0]), vec![1]);
        assert_eq!(mismatches(&expected, &[1.0]), vec![1, 2]);
    }

    #[test]
    fn rows_of_four() {
        let mut values = [0.0; 8];
        values[0] = 3.50000000000727684579260312603E2;

        let rows = dump_rows(&values);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("read[0] = (350.00000000073 [0x4075E00000003202],  0 ["));
        assert!(rows[1].starts_with("read[4] = (0 [0x0000000000000000]"));
    }
}
