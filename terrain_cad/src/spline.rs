//! Uniform Catmull-Rom interpolation used by the smooth loft.

/// Samples a uniform Catmull-Rom curve through `values`.
///
/// Each span between adjacent knots is subdivided into `refine` segments and
/// the final knot is appended, so the output holds
/// `(values.len() - 1) * refine + 1` samples. The curve passes exactly
/// through every input knot. Tangents are central differences with one-sided
/// differences at the ends, which keeps linear input exactly linear.
pub fn catmull_rom_resample(values: &[f64], refine: usize) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return values.to_vec();
    }
    let refine = refine.max(1);

    let tangent = |i: usize| -> f64 {
        if i == 0 {
            values[1] - values[0]
        } else if i == n - 1 {
            values[n - 1] - values[n - 2]
        } else {
            (values[i + 1] - values[i - 1]) / 2.0
        }
    };

    let mut out = Vec::with_capacity((n - 1) * refine + 1);
    for i in 0..n - 1 {
        let v0 = values[i];
        let v1 = values[i + 1];
        let m0 = tangent(i);
        let m1 = tangent(i + 1);
        for k in 0..refine {
            let t = k as f64 / refine as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            out.push(h00 * v0 + h10 * m0 + h01 * v1 + h11 * m1);
        }
    }
    out.push(values[n - 1]);
    out
}
