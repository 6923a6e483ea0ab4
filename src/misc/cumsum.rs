/// Reverse cumulative sum: `out[i] = seq[i] + gamma * out[i + 1]`.
///
/// With `gamma == 1.0` this is the plain suffix sum used for rewards-to-go.
pub fn cumsum_rev(seq: &[f64], gamma: f64) -> Vec<f64> {
    let mut out: Vec<f64> = seq
        .iter()
        .rev()
        .scan(0.0, |acc, &x| {
            *acc = *acc * gamma + x;
            Some(*acc)
        })
        .collect();
    out.reverse();
    out
}
