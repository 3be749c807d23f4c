// crates/pv_algo/src/stats.rs
//! Small descriptive statistics used by the aggregator and the z-table.

/// Median of integer scores (mean of the two middle values for even length).
/// `None` for an empty slice.
pub fn median(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut v = values.to_vec();
    v.sort_unstable();
    let mid = v.len() / 2;
    Some(if v.len() % 2 == 1 {
        f64::from(v[mid])
    } else {
        (f64::from(v[mid - 1]) + f64::from(v[mid])) / 2.0
    })
}

pub fn mean(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().map(|&x| i64::from(x)).sum();
    Some(sum as f64 / values.len() as f64)
}

/// Population standard deviation (divides by N).
pub fn pstdev(values: &[i32]) -> Option<f64> {
    let m = mean(values)?;
    let ss: f64 = values
        .iter()
        .map(|&x| {
            let d = f64::from(x) - m;
            d * d
        })
        .sum();
    Some((ss / values.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_even_empty() {
        assert_eq!(median(&[50, -50, 0]), Some(0.0));
        assert_eq!(median(&[0, -50]), Some(-25.0));
        assert_eq!(median(&[7]), Some(7.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn population_std() {
        assert_eq!(mean(&[60, -40]), Some(10.0));
        assert_eq!(pstdev(&[60, -40]), Some(50.0));
        assert_eq!(pstdev(&[5]), Some(0.0));
        assert_eq!(pstdev(&[3, 3, 3]), Some(0.0));
        assert_eq!(pstdev(&[]), None);
    }
}
