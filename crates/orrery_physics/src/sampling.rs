use rand::Rng;

/// Inverse-CDF draw from an exponential distribution: `-mean * ln(u)`
///
/// `u` is taken from (0, 1] so the result is finite and never negative.
pub fn sample_exponential<R: Rng + ?Sized>(mean: f32, rng: &mut R) -> f32 {
    let u: f64 = 1.0 - rng.gen_range(0.0..1.0);
    (-(mean as f64) * u.ln()) as f32
}

/// Exponential draw whose median equals `half_life`
pub fn sample_half_life<R: Rng + ?Sized>(half_life: f32, rng: &mut R) -> f32 {
    sample_exponential(half_life / std::f32::consts::LN_2, rng)
}

/// Uniform integer in an inclusive `[lo, hi]` range; `lo` when the range is inverted
pub fn sample_count<R: Rng + ?Sized>(range: [u32; 2], rng: &mut R) -> u32 {
    let [lo, hi] = range;
    if hi <= lo { lo } else { rng.gen_range(lo..=hi) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_exponential_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 10_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let x = sample_exponential(10.0, &mut rng);
            assert!(x >= 0.0 && x.is_finite());
            sum += x as f64;
        }
        let mean = sum / n as f64;
        assert!((mean - 10.0).abs() < 0.5, "empirical mean {mean}");
    }

    #[test]
    fn test_half_life_median() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut samples: Vec<f32> = (0..10_001).map(|_| sample_half_life(5.0, &mut rng)).collect();
        samples.sort_by(|a, b| a.total_cmp(b));
        let median = samples[samples.len() / 2];
        assert!((median - 5.0).abs() < 0.4, "median {median}");
    }

    #[test]
    fn test_sample_count_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let n = sample_count([2, 8], &mut rng);
            assert!((2..=8).contains(&n));
        }
        assert_eq!(sample_count([3, 3], &mut rng), 3);
        assert_eq!(sample_count([5, 1], &mut rng), 5);
    }
}
