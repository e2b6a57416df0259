//! # Common Utilities
//!
//! Shared helpers used throughout the codebase.

/// Normalize names for consistent comparison (lowercases and strips
/// everything that is not an ASCII letter or digit).
///
/// Used for move/species/ability/item identifiers so that display names
/// ("Stealth Rock", "U-turn", "Farfetch'd") and data-file ids compare equal.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Clamp a fraction to [0, 1].
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert scores into softmax probabilities with temperature `tau` and a
/// probability floor.
///
/// A non-finite total falls back to the uniform distribution over the inputs
/// so a single runaway score can never poison an action distribution.
pub fn softmax_probs(scores: &[f32], tau: f32, min_prob: f32) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let tau = tau.max(1e-6);
    let m = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores
        .iter()
        .map(|s| (((s - m) / tau).clamp(-50.0, 50.0)).exp())
        .collect();
    let total: f32 = exps.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        let p = 1.0 / scores.len() as f32;
        return vec![p; scores.len()];
    }
    let mut probs: Vec<f32> = exps.iter().map(|e| e / total).collect();
    if min_prob > 0.0 {
        for p in probs.iter_mut() {
            *p = p.max(min_prob);
        }
        let z: f32 = probs.iter().sum();
        for p in probs.iter_mut() {
            *p /= z;
        }
    }
    probs
}

/// Sample an index from softmax-weighted scores using the provided RNG.
pub fn sample_softmax(scores: &[f32], tau: f32, rng: &mut impl rand::Rng) -> usize {
    if scores.len() <= 1 {
        return 0;
    }
    let probs = softmax_probs(scores, tau, 0.0);
    let r: f32 = rng.gen();
    let mut acc = 0.0;
    for (i, p) in probs.iter().enumerate() {
        acc += p;
        if acc >= r {
            return i;
        }
    }
    scores.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Shell Armor"), "shellarmor");
        assert_eq!(normalize_name("Air-Lock"), "airlock");
        assert_eq!(normalize_name("U-turn"), "uturn");
        assert_eq!(normalize_name("Farfetch'd"), "farfetchd");
        assert_eq!(normalize_name("Mr. Mime"), "mrmime");
        assert_eq!(normalize_name("NORMAL"), "normal");
    }

    #[test]
    fn test_normalize_name_edge_cases() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("---"), "");
        assert_eq!(normalize_name("A-B'C.D E"), "abcde");
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax_probs(&[1.0, 5.0, -3.0], 8.0, 1e-6);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| *p >= 1e-6));
    }

    #[test]
    fn test_softmax_nonfinite_falls_back_to_uniform() {
        let probs = softmax_probs(&[f32::NAN, 1.0, 2.0], 8.0, 0.0);
        for p in probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sample_softmax_prefers_high_scores() {
        let mut rng = StdRng::seed_from_u64(7);
        let scores = [0.0, 100.0, 0.0];
        let mut hits = 0;
        for _ in 0..200 {
            if sample_softmax(&scores, 4.0, &mut rng) == 1 {
                hits += 1;
            }
        }
        assert!(hits > 190);
    }
}
