use crate::Generator;
use hop_core::Alias;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Draws aliases uniformly from `[A-Za-z0-9]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl Generator for RandomGenerator {
    fn generate(&self, length: usize) -> Alias {
        let mut rng = rand::thread_rng();
        let candidate: String = (0..length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        // The alphanumeric alphabet is a subset of the one `Alias::new` accepts.
        Alias::new_unchecked(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn produces_requested_length() {
        for length in [1, 6, 32] {
            assert_eq!(RandomGenerator.generate(length).as_str().len(), length);
        }
    }

    #[test]
    fn candidates_are_valid_aliases() {
        for _ in 0..100 {
            let candidate = RandomGenerator.generate(6);
            assert!(Alias::new(candidate.as_str()).is_ok());
            assert!(candidate.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn candidates_vary() {
        let drawn: HashSet<String> = (0..50)
            .map(|_| RandomGenerator.generate(8).as_str().to_owned())
            .collect();
        assert!(drawn.len() > 45);
    }
}
