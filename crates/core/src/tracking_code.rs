//! Tracking code generation.
//!
//! Codes are short enough to read out over the phone: the `PSJ` prefix
//! followed by seven characters from `[A-Z0-9]`. A candidate is only handed
//! out after the store confirms no report carries it yet. That check is
//! advisory (another submitter can claim the same code before our insert);
//! the `uq_reports_unique_code` constraint is the backstop.

use rand::Rng;

use crate::store::ReportStore;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed prefix of every tracking code.
pub const CODE_PREFIX: &str = "PSJ";

/// Number of random characters after the prefix.
pub const CODE_SUFFIX_LENGTH: usize = 7;

/// Total length of a tracking code.
pub const CODE_LENGTH: usize = CODE_PREFIX.len() + CODE_SUFFIX_LENGTH;

/// Characters a code suffix is drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

// ---------------------------------------------------------------------------
// Randomness
// ---------------------------------------------------------------------------

/// Uniform index source. Does not need to be cryptographically secure.
pub trait RandomSource: Send + Sync {
    /// Return an index in `0..bound`.
    fn pick(&self, bound: usize) -> usize;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CodeGenerationError {
    #[error("Could not generate a unique tracking code after {attempts} attempts")]
    ExhaustedAttempts { attempts: u32 },
}

/// Draw one candidate code without checking the store.
pub fn generate_candidate(random: &dyn RandomSource) -> String {
    let mut code = String::with_capacity(CODE_LENGTH);
    code.push_str(CODE_PREFIX);
    for _ in 0..CODE_SUFFIX_LENGTH {
        let idx = random.pick(CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[idx]));
    }
    code
}

/// Whether `code` has the shape of a tracking code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code.starts_with(CODE_PREFIX)
        && code[CODE_PREFIX.len()..]
            .bytes()
            .all(|b| CODE_ALPHABET.contains(&b))
}

/// Generate a code that no stored report carries.
///
/// Each attempt draws a fresh candidate and looks it up. A lookup error
/// counts as a failed attempt and the loop moves on to the next candidate.
pub async fn generate_unique_code<S>(
    store: &S,
    random: &dyn RandomSource,
    max_attempts: u32,
) -> Result<String, CodeGenerationError>
where
    S: ReportStore + ?Sized,
{
    for attempt in 1..=max_attempts {
        let candidate = generate_candidate(random);
        match store.find_report_by_code(&candidate).await {
            Ok(None) => return Ok(candidate),
            Ok(Some(_)) => {
                tracing::debug!(attempt, code = %candidate, "Tracking code already taken");
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Tracking code lookup failed");
            }
        }
    }

    Err(CodeGenerationError::ExhaustedAttempts {
        attempts: max_attempts,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::test_support::{Failures, RecordingStore, SequenceRandom, StoreCall};

    #[test]
    fn candidates_have_tracking_code_shape() {
        for _ in 0..200 {
            let code = generate_candidate(&ThreadRandom);
            assert_eq!(code.len(), 10);
            assert!(code.starts_with("PSJ"));
            assert!(
                code[3..]
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected character in {code}"
            );
            assert!(is_valid_code(&code));
        }
    }

    #[test]
    fn candidate_maps_picks_onto_alphabet() {
        let random = SequenceRandom::new(vec![0, 25, 26, 35, 1, 2, 3]);
        assert_eq!(generate_candidate(&random), "PSJAZ09BCD");
    }

    #[test]
    fn code_shape_validation() {
        assert!(is_valid_code("PSJ0A1B2C3"));
        assert!(!is_valid_code("PSJ0A1B2C"));
        assert!(!is_valid_code("PSJ0A1B2C3D"));
        assert!(!is_valid_code("ABC0A1B2C3"));
        assert!(!is_valid_code("PSJ0a1b2c3"));
        assert!(!is_valid_code("PSJ0A1B2-3"));
    }

    #[tokio::test]
    async fn first_free_candidate_is_returned() {
        let store = RecordingStore::new();
        let code = generate_unique_code(&store, &ThreadRandom, DEFAULT_MAX_ATTEMPTS)
            .await
            .unwrap();

        assert!(is_valid_code(&code));
        assert_eq!(store.calls(), vec![StoreCall::FindByCode(code)]);
    }

    #[tokio::test]
    async fn always_taken_exhausts_attempts() {
        let store = RecordingStore::failing(Failures {
            every_code_taken: true,
            ..Failures::default()
        });

        let result = generate_unique_code(&store, &ThreadRandom, 4).await;

        assert_matches!(
            result,
            Err(CodeGenerationError::ExhaustedAttempts { attempts: 4 })
        );
        assert_eq!(store.lookup_count(), 4);
    }

    #[tokio::test]
    async fn collision_draws_a_new_candidate() {
        // First candidate is PSJAAAAAAA, second PSJBBBBBBB.
        let random = SequenceRandom::new(vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1]);
        let store = RecordingStore::with_taken_codes(&["PSJAAAAAAA"]);

        let code = generate_unique_code(&store, &random, 3).await.unwrap();

        assert_eq!(code, "PSJBBBBBBB");
        assert_eq!(store.lookup_count(), 2);
    }

    #[tokio::test]
    async fn lookup_errors_consume_attempts() {
        let store = RecordingStore::failing(Failures {
            lookup: Some("connection reset by peer"),
            ..Failures::default()
        });

        let result = generate_unique_code(&store, &ThreadRandom, 3).await;

        assert_matches!(
            result,
            Err(CodeGenerationError::ExhaustedAttempts { attempts: 3 })
        );
        assert_eq!(store.lookup_count(), 3);
    }

    #[tokio::test]
    async fn zero_budget_fails_without_lookup() {
        let store = RecordingStore::new();
        let result = generate_unique_code(&store, &ThreadRandom, 0).await;

        assert_matches!(result, Err(CodeGenerationError::ExhaustedAttempts { .. }));
        assert!(store.calls().is_empty());
    }
}
