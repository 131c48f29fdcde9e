//! Atomic claim splitting

/// Claims must have more words than this
const MIN_CLAIM_WORDS: usize = 4;

/// Claims must have fewer words than this
const MAX_CLAIM_WORDS: usize = 30;

/// Split an answer into at most `max_claims` declarative claims
///
/// Sentences are cut on `.`, `!`, `?` and `;`. Fragments that are too short
/// or too long to be a single checkable statement are dropped. When nothing
/// survives, the whole answer is the only claim.
///
/// ```
/// use verity_engine::claims::split_claims;
///
/// let claims = split_claims("Paris is the capital of France. It is large.", 3);
/// assert_eq!(claims, vec!["Paris is the capital of France"]);
///
/// assert_eq!(split_claims("Berlin.", 3), vec!["Berlin."]);
/// ```
pub fn split_claims(answer: &str, max_claims: usize) -> Vec<String> {
    let claims: Vec<String> = answer
        .split(['.', '!', '?', ';'])
        .map(str::trim)
        .filter(|part| {
            let words = part.split_whitespace().count();
            words > MIN_CLAIM_WORDS && words < MAX_CLAIM_WORDS
        })
        .take(max_claims.max(1))
        .map(str::to_string)
        .collect();

    if claims.is_empty() {
        vec![answer.trim().to_string()]
    } else {
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_claim_count() {
        let answer = "Neil Armstrong walked on the Moon. Apollo 11 launched in July 1969. \
                      The crew returned safely to Earth. Buzz Aldrin joined him outside.";
        let claims = split_claims(answer, 2);
        assert_eq!(
            claims,
            vec!["Neil Armstrong walked on the Moon", "Apollo 11 launched in July 1969"]
        );
    }

    #[test]
    fn test_drops_short_fragments() {
        let claims = split_claims("Yes. The capital of France is Berlin!", 3);
        assert_eq!(claims, vec!["The capital of France is Berlin"]);
    }

    #[test]
    fn test_falls_back_to_whole_answer() {
        assert_eq!(split_claims("  Jeff Bezos founded SpaceX.  ", 3), vec!["Jeff Bezos founded SpaceX."]);
    }

    #[test]
    fn test_zero_max_claims_still_yields_one() {
        let claims = split_claims("Elon Musk founded SpaceX in 2002. Tesla followed later on.", 0);
        assert_eq!(claims.len(), 1);
    }
}
