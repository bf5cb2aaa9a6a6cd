use crate::token::Token;

/// A query mentioning randomness anywhere ("random", "randomly", ...)
/// asks for a surprise pick.
pub fn is_random_request(tokens: &[Token]) -> bool {
    tokens.iter().any(|token| token.text.contains("random"))
}

/// Thanks are matched on whole tokens only, so "thanksgiving" is not a
/// thank-you.
pub fn is_gratitude(tokens: &[Token], keywords: &[String]) -> bool {
    tokens
        .iter()
        .any(|token| keywords.iter().any(|keyword| *keyword == token.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn keywords() -> Vec<String> {
        ["thank", "thanks", "thx", "ty", "merci"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn random_anywhere_in_a_token() {
        assert!(is_random_request(&tokenize("show me a random robot")));
        assert!(is_random_request(&tokenize("randomly pick one")));
        assert!(!is_random_request(&tokenize("show me a robot")));
    }

    #[test]
    fn gratitude_needs_an_exact_token() {
        assert!(is_gratitude(&tokenize("thanks little robot"), &keywords()));
        assert!(is_gratitude(&tokenize("merci!"), &keywords()));
        assert!(is_gratitude(&tokenize("ty"), &keywords()));
        assert!(!is_gratitude(&tokenize("happy thanksgiving"), &keywords()));
        assert!(!is_gratitude(&tokenize("thankful for you"), &keywords()));
    }
}
