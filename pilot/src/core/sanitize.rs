//! Distilling free-text decision replies into legal input tokens.

use crate::core::types::InputToken;

/// Result of sanitizing one reply. Both variants yield a sendable token; the
/// split lets callers tell a clean parse from a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sanitized {
    /// A grammar-valid line was found in the reply.
    Token(InputToken),
    /// No line matched; fall back to the universal `u` recovery token.
    Defaulted,
}

impl Sanitized {
    pub fn into_token(self) -> InputToken {
        match self {
            Sanitized::Token(token) => token,
            Sanitized::Defaulted => InputToken::undo(),
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Sanitized::Defaulted)
    }
}

/// Extract the decision token from a reply, scanning lines from the end.
///
/// Generative replies typically end with the decision line after explanatory
/// prose; scanning backward tolerates verbose preambles while rejecting
/// chatter. Total: some token is always produced, never an error.
pub fn sanitize(reply: &str) -> Sanitized {
    reply
        .lines()
        .rev()
        .find_map(|line| InputToken::parse(line.trim()))
        .map_or(Sanitized::Defaulted, Sanitized::Token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LEGAL_INPUT;

    fn token(reply: &str) -> String {
        sanitize(reply).into_token().as_str().to_string()
    }

    #[test]
    fn empty_reply_defaults_to_undo() {
        assert_eq!(sanitize(""), Sanitized::Defaulted);
        assert_eq!(token(""), "u");
    }

    #[test]
    fn prose_only_reply_defaults_to_undo() {
        let reply = "The query asks for a program that evaluates to a pair.\nLet me think.";
        assert_eq!(sanitize(reply), Sanitized::Defaulted);
        assert_eq!(token(reply), "u");
    }

    #[test]
    fn last_matching_line_wins_over_prose() {
        let reply = "I will pick branch 2, then sub-branch 1.\n2.1";
        assert_eq!(token(reply), "2.1");
    }

    #[test]
    fn trailing_chatter_after_the_decision_is_skipped() {
        let reply = "2.1.2\nLet me know how the search goes!";
        assert_eq!(token(reply), "2.1.2");
    }

    #[test]
    fn later_decision_overrides_earlier_one() {
        assert_eq!(token("1\nOn second thought:\n3"), "3");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_per_line() {
        assert_eq!(token("picking a branch:\n  2.1  \n"), "2.1");
    }

    #[test]
    fn undo_alias_is_returned_as_written() {
        assert_eq!(token("This branch is hopeless.\nundo"), "undo");
        assert_eq!(token("u"), "u");
    }

    #[test]
    fn inline_tokens_do_not_count() {
        // The grammar applies to the entire trimmed line.
        assert_eq!(token("I choose 2.1 here"), "u");
    }

    #[test]
    fn output_always_satisfies_the_grammar() {
        let replies = ["", "garbage", "2.1", "undo\n", "a\nb\nc", "u2", "1.2.3.4"];
        for reply in replies {
            let sent = token(reply);
            assert!(LEGAL_INPUT.is_match(&sent), "invalid token {sent:?}");
        }
    }
}
