//! Validated, ordered list of message texts a job cycles through.

use serde::Serialize;

use crate::error::JobError;

/// Ordered, non-empty list of message texts.
///
/// Entries are trimmed and blank entries are dropped on construction, so a
/// `MessageList` can never be empty and never contains blank lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageList(Vec<String>);

impl MessageList {
    /// Build from caller-supplied entries, discarding blank ones.
    pub fn new<I, S>(entries: I) -> Result<Self, JobError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let messages: Vec<String> = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if messages.is_empty() {
            return Err(JobError::validation(
                "message list is empty or only blank lines",
            ));
        }
        Ok(Self(messages))
    }

    /// Parse line-delimited text (one message per line).
    pub fn parse(text: &str) -> Result<Self, JobError> {
        Self::new(text.lines())
    }

    /// Message for the 0-based cycle index; wraps around the list.
    pub fn message_for_attempt(&self, index: u64) -> &str {
        let len = self.0.len() as u64;
        &self.0[(index % len) as usize]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    // Never true; kept for the `len`/`is_empty` convention.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entries_are_discarded() {
        let list = MessageList::new(["hello", "  ", "", " world "]).unwrap();
        assert_eq!(list.as_slice(), &["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn all_blank_is_rejected() {
        assert!(matches!(
            MessageList::new(["", "   ", "\t"]),
            Err(JobError::Validation(_))
        ));
        assert!(matches!(
            MessageList::new(Vec::<String>::new()),
            Err(JobError::Validation(_))
        ));
    }

    #[test]
    fn parse_handles_crlf_and_blank_lines() {
        let list = MessageList::parse("first\r\n\r\nsecond\n\n  third  \n").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.message_for_attempt(0), "first");
        assert_eq!(list.message_for_attempt(1), "second");
        assert_eq!(list.message_for_attempt(2), "third");
    }

    #[test]
    fn rotation_wraps_around() {
        let list = MessageList::new(["a", "b"]).unwrap();
        let seen: Vec<&str> = (0..5).map(|i| list.message_for_attempt(i)).collect();
        assert_eq!(seen, vec!["a", "b", "a", "b", "a"]);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the k-th attempt (1-indexed) uses messages[(k-1) mod N].
            #[test]
            fn kth_attempt_uses_rotated_message(
                messages in prop::collection::vec("[a-z][a-z0-9 ]{0,15}[a-z0-9]", 1..12),
                k in 1u64..10_000,
            ) {
                let list = MessageList::new(&messages).unwrap();
                let n = messages.len() as u64;
                let expected = messages[((k - 1) % n) as usize].trim();
                prop_assert_eq!(list.message_for_attempt(k - 1), expected);
            }

            /// Property: parsing never yields blank messages and never loses non-blank lines.
            #[test]
            fn parse_keeps_exactly_non_blank_lines(
                lines in prop::collection::vec("[ a-z]{0,8}", 0..20),
            ) {
                let text = lines.join("\n");
                let expected: Vec<String> = lines
                    .iter()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .collect();

                match MessageList::parse(&text) {
                    Ok(list) => prop_assert_eq!(list.as_slice(), expected.as_slice()),
                    Err(_) => prop_assert!(expected.is_empty()),
                }
            }
        }
    }
}
