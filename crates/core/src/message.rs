//! Transcript entry domain types.
//!
//! An [`Entry`] is the unit that flows through the whole system: the user
//! types one, the assembler threads them into a request, the remote service
//! answers with one, and the store keeps them in pairs.

use serde::{Deserialize, Serialize};

/// The role of an entry's author in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The fixed system preamble
    System,
    /// The end user
    User,
    /// The remote completion service
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        };
        f.write_str(s)
    }
}

/// A single typed utterance: who said it and what was said.
///
/// Assistant text may be empty when the remote service returns an empty
/// completion; that is accepted as-is, not treated as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Who authored this entry
    pub role: Role,

    /// The text content
    pub text: String,
}

impl Entry {
    /// Create a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create an assistant entry.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// Create a system entry (the preamble).
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_roles() {
        assert_eq!(Entry::user("hi").role, Role::User);
        assert_eq!(Entry::assistant("hello").role, Role::Assistant);
        assert_eq!(Entry::system("rules").role, Role::System);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Entry::user("hi")).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let json = serde_json::to_string(&Entry::system("p")).unwrap();
        assert!(json.contains("\"role\":\"system\""));
    }

    #[test]
    fn entry_serialization_roundtrip() {
        let entry = Entry::assistant("Salve!");
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn empty_assistant_text_is_allowed() {
        let entry = Entry::assistant("");
        assert_eq!(entry.role, Role::Assistant);
        assert!(entry.text.is_empty());
    }
}
