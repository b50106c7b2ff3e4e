pub const GREETING: &str = "Hello! I am ready to help you convert your pseudocode to code.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
}

/// Append-only conversation in the order it happened.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Transcript {
    fn default() -> Self {
        let mut transcript = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        transcript.push(Role::Assistant, GREETING.to_string());
        transcript
    }
}

impl Transcript {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, role: Role, content: String) -> &ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage { id, role, content });
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Transcript, GREETING};

    #[test]
    fn opens_with_greeting() {
        let transcript = Transcript::default();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].content, GREETING);
    }

    #[test]
    fn ids_increase_in_conversation_order() {
        let mut transcript = Transcript::default();
        let first = transcript.push(Role::User, "hi".to_string()).id;
        let second = transcript.push(Role::Assistant, "hello".to_string()).id;
        assert!(second > first);
        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    }
}
