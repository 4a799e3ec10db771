//! Chat transcript model: the active transcript plus the saved
//! conversations shown in the sidebar.

use noponto_shared::constants::ACTIVITY_LABEL_NOW;
use noponto_shared::types::{Conversation, ConversationId, Message};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ChatTranscript {
    greeting: String,
    messages: Vec<Message>,
    /// Most recently created first.
    conversations: Vec<Conversation>,
    active: Option<ConversationId>,
}

impl ChatTranscript {
    /// A fresh chat showing only `greeting`.
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            messages: vec![Message::bot(greeting.clone())],
            greeting,
            conversations: Vec::new(),
            active: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.active
    }

    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Append `message` to the active transcript.
    ///
    /// The first user message of a fresh chat starts a new conversation and
    /// makes it active. Once a conversation is active, its saved transcript
    /// follows the active one. Returns the id of a newly created
    /// conversation.
    pub fn add_message(&mut self, message: Message) -> Option<ConversationId> {
        let starts_conversation = message.is_user() && self.active.is_none();
        self.messages.push(message);

        if starts_conversation {
            let first = self.messages.last()?;
            let conversation = Conversation::start(first, self.messages.clone());
            let id = conversation.id;
            debug!(conversation = %id, title = %conversation.title, "Conversation started");
            self.conversations.insert(0, conversation);
            self.active = Some(id);
            return Some(id);
        }

        if let Some(id) = self.active {
            if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
                conversation.transcript = self.messages.clone();
                conversation.last_activity_label = ACTIVITY_LABEL_NOW.to_string();
            }
        }

        None
    }

    /// Show the saved conversation `id`. An unknown id leaves everything
    /// unchanged and returns `false`.
    pub fn load_conversation(&mut self, id: ConversationId) -> bool {
        let Some(conversation) = self.conversation(id) else {
            debug!(conversation = %id, "Ignoring unknown conversation");
            return false;
        };
        self.messages = conversation.transcript.clone();
        self.active = Some(id);
        true
    }

    /// Start over with only the greeting. Saved conversations are kept.
    pub fn new_chat(&mut self) {
        self.messages = vec![Message::bot(self.greeting.clone())];
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noponto_shared::types::Sender;

    const GREETING: &str = "Olá!";

    #[test]
    fn test_new_transcript_holds_only_greeting() {
        let t = ChatTranscript::new(GREETING);
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].content, GREETING);
        assert_eq!(t.messages()[0].sender, Sender::Bot);
        assert!(t.conversations().is_empty());
        assert!(t.active_conversation_id().is_none());
    }

    #[test]
    fn test_first_user_message_creates_one_conversation() {
        let mut t = ChatTranscript::new(GREETING);
        let created = t.add_message(Message::user("Qual o horário?"));

        assert_eq!(t.conversations().len(), 1);
        let conversation = &t.conversations()[0];
        assert_eq!(created, Some(conversation.id));
        assert_eq!(t.active_conversation_id(), Some(conversation.id));
        assert_eq!(conversation.title, "Qual o horário?");
        assert_eq!(conversation.last_activity_label, "Agora");
    }

    #[test]
    fn test_long_first_message_title_truncated() {
        let mut t = ChatTranscript::new(GREETING);
        let content = "x".repeat(80);
        t.add_message(Message::user(content));
        assert_eq!(t.conversations()[0].title, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_bot_message_without_active_conversation_creates_nothing() {
        let mut t = ChatTranscript::new(GREETING);
        assert!(t.add_message(Message::bot("aviso")).is_none());
        assert!(t.conversations().is_empty());
        assert_eq!(t.messages().len(), 2);
    }

    #[test]
    fn test_active_conversation_follows_transcript_and_title_is_fixed() {
        let mut t = ChatTranscript::new(GREETING);
        t.add_message(Message::user("primeira"));
        assert!(t.add_message(Message::bot("resposta")).is_none());
        assert!(t.add_message(Message::user("segunda")).is_none());

        assert_eq!(t.conversations().len(), 1);
        let conversation = &t.conversations()[0];
        assert_eq!(conversation.title, "primeira");
        assert_eq!(conversation.transcript, t.messages());
        assert_eq!(conversation.transcript.len(), 4);
    }

    #[test]
    fn test_new_chat_keeps_saved_conversations() {
        let mut t = ChatTranscript::new(GREETING);
        t.add_message(Message::user("primeira"));
        t.new_chat();

        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].content, GREETING);
        assert!(t.active_conversation_id().is_none());
        assert_eq!(t.conversations().len(), 1);
    }

    #[test]
    fn test_newest_conversation_listed_first() {
        let mut t = ChatTranscript::new(GREETING);
        t.add_message(Message::user("primeira"));
        t.new_chat();
        t.add_message(Message::user("segunda"));

        let titles: Vec<&str> = t.conversations().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["segunda", "primeira"]);
    }

    #[test]
    fn test_load_unknown_conversation_is_a_no_op() {
        let mut t = ChatTranscript::new(GREETING);
        t.add_message(Message::user("primeira"));
        let before = t.messages().to_vec();
        let active = t.active_conversation_id();

        assert!(!t.load_conversation(ConversationId::new()));
        assert_eq!(t.messages(), before.as_slice());
        assert_eq!(t.active_conversation_id(), active);
    }

    #[test]
    fn test_new_chat_then_message_then_load_round_trip() {
        let mut t = ChatTranscript::new(GREETING);
        t.add_message(Message::user("antiga"));
        t.new_chat();

        let greeting = t.messages()[0].clone();
        let user_msg = Message::user("nova");
        let id = t.add_message(user_msg.clone()).unwrap();

        t.new_chat();
        assert!(t.load_conversation(id));

        assert_eq!(t.messages(), &[greeting, user_msg][..]);
        assert_eq!(t.active_conversation_id(), Some(id));
    }

    #[test]
    fn test_loaded_conversation_keeps_growing() {
        let mut t = ChatTranscript::new(GREETING);
        let first = t.add_message(Message::user("primeira")).unwrap();
        t.new_chat();
        t.add_message(Message::user("segunda"));

        assert!(t.load_conversation(first));
        t.add_message(Message::user("continuação"));

        let conversation = t.conversation(first).unwrap();
        assert_eq!(conversation.transcript.len(), 3);
        assert_eq!(conversation.transcript[2].content, "continuação");
        assert_eq!(t.conversations().len(), 2);
    }
}
