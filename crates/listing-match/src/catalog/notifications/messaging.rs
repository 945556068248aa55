/// Outbound messaging channel. Implementations only build the link that
/// opens a pre-addressed conversation; delivery is up to the client.
pub trait MessagingChannel: Send + Sync {
    fn conversation_url(&self, contact_handle: &str, message: &str) -> String;
}

/// Click-to-chat links of the form `{base}/{digits}?text={message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppChannel {
    base_url: String,
}

impl WhatsAppChannel {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for WhatsAppChannel {
    fn default() -> Self {
        Self::new("https://wa.me")
    }
}

impl MessagingChannel for WhatsAppChannel {
    fn conversation_url(&self, contact_handle: &str, message: &str) -> String {
        let digits: String = contact_handle
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        format!(
            "{}/{}?text={}",
            self.base_url,
            digits,
            urlencoding::encode(message)
        )
    }
}
