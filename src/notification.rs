use serde::Serialize;

pub const DEFAULT_ICON_URL: &str = "https://images2.minutemediacdn.com/image/upload/c_fill,g_auto,h_1248,w_2220/f_auto,q_auto,w_1100/v1555925520/shape/mentalfloss/800px-princesslineup.jpg";

/// Incoming-webhook message accepted by Mattermost.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub username: String,
    pub icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    pub color: String,
    pub fields: Vec<Field>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl WebhookPayload {
    pub fn new(username: &str, icon_url: &str) -> Self {
        WebhookPayload {
            username: username.to_string(),
            icon_url: icon_url.to_string(),
            text: String::new(),
            attachments: vec![],
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

impl Attachment {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(color: &str) -> Self {
        Attachment {
            color: color.to_string(),
            fields: vec![],
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_field(mut self, title: &str, value: &str, short: bool) -> Self {
        self.fields.push(Field {
            title: title.to_string(),
            value: value.to_string(),
            short,
        });
        self
    }
}

/// What went wrong for one rejected or failed invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureNotification<'a> {
    pub error: String,
    pub method: &'a str,
    pub path: &'a str,
    pub request_id: &'a str,
    pub body: &'a str,
}

impl<'a> FailureNotification<'a> {
    pub fn message(&self) -> String {
        let mut message = format!(
            "Cloud Auth Failure\n---\nError: {}\nMethod: {}\nPath: {}\nRequest ID: {}\n",
            self.error, self.method, self.path, self.request_id
        );
        if !self.body.is_empty() {
            message.push_str(&format!("```\n{}\n```", self.body));
        }
        message
    }

    pub fn to_payload(&self) -> WebhookPayload {
        WebhookPayload::new("Cloud Auth", DEFAULT_ICON_URL).with_text(self.message())
    }
}
