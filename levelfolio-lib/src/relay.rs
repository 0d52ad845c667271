//! Visitor messages, forwarded to a third-party form relay rather than the content store.

use std::{fmt::Display, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How long the success or error notice stays up before the form returns to idle.
pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

pub const SUCCESS_NOTICE: &str = "Message sent successfully! I'll get back to you soon.";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("`{0}` is not an email address")]
    InvalidEmail(String),
    #[error("a message is already being sent")]
    Busy,
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay responded with status {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(rename = "_replyto")]
    pub reply_to: String,
    #[serde(rename = "_subject")]
    pub relay_subject: String,
}

/// Something that can deliver a [`Submission`].
#[async_trait]
pub trait Relay: std::fmt::Debug + Send + Sync {
    async fn send(&self, submission: &Submission) -> Result<()>;
}

/// Posts submissions as JSON to a form relay endpoint. Any 2xx response is a success.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: Client,
    endpoint: String,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn send(&self, submission: &Submission) -> Result<()> {
        debug!("Relaying message from {}", submission.email);

        let status = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await?
            .status();

        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
}

impl Status {
    pub fn button_label(self) -> &'static str {
        match self {
            Status::Idle => "Send Message",
            Status::Sending => "Sending...",
            Status::Success => "Sent!",
            Status::Error => "Failed - Retry",
        }
    }
}

/// The contact form and its submission state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    status: Status,
}

impl ContactForm {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::MissingField(field));
        }
        if !self.email.contains('@') {
            return Err(Error::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    /// Validate and enter the sending state, returning the payload to deliver.
    pub fn submit(&mut self) -> Result<Submission> {
        if self.status == Status::Sending {
            return Err(Error::Busy);
        }
        self.validate()?;
        self.status = Status::Sending;

        Ok(Submission {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            reply_to: self.email.clone(),
            relay_subject: format!("Portfolio Contact: {}", self.subject),
        })
    }

    /// Record the delivery outcome and hand it back. A success clears the fields.
    pub fn finished<E: Display>(
        &mut self,
        result: std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        match &result {
            Ok(()) => {
                info!("Contact message delivered");
                *self = Self {
                    status: Status::Success,
                    ..Self::default()
                };
            }
            Err(err) => {
                warn!("Contact message could not be delivered: {err}");
                self.status = Status::Error;
            }
        }
        result
    }

    /// Return to idle once the notice has been shown. Ignored while a message is in flight.
    pub fn reset_status(&mut self) {
        if self.status != Status::Sending {
            self.status = Status::Idle;
        }
    }

    /// Submit through `relay` and record the outcome.
    pub async fn send(&mut self, relay: &dyn Relay) -> Result<()> {
        let submission = self.submit()?;
        let result = relay.send(&submission).await;
        self.finished(result)
    }
}

/// The text of the error notice, pointing visitors at `fallback_email`.
pub fn error_notice(fallback_email: &str) -> String {
    format!("Failed to send message. Please try again or contact directly at {fallback_email}")
}

#[cfg(test)]
mod test {
    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        sent: Mutex<Vec<Submission>>,
        fail: bool,
    }

    #[async_trait]
    impl Relay for Recorder {
        async fn send(&self, submission: &Submission) -> Result<()> {
            if self.fail {
                return Err(Error::Status(500));
            }
            self.sent.lock().push(submission.clone());
            Ok(())
        }
    }

    fn filled() -> ContactForm {
        ContactForm {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            subject: "Hello".into(),
            message: "Nice portfolio".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload() {
        let submission = filled().submit().unwrap();
        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["_replyto"], "sam@example.com");
        assert_eq!(json["_subject"], "Portfolio Contact: Hello");
        assert_eq!(json["message"], "Nice portfolio");
    }

    #[test]
    fn test_validation() {
        let mut form = filled();
        form.subject = " ".into();
        assert!(matches!(form.submit(), Err(Error::MissingField("subject"))));
        assert_eq!(form.status(), Status::Idle);

        let mut form = filled();
        form.email = "sam.example.com".into();
        assert!(matches!(form.validate(), Err(Error::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_success_clears_fields() {
        let relay = Recorder::default();
        let mut form = filled();

        form.send(&relay).await.unwrap();

        assert_eq!(form.status(), Status::Success);
        assert!(form.name.is_empty() && form.message.is_empty());
        assert_eq!(relay.sent.lock().len(), 1);

        form.reset_status();
        assert_eq!(form.status(), Status::Idle);
    }

    #[tokio::test]
    async fn test_failure_keeps_fields() {
        let relay = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut form = filled();

        assert!(form.send(&relay).await.is_err());

        assert_eq!(form.status(), Status::Error);
        assert_eq!(form.name, "Sam");
    }

    #[test]
    fn test_no_double_submit() {
        let mut form = filled();
        form.submit().unwrap();

        assert!(matches!(form.submit(), Err(Error::Busy)));
        form.reset_status();
        assert_eq!(form.status(), Status::Sending);
    }
}
