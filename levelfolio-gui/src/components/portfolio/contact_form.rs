use std::sync::Arc;

use iced::{
    Element, Length, Task,
    widget::{button, column, container, row, text, text_editor, text_input},
};
use levelfolio_lib::relay::{
    ContactForm as Form, NOTICE_DURATION, Relay, SUCCESS_NOTICE, Status, error_notice,
};
use tracing::debug;

use crate::icons::icon;

#[derive(Debug, Clone)]
pub enum Message {
    NameInput(String),
    EmailInput(String),
    SubjectInput(String),
    MessageEdited(text_editor::Action),
    SendPressed,
    Sent(Result<(), String>),
    /// Carries the notice generation that scheduled it
    NoticeExpired(u64),
}

pub struct ContactForm {
    relay: Arc<dyn Relay>,
    form: Form,
    body: text_editor::Content,
    notice: u64,
}

impl ContactForm {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self {
            relay,
            form: Form::default(),
            body: text_editor::Content::new(),
            notice: 0,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NameInput(name) => self.form.name = name,
            Message::EmailInput(email) => self.form.email = email,
            Message::SubjectInput(subject) => self.form.subject = subject,
            Message::MessageEdited(action) => {
                if self.form.status() != Status::Sending {
                    self.body.perform(action);
                    self.form.message = self.body.text();
                }
            }
            Message::SendPressed => match self.form.submit() {
                Ok(submission) => {
                    let relay = self.relay.clone();
                    return Task::perform(
                        async move {
                            relay
                                .send(&submission)
                                .await
                                .map_err(|err| err.to_string())
                        },
                        Message::Sent,
                    );
                }
                Err(err) => debug!("Contact form not submitted: {err}"),
            },
            Message::Sent(result) => {
                if self.form.finished(result).is_ok() {
                    self.body = text_editor::Content::new();
                }

                self.notice = self.notice.wrapping_add(1);
                let notice = self.notice;
                return Task::perform(
                    async { tokio::time::sleep(NOTICE_DURATION).await },
                    move |()| Message::NoticeExpired(notice),
                );
            }
            Message::NoticeExpired(notice) => {
                // A newer notice restarts the countdown
                if notice == self.notice {
                    self.form.reset_status();
                }
            }
        }

        Task::none()
    }

    /// `fallback_email` is offered when delivery fails.
    pub fn view<'a>(&'a self, fallback_email: &str) -> Element<'a, Message> {
        let status = self.form.status();
        let sending = status == Status::Sending;

        let input = |placeholder: &'a str, value: &'a str, on_input: fn(String) -> Message| {
            let field = text_input(placeholder, value);
            if sending {
                field
            } else {
                field.on_input(on_input)
            }
        };

        let mut body = text_editor(&self.body)
            .placeholder("Your message")
            .height(140);
        if !sending {
            body = body.on_action(Message::MessageEdited);
        }

        let mut form = column![
            row![
                input("Name", &self.form.name, Message::NameInput),
                input("Email", &self.form.email, Message::EmailInput),
            ]
            .spacing(10),
            input("Subject", &self.form.subject, Message::SubjectInput),
            body,
        ]
        .spacing(10);

        match status {
            Status::Success => form = form.push(text(SUCCESS_NOTICE).style(text::success)),
            Status::Error => {
                form = form.push(text(error_notice(fallback_email)).style(text::danger));
            }
            Status::Idle | Status::Sending => {}
        }

        let send_style = if status == Status::Error {
            button::danger
        } else {
            button::primary
        };

        form = form.push(
            button(row![icon("send"), text(format!(" {}", status.button_label()))])
                .style(send_style)
                .on_press_maybe(
                    (!sending && self.form.validate().is_ok()).then_some(Message::SendPressed),
                ),
        );

        container(form)
            .padding(14)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
    }
}
