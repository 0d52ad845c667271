use iced::{
    Alignment, Element, Length, Task,
    widget::{button, center, column, container, row, text, text_input},
};
use levelfolio_lib::session::{SessionContext, User};

use crate::icons::icon;

#[derive(Debug, Clone)]
pub enum Message {
    EmailInput(String),
    PasswordInput(String),
    SubmitPressed,
    Finished(Result<User, String>),
}

/// Action used for communicating with the parent component
pub enum Action {
    None,
    Run(Task<Message>),
    SignedIn(User),
}

pub struct Login {
    session: SessionContext,
    email: String,
    password: String,
    error: Option<String>,
    loading: bool,
}

impl Login {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            email: String::new(),
            password: String::new(),
            error: None,
            loading: false,
        }
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::EmailInput(email) => {
                self.email = email;
                Action::None
            }
            Message::PasswordInput(password) => {
                self.password = password;
                Action::None
            }
            Message::SubmitPressed => {
                if !self.can_submit() {
                    return Action::None;
                }

                self.loading = true;
                self.error = None;

                let session = self.session.clone();
                let email = self.email.clone();
                let password = self.password.clone();

                Action::Run(Task::perform(
                    async move {
                        session
                            .sign_in(&email, &password)
                            .await
                            .map_err(|err| err.to_string())
                    },
                    Message::Finished,
                ))
            }
            Message::Finished(result) => {
                self.loading = false;
                match result {
                    Ok(user) => {
                        self.password.clear();
                        Action::SignedIn(user)
                    }
                    Err(err) => {
                        self.error = Some(err);
                        Action::None
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut email = text_input("admin@example.com", &self.email);
        let mut password = text_input("Password", &self.password).secure(true);
        if !self.loading {
            email = email.on_input(Message::EmailInput);
            password = password
                .on_input(Message::PasswordInput)
                .on_submit(Message::SubmitPressed);
        }

        let label = if self.loading {
            "Authenticating..."
        } else {
            "Access Admin Panel"
        };

        let mut form = column![
            row![icon("shield"), text(" ADMIN ACCESS").size(24)].align_y(Alignment::Center),
            text("Enter credentials to access the control panel"),
            text("Email"),
            email,
            text("Password"),
            password,
        ]
        .spacing(10);

        if let Some(error) = &self.error {
            form = form.push(text(error).style(text::danger));
        }

        form = form.push(
            button(text(label))
                .width(Length::Fill)
                .style(button::primary)
                .on_press_maybe(self.can_submit().then_some(Message::SubmitPressed)),
        );

        center(
            container(form)
                .padding(24)
                .max_width(420)
                .style(container::bordered_box),
        )
        .into()
    }

    fn can_submit(&self) -> bool {
        !self.loading && !self.email.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use levelfolio_lib::{config::DemoConfig, session::StaticAuth};

    use super::*;

    fn login() -> Login {
        Login::new(SessionContext::new(Arc::new(StaticAuth::new(
            DemoConfig::default(),
        ))))
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let mut login = login();
        let _ = login.update(Message::EmailInput("admin@example.com".into()));

        assert!(matches!(login.update(Message::SubmitPressed), Action::None));
        assert!(!login.loading);
    }

    #[test]
    fn test_rejection_is_shown() {
        let mut login = login();
        let _ = login.update(Message::EmailInput("admin@example.com".into()));
        let _ = login.update(Message::PasswordInput("wrong".into()));

        assert!(matches!(login.update(Message::SubmitPressed), Action::Run(_)));
        assert!(login.loading);

        let action = login.update(Message::Finished(Err("Invalid login credentials".into())));

        assert!(matches!(action, Action::None));
        assert!(!login.loading);
        assert_eq!(login.error.as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn test_success_signs_in() {
        let mut login = login();
        let user = User {
            id: "demo".into(),
            email: "admin@example.com".into(),
        };

        let action = login.update(Message::Finished(Ok(user.clone())));

        assert!(matches!(action, Action::SignedIn(signed_in) if signed_in == user));
    }
}
