use std::sync::Arc;

use iced::{
    Alignment, Element, Length, Task,
    widget::{button, center, column, container, row, scrollable, space, text},
};
use levelfolio_lib::{
    LoadError, PortfolioContent, content,
    display::{HP_REVEAL_DELAY, Meter, SKILL_REVEAL_DELAY},
    relay::Relay,
    repository::Repository,
};
use tracing::debug;

use crate::{
    components::portfolio::contact_form::ContactForm, config::Cfg, icons::icon,
};

pub mod contact_form;
pub mod footer;
pub mod profile_card;
pub mod sections;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<PortfolioContent, Arc<LoadError>>),
    RevealHp,
    RevealSkills,
    DarkModeToggled,
    ContactForm(contact_form::Message),
}

#[derive(Debug)]
enum State {
    Loading,
    Failed,
    Loaded(Box<Loaded>),
}

#[derive(Debug)]
struct Loaded {
    content: PortfolioContent,
    hp: Meter,
    skills: Vec<Meter>,
}

impl Loaded {
    fn new(content: PortfolioContent) -> Self {
        let hp = Meter::hp(content.profile.hp, content.profile.max_hp);
        let skills = content
            .skills
            .iter()
            .map(|skill| Meter::skill(skill.level))
            .collect();

        Self {
            content,
            hp,
            skills,
        }
    }
}

/// The public, read-only view.
pub struct Portfolio {
    cfg: Cfg,
    state: State,
    contact_form: ContactForm,
}

impl Portfolio {
    pub fn new(repo: Repository, cfg: Cfg, relay: Arc<dyn Relay>) -> (Self, Task<Message>) {
        (
            Self {
                cfg,
                state: State::Loading,
                contact_form: ContactForm::new(relay),
            },
            Task::perform(
                async move { content::load(&repo).await.map_err(Arc::new) },
                Message::Loaded,
            ),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(Ok(content)) => {
                self.state = State::Loaded(Box::new(Loaded::new(content)));

                Task::batch([
                    Task::perform(
                        async { tokio::time::sleep(HP_REVEAL_DELAY).await },
                        |()| Message::RevealHp,
                    ),
                    Task::perform(
                        async { tokio::time::sleep(SKILL_REVEAL_DELAY).await },
                        |()| Message::RevealSkills,
                    ),
                ])
            }
            Message::Loaded(Err(_)) => {
                // Already logged by the loader
                self.state = State::Failed;
                Task::none()
            }
            Message::RevealHp => {
                if let State::Loaded(loaded) = &mut self.state {
                    loaded.hp.reveal();
                }
                Task::none()
            }
            Message::RevealSkills => {
                if let State::Loaded(loaded) = &mut self.state {
                    loaded.skills.iter_mut().for_each(Meter::reveal);
                }
                Task::none()
            }
            Message::DarkModeToggled => {
                let mut cfg = self.cfg.write();
                cfg.toggle_dark_mode();
                debug!("Dark mode: {}", cfg.dark_mode);
                Task::none()
            }
            Message::ContactForm(message) => self
                .contact_form
                .update(message)
                .map(Message::ContactForm),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let loaded = match &self.state {
            State::Loading => return center(text("Loading...").size(20)).into(),
            State::Failed => {
                return center(text(content::LOAD_FAILED).size(20).style(text::danger)).into();
            }
            State::Loaded(loaded) => loaded,
        };
        let content = &loaded.content;

        let theme_icon = if self.cfg.read().dark_mode {
            "sun"
        } else {
            "moon"
        };

        let page = column![
            row![
                space::horizontal(),
                button(icon(theme_icon))
                    .style(button::text)
                    .on_press(Message::DarkModeToggled)
            ],
            profile_card::view(&content.profile, &loaded.hp),
            sections::about(&content.about),
            sections::skills(&content.skills, &loaded.skills),
            sections::education(&content.education),
            sections::experience(&content.experience),
            sections::projects(&content.projects),
            sections::achievements(&content.achievements),
            column![
                sections::heading("mail", "SEND MESSAGE // CONTACT"),
                self.contact_form
                    .view(&content.social.email)
                    .map(Message::ContactForm),
            ]
            .spacing(10),
            footer::view(&content.social),
        ]
        .spacing(24)
        .padding(24)
        .max_width(960);

        scrollable(
            container(page)
                .width(Length::Fill)
                .align_x(Alignment::Center),
        )
        .height(Length::Fill)
        .into()
    }
}

#[cfg(test)]
mod test {
    use levelfolio_lib::{
        Table,
        relay::HttpRelay,
        repository::{MemoryStore, seed},
    };
    use parking_lot::RwLock;

    use super::*;
    use crate::config::GuiConfig;

    fn portfolio() -> Portfolio {
        let store = MemoryStore::new();
        seed::seed(&store);

        Portfolio::new(
            Repository::new(Arc::new(store)),
            Arc::new(RwLock::new(GuiConfig::default())),
            Arc::new(HttpRelay::new("http://127.0.0.1:9")),
        )
        .0
    }

    async fn seeded_content() -> PortfolioContent {
        let store = MemoryStore::new();
        seed::seed(&store);
        content::load(&Repository::new(Arc::new(store))).await.unwrap()
    }

    #[tokio::test]
    async fn test_meters_start_empty() {
        let mut portfolio = portfolio();
        let _ = portfolio.update(Message::Loaded(Ok(seeded_content().await)));

        let State::Loaded(loaded) = &portfolio.state else {
            panic!("content not loaded");
        };
        assert_eq!(loaded.hp.value(), 0);
        assert!(loaded.skills.iter().all(|meter| meter.value() == 0));
    }

    #[tokio::test]
    async fn test_reveal_fills_meters_once() {
        let mut portfolio = portfolio();
        let content = seeded_content().await;
        let hp = content.profile.hp;
        let _ = portfolio.update(Message::Loaded(Ok(content)));

        let _ = portfolio.update(Message::RevealHp);
        let _ = portfolio.update(Message::RevealSkills);
        let _ = portfolio.update(Message::RevealHp);

        let State::Loaded(loaded) = &portfolio.state else {
            panic!("content not loaded");
        };
        assert_eq!(loaded.hp.value(), hp);
        assert!(loaded.skills.iter().all(Meter::is_revealed));
    }

    #[test]
    fn test_failure_hides_content() {
        let mut portfolio = portfolio();

        let _ = portfolio.update(Message::Loaded(Err(Arc::new(LoadError::Missing(
            Table::Profile,
        )))));

        assert!(matches!(portfolio.state, State::Failed));
    }
}
