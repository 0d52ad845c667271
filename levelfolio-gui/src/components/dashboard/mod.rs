use std::sync::atomic::{AtomicU64, Ordering};

use iced::{
    Element, Length, Task,
    widget::{Column, button, column, container, row, rule, space, text},
};
use levelfolio_lib::{
    repository::{
        AchievementRow, EducationRow, ExperienceRow, ProfileRow, ProjectRow, Repository, SkillRow,
        SocialLinksRow,
    },
    session::SessionContext,
};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::debug;

use crate::{components::dashboard::editor::RecordEditor, icons::icon};

pub mod editor;

/// Every mounted editor gets a fresh id so that results addressed to an editor that has since
/// been replaced can be recognised and dropped.
static MOUNTS: AtomicU64 = AtomicU64::new(0);

fn next_mount() -> u64 {
    MOUNTS.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Tab {
    #[default]
    Profile,
    Skills,
    Education,
    Experience,
    Projects,
    Achievements,
    #[strum(serialize = "Social Links")]
    SocialLinks,
}

impl Tab {
    fn icon(self) -> &'static str {
        match self {
            Tab::Profile => "user",
            Tab::Skills => "code",
            Tab::Education => "book",
            Tab::Experience => "briefcase",
            Tab::Projects => "sword",
            Tab::Achievements => "trophy",
            Tab::SocialLinks => "link",
        }
    }
}

#[derive(Debug, Clone)]
pub enum PaneMessage {
    Profile(editor::Message<ProfileRow>),
    Skills(editor::Message<SkillRow>),
    Education(editor::Message<EducationRow>),
    Experience(editor::Message<ExperienceRow>),
    Projects(editor::Message<ProjectRow>),
    Achievements(editor::Message<AchievementRow>),
    SocialLinks(editor::Message<SocialLinksRow>),
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    Pane(u64, PaneMessage),
    SignOutPressed,
    SignedOut,
}

/// Action used for communicating with the parent component
pub enum Action {
    None,
    Run(Task<Message>),
    SignedOut,
}

/// The editor of the active tab. Only one is mounted at a time.
#[derive(Debug)]
enum Pane {
    Profile(RecordEditor<ProfileRow>),
    Skills(RecordEditor<SkillRow>),
    Education(RecordEditor<EducationRow>),
    Experience(RecordEditor<ExperienceRow>),
    Projects(RecordEditor<ProjectRow>),
    Achievements(RecordEditor<AchievementRow>),
    SocialLinks(RecordEditor<SocialLinksRow>),
}

impl Pane {
    fn mount(tab: Tab, repo: Repository) -> (Self, Task<PaneMessage>) {
        match tab {
            Tab::Profile => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::Profile(editor), task.map(PaneMessage::Profile))
            }
            Tab::Skills => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::Skills(editor), task.map(PaneMessage::Skills))
            }
            Tab::Education => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::Education(editor), task.map(PaneMessage::Education))
            }
            Tab::Experience => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::Experience(editor), task.map(PaneMessage::Experience))
            }
            Tab::Projects => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::Projects(editor), task.map(PaneMessage::Projects))
            }
            Tab::Achievements => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::Achievements(editor), task.map(PaneMessage::Achievements))
            }
            Tab::SocialLinks => {
                let (editor, task) = RecordEditor::new(repo);
                (Pane::SocialLinks(editor), task.map(PaneMessage::SocialLinks))
            }
        }
    }

    fn update(&mut self, message: PaneMessage) -> Task<PaneMessage> {
        match (self, message) {
            (Pane::Profile(e), PaneMessage::Profile(m)) => e.update(m).map(PaneMessage::Profile),
            (Pane::Skills(e), PaneMessage::Skills(m)) => e.update(m).map(PaneMessage::Skills),
            (Pane::Education(e), PaneMessage::Education(m)) => {
                e.update(m).map(PaneMessage::Education)
            }
            (Pane::Experience(e), PaneMessage::Experience(m)) => {
                e.update(m).map(PaneMessage::Experience)
            }
            (Pane::Projects(e), PaneMessage::Projects(m)) => e.update(m).map(PaneMessage::Projects),
            (Pane::Achievements(e), PaneMessage::Achievements(m)) => {
                e.update(m).map(PaneMessage::Achievements)
            }
            (Pane::SocialLinks(e), PaneMessage::SocialLinks(m)) => {
                e.update(m).map(PaneMessage::SocialLinks)
            }
            (_, message) => {
                debug!("Dropping message for another editor: {message:?}");
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, PaneMessage> {
        match self {
            Pane::Profile(e) => e.view().map(PaneMessage::Profile),
            Pane::Skills(e) => e.view().map(PaneMessage::Skills),
            Pane::Education(e) => e.view().map(PaneMessage::Education),
            Pane::Experience(e) => e.view().map(PaneMessage::Experience),
            Pane::Projects(e) => e.view().map(PaneMessage::Projects),
            Pane::Achievements(e) => e.view().map(PaneMessage::Achievements),
            Pane::SocialLinks(e) => e.view().map(PaneMessage::SocialLinks),
        }
    }
}

pub struct Dashboard {
    repo: Repository,
    session: SessionContext,
    active_tab: Tab,
    mount: u64,
    pane: Pane,
}

impl Dashboard {
    pub fn new(repo: Repository, session: SessionContext) -> (Self, Task<Message>) {
        let active_tab = Tab::default();
        let mount = next_mount();
        let (pane, task) = Pane::mount(active_tab, repo.clone());

        (
            Self {
                repo,
                session,
                active_tab,
                mount,
                pane,
            },
            task.map(move |m| Message::Pane(mount, m)),
        )
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::TabSelected(tab) => {
                if tab == self.active_tab {
                    return Action::None;
                }

                // Unsaved changes of the previous tab are discarded
                let mount = next_mount();
                let (pane, task) = Pane::mount(tab, self.repo.clone());
                self.active_tab = tab;
                self.mount = mount;
                self.pane = pane;

                Action::Run(task.map(move |m| Message::Pane(mount, m)))
            }
            Message::Pane(mount, message) => {
                if mount != self.mount {
                    debug!("Dropping result for unmounted editor {mount}");
                    return Action::None;
                }
                Action::Run(
                    self.pane
                        .update(message)
                        .map(move |m| Message::Pane(mount, m)),
                )
            }
            Message::SignOutPressed => {
                let session = self.session.clone();
                Action::Run(Task::perform(
                    async move { session.sign_out().await },
                    |()| Message::SignedOut,
                ))
            }
            Message::SignedOut => Action::SignedOut,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let email = self
            .session
            .state()
            .user()
            .map(|user| user.email.clone())
            .unwrap_or_default();

        let header = container(
            row![
                column![
                    text("ADMIN CONTROL PANEL").size(26),
                    text(format!("Logged in as: {email}"))
                ]
                .spacing(4),
                space::horizontal(),
                button(row![icon("log-out"), text(" Sign Out")])
                    .style(button::danger)
                    .on_press(Message::SignOutPressed)
            ]
            .align_y(iced::Alignment::Center),
        )
        .padding(16)
        .style(container::rounded_box);

        let tabs = Column::with_children(Tab::iter().map(|tab| self.tab_button(tab))).spacing(6);

        let sidebar = container(column![text("SECTIONS"), rule::horizontal(1), tabs].spacing(10))
            .padding(12)
            .width(Length::FillPortion(1))
            .style(container::rounded_box);

        let mount = self.mount;
        let pane = container(self.pane.view().map(move |m| Message::Pane(mount, m)))
            .width(Length::FillPortion(3))
            .height(Length::Fill)
            .style(container::rounded_box);

        column![header, row![sidebar, pane].spacing(16)]
            .spacing(16)
            .padding(16)
            .into()
    }

    fn tab_button(&self, tab: Tab) -> Element<'_, Message> {
        let style = if tab == self.active_tab {
            button::primary
        } else {
            button::subtle
        };

        button(row![icon(tab.icon()), text(format!(" {tab}"))])
            .width(Length::Fill)
            .style(style)
            .on_press(Message::TabSelected(tab))
            .into()
    }
}
