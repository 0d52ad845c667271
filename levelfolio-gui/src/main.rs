use std::{env, sync::Arc};

use iced::{
    Alignment, Element,
    Length::Fill,
    Task, Theme, application,
    widget::{button, center, column, container, row, space, text},
};
use levelfolio_lib::{
    Backend,
    config::CoreConfig,
    relay::{HttpRelay, Relay},
    router::{self, ADMIN_PATH, Router, Screen},
    session::SessionState,
};
use parking_lot::RwLock;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::{
        dashboard::{self, Dashboard},
        login::{self, Login},
        portfolio::{self, Portfolio},
    },
    config::{Cfg, GuiConfig},
    icons::icon,
};

pub mod components;
pub mod config;
pub mod icons;

fn main() -> iced::Result {
    application(App::new, App::update, App::view)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    SessionResolved(SessionState),
    Navigate(String),
    BackPressed,
    ForwardPressed,
    // Components
    Portfolio(portfolio::Message),
    Login(login::Message),
    Dashboard(dashboard::Message),
}

struct App {
    cfg: Cfg,
    backend: Backend,
    relay: Arc<dyn Relay>,
    router: Router,
    screen: Screen,
    // Components, mounted only while their screen is shown
    portfolio: Option<Portfolio>,
    login: Option<Login>,
    dashboard: Option<Dashboard>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        // Human friendly panicking in release mode
        human_panic::setup_panic!();

        // Logging
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");

        let core = CoreConfig::load().unwrap_or_else(|err| {
            error!("Failed to load configuration, using defaults: {err}");
            CoreConfig::default()
        });
        let backend = Backend::from_config(&core).unwrap_or_else(|err| {
            warn!("Remote backend unavailable, falling back to sample data: {err}");
            Backend::demo(&core)
        });
        let cfg = Arc::new(RwLock::new(GuiConfig::load()));
        let relay: Arc<dyn Relay> = Arc::new(HttpRelay::new(core.relay.endpoint.as_str()));

        // The first argument stands in for the address bar
        let router = env::args().nth(1).map(Router::new).unwrap_or_default();
        info!("Starting at {}", router.path());

        let session = backend.session.clone();
        let mut app = Self {
            cfg,
            backend,
            relay,
            router,
            screen: Screen::Loading,
            portfolio: None,
            login: None,
            dashboard: None,
        };
        let mount = app.sync_screen();

        (
            app,
            Task::batch([
                mount,
                Task::perform(
                    async move { session.init().await },
                    Message::SessionResolved,
                ),
            ]),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SessionResolved(state) => {
                debug!("Session resolved: {state:?}");
                self.sync_screen()
            }
            Message::Navigate(path) => {
                self.router.navigate(path);
                self.sync_screen()
            }
            Message::BackPressed => {
                self.router.back();
                self.sync_screen()
            }
            Message::ForwardPressed => {
                self.router.forward();
                self.sync_screen()
            }
            // Redirect messages to relevant child components
            Message::Portfolio(message) => match &mut self.portfolio {
                Some(portfolio) => portfolio.update(message).map(Message::Portfolio),
                None => Self::dropped("portfolio"),
            },
            Message::Login(message) => {
                let Some(login) = &mut self.login else {
                    return Self::dropped("login");
                };
                match login.update(message) {
                    login::Action::None => Task::none(),
                    login::Action::Run(task) => task.map(Message::Login),
                    login::Action::SignedIn(user) => {
                        info!("{} signed in", user.email);
                        self.sync_screen()
                    }
                }
            }
            Message::Dashboard(message) => {
                let Some(dashboard) = &mut self.dashboard else {
                    return Self::dropped("dashboard");
                };
                match dashboard.update(message) {
                    dashboard::Action::None => Task::none(),
                    dashboard::Action::Run(task) => task.map(Message::Dashboard),
                    dashboard::Action::SignedOut => self.sync_screen(),
                }
            }
        }
    }

    /// Mount the component the gate currently allows and unmount the rest.
    fn sync_screen(&mut self) -> Task<Message> {
        let screen = router::gate(self.router.route(), &self.backend.session.state());
        if screen == self.screen && self.is_mounted(screen) {
            return Task::none();
        }
        debug!("Showing {screen:?}");
        self.screen = screen;

        self.portfolio = None;
        self.login = None;
        self.dashboard = None;

        let repo = self.backend.repo.clone();
        let session = self.backend.session.clone();

        match screen {
            Screen::Loading => Task::none(),
            Screen::Portfolio => {
                let (portfolio, task) = Portfolio::new(repo, self.cfg.clone(), self.relay.clone());
                self.portfolio = Some(portfolio);
                task.map(Message::Portfolio)
            }
            Screen::Login => {
                self.login = Some(Login::new(session));
                Task::none()
            }
            Screen::Dashboard => {
                let (dashboard, task) = Dashboard::new(repo, session);
                self.dashboard = Some(dashboard);
                task.map(Message::Dashboard)
            }
        }
    }

    fn is_mounted(&self, screen: Screen) -> bool {
        match screen {
            Screen::Loading => true,
            Screen::Portfolio => self.portfolio.is_some(),
            Screen::Login => self.login.is_some(),
            Screen::Dashboard => self.dashboard.is_some(),
        }
    }

    fn dropped(component: &str) -> Task<Message> {
        debug!("Dropping message for unmounted {component}");
        Task::none()
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        let nav = |label: &'static str, path: &'static str| {
            let style = if self.router.path() == path {
                button::primary
            } else {
                button::subtle
            };
            button(label)
                .style(style)
                .on_press(Message::Navigate(path.into()))
        };

        let mut top_bar = row![
            button(icon("arrow-left"))
                .style(button::text)
                .on_press_maybe(self.router.can_go_back().then_some(Message::BackPressed)),
            button(icon("arrow-right"))
                .style(button::text)
                .on_press_maybe(
                    self.router
                        .can_go_forward()
                        .then_some(Message::ForwardPressed)
                ),
            text(self.router.path()),
            space::horizontal(),
        ]
        .spacing(8)
        .padding(8)
        .align_y(Alignment::Center);
        if self.backend.demo {
            top_bar = top_bar.push(text("DEMO DATA").style(text::warning));
        }
        top_bar = top_bar.push(nav("Portfolio", "/")).push(nav("Admin", ADMIN_PATH));

        let body: Element<'_, Message> = match (
            &self.portfolio,
            &self.login,
            &self.dashboard,
        ) {
            (Some(portfolio), _, _) => portfolio.view().map(Message::Portfolio),
            (_, Some(login), _) => login.view().map(Message::Login),
            (_, _, Some(dashboard)) => dashboard.view().map(Message::Dashboard),
            (None, None, None) => center(text("Loading...").size(20)).into(),
        };

        column![
            container(top_bar).style(container::bordered_box),
            container(body).height(Fill),
        ]
        .height(Fill)
        .into()
    }

    pub fn title(&self) -> String {
        match self.screen {
            Screen::Dashboard | Screen::Login => "Levelfolio - Admin".into(),
            Screen::Loading | Screen::Portfolio => "Levelfolio".into(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.cfg.read().theme()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.backend.session.teardown();
    }
}
