use iced::{
    Alignment, Element, Length,
    widget::{column, container, row, text},
};
use levelfolio_lib::repository::SocialLinks;

use crate::icons::icon;

pub const SIGNATURE: &str = "SYSTEM INTERFACE v1.0 // PORTFOLIO";

pub fn view<'a, M: 'a>(social: &'a SocialLinks) -> Element<'a, M> {
    let link = |name: &'static str, target: &'a str| {
        row![icon(name), text(target)]
            .spacing(6)
            .align_y(Alignment::Center)
    };

    container(
        column![
            row![
                link("link", &social.linkedin),
                link("code", &social.github),
                link("mail", &social.email),
            ]
            .spacing(20),
            text(SIGNATURE).size(12).style(text::secondary),
        ]
        .spacing(10)
        .align_x(Alignment::Center),
    )
    .padding(16)
    .width(Length::Fill)
    .align_x(Alignment::Center)
    .into()
}
