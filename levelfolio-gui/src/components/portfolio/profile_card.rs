use iced::{
    Alignment, Element, Length,
    widget::{column, container, progress_bar, row, space, text},
};
use levelfolio_lib::{
    display::{Meter, initials, level_label},
    repository::Profile,
};

/// Character sheet: portrait, name, title, level and the hit-point bar.
pub fn view<'a, M: 'a>(profile: &'a Profile, hp: &Meter) -> Element<'a, M> {
    let bar = column![
        row![
            text("HP"),
            space::horizontal(),
            text(hp.label()).style(text::success)
        ],
        progress_bar(0.0..=1.0, hp.fill())
            .length(Length::Fill)
            .girth(10)
            .style(progress_bar::success),
    ]
    .spacing(4);

    container(
        column![
            row![
                container(text(initials(&profile.name)).size(40))
                    .padding(12)
                    .style(container::bordered_box),
                column![
                    text(&profile.name).size(30),
                    text(&profile.title),
                    text(level_label(profile.level)).style(text::primary),
                ]
                .spacing(4),
            ]
            .spacing(16)
            .align_y(Alignment::Center),
            bar,
        ]
        .spacing(16),
    )
    .padding(20)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}
