//! The read-only sections of the portfolio, one function per heading.

use iced::{
    Alignment, Element, Length,
    widget::{Column, Row, column, container, progress_bar, row, rule, space, text},
};
use levelfolio_lib::{
    display::{Meter, ProjectCard, guild_label, level_gain_label},
    repository::{Achievement, Education, Experience, Project, Skill},
};

use crate::icons::icon;

pub fn heading<'a, M: 'a>(icon_name: &str, title: &'a str) -> Element<'a, M> {
    column![
        row![icon(icon_name), text(title).size(20)]
            .spacing(8)
            .align_y(Alignment::Center),
        rule::horizontal(1),
    ]
    .spacing(6)
    .into()
}

fn card<'a, M: 'a>(content: impl Into<Element<'a, M>>) -> Element<'a, M> {
    container(content)
        .padding(14)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn section<'a, M: 'a>(
    icon_name: &str,
    title: &'a str,
    items: impl IntoIterator<Item = Element<'a, M>>,
) -> Element<'a, M> {
    Column::new()
        .push(heading(icon_name, title))
        .extend(items)
        .spacing(10)
        .into()
}

pub fn about<'a, M: 'a>(about: &'a str) -> Element<'a, M> {
    section("user", "ABOUT ME // HUNTER PROFILE", [card(text(about))])
}

/// `meters` holds one bar per skill, in the same order.
pub fn skills<'a, M: 'a>(skills: &'a [Skill], meters: &[Meter]) -> Element<'a, M> {
    let rows = skills.iter().zip(meters).map(|(skill, meter)| {
        column![
            row![
                text(&skill.name),
                space::horizontal(),
                text(meter.label())
            ],
            progress_bar(0.0..=1.0, meter.fill())
                .length(Length::Fill)
                .girth(8),
        ]
        .spacing(4)
        .into()
    });

    section(
        "code",
        "ABILITIES // SKILL TREE",
        [card(Column::with_children(rows).spacing(12))],
    )
}

pub fn education<'a, M: 'a>(education: &'a [Education]) -> Element<'a, M> {
    section(
        "book",
        "KNOWLEDGE UNLOCKED // EDUCATION",
        education.iter().map(|entry| {
            let mut body = column![
                text(&entry.degree).size(18),
                text(&entry.institution),
                text(&entry.years).style(text::secondary),
            ]
            .spacing(4);

            if let Some(gain) = entry.level_gain {
                body = body.push(text(level_gain_label(gain)).style(text::success));
            }
            card(body)
        }),
    )
}

pub fn experience<'a, M: 'a>(experience: &'a [Experience]) -> Element<'a, M> {
    section(
        "briefcase",
        "QUEST LOG // WORK EXPERIENCE",
        experience.iter().map(|entry| {
            let mut body = column![
                row![
                    text(&entry.title).size(18),
                    space::horizontal(),
                    text(&entry.period).style(text::secondary)
                ],
                text(format!("@{}", entry.company)),
            ]
            .spacing(4);

            if let Some(description) = &entry.description {
                body = body.push(text(description));
            }
            body = body.push(text(guild_label(&entry.title)).style(text::success));

            card(body)
        }),
    )
}

pub fn projects<'a, M: 'a>(projects: &'a [Project]) -> Element<'a, M> {
    section(
        "sword",
        "DUNGEON RAIDS // PROJECTS",
        projects.iter().map(|project| project_card(ProjectCard::new(project))),
    )
}

fn project_card<'a, M: 'a>(card_view: ProjectCard<'a>) -> Element<'a, M> {
    let project = card_view.project;

    let badge_style = if card_view.is_completed() {
        text::success
    } else {
        text::warning
    };

    let mut body = column![
        row![
            text(&project.title).size(18),
            space::horizontal(),
            container(text(card_view.badge()).style(badge_style))
                .padding([2, 8])
                .style(container::bordered_box)
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(6);

    if let Some(role) = &project.role {
        body = body.push(text(format!("Role: {role}")).style(text::secondary));
    }

    let stack = Row::with_children(project.tech_stack.iter().map(|tech| {
        container(text(tech).size(12))
            .padding([2, 6])
            .style(container::bordered_box)
            .into()
    }))
    .spacing(6)
    .wrap();

    body = body.push(text(&project.description)).push(stack).push(
        column![
            row![text("Progress"), space::horizontal(), text(card_view.progress_label())],
            progress_bar(0.0..=1.0, card_view.progress.fill())
                .length(Length::Fill)
                .girth(8),
        ]
        .spacing(4),
    );

    card(body)
}

pub fn achievements<'a, M: 'a>(achievements: &'a [Achievement]) -> Element<'a, M> {
    section(
        "trophy",
        "TITLES EARNED // ACHIEVEMENTS",
        achievements.iter().map(|achievement| {
            card(
                row![
                    icon("trophy"),
                    column![text(&achievement.title).size(16), text(&achievement.description)]
                        .spacing(4)
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            )
        }),
    )
}
