//! Reusable UI components.

use iced::widget::{button, container, row, text, Row, Text};
use iced::{Color, Element, Fill};

const MUTED: Color = Color::from_rgb(0.6, 0.6, 0.6);
const DIRTY: Color = Color::from_rgb(1.0, 0.7, 0.3);

/// Setting name, highlighted while it has an unapplied change.
pub fn setting_title(name: &str, dirty: bool) -> Text<'_> {
    let title = text(if dirty {
        format!("{name} *")
    } else {
        name.to_string()
    })
    .size(16);
    if dirty {
        title.color(DIRTY)
    } else {
        title
    }
}

pub fn description_text(description: &str) -> Text<'_> {
    text(description).size(12).color(MUTED)
}

pub fn card_container<'a, M: 'a>(
    content: impl Into<Element<'a, M>>,
    bg: Color,
    border: Color,
) -> container::Container<'a, M> {
    container(content)
        .padding(15)
        .width(Fill)
        .style(move |_| container::Style {
            background: Some(iced::Background::Color(bg)),
            border: iced::Border {
                color: border,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        })
}

fn banner<'a, M: 'a>(
    content: impl Into<Element<'a, M>>,
    bg: Color,
    border: Color,
) -> container::Container<'a, M> {
    container(content)
        .padding(10)
        .width(Fill)
        .style(move |_| container::Style {
            background: Some(iced::Background::Color(bg)),
            border: iced::Border {
                color: border,
                width: 1.0,
                radius: 6.0.into(),
            },
            ..Default::default()
        })
}

pub fn admin_warning<'a, M: Clone + 'a>(on_restart: M) -> container::Container<'a, M> {
    banner(
        row![
            text("Administrator rights are required to apply or restore settings")
                .size(13)
                .width(Fill),
            button("Restart as admin")
                .on_press(on_restart)
                .padding([5, 10]),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
        Color::from_rgb(0.25, 0.2, 0.15),
        Color::from_rgb(0.6, 0.5, 0.3),
    )
}

pub fn status_banner<'a, M: 'a>(message: &'a str) -> container::Container<'a, M> {
    banner(
        text(message).size(13),
        Color::from_rgb(0.2, 0.25, 0.15),
        Color::from_rgb(0.5, 0.6, 0.3),
    )
}

pub fn pending_notice<'a>(count: usize) -> Text<'a> {
    text(format!(
        "{count} setting(s) changed. Press \"Apply selected\" to write them."
    ))
    .size(12)
    .color(DIRTY)
}

/// Inline yes/no prompt standing in for a modal dialog.
pub fn confirm_bar<'a, M: Clone + 'a>(question: String, on_yes: M, on_no: M) -> Row<'a, M> {
    row![
        text(question).size(14).width(Fill),
        button("Yes").on_press(on_yes).padding([6, 14]),
        button("No").on_press(on_no).padding([6, 14]),
    ]
    .spacing(10)
    .align_y(iced::Alignment::Center)
}
