//! One card per toggle: name, description and the two radio choices.

use crate::ui::components;
use iced::widget::{column, radio, row};
use iced::{Color, Element, Fill};
use pole_to_win::{Choice, SettingView};

pub fn view<'a, M: Clone + 'a>(
    setting: &'a SettingView,
    on_select: fn(String, Choice) -> M,
) -> Element<'a, M> {
    let enabled_id = setting.id.clone();
    let disabled_id = setting.id.clone();

    let choices = row![
        radio(
            setting.labels.enabled.as_str(),
            Choice::Enabled,
            Some(setting.selection),
            move |c| on_select(enabled_id.clone(), c),
        ),
        radio(
            setting.labels.disabled.as_str(),
            Choice::Disabled,
            Some(setting.selection),
            move |c| on_select(disabled_id.clone(), c),
        ),
    ]
    .spacing(20);

    let content = row![
        column![
            components::setting_title(&setting.display_name, setting.dirty),
            components::description_text(&setting.description),
        ]
        .spacing(4)
        .width(Fill),
        choices,
    ]
    .align_y(iced::Alignment::Center);

    components::card_container(
        content,
        Color::from_rgb(0.15, 0.2, 0.25),
        Color::from_rgb(0.3, 0.4, 0.5),
    )
    .into()
}
