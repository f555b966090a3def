/// Left control panel: character slots, aspect ratio, prompts
///
/// Pure view construction; every interaction is reported upward as a
/// Message and handled in the application update.

use iced::widget::{
    button, checkbox, column, container, image, pick_list, row, scrollable, text, text_input,
    Column, Row,
};
use iced::{Alignment, Element, Length};

use crate::state::data::{AspectRatio, Character, MAX_PROMPTS};
use crate::{App, Message};

/// Fixed width of the control panel column
const PANEL_WIDTH: f32 = 380.0;

pub fn view(app: &App) -> Element<'_, Message> {
    let header = row![
        column![
            text("⚡ Story Studio").size(24),
            text("Consistent AI character story creator").size(12),
        ]
        .spacing(4),
        button(text("?").size(16))
            .on_press(Message::HelpOpened)
            .style(button::secondary),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut slots = Column::new().spacing(10);
    for character in &app.characters {
        slots = slots.push(character_slot(character));
    }

    let characters_section = column![section_title("1. Characters"), slots].spacing(10);

    let mut ratio_section = column![
        section_title("2. Aspect Ratio"),
        pick_list(
            AspectRatio::ALL,
            Some(app.aspect_ratio),
            Message::AspectRatioPicked,
        )
        .width(Length::Fill)
        .text_size(14),
    ]
    .spacing(10);

    if app.aspect_ratio == AspectRatio::Custom {
        ratio_section = ratio_section.push(
            text_input("e.g., 21:9", &app.custom_ratio)
                .on_input(Message::CustomRatioChanged)
                .size(14),
        );
    }

    let prompts_section = column![
        row![
            section_title("3. Story Prompts"),
            text(format!("{}/{}", app.prompts.len(), MAX_PROMPTS)).size(12),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        prompt_list(app),
    ]
    .spacing(10);

    let generate_label = if app.is_generating {
        "Generating..."
    } else {
        "Generate All Images"
    };
    let generate = button(text(generate_label).size(16))
        .on_press_maybe((!app.is_generating).then_some(Message::GenerateAll))
        .style(button::danger)
        .width(Length::Fill)
        .padding(12);

    let content = column![
        header,
        characters_section,
        ratio_section,
        prompts_section,
        generate,
        text(&app.status).size(12),
    ]
    .spacing(24)
    .padding(20);

    container(scrollable(content))
        .width(Length::Fixed(PANEL_WIDTH))
        .height(Length::Fill)
        .style(container::bordered_box)
        .into()
}

fn section_title(title: &str) -> Element<'_, Message> {
    text(title).size(14).into()
}

/// One fixed character slot: inclusion checkbox, editable name,
/// preview thumbnail and the file picker button.
fn character_slot(character: &Character) -> Element<'_, Message> {
    let slot = character.slot;

    let header = row![
        checkbox("", character.selected)
            .on_toggle(move |selected| Message::CharacterToggled(slot, selected)),
        text_input("Character Name", &character.name)
            .on_input(move |name| Message::CharacterRenamed(slot, name))
            .size(14),
    ]
    .spacing(6)
    .align_y(Alignment::Center);

    let preview: Element<'_, Message> = match &character.reference {
        Some(reference) => image(reference.preview.clone())
            .width(Length::Fixed(64.0))
            .height(Length::Fixed(64.0))
            .into(),
        None => container(text("No Img").size(11))
            .width(Length::Fixed(64.0))
            .height(Length::Fixed(64.0))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(container::rounded_box)
            .into(),
    };

    let pick_label = if character.reference.is_some() {
        "Change Image"
    } else {
        "+ Upload Image"
    };
    let mut details = column![button(text(pick_label).size(12))
        .on_press(Message::CharacterPickFile(slot))
        .style(button::secondary)
        .width(Length::Fill)]
    .spacing(4)
    .width(Length::Fill);

    if let Some(reference) = &character.reference {
        details = details.push(text(&reference.file_name).size(10));
    }

    container(
        column![
            header,
            row![preview, details].spacing(10).align_y(Alignment::Start),
        ]
        .spacing(8),
    )
    .padding(10)
    .style(container::bordered_box)
    .into()
}

/// Editable prompt rows with a remove button each (when more than
/// one remains) and an add button while under the limit.
fn prompt_list(app: &App) -> Element<'_, Message> {
    let mut list = Column::new().spacing(8);

    for (index, prompt) in app.prompts.iter().enumerate() {
        let mut entry: Row<'_, Message> = row![text_input(
            &format!("Scene {}: Describe the action...", index + 1),
            prompt,
        )
        .on_input(move |value| Message::PromptChanged(index, value))
        .size(13)]
        .spacing(6)
        .align_y(Alignment::Center);

        if app.prompts.len() > 1 {
            entry = entry.push(
                button(text("✕").size(12))
                    .on_press(Message::PromptRemoved(index))
                    .style(button::text),
            );
        }

        list = list.push(entry);
    }

    if app.prompts.len() < MAX_PROMPTS {
        list = list.push(
            button(text("+ Add Scene Prompt").size(13))
                .on_press(Message::PromptAdded)
                .style(button::secondary)
                .width(Length::Fill),
        );
    }

    list.into()
}
