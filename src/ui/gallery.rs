/// Result gallery: one card per generation, plus batch download
///
/// Cards render by status (pending note, inline error, or the image
/// with view/download actions). Nothing here feeds back into
/// generation; the gallery is a pure projection of the result list.

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::data::{GeneratedImage, GenerationStatus};
use crate::{App, Message};

/// Width of one result card
const CARD_WIDTH: f32 = 320.0;
/// Height of the image area on a card
const CARD_IMAGE_HEIGHT: f32 = 200.0;

pub fn view(app: &App) -> Element<'_, Message> {
    let any_ready = app.results.iter().any(|result| result.ready().is_some());

    let mut header = row![column![
        text("Generated Stories").size(24),
        text("Your generated storyboards will appear here").size(12),
    ]
    .spacing(4)
    .width(Length::Fill)]
    .align_y(Alignment::Center)
    .spacing(12);

    if any_ready {
        header = header.push(
            button(text("Download Batch").size(13))
                .on_press_maybe((!app.is_generating).then_some(Message::DownloadAll))
                .style(button::secondary),
        );
    }

    let body: Element<'_, Message> = if app.results.is_empty() {
        empty_state()
    } else {
        let cards: Vec<Element<'_, Message>> =
            app.results.iter().map(result_card).collect();

        scrollable(
            Wrap::with_elements(cards)
                .spacing(16.0)
                .line_spacing(16.0),
        )
        .height(Length::Fill)
        .into()
    };

    container(column![header, body].spacing(20).padding(24))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn empty_state() -> Element<'static, Message> {
    container(
        column![
            text("Ready to create your story?").size(18),
            text("Set up your characters and prompts on the left, then hit Generate.").size(13),
        ]
        .spacing(8)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn result_card(result: &GeneratedImage) -> Element<'_, Message> {
    let badge = text(format!("{:03}", result.index)).size(11);

    let body: Element<'_, Message> = match &result.status {
        GenerationStatus::Pending => container(
            text(format!("Dreaming up scene {}...", result.index)).size(13),
        )
        .width(Length::Fill)
        .height(Length::Fixed(CARD_IMAGE_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into(),

        GenerationStatus::Failed(message) => container(
            text(message).size(12).style(text::danger),
        )
        .width(Length::Fill)
        .height(Length::Fixed(CARD_IMAGE_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .padding(12)
        .into(),

        GenerationStatus::Ready(ready) => {
            let picture = button(
                image(ready.preview.clone())
                    .width(Length::Fill)
                    .height(Length::Fixed(CARD_IMAGE_HEIGHT)),
            )
            .on_press(Message::ViewerOpened(result.id))
            .style(button::text)
            .padding(0);

            let actions = row![
                button(text("View").size(12))
                    .on_press(Message::ViewerOpened(result.id))
                    .style(button::secondary),
                button(text("Download").size(12))
                    .on_press(Message::DownloadOne(result.id))
                    .style(button::primary),
                text(format!("{}×{}", ready.width, ready.height)).size(11),
            ]
            .spacing(8)
            .align_y(Alignment::Center);

            column![picture, actions].spacing(8).into()
        }
    };

    let footer = row![
        text(result.created_at.format("%d%b%Y").to_string()).size(10),
        badge,
    ]
    .spacing(8);

    container(
        column![body, text(&result.prompt).size(12), footer].spacing(8),
    )
    .width(Length::Fixed(CARD_WIDTH))
    .padding(10)
    .style(container::bordered_box)
    .into()
}
