/// The four-step help overlay

use iced::widget::{button, column, container, row, text};
use iced::{Color, Element, Length};

use crate::Message;

const STEPS: [(&str, &str); 4] = [
    (
        "Upload Character References",
        "Upload clear images for your characters in the slots provided. Give them \
         names (e.g., \"Hero\", \"Villain\") to easily reference them in your prompts. \
         Check the box next to a character to include them in the current batch.",
    ),
    (
        "Choose Aspect Ratio",
        "Select the dimensions for your output images. Standard options like 16:9 \
         (Landscape) or 1:1 (Square) are available, or enter a custom ratio.",
    ),
    (
        "Write Story Prompts",
        "Add multiple prompts to create a sequence. Tip: use the exact character \
         names you set in step 1 (e.g., \"Hero running\", \"Villain laughing\") so \
         the model uses the correct reference image.",
    ),
    (
        "Generate & Download",
        "Click Generate All Images. All prompts are processed in parallel. Once \
         done, click an image to zoom and pan, or use Download Batch to save \
         everything with organized filenames.",
    ),
];

pub fn view() -> Element<'static, Message> {
    let mut steps = column![].spacing(16);
    for (number, (title, description)) in STEPS.iter().enumerate() {
        steps = steps.push(
            row![
                text(format!("{}.", number + 1)).size(18),
                column![text(*title).size(15), text(*description).size(13)].spacing(4),
            ]
            .spacing(12),
        );
    }

    let card = container(
        column![
            text("How to Use Story Studio").size(20),
            steps,
            button(text("Got it").size(14)).on_press(Message::HelpClosed),
        ]
        .spacing(20),
    )
    .padding(24)
    .max_width(640.0)
    .style(container::rounded_box);

    // Dimmed backdrop behind the card
    container(card)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.8).into()),
            ..container::Style::default()
        })
        .into()
}
