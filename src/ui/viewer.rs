/// Full-screen lightbox with zoom/pan support
///
/// The image is drawn on a canvas that captures mouse wheel zoom and
/// drag-to-pan, with a toolbar for stepped zoom, reset and close.

use cgmath::Vector2;
use iced::alignment::{Horizontal, Vertical};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::widget::{button, canvas as canvas_widget, container, row, text};
use iced::{Alignment, Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use crate::Message;

/// Zoom bounds (1.0 = 100%)
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 5.0;

/// Scale change per wheel line
pub const WHEEL_ZOOM_STEP: f32 = 0.1;
/// Scale change per toolbar button press
pub const BUTTON_ZOOM_STEP: f32 = 0.5;

/// Viewer state held while the lightbox is open
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// Decoded image to draw
    pub handle: Handle,
    /// Source pixel dimensions, for fit-to-screen math
    pub width: u32,
    pub height: u32,
    /// Zoom level, clamped to [MIN_ZOOM, MAX_ZOOM]
    pub scale: f32,
    /// Pan offset in screen pixels
    pub offset: Vector2<f32>,
}

impl ViewerState {
    /// Open a result at default scale and origin offset.
    /// Switching images always goes through here, so the view resets.
    pub fn open(handle: Handle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
            scale: 1.0,
            offset: Vector2::new(0.0, 0.0),
        }
    }

    /// Adjust zoom by a delta, clamped to the allowed range
    pub fn zoom(&mut self, delta: f32) {
        self.scale = (self.scale + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Shift the pan offset by a screen-space delta
    pub fn pan(&mut self, delta: Vector2<f32>) {
        self.offset += delta;
    }

    /// Back to default scale and position
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vector2::new(0.0, 0.0);
    }
}

/// Canvas renderer for the lightbox image
struct Lightbox<'a> {
    viewer: &'a ViewerState,
}

impl<'a> Program<Message> for Lightbox<'a> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        // Dim everything behind the image
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgba(0.0, 0.0, 0.0, 0.95),
        );

        let width = self.viewer.width as f32;
        let height = self.viewer.height as f32;

        if width > 0.0 && height > 0.0 {
            // Fit the image inside the bounds at 100%, then apply zoom
            let fit = (bounds.width / width)
                .min(bounds.height / height)
                .min(1.0);
            let size = Size::new(
                width * fit * self.viewer.scale,
                height * fit * self.viewer.scale,
            );
            let top_left = Point::new(
                (bounds.width - size.width) / 2.0 + self.viewer.offset.x,
                (bounds.height - size.height) / 2.0 + self.viewer.offset.y,
            );

            frame.draw_image(
                Rectangle::new(top_left, size),
                canvas::Image::new(self.viewer.handle.clone()),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        _bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Wheel zooms, scaled down for pixel-precise trackpads
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let zoom_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y * WHEEL_ZOOM_STEP,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                return (
                    canvas::event::Status::Captured,
                    Some(Message::ViewerZoomed(zoom_delta)),
                );
            }

            // Left press anchors a drag
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position() {
                    state.is_dragging = true;
                    state.last_position = Some(pos);
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.is_dragging = false;
                state.last_position = None;
                return (canvas::event::Status::Captured, None);
            }

            // While dragging, each cursor move pans by the step since
            // the last position
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging {
                    if let Some(current_pos) = cursor.position() {
                        if let Some(last_pos) = state.last_position {
                            let delta = Vector2::new(
                                current_pos.x - last_pos.x,
                                current_pos.y - last_pos.y,
                            );

                            state.last_position = Some(current_pos);
                            return (
                                canvas::event::Status::Captured,
                                Some(Message::ViewerPanned(delta)),
                            );
                        }
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
    pub last_position: Option<Point>,
}

/// The whole lightbox layer: image canvas plus bottom toolbar
pub fn view(viewer: &ViewerState) -> Element<'_, Message> {
    let stage = canvas_widget(Lightbox { viewer })
        .width(Length::Fill)
        .height(Length::Fill);

    let toolbar = container(
        row![
            button(text("−").size(16))
                .on_press(Message::ViewerZoomed(-BUTTON_ZOOM_STEP))
                .style(button::secondary),
            text(format!("{:.0}%", viewer.scale * 100.0)).size(13),
            button(text("+").size(16))
                .on_press(Message::ViewerZoomed(BUTTON_ZOOM_STEP))
                .style(button::secondary),
            button(text("Reset").size(13))
                .on_press(Message::ViewerReset)
                .style(button::secondary),
            button(text("Close").size(13))
                .on_press(Message::ViewerClosed)
                .style(button::danger),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    )
    .padding(8)
    .style(container::rounded_box);

    let toolbar_layer = container(toolbar)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Bottom)
        .padding(32);

    iced::widget::stack([stage.into(), toolbar_layer.into()]).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> ViewerState {
        ViewerState::open(Handle::from_bytes(vec![0u8]), 800, 600)
    }

    #[test]
    fn test_open_starts_at_default_view() {
        let state = viewer();
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.offset, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut state = viewer();

        for _ in 0..100 {
            state.zoom(BUTTON_ZOOM_STEP);
        }
        assert_eq!(state.scale, MAX_ZOOM);

        for _ in 0..100 {
            state.zoom(-BUTTON_ZOOM_STEP);
        }
        assert_eq!(state.scale, MIN_ZOOM);

        for _ in 0..1000 {
            state.zoom(-WHEEL_ZOOM_STEP);
        }
        assert_eq!(state.scale, MIN_ZOOM);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = viewer();
        state.zoom(1.5);
        state.pan(Vector2::new(40.0, -25.0));

        state.reset();

        assert_eq!(state.scale, 1.0);
        assert_eq!(state.offset, Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_pan_accumulates() {
        let mut state = viewer();
        state.pan(Vector2::new(10.0, 5.0));
        state.pan(Vector2::new(-4.0, 5.0));
        assert_eq!(state.offset, Vector2::new(6.0, 10.0));
    }
}
