//! # Keyboard Widget
//!
//! A piano-style keyboard spanning the display range (note indices 48-84,
//! Do3 to Do6) with the currently detected note highlighted. Key layout
//! and labels come from [`tuner_core::note::KEYBOARD_NOTES`]. Display
//! only: the tuner has no manual note selection.

use iced::widget::canvas::{self, Fill, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Pixels, Point, Rectangle, Renderer, Size, Theme, alignment, mouse};

use tuner_core::note::{KEYBOARD_NOTES, Note};

/// Pattern indicating which notes in an octave are black keys, starting
/// from Do (C).
const IS_BLACK: [bool; 12] = [
    false, true, false, true, false, false, true, false, true, false, true, false,
];

fn is_black(note: &Note) -> bool {
    IS_BLACK[note.index.rem_euclid(12) as usize]
}

/// Number of white keys in the displayed range.
const WHITE_KEY_COUNT: usize = 22;

/// Labels drawn at the bottom of the octave-boundary (Do) keys, taken
/// from the precomputed keyboard table.
fn octave_labels() -> Vec<&'static str> {
    KEYBOARD_NOTES
        .iter()
        .filter(|note| note.index.rem_euclid(12) == 0)
        .map(|note| note.name.as_str())
        .collect()
}

/// Keyboard widget highlighting the detected note index.
#[derive(Debug, Clone)]
pub struct Keyboard {
    detected_index: Option<i32>,
}

impl Keyboard {
    pub fn new(detected_index: Option<i32>) -> Self {
        Self { detected_index }
    }

    pub fn view(self) -> Element<'static, super::super::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(120.0)),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for Keyboard {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let white_key_width = bounds.width / WHITE_KEY_COUNT as f32;
        let black_key_width = white_key_width * 0.6;
        let black_key_height = bounds.height * 0.6;

        // Draw white keys
        let mut white_key_x = 0.0;
        for note in KEYBOARD_NOTES.iter().filter(|note| !is_black(note)) {
            let color = if self.detected_index == Some(note.index) {
                Color::from_rgb8(0x34, 0xDB, 0x98) // Green (Detected)
            } else {
                Color::WHITE
            };

            frame.fill_rectangle(
                Point::new(white_key_x, 0.0),
                Size::new(white_key_width, bounds.height),
                Fill::from(color),
            );
            frame.stroke(
                &Path::rectangle(
                    Point::new(white_key_x, 0.0),
                    Size::new(white_key_width, bounds.height),
                ),
                Stroke::default().with_color(Color::BLACK),
            );

            // Label the octave boundaries so the range reads at a glance.
            if note.index.rem_euclid(12) == 0 {
                frame.fill_text(canvas::Text {
                    content: note.name.clone(),
                    position: Point::new(
                        white_key_x + white_key_width / 2.0,
                        bounds.height - 14.0,
                    ),
                    color: Color::from_rgb8(0x50, 0x50, 0x50),
                    size: Pixels(12.0),
                    horizontal_alignment: alignment::Horizontal::Center,
                    ..canvas::Text::default()
                });
            }

            white_key_x += white_key_width;
        }

        // Draw black keys on top
        let mut white_key_idx: f32 = 0.0;
        for note in KEYBOARD_NOTES.iter() {
            if is_black(note) {
                let key_x = (white_key_idx - 0.5) * white_key_width; // Center on the line
                let color = if self.detected_index == Some(note.index) {
                    Color::from_rgb8(0x34, 0xDB, 0x98) // Green
                } else {
                    Color::BLACK
                };

                frame.fill_rectangle(
                    Point::new(key_x, 0.0),
                    Size::new(black_key_width, black_key_height),
                    Fill::from(color),
                );
            } else {
                white_key_idx += 1.0;
            }
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_the_key_layout() {
        let whites = KEYBOARD_NOTES.iter().filter(|note| !is_black(note)).count();
        assert_eq!(whites, WHITE_KEY_COUNT);
        assert_eq!(octave_labels(), vec!["Do3", "Do4", "Do5", "Do6"]);
    }

    #[test]
    fn highlight_matches_only_the_detected_index() {
        let keyboard = Keyboard::new(Some(69));
        let highlighted: Vec<i32> = KEYBOARD_NOTES
            .iter()
            .filter(|note| keyboard.detected_index == Some(note.index))
            .map(|note| note.index)
            .collect();
        assert_eq!(highlighted, vec![69]);
    }
}
