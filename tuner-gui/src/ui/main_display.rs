//! # Main Display Module
//!
//! This module contains the main display components and layout logic
//! for the pitch tuner application.

use iced::widget::{Space, button, column, container, row, text};
use iced::{Alignment, Element, Length};

use super::{history, keyboard, needle};

/// Creates the complete main application view
pub fn create_main_view(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let title = text("Pitch Tuner").size(28);

    let needle_panel = create_needle_panel(data);
    let history_panel = create_history_panel(data);
    let keyboard_panel = create_keyboard_panel(data);
    let sidebar = create_sidebar(data);

    let main_content = row![
        column![
            title,
            Space::with_height(20),
            needle_panel,
            Space::with_height(10),
            history_panel,
            Space::with_height(10),
            keyboard_panel,
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        sidebar,
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Creates the needle gauge panel with the note readout.
fn create_needle_panel(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let (note_name, freq_text, cents_text) = match data
        .last_tick
        .as_ref()
        .and_then(|tick| tick.note.clone())
    {
        Some(note) => {
            let frequency = data
                .last_tick
                .as_ref()
                .and_then(|tick| tick.smoothed_frequency)
                .unwrap_or(0.0);
            (
                note.note_name,
                format!("{:.2} Hz", frequency),
                format!("{:+} cents", note.cents_offset),
            )
        }
        None => ("--".to_string(), "0.00 Hz".to_string(), "-- cents".to_string()),
    };

    let (position, cents) = match data.last_tick.as_ref() {
        Some(tick) => (
            tick.needle_position,
            tick.note.as_ref().map(|note| note.cents_offset),
        ),
        None => (None, None),
    };

    let readout = row![
        text(note_name).size(40),
        Space::with_width(20),
        column![text(freq_text).size(18), text(cents_text).size(18)],
    ]
    .align_y(Alignment::Center);

    container(
        column![
            text("Tuning").size(18),
            Space::with_height(10),
            readout,
            Space::with_height(10),
            needle::NeedleGauge::new(position, cents).view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .into()
}

/// Creates the scrolling pitch history panel.
fn create_history_panel(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let normalized: Vec<Option<f32>> = data
        .history
        .normalized(data.config.min_frequency, data.config.max_frequency)
        .collect();

    container(
        column![
            text("Pitch history").size(18),
            Space::with_height(10),
            history::HistoryTrace::new(normalized, data.history.capacity()).view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(220.0))
    .into()
}

/// Creates the keyboard panel highlighting the detected note.
fn create_keyboard_panel(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let detected_index = data
        .last_tick
        .as_ref()
        .and_then(|tick| tick.note.as_ref())
        .map(|note| note.note_index);

    container(
        column![
            text("Detected note").size(18),
            Space::with_height(10),
            keyboard::Keyboard::new(detected_index).view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .into()
}

/// Creates the control sidebar.
fn create_sidebar(data: &crate::AppDisplayData) -> Element<'static, crate::Message> {
    let tuner_label = if data.tuner_active { "Stop tuner" } else { "Start tuner" };
    let tone_label = if data.tone_active {
        "Reference tone: on"
    } else {
        "Reference tone: off"
    };

    container(
        column![
            text("Controls").size(18),
            Space::with_height(10),
            button(text(tuner_label)).on_press(crate::Message::ToggleTuner),
            button(text(tone_label)).on_press(crate::Message::ToggleReferenceTone),
            Space::with_height(20),
            button(text("Exit")).on_press(crate::Message::Exit),
        ]
        .spacing(10)
        .padding(15),
    )
    .width(Length::Fixed(220.0))
    .into()
}
