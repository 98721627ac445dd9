//! # Needle Gauge Widget
//!
//! Visual tuning meter: a needle over a fixed cent scale showing how far
//! the current pitch sits from the target note, with color-coded
//! accuracy zones.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Size, Theme, mouse};

/// Maximum cent deviation shown by the gauge, either side of center.
const GAUGE_RANGE_CENTS: f32 = 50.0;

/// Needle gauge widget for displaying tuning accuracy.
pub struct NeedleGauge {
    /// Normalized needle position in `[0, 1]`; 0.5 is in tune.
    position: Option<f32>,
    /// Whole-cent deviation, used for the color zones.
    cents: Option<i32>,
}

impl NeedleGauge {
    pub fn new(position: Option<f32>, cents: Option<i32>) -> Self {
        Self { position, cents }
    }

    /// Creates the view element for the gauge.
    pub fn view(self) -> Element<'static, super::super::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(80.0)),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for NeedleGauge {
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

        // Gauge background
        let background = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&background, Color::from_rgb8(0x40, 0x40, 0x40));

        // Tick marks every 10 cents
        let tick_count = (2.0 * GAUGE_RANGE_CENTS / 10.0) as usize;
        for i in 0..=tick_count {
            let x = i as f32 / tick_count as f32 * bounds.width;
            let tick = Path::line(
                Point::new(x, bounds.height - 10.0),
                Point::new(x, bounds.height),
            );
            frame.stroke(
                &tick,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(Color::from_rgb8(0x80, 0x80, 0x80)),
            );
        }

        // Center line marks the in-tune position
        let center_x = bounds.width / 2.0;
        let center_line = Path::line(
            Point::new(center_x, 0.0),
            Point::new(center_x, bounds.height),
        );
        frame.stroke(
            &center_line,
            Stroke::default().with_width(2.0).with_color(Color::WHITE),
        );

        // Needle
        if let (Some(position), Some(cents)) = (self.position, self.cents) {
            let needle_x = position.clamp(0.0, 1.0) * bounds.width;

            let cents = cents.abs();
            let color = if cents < 5 {
                Color::from_rgb8(0x34, 0xDB, 0x98) // Green
            } else if cents < 20 {
                Color::from_rgb8(0xFF, 0xC3, 0x00) // Yellow
            } else {
                Color::from_rgb8(0xFF, 0x33, 0x33) // Red
            };

            let needle = Path::rectangle(
                Point::new(needle_x - 2.0, 0.0),
                Size::new(4.0, bounds.height),
            );
            frame.fill(&needle, color);
        }

        vec![frame.into_geometry()]
    }
}
