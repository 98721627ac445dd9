//! # Pitch History Widget
//!
//! Scrolling time series of the recent pitch estimates: one sample per
//! tick, the newest at the right edge. Frequencies are drawn at their
//! normalized vertical position in the search range; silent ticks leave
//! a gap in the trace.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Theme, mouse};

/// Pitch history trace widget.
pub struct HistoryTrace {
    /// Normalized vertical positions in `[0, 1]`, oldest first, `None`
    /// for ticks with no pitch.
    data: Vec<Option<f32>>,
    /// Total number of samples the display spans (the history capacity).
    span: usize,
}

impl HistoryTrace {
    pub fn new(data: Vec<Option<f32>>, span: usize) -> Self {
        Self { data, span }
    }

    pub fn view(self) -> Element<'static, super::super::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for HistoryTrace {
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

        let background = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&background, Color::from_rgb8(0x20, 0x20, 0x20));

        if !bounds.width.is_finite() || !bounds.height.is_finite() || self.span < 2 {
            return vec![frame.into_geometry()];
        }

        let step = bounds.width / (self.span - 1) as f32;
        let point_at = |i: usize, value: f32| {
            // Low frequencies at the bottom, high at the top.
            Point::new(i as f32 * step, (1.0 - value) * bounds.height)
        };

        // Connect consecutive samples; a `None` on either side breaks the
        // trace and leaves a gap.
        for (i, pair) in self.data.windows(2).enumerate() {
            if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                let segment = Path::line(point_at(i, a), point_at(i + 1, b));
                frame.stroke(
                    &segment,
                    Stroke::default()
                        .with_width(1.5)
                        .with_color(Color::from_rgb8(0x34, 0x98, 0xDB)),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
