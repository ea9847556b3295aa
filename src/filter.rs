//! Area filtering: keep only the text drawn inside a page's keep-rectangle.

use serde::{Deserialize, Serialize};

use crate::geometry::{contains, Rect};
use crate::model::RenderEvent;

/// Counts of units tested against the keep area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Units whose baseline lies inside the area
    pub kept: u64,
    /// Units rejected by the containment test
    pub dropped: u64,
}

/// Collects the text of runs whose baselines lie inside a keep-rectangle.
///
/// Runs decomposed into glyphs are tested glyph by glyph, so a run that
/// straddles the area edge contributes only its inside characters. Kept text
/// is emitted in event order with nothing inserted between runs.
#[derive(Debug, Clone)]
pub struct AreaFilter {
    area: Rect,
    stats: FilterStats,
}

impl AreaFilter {
    /// Create a filter for the given keep-rectangle.
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            stats: FilterStats::default(),
        }
    }

    /// Replace the keep-rectangle before processing another page.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Current keep-rectangle.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Route one event, appending any kept text to `out`.
    pub fn handle(&mut self, event: &RenderEvent, out: &mut String) {
        match event {
            RenderEvent::Text(render) => {
                for unit in render.units() {
                    if contains(&self.area, &unit.bounds()) {
                        out.push_str(&unit.text);
                        self.stats.kept += 1;
                    } else {
                        self.stats.dropped += 1;
                    }
                }
            }
            RenderEvent::Other { .. } => {}
        }
    }

    /// Filter a whole page's event sequence into a string.
    pub fn extract_page<I>(&mut self, events: I) -> String
    where
        I: IntoIterator<Item = RenderEvent>,
    {
        let mut out = String::new();
        for event in events {
            self.handle(&event, &mut out);
        }
        out
    }

    /// Counters accumulated since the last call, resetting them.
    pub fn take_stats(&mut self) -> FilterStats {
        std::mem::take(&mut self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextRender, TextRun};

    fn keep() -> Rect {
        // Letter page with default margins
        Rect::new(50.0, 80.0, 512.0, 632.0)
    }

    fn run(text: &str, x: f32, y: f32, width: f32) -> RenderEvent {
        RenderEvent::Text(TextRender::new(TextRun::horizontal(text, x, y, width)))
    }

    #[test]
    fn test_keeps_inside_runs_in_event_order() {
        let events = vec![
            run("second ", 300.0, 200.0, 40.0),
            RenderEvent::other("re"),
            run("first", 60.0, 600.0, 30.0),
            run("HEADER", 60.0, 750.0, 40.0),
            run(" third", 100.0, 100.0, 40.0),
        ];

        let mut filter = AreaFilter::new(keep());
        assert_eq!(filter.extract_page(events), "second first third");
        assert_eq!(filter.take_stats(), FilterStats { kept: 3, dropped: 1 });
        assert_eq!(filter.take_stats(), FilterStats::default());
    }

    #[test]
    fn test_edges_count_as_inside() {
        let mut filter = AreaFilter::new(keep());
        let mut out = String::new();

        // Exactly on the left and bottom edges, ending on the right edge
        filter.handle(&run("a", 50.0, 80.0, 512.0), &mut out);
        // Exactly on the top edge
        filter.handle(&run("b", 100.0, 712.0, 10.0), &mut out);
        // A hair past the right edge
        filter.handle(&run("c", 550.0, 400.0, 12.5), &mut out);

        assert_eq!(out, "ab");
    }

    #[test]
    fn test_straddling_run_is_split_per_glyph() {
        // "abcdef" with 10pt glyphs starting at x=20; the area starts at x=50
        let glyphs = "abcdef"
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let x = 20.0 + i as f32 * 10.0;
                TextRun::horizontal(c.to_string(), x, 300.0, 10.0)
            })
            .collect();
        let event = RenderEvent::Text(TextRender::from_glyphs(glyphs));

        let mut filter = AreaFilter::new(keep());
        let mut out = String::new();
        filter.handle(&event, &mut out);

        // "c" spans 40..50 and only touches the edge; "d" starts on it
        assert_eq!(out, "def");
        assert_eq!(filter.take_stats(), FilterStats { kept: 3, dropped: 3 });
    }

    #[test]
    fn test_other_events_contribute_nothing() {
        let mut filter = AreaFilter::new(keep());
        let out = filter.extract_page(vec![RenderEvent::other("Do"), RenderEvent::other("cm")]);
        assert!(out.is_empty());
        assert_eq!(filter.take_stats(), FilterStats::default());
    }

    #[test]
    fn test_negative_area_keeps_nothing() {
        let mut filter = AreaFilter::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        filter.set_area(Rect::new(400.0, 500.0, -188.0, -208.0));
        assert_eq!(filter.area().width, -188.0);
        assert_eq!(filter.extract_page(vec![run("x", 300.0, 400.0, 5.0)]), "");
    }
}
