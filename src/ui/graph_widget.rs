use gtk4 as gtk;
use gtk::cairo;
use gtk::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{Collector, HistoryBuffer, SystemSource};
use crate::util;

const FONT_SIZE: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GraphColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn channels(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

pub const BACKDROP: GraphColor = GraphColor::new(0, 0, 0);
pub const BACKGROUND: GraphColor = GraphColor::new(20, 20, 20);
pub const GRID: GraphColor = GraphColor::new(60, 60, 60);
pub const CPU_COLOR: GraphColor = GraphColor::new(0, 200, 0);
pub const MEMORY_COLOR: GraphColor = GraphColor::new(0, 150, 255);

/// Pixel rectangle; `right` and `bottom` are exclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: GraphColor,
    pub width: f64,
    pub dotted: bool,
}

/// Minimal drawing target for the graphs.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: GraphColor);
    fn stroke_line(&mut self, from: (i32, i32), to: (i32, i32), pen: Pen);
    fn stroke_polyline(&mut self, points: &[(i32, i32)], pen: Pen);
    /// `(x, y)` is the top-left corner of the text.
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: GraphColor);
}

impl Surface for cairo::Context {
    fn fill_rect(&mut self, rect: Rect, color: GraphColor) {
        let (r, g, b) = color.channels();
        self.set_source_rgb(r, g, b);
        self.rectangle(
            rect.left as f64,
            rect.top as f64,
            rect.width() as f64,
            rect.height() as f64,
        );
        let _ = self.fill();
    }

    fn stroke_line(&mut self, from: (i32, i32), to: (i32, i32), pen: Pen) {
        let (r, g, b) = pen.color.channels();
        self.set_source_rgb(r, g, b);
        self.set_line_width(pen.width);
        if pen.dotted {
            self.set_dash(&[1.0, 2.0], 0.0);
        }
        // Offset by half a pixel so 1px lines stay crisp
        self.move_to(from.0 as f64, from.1 as f64 + 0.5);
        self.line_to(to.0 as f64, to.1 as f64 + 0.5);
        let _ = self.stroke();
        self.set_dash(&[], 0.0);
    }

    fn stroke_polyline(&mut self, points: &[(i32, i32)], pen: Pen) {
        let (r, g, b) = pen.color.channels();
        self.set_source_rgb(r, g, b);
        self.set_line_width(pen.width);
        self.set_line_join(cairo::LineJoin::Round);
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                self.move_to(x as f64, y as f64);
            } else {
                self.line_to(x as f64, y as f64);
            }
        }
        let _ = self.stroke();
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: GraphColor) {
        let (r, g, b) = color.channels();
        self.set_source_rgb(r, g, b);
        self.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        self.set_font_size(FONT_SIZE);
        self.move_to(x as f64, y as f64 + FONT_SIZE);
        let _ = self.show_text(text);
    }
}

/// Y coordinates of the four horizontal gridlines, the first on the top edge.
pub fn gridline_ys(region: Rect) -> [i32; 4] {
    let h = region.height();
    [0, 1, 2, 3].map(|i| region.top + i * h / 4)
}

/// Maps percentages onto `region`, spreading them evenly left to right.
/// 100% lands on the top edge and 0% on the bottom edge.
pub fn plot_points(region: Rect, values: &[f64]) -> Vec<(i32, i32)> {
    let width = region.width() as f64;
    let height = region.height() as f64;
    let last = values.len().saturating_sub(1).max(1) as f64;

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = region.left + (i as f64 * width / last).round() as i32;
            let y = region.bottom - (v / 100.0 * height).round() as i32;
            (x, y)
        })
        .collect()
}

/// Draws one labelled line chart of `history` inside `region`.
pub fn render_graph(
    surface: &mut impl Surface,
    region: Rect,
    history: &HistoryBuffer,
    color: GraphColor,
    label: &str,
) {
    surface.fill_rect(region, BACKGROUND);

    let grid = Pen { color: GRID, width: 1.0, dotted: true };
    for y in gridline_ys(region) {
        surface.stroke_line((region.left, y), (region.right, y), grid);
    }

    surface.draw_text(region.left + 6, region.top + 4, label, color);
    surface.draw_text(
        region.right - 60,
        region.top + 4,
        &util::format_percent(history.latest()),
        color,
    );

    let points = plot_points(region, &history.ordered_snapshot());
    surface.stroke_polyline(&points, Pen { color, width: 2.0, dotted: false });
}

/// Draws the CPU and memory graphs side by side across the top
/// `graph_height` pixels of `client`.
pub fn render_dashboard(
    surface: &mut impl Surface,
    client: Rect,
    graph_height: i32,
    cpu: &HistoryBuffer,
    memory: &HistoryBuffer,
) {
    let area = Rect {
        bottom: client.bottom.min(client.top + graph_height),
        ..client
    };
    if area.width() <= 0 || area.height() <= 0 {
        return;
    }
    surface.fill_rect(area, BACKDROP);

    let mid = area.left + area.width() / 2;
    let cpu_rect = Rect { right: mid, ..area };
    let mem_rect = Rect { left: mid, ..area };
    render_graph(surface, cpu_rect, cpu, CPU_COLOR, "CPU Usage");
    render_graph(surface, mem_rect, memory, MEMORY_COLOR, "Memory Usage");
}

pub struct GraphWidget {
    pub widget: gtk::DrawingArea,
}

impl GraphWidget {
    pub fn new<S: SystemSource + 'static>(
        graph_height: i32,
        collector: Rc<RefCell<Collector<S>>>,
    ) -> Self {
        let area = gtk::DrawingArea::new();
        area.set_content_height(graph_height);
        area.set_hexpand(true);
        area.add_css_class("graph-area");

        area.set_draw_func(move |_area, cr, w, h| {
            let Ok(collector) = collector.try_borrow() else {
                return;
            };
            let mut surface = cr.clone();
            render_dashboard(
                &mut surface,
                Rect::new(0, 0, w, h),
                graph_height,
                collector.cpu_history(),
                collector.mem_history(),
            );
        });

        Self { widget: area }
    }

    pub fn queue_redraw(&self) {
        self.widget.queue_draw();
    }
}
