use crate::app::{OleSession, colors};
use crate::events::collect_ui_events;
use crate::hexlayout::{BYTES_PER_LINE, byte_offset, display_char, format_address};
use crate::hexview::{Clipboard, HexView};
use crate::ui_scrollarea::{Axis, Scrollbar, wheel_lines};
use eframe::egui;
use std::time::Duration;

/// Thickness reserved for each scrollbar
const SCROLLBAR_SIZE: f32 = 12.0;

/// System clipboard through egui's output
pub struct EguiClipboard<'a>(pub &'a egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn set_text(&mut self, text: String) {
        self.0.copy_text(text);
    }
}

/// Screen areas of the central panel
struct PanelRects {
    view: egui::Rect,
    v_bar: egui::Rect,
    h_bar: egui::Rect,
    status: egui::Rect,
}

impl PanelRects {
    fn split(full: egui::Rect, status_height: f32) -> Self {
        let view = egui::Rect::from_min_max(
            full.min,
            egui::pos2(
                full.right() - SCROLLBAR_SIZE,
                full.bottom() - status_height - SCROLLBAR_SIZE,
            ),
        );
        Self {
            view,
            v_bar: egui::Rect::from_min_max(
                egui::pos2(view.right(), full.top()),
                egui::pos2(full.right(), view.bottom()),
            ),
            h_bar: egui::Rect::from_min_max(
                egui::pos2(full.left(), view.bottom()),
                egui::pos2(view.right(), view.bottom() + SCROLLBAR_SIZE),
            ),
            status: egui::Rect::from_min_max(
                egui::pos2(full.left(), full.bottom() - status_height),
                full.max,
            ),
        }
    }
}

/// Text of the status line below the view
fn status_text(view: &HexView, stream: Option<&[String]>) -> String {
    let name = stream.map_or_else(String::new, |path| path.join("/"));
    let size = view.data().len();

    if let Some(range) = view.selection_range() {
        format!(
            "{name}  |  {size} bytes  |  Selected {} bytes: {:#X}..{:#X}",
            range.len(),
            range.start,
            range.end
        )
    } else if let Some(pos) = view.cursor().begin() {
        let offset = byte_offset(pos.line, pos.col).min(size);
        format!("{name}  |  {size} bytes  |  Offset {offset:#X}")
    } else {
        name
    }
}

impl OleSession {
    /// Displays the hex view of the selected stream with its scrollbars and status line
    pub(crate) fn show_central_panel(&mut self, ctx: &egui::Context, font: &egui::FontId) {
        egui::CentralPanel::default().show(ctx, |ui| {
            // Collect input events once per frame and store in the app state
            *self.events.borrow_mut() = collect_ui_events(ui);
            let events = *self.events.borrow();

            if self.view.data().is_empty() {
                ui.centered_and_justified(|ui| {
                    if self.selected.is_some() {
                        ui.label("Stream is empty");
                    } else {
                        ui.label("Select a stream in the tree");
                    }
                });
                return;
            }

            let status_height = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
            let full = ui.available_rect_before_wrap();
            ui.allocate_rect(full, egui::Sense::hover());
            let rects = PanelRects::split(full, status_height);

            self.view.set_viewport_size(rects.view.size());
            self.view.on_tick(events.time);

            self.handle_scrolling(ui, &rects, events.scroll_delta);
            self.handle_pointer(ui, &rects);

            if events.copy_requested
                && self.view.has_focus()
                && let Some(text) = self.view.copy(&mut EguiClipboard(ctx))
            {
                log::debug!("Copied {} characters", text.len());
            }

            self.paint_view(ui, rects.view, font);

            ui.put(
                rects.status,
                egui::Label::new(
                    egui::RichText::new(status_text(&self.view, self.selected.as_deref()))
                        .color(colors::GRAY_160),
                )
                .truncate(),
            );

            if let Some(secs) = self.view.next_blink_in() {
                ctx.request_repaint_after(Duration::from_secs_f64(secs));
            }
        });
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn handle_scrolling(&mut self, ui: &egui::Ui, rects: &PanelRects, delta: egui::Vec2) {
        let line_height = self.view.layout().glyph.height;

        if ui.rect_contains_pointer(rects.view) {
            // Shift + wheel arrives as horizontal delta
            if delta.x != 0.0 {
                self.view.set_h_scroll(self.view.h_scroll() - delta.x);
            }
            let lines = wheel_lines(delta.y, line_height);
            if lines != 0 {
                self.view.scroll_by_lines(lines);
            }
        }

        let v_max = self.view.v_scroll_max() as f32;
        if let Some(line) = Scrollbar::new(self.scroll_id.with("v"), Axis::Vertical).show(
            ui,
            rects.v_bar,
            self.view.first_visible_line() as f32,
            v_max,
            self.view.lines_per_page() as f32,
        ) {
            self.view.set_v_scroll(line.round() as usize);
        }

        if let Some(offset) = Scrollbar::new(self.scroll_id.with("h"), Axis::Horizontal).show(
            ui,
            rects.h_bar,
            self.view.h_scroll(),
            self.view.h_scroll_max(),
            rects.view.width(),
        ) {
            self.view.set_h_scroll(offset);
        }
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, rects: &PanelRects) {
        let view_rect = rects.view;
        let response = ui.interact(
            view_rect,
            self.scroll_id.with("canvas"),
            egui::Sense::click_and_drag(),
        );
        let to_view = |p: egui::Pos2| (p - view_rect.min).to_pos2();

        let (primary_pressed, any_pressed, pointer, window_focused) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.any_pressed(),
                i.pointer.interact_pos(),
                i.focused,
            )
        });

        if primary_pressed
            && let Some(p) = pointer
            && view_rect.contains(p)
        {
            let notifications = self.view.on_press(to_view(p));
            if !notifications.is_empty() {
                ui.ctx().request_repaint();
            }
        } else if response.dragged_by(egui::PointerButton::Primary)
            && let Some(p) = response.interact_pointer_pos()
        {
            // Keep selecting past the top and bottom edges
            if p.y < view_rect.top() {
                self.view.scroll_by_lines(-1);
            } else if p.y > view_rect.bottom() {
                self.view.scroll_by_lines(1);
            }
            let notifications = self.view.on_drag(to_view(p));
            if !notifications.is_empty() {
                ui.ctx().request_repaint();
            }
        }

        let pressed_elsewhere = any_pressed && pointer.is_some_and(|p| !view_rect.contains(p));
        if self.view.has_focus() && (pressed_elsewhere || !window_focused) {
            self.view.on_focus_out();
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn paint_view(&self, ui: &egui::Ui, rect: egui::Rect, font: &egui::FontId) {
        let view = &self.view;
        let layout = view.layout();
        let glyph = layout.glyph;
        let h_scroll = view.h_scroll();
        let data = view.data();
        let text_color = ui.visuals().text_color();

        let painter = ui.painter_at(rect);
        // Hex and ASCII scroll under the fixed address column
        let content = painter.with_clip_rect(rect.intersect(egui::Rect::from_min_max(
            egui::pos2(rect.left() + layout.address_width(), rect.top()),
            rect.max,
        )));
        let at = |x: f32, y: f32| rect.min + egui::vec2(x, y);

        for line in view.visible_lines() {
            let Some(top) = view.line_top(line) else {
                continue;
            };

            if let Some(spans) = view.selection_spans(line) {
                let offset = rect.min.to_vec2();
                content.rect_filled(spans.hex.translate(offset), 0.0, colors::LIGHT_BLUE);
                content.rect_filled(spans.ascii.translate(offset), 0.0, colors::LIGHT_BLUE);
            }

            let start = line * BYTES_PER_LINE;
            let bytes = &data[start..(start + BYTES_PER_LINE).min(data.len())];

            painter.text(
                at(0.0, top),
                egui::Align2::LEFT_TOP,
                format_address(start, layout.address_digits),
                font.clone(),
                colors::GRAY,
            );

            let hex = bytes
                .iter()
                .map(|b| format!("{b:02X}"))
                .collect::<Vec<_>>()
                .join(" ");
            content.text(
                at(layout.hex_x() - h_scroll, top),
                egui::Align2::LEFT_TOP,
                hex,
                font.clone(),
                text_color,
            );

            // One glyph per byte keeps the ASCII pane on the grid for any font
            for (i, &b) in bytes.iter().enumerate() {
                content.text(
                    at(layout.ascii_byte_x(i) - h_scroll, top),
                    egui::Align2::LEFT_TOP,
                    display_char(b),
                    font.clone(),
                    text_color,
                );
            }
        }

        let rule = egui::Stroke::new(1.0, colors::GRAY_210.gamma_multiply(0.4));
        painter.vline(rect.left() + layout.address_width() - 1.0, rect.y_range(), rule);
        content.vline(
            rect.left() + layout.ascii_x() - glyph.width / 2.0 - h_scroll,
            rect.y_range(),
            rule,
        );

        if let Some(caret) = view.cursor_rect() {
            content.rect_filled(caret.translate(rect.min.to_vec2()), 0.0, text_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hexlayout::GlyphMetrics;

    const GLYPH: GlyphMetrics = GlyphMetrics {
        width: 8.0,
        height: 16.0,
    };

    fn loaded_view(len: usize) -> HexView {
        let mut view = HexView::new(GLYPH);
        view.set_viewport_size(egui::vec2(1000.0, 400.0));
        view.set_data(Some((0..len).map(|i| (i % 256) as u8).collect()));
        view
    }

    #[test]
    fn test_panel_rects_do_not_overlap() {
        // Arrange
        let full = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(600.0, 400.0));

        // Act
        let rects = PanelRects::split(full, 20.0);

        // Assert
        assert_eq!(rects.view.min, full.min);
        assert!(!rects.view.intersects(rects.v_bar.shrink(0.5)));
        assert!(!rects.view.intersects(rects.h_bar.shrink(0.5)));
        assert!(!rects.view.intersects(rects.status.shrink(0.5)));
        assert!((rects.status.height() - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_status_text_caret() {
        let view = loaded_view(40);
        let path = vec!["Storage".to_string(), "Data".to_string()];

        let text = status_text(&view, Some(path.as_slice()));

        assert_eq!(text, "Storage/Data  |  40 bytes  |  Offset 0x0");
    }

    #[test]
    fn test_status_text_selection() {
        // Arrange: drag across the first four bytes of the second line
        let mut view = loaded_view(40);
        view.on_press(egui::pos2(view.layout().hex_x(), 16.0 + 4.0));
        let x = view.layout().column_x(crate::textcursor::Pane::Hex, 11);
        view.on_drag(egui::pos2(x, 16.0 + 4.0));

        // Act
        let text = status_text(&view, None);

        // Assert
        assert_eq!(text, "  |  40 bytes  |  Selected 4 bytes: 0x10..0x14");
    }

    #[test]
    fn test_status_text_caret_offset_on_later_line() {
        // Arrange: caret between the digits of byte 3 on line 2
        let mut view = loaded_view(64);
        let x = view.layout().column_x(crate::textcursor::Pane::Hex, 10);
        view.on_press(egui::pos2(x, 2.0 * 16.0 + 4.0));

        // Act
        let text = status_text(&view, None);

        // Assert
        assert_eq!(text, "  |  64 bytes  |  Offset 0x23");
    }

    #[test]
    fn test_status_text_without_data() {
        let view = HexView::new(GLYPH);
        assert_eq!(status_text(&view, None), "");
    }
}
