//! HTML/SVG calendar document serializer.
//!
//! Emits one self-contained document: a fixed label column and a
//! horizontally scrollable chart, both as inline SVG, plus a JSON config
//! island and the fixed client runtime. The serializer bakes all geometry
//! into the markup; the runtime only wires behavior (tooltip, password
//! gate, auto-refresh, initial scroll) off the config island.

use crate::booking::{Annotations, Booking, CalendarBoard};
use crate::dates::format_day_month_year;
use crate::layout::{ellipsize, BarGeometry, Geometry, Window, DEFAULT_SCALE};
use crate::properties::display_name;
use crate::serializer::escape_html;
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt::Write;

/// Version of the embedded client runtime, mirrored in `assets/runtime.js`.
pub const RUNTIME_VERSION: u32 = 3;

/// Client-side authorization token lifetime (30 days, in milliseconds).
pub const TOKEN_TTL_MS: i64 = 30 * 24 * 60 * 60 * 1000;

const RUNTIME_JS: &str = include_str!("../../assets/runtime.js");

/// Configuration options for HTML serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlOptions {
    /// UI scale factor applied to every pixel constant.
    ///
    /// Default: 1.5 (≈ 150% zoom).
    pub scale: f64,

    /// Auto-refresh interval in minutes; 0 disables the refresh behavior.
    ///
    /// Default: 60.
    pub auto_refresh_minutes: u32,

    /// SHA-256 hex of the access password. `None` disables the gate; the
    /// plaintext never reaches the serializer.
    pub password_hash: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            auto_refresh_minutes: 60,
            password_hash: None,
        }
    }
}

/// Serializer for the occupancy calendar document.
///
/// # Examples
///
/// ```
/// use fewocal_core::booking::{Annotations, CalendarBoard};
/// use fewocal_core::serializer::CalendarHtmlSerializer;
/// use chrono::NaiveDate;
///
/// let serializer = CalendarHtmlSerializer::new();
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let html = serializer.serialize(&CalendarBoard::default(), &Annotations::default(), today, 0);
/// assert!(html.contains("No properties found"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarHtmlSerializer {
    options: HtmlOptions,
}

impl CalendarHtmlSerializer {
    /// Create a serializer with default options.
    #[inline]
    #[must_use = "creates a serializer that should be used to render the board"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with the given options.
    #[inline]
    #[must_use]
    pub fn with_options(options: HtmlOptions) -> Self {
        Self { options }
    }

    /// Render the document.
    ///
    /// `generated_ms` is the generation wall-clock timestamp in epoch
    /// milliseconds; it parameterizes the client-side staleness check so
    /// rendering itself stays deterministic and testable.
    #[must_use]
    pub fn serialize(
        &self,
        board: &CalendarBoard,
        annotations: &Annotations,
        today: NaiveDate,
        generated_ms: i64,
    ) -> String {
        let mut html = String::new();
        html.push_str(
            "<!doctype html><meta charset=\"utf-8\">\
             <meta http-equiv=\"Cache-Control\" content=\"no-cache, no-store, must-revalidate\">\
             <meta http-equiv=\"Pragma\" content=\"no-cache\">\
             <meta http-equiv=\"Expires\" content=\"0\">\
             <title>Bookings Calendar</title>",
        );
        if board.lanes.is_empty() {
            html.push_str("<h1>No properties found</h1>");
            return html;
        }

        let window = Window::around(today);
        let names: Vec<&str> = board
            .lanes
            .iter()
            .map(|lane| display_name(&lane.property))
            .collect();
        let max_name_chars = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);
        let geom = Geometry::new(self.options.scale, window, board.lanes.len(), max_name_chars);
        let gated = self.options.password_hash.is_some();

        self.push_config_island(&mut html, &geom, today, generated_ms);
        let _ = write!(html, "<script>{RUNTIME_JS}</script>");
        self.push_style(&mut html, &geom);

        if gated {
            push_gate_markup(&mut html);
        }
        let hidden = if gated { " style=\"display:none\"" } else { "" };
        let nav_style = if gated {
            "display:none;font-family:initial;margin:8px"
        } else {
            "font-family:initial;margin:8px"
        };
        let _ = write!(
            html,
            "<div id=\"nav\" style=\"{nav_style}\">\
             <p><a href='calendar.html'>Visual Calendar</a> &nbsp; \
             <a href='quick_overview.html'>Quick Overview</a> &nbsp; \
             <a href='arrivals.html'>Arrivals</a> &nbsp; \
             <a href='departures.html'>Departures</a></p><br></div>"
        );

        let _ = write!(html, "<div class=\"wrap\"{hidden}>");
        push_labels_column(&mut html, &geom, &names);
        self.push_chart_column(&mut html, &geom, board, annotations, today);
        html.push_str("</div>");
        html.push_str("<div id=\"tip\" class=\"tooltip\"></div>");
        html
    }

    /// Emit the JSON data island the client runtime boots from.
    fn push_config_island(
        &self,
        html: &mut String,
        geom: &Geometry,
        today: NaiveDate,
        generated_ms: i64,
    ) {
        let config = serde_json::json!({
            "version": RUNTIME_VERSION,
            "passwordHash": self.options.password_hash,
            "refreshMs": i64::from(self.options.auto_refresh_minutes) * 60_000,
            "generatedMs": generated_ms,
            "scrollPx": geom.scroll_offset(today),
            "tokenTtlMs": TOKEN_TTL_MS,
        });
        let _ = write!(
            html,
            "<script type=\"application/json\" id=\"cal-config\">{config}</script>"
        );
    }

    fn push_style(&self, html: &mut String, geom: &Geometry) {
        let s = geom.scale;
        let fs = 12.0 * s;
        let small_fs = 10.0 * s;
        let barlab_fs = 11.0 * s;
        let sw1 = s;
        let sw2 = 2.0 * s;
        let radius = 3.0 * s;
        let _ = write!(
            html,
            "<style>\
body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,sans-serif;margin:0}}\
.wrap{{display:flex;padding:8px}}\
.labels-col{{flex:0 0 {label_w}px;overflow:hidden}}\
.chart-col{{flex:1;overflow-x:auto}}\
text{{font-size:{fs}px;fill:#222}}\
.grid{{stroke:#eee;stroke-width:{sw1}}}\
.day{{stroke:#f3f3f3;stroke-width:{sw1}}}\
.sun{{fill:#d9e1f0}}\
.month{{stroke:#ddd;stroke-width:{sw1}}}\
.name{{fill:#111}}\
.bar{{fill:#2b8cbe;rx:{radius};ry:{radius};stroke:#fff;stroke-width:{sw2};paint-order:stroke fill}}\
.bar.new{{fill:#e67e22}}\
.bar:hover{{fill:#1b6f97}}\
.blocked{{fill:#ccc;rx:{radius};ry:{radius};stroke:#fff;stroke-width:{sw2};paint-order:stroke fill}}\
.blocked:hover{{fill:#aaa}}\
.today{{stroke:#f33;stroke-width:{sw1}}}\
.legend{{font-size:{fs}px;fill:#555}}\
.small{{font-size:{small_fs}px;fill:#666}}\
.barlabel{{fill:#fff;font-size:{barlab_fs}px;pointer-events:none}}\
.tooltip{{position:fixed;z-index:1000;background:rgba(0,0,0,.85);color:#fff;\
padding:6px 8px;border-radius:4px;font-size:{fs}px;max-width:60vw;pointer-events:none;display:none}}\
.turnover{{stroke:#f00;stroke-width:{turnover_sw}}}",
            label_w = geom.label_w,
            turnover_sw = 4.0 * s,
        );
        if self.options.password_hash.is_some() {
            let _ = write!(
                html,
                "#gate{{position:fixed;inset:0;background:#fff;display:flex;\
align-items:center;justify-content:center;z-index:2000}}\
#gate form{{background:#f7f7f7;padding:{p1}px {p2}px;border-radius:{r}px;\
box-shadow:0 2px {sh}px rgba(0,0,0,.15);min-width:{mw}px}}\
#gate label{{display:block;margin-bottom:{mb}px;color:#333;font-weight:600}}\
#gate input{{font-size:{fs}px;padding:{ip1}px {ip2}px;width:100%;box-sizing:border-box;margin-bottom:{imb}px}}\
#gate button{{font-size:{fs}px;padding:{ip1}px {bp}px}}",
                p1 = 12.0 * s,
                p2 = 14.0 * s,
                r = 8.0 * s,
                sh = 12.0 * s,
                mw = 260.0 * s,
                mb = 6.0 * s,
                ip1 = 6.0 * s,
                ip2 = 8.0 * s,
                imb = 8.0 * s,
                bp = 10.0 * s,
            );
        }
        html.push_str("</style>");
    }

    fn push_chart_column(
        &self,
        html: &mut String,
        geom: &Geometry,
        board: &CalendarBoard,
        annotations: &Annotations,
        today: NaiveDate,
    ) {
        let _ = write!(
            html,
            "<div class=\"chart-col\"><svg class=\"cal\" width=\"{}\" height=\"{}\" \
             xmlns=\"http://www.w3.org/2000/svg\">",
            geom.chart_w, geom.height
        );
        push_grid(html, geom, today);
        for (row, lane) in board.lanes.iter().enumerate() {
            let y = geom.row_y(row);
            let mid = y + geom.row_h / 2.0;
            let _ = write!(
                html,
                "<line class=\"grid\" x1=\"0\" y1=\"{mid}\" x2=\"{}\" y2=\"{mid}\"/>",
                geom.chart_w
            );
            let property = display_name(&lane.property);

            let lane_bars = geom.lay_out_bookings(row, &lane.bookings);
            for (index, bar) in &lane_bars.bars {
                self.push_booking_bar(html, geom, &lane.bookings[*index], property, bar, annotations);
            }
            for turnover in &lane_bars.turnovers {
                let x = geom.day_x(*turnover);
                let _ = write!(
                    html,
                    "<line class=\"turnover\" x1=\"{x}\" y1=\"{y}\" x2=\"{x}\" y2=\"{}\"/>",
                    y + geom.bar_height()
                );
            }
            for (index, bar) in geom.lay_out_blocked(row, &lane.blocked) {
                let blocked = &lane.blocked[index];
                let tip = format!(
                    "BLOCKED — {property}: {} – {}",
                    format_day_month_year(blocked.start),
                    format_day_month_year(blocked.end)
                );
                push_bar_rect(html, "blocked", &bar, &tip);
                push_bar_label(html, geom, &bar, "x");
            }
        }
        html.push_str("</svg></div>");
    }

    fn push_booking_bar(
        &self,
        html: &mut String,
        geom: &Geometry,
        booking: &Booking,
        property: &str,
        bar: &BarGeometry,
        annotations: &Annotations,
    ) {
        let key = booking.key();
        let is_new = annotations.new_keys.contains(&key);
        let is_repeat = annotations.repeat_keys.contains(&key);
        let guest = if is_repeat {
            format!("Stamm: {}", booking.guest)
        } else {
            booking.guest.clone()
        };
        let tip = booking_tip(booking, property, &guest, is_new);
        let class = if is_new { "bar new" } else { "bar" };
        push_bar_rect(html, class, bar, &tip);
        push_bar_label(html, geom, bar, &guest);
    }
}

/// Tooltip text for one booking:
/// `guest — property: start – end[ — N guests][, M animals][ — NEW]`.
fn booking_tip(booking: &Booking, property: &str, guest: &str, is_new: bool) -> String {
    let mut tip = format!(
        "{guest} — {property}: {} – {}",
        format_day_month_year(booking.start),
        format_day_month_year(booking.end)
    );
    if let Some(count) = booking.guest_count {
        let _ = write!(tip, " — {count} guests");
    }
    if booking.animal_count.unwrap_or(0) > 0 {
        let _ = write!(tip, ", {} animals", booking.animal_count.unwrap_or(0));
    }
    if is_new {
        tip.push_str(" — NEW");
    }
    tip
}

fn push_bar_rect(html: &mut String, class: &str, bar: &BarGeometry, tip: &str) {
    let escaped = escape_html(tip);
    let _ = write!(
        html,
        "<rect class=\"{class}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
         data-tip=\"{escaped}\"><title>{escaped}</title></rect>",
        bar.x, bar.y, bar.width, bar.height
    );
}

fn push_bar_label(html: &mut String, geom: &Geometry, bar: &BarGeometry, text: &str) {
    if !geom.shows_label(bar.width) {
        return;
    }
    let label = ellipsize(text, geom.label_budget(bar.width), geom.label_char_px());
    if label.is_empty() {
        return;
    }
    let y = bar.y + bar.height / 2.0 + 4.0 * geom.scale;
    let _ = write!(
        html,
        "<text class=\"barlabel\" x=\"{}\" y=\"{y}\">{}</text>",
        bar.x + 4.0 * geom.scale,
        escape_html(&label)
    );
}

/// Month lines, day columns, Sunday bands, day numbers and the today marker.
fn push_grid(html: &mut String, geom: &Geometry, today: NaiveDate) {
    let s = geom.scale;
    for month in geom.window.month_starts() {
        let x = geom.day_x(month);
        let _ = write!(
            html,
            "<line class=\"month\" x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{}\"/>",
            geom.height
        );
        let label = month.format("%b %Y").to_string();
        let _ = write!(
            html,
            "<text x=\"{}\" y=\"{}\">{}</text>",
            x + 4.0 * s,
            geom.top_h - 32.0 * s,
            escape_html(&label)
        );
    }
    let tick = geom.day_tick_interval();
    for day in geom.window.iter_days() {
        let x = geom.day_x(day);
        if day.weekday() == Weekday::Sun {
            let _ = write!(
                html,
                "<rect class=\"sun\" x=\"{x}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
                geom.top_h,
                geom.day_w,
                geom.height - geom.top_h
            );
        }
        let _ = write!(
            html,
            "<line class=\"day\" x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\"/>",
            geom.top_h, geom.height
        );
        if day.day() % tick == 0 || day.day() == 1 {
            let _ = write!(
                html,
                "<text class=\"small\" x=\"{}\" y=\"{}\">{}</text>",
                x + 2.0 * s,
                geom.top_h - 10.0 * s,
                day.day()
            );
        }
    }
    if geom.window.contains(today) {
        let x = geom.day_x(today);
        let _ = write!(
            html,
            "<line class=\"today\" x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{}\"/>",
            geom.height
        );
    }
}

fn push_labels_column(html: &mut String, geom: &Geometry, names: &[&str]) {
    let s = geom.scale;
    let _ = write!(
        html,
        "<div class=\"labels-col\"><svg width=\"{}\" height=\"{}\" \
         xmlns=\"http://www.w3.org/2000/svg\">",
        geom.label_w, geom.height
    );
    for (row, name) in names.iter().enumerate() {
        let mid = geom.row_y(row) + geom.row_h / 2.0;
        let label = ellipsize(name, geom.label_w - 12.0 * s, 6.5 * s);
        let _ = write!(
            html,
            "<text class=\"name\" x=\"8\" y=\"{}\">{}</text>",
            mid + 4.0,
            escape_html(&label)
        );
    }
    html.push_str("</svg></div>");
}

fn push_gate_markup(html: &mut String) {
    html.push_str(
        "<div id=\"gate\"><form id=\"gateForm\">\
         <label for=\"gateInput\">Passwort</label>\
         <input id=\"gateInput\" type=\"password\" autocomplete=\"current-password\" autofocus required>\
         <button type=\"submit\">Öffnen</button>\
         <div id=\"gateMsg\" class=\"small\" style=\"margin-top:6px;color:#b00\"></div>\
         </form></div>",
    );
}
