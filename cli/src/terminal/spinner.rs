use colored::*;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub const TIP: &str = "press 'q' to finish early";

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} [{bar:30.green/bright_black}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICK_STRINGS)
        .progress_chars("█▓░")
}

/// A progress indicator shown while its span lives.
///
/// The bar is drawn by the `tracing-indicatif` layer, so log lines and
/// printed output are written above it instead of through it.
#[derive(Clone)]
pub struct Progress {
    span: Span,
}

impl Progress {
    pub fn spinner(name: &'static str, tip: bool) -> Self {
        let span = info_span!("progress", task = name, indicatif.pb_show = true);
        span.pb_set_style(&spinner_style());
        if tip {
            span.pb_set_message(&format!("{}", TIP.italic().white()));
        }
        span.pb_start();
        Self { span }
    }

    pub fn set_message(&self, msg: &str) {
        self.span.pb_set_message(msg);
    }

    pub fn set_length(&self, len: u64) {
        self.span.pb_set_length(len);
    }

    pub fn set_position(&self, pos: u64) {
        self.span.pb_set_position(pos);
    }

    pub fn switch_to_bar(&self, len: u64) {
        self.span.pb_set_style(&bar_style());
        self.span.pb_set_length(len);
        self.span.pb_set_position(0);
    }
}

pub fn report_discovery_progress(progress: &Progress, count: usize) {
    progress.set_message(&format!(
        "Identified {} hosts so far...",
        count.to_string().green().bold()
    ));
}
