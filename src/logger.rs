use anyhow::Context as _;
use egui::{Color32, Label, RichText, Sense};
use log::Level;

/// Installs the in-app logger. Records from this crate come out of the returned channel.
pub fn init_logger(max_level: log::LevelFilter) -> anyhow::Result<flume::Receiver<Record>> {
    let (sender, receiver) = flume::bounded(Logger::CAPACITY);
    log::set_boxed_logger(Box::new(Logger::new(sender)))
        .context("a logger was already installed")?;
    log::set_max_level(max_level);
    Ok(receiver)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisplayOptions {
    pub timestamp: bool,
    pub level: bool,
    pub target: bool,
}

impl DisplayOptions {
    pub const fn new() -> Self {
        Self {
            timestamp: true,
            level: true,
            target: false,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Record {
    pub timestamp: time::OffsetDateTime,
    pub start: time::OffsetDateTime,
    pub target: Box<str>,
    pub level: Level,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub data: Box<str>,
}

impl Record {
    const fn level(&self) -> &'static str {
        match self.level {
            Level::Error => "error",
            Level::Warn => "warn ",
            Level::Info => "info ",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    const fn level_color(&self) -> Color32 {
        match self.level {
            Level::Error => Color32::RED,
            Level::Warn => Color32::YELLOW,
            Level::Info => Color32::GREEN,
            Level::Debug => Color32::from_rgb(0x00, 0xFF, 0xFF),
            Level::Trace => Color32::from_rgb(0xFF, 0x00, 0xFF),
        }
    }

    /// Milliseconds since the logger started, zero padded to 9 digits.
    pub fn elapsed(&self) -> String {
        let ms = (self.timestamp - self.start).whole_milliseconds().max(0);
        format!("{ms:0>9}")
    }

    /// NOTE this assume the timestamp is 9 digits
    fn colorize_timestamp(input: &str) -> [(&str, Color32); 3] {
        const COLORS: [Color32; 3] = [
            Color32::LIGHT_YELLOW,
            Color32::LIGHT_BLUE,
            Color32::LIGHT_GREEN,
        ];

        let mut out = [("", Color32::GRAY); 3];
        if input.len() != 9 || !input.is_ascii() {
            out[2] = (input, Color32::GRAY);
            return out;
        }

        for (i, part) in out.iter_mut().enumerate() {
            *part = (&input[i * 3..i * 3 + 3], COLORS[i]);
        }
        out
    }

    pub fn display(&self, opts: DisplayOptions, index: usize, ui: &mut egui::Ui) {
        let resp = ui
            .horizontal_wrapped(|ui| {
                ui.monospace(index.to_string());

                if opts.level {
                    ui.add(Label::new(
                        RichText::new(self.level())
                            .monospace()
                            .color(self.level_color()),
                    ));
                }

                if opts.timestamp {
                    ui.scope(|ui| {
                        ui.style_mut().spacing.item_spacing.x = 0.0;
                        let ts = self.elapsed();
                        for (i, (part, color)) in
                            Self::colorize_timestamp(&ts).into_iter().enumerate()
                        {
                            if i != 0 {
                                ui.monospace(".");
                            }
                            ui.add(Label::new(RichText::new(part).monospace().color(color)));
                        }
                    });
                }

                if opts.target {
                    ui.monospace(&*self.target);
                }

                ui.add(Label::new(
                    RichText::new(&*self.data)
                        .monospace()
                        .color(ui.style().visuals.strong_text_color()),
                ))
            })
            .response;

        let resp = ui.interact(resp.rect, ui.id().with(("log", index)), Sense::hover());
        if let Some((file, line)) = self.file.zip(self.line) {
            resp.on_hover_text_at_pointer(format!("{file}:{line}"));
        }
    }
}

struct Logger {
    sender: flume::Sender<Record>,
    start: time::OffsetDateTime,
}

impl Logger {
    const CAPACITY: usize = 4096;

    fn new(sender: flume::Sender<Record>) -> Self {
        Self {
            sender,
            start: now(),
        }
    }

    fn log_it(&self, record: &log::Record<'_>) {
        let metadata = record.metadata();

        // a full channel means nobody is reading, so drop it
        let _ = self.sender.try_send(Record {
            timestamp: now(),
            start: self.start,
            target: Box::from(metadata.target()),
            level: metadata.level(),
            data: Box::from(&*record.args().to_string()),
            file: record.file_static(),
            line: record.line(),
        });
    }

    fn is_from_our_pkg(record: &log::Record<'_>) -> bool {
        record
            .module_path()
            .map(|module| module.split("::").next() == Some(env!("CARGO_PKG_NAME")))
            .unwrap_or(false)
    }
}

fn now() -> time::OffsetDateTime {
    time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc())
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) || !Self::is_from_our_pkg(record) {
            return;
        }

        self.log_it(record)
    }

    fn flush(&self) {}
}
