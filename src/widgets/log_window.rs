use std::collections::VecDeque;

use egui::{ScrollArea, Window};

use crate::logger::{DisplayOptions, Record};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Level {
    #[default]
    All,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    fn accepts(self, level: log::Level) -> bool {
        match self {
            Self::All => true,
            Self::Error => level == log::Level::Error,
            Self::Warn => level == log::Level::Warn,
            Self::Info => level == log::Level::Info,
            Self::Debug => level == log::Level::Debug,
            Self::Trace => level == log::Level::Trace,
        }
    }
}

pub struct LogWindow {
    records: VecDeque<Record>,
    max: usize,
    active_log: Level,
    opts: DisplayOptions,
}

impl Default for LogWindow {
    fn default() -> Self {
        Self::with_capacity(500)
    }
}

impl LogWindow {
    pub fn with_capacity(max: usize) -> Self {
        assert!(max != 0);
        Self {
            records: VecDeque::with_capacity(max),
            max,
            active_log: Level::default(),
            opts: DisplayOptions::new(),
        }
    }

    pub fn push(&mut self, record: Record) {
        while self.records.len() >= self.max {
            self.records.pop_front();
        }
        self.records.push_back(record)
    }

    pub fn drain_from(&mut self, receiver: &flume::Receiver<Record>) {
        for record in receiver.try_iter() {
            self.push(record)
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self, level: Level) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(move |r| level.accepts(r.level))
    }

    pub fn display(&mut self, show_logs: &mut bool, ctx: &egui::Context) {
        Window::new("logs")
            .default_height(200.0)
            .resizable(true)
            .collapsible(true)
            .open(show_logs)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for (repr, level) in [
                        ("all", Level::All),
                        ("error", Level::Error),
                        ("warn", Level::Warn),
                        ("info", Level::Info),
                        ("debug", Level::Debug),
                        ("trace", Level::Trace),
                    ] {
                        ui.selectable_value(&mut self.active_log, level, repr);
                    }

                    ui.separator();
                    ui.toggle_value(&mut self.opts.timestamp, "time");
                    ui.toggle_value(&mut self.opts.level, "level");
                    ui.toggle_value(&mut self.opts.target, "target");
                });

                ui.separator();
                ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            for (i, record) in self.iter(self.active_log).enumerate() {
                                record.display(self.opts, i, ui);
                            }
                        })
                    });
            });
    }
}
