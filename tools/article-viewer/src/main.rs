use eframe::egui;
use egui_extras::{Column, Size, StripBuilder, TableBuilder};
use std::path::Path;

use article_model::ArticleRecord;
use doc_splitter::config::{format_field_list, load_profile, save_profile};
use doc_splitter::csv_export::{write_csv_file, CsvEncoding};
use doc_splitter::{OutputFormat, SplitConfig, SplitMode, SPLIT_DEFAULTS};

#[derive(Debug, Default)]
struct AppState {
    path: String,
    cfg: SplitConfig,
    /// Custom delimiter/fields instead of the built-in article convention.
    custom_delims: bool,
    delimiter_edit: String,
    fields_edit: String,
    encoding: CsvEncoding,
    info_json: String,
    /// Settings the current records were produced with; CSV columns follow them.
    used_cfg: Option<SplitConfig>,
    articles: Vec<ArticleRecord>,
    status: Option<String>,
    error: Option<String>,
    selected: Option<usize>,
    show_tab_escape: bool,
}

fn main() -> eframe::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Article Viewer",
        options,
        Box::new(|_cc| Box::new(AppState::new())),
    )
}

impl AppState {
    fn new() -> Self {
        let cfg = SplitConfig::default();
        Self {
            delimiter_edit: cfg.delimiter.clone(),
            fields_edit: format_field_list(&cfg.fields, &cfg.tag_prefix),
            cfg,
            show_tab_escape: true,
            ..Default::default()
        }
    }

    /// Settings as shown in the panel: built-in convention unless custom is selected.
    fn effective_config(&self) -> SplitConfig {
        let mut cfg = self.cfg.clone();
        if self.custom_delims {
            cfg.delimiter = self.delimiter_edit.trim().to_string();
            cfg.set_fields_from_list(&self.fields_edit);
        } else {
            let d = SplitConfig::default();
            cfg.delimiter = d.delimiter;
            cfg.tag_prefix = d.tag_prefix;
            cfg.fields = d.fields;
        }
        cfg
    }

    fn process(&mut self) {
        self.error = None;
        self.status = None;
        self.info_json.clear();
        self.articles.clear();
        self.used_cfg = None;
        self.selected = None;
        let path = self.path.trim();
        if path.is_empty() {
            self.error = Some("Please pick a file".into());
            return;
        }
        let cfg = self.effective_config();
        match doc_splitter::process_path(Path::new(path), &cfg) {
            Ok(out) => {
                self.info_json = serde_json::to_string_pretty(&out.info)
                    .unwrap_or_else(|_| "<serde error>".into());
                self.status = Some(format!("Found {} articles", out.articles.len()));
                self.articles = out.articles;
                self.selected = if self.articles.is_empty() { None } else { Some(0) };
                self.used_cfg = Some(cfg);
            }
            Err(e) => {
                tracing::warn!(error = %e, path, "processing failed");
                self.error = Some(e.to_string());
            }
        }
    }

    fn save_csv(&mut self) {
        let Some(cfg) = &self.used_cfg else {
            self.error = Some("Nothing to export yet".into());
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(SPLIT_DEFAULTS.csv_file_name)
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match write_csv_file(&path, &self.articles, cfg, self.encoding) {
            Ok(()) => self.status = Some(format!("Saved {} articles to {}", self.articles.len(), path.display())),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn load_profile(&mut self) {
        let Some(path) = rfd::FileDialog::new().add_filter("Profile", &["json"]).pick_file() else {
            return;
        };
        match load_profile(&path) {
            Ok(cfg) => {
                let d = SplitConfig::default();
                self.custom_delims = cfg.delimiter != d.delimiter || cfg.fields != d.fields || cfg.tag_prefix != d.tag_prefix;
                self.delimiter_edit = cfg.delimiter.clone();
                self.fields_edit = format_field_list(&cfg.fields, &cfg.tag_prefix);
                self.cfg = cfg;
                self.status = Some(format!("Loaded profile {}", path.display()));
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn save_profile(&mut self) {
        let cfg = self.effective_config();
        if let Err(e) = cfg.validate() {
            self.error = Some(e.to_string());
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("profile.json")
            .add_filter("Profile", &["json"])
            .save_file()
        else {
            return;
        };
        match save_profile(&path, &cfg) {
            Ok(()) => self.status = Some(format!("Saved profile {}", path.display())),
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.vertical(|ui| {
                // Row 1: file input + actions
                ui.horizontal(|ui| {
                    ui.label("File:");
                    ui.text_edit_singleline(&mut self.path);
                    if ui.button("Pick...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Documents", &["docx", "odt"]).pick_file()
                        {
                            self.path = path.display().to_string();
                        }
                    }
                    ui.separator();
                    if ui.button("Process").clicked() {
                        self.process();
                    }
                    ui.separator();
                    egui::ComboBox::from_id_source("csv_encoding")
                        .selected_text(self.encoding.label())
                        .show_ui(ui, |ui| {
                            for enc in CsvEncoding::ALL {
                                ui.selectable_value(&mut self.encoding, enc, enc.label());
                            }
                        });
                    let can_save = !self.articles.is_empty();
                    if ui.add_enabled(can_save, egui::Button::new("Save CSV...")).clicked() {
                        self.save_csv();
                    }
                    ui.separator();
                    if ui.button("Load profile...").clicked() {
                        self.load_profile();
                    }
                    if ui.button("Save profile...").clicked() {
                        self.save_profile();
                    }
                });

                // Row 2: output and splitting mode
                ui.horizontal_wrapped(|ui| {
                    ui.label("Output:");
                    for f in [OutputFormat::Text, OutputFormat::Html] {
                        ui.radio_value(&mut self.cfg.output_format, f, f.label());
                    }
                    ui.separator();
                    ui.label("Split by:");
                    ui.radio_value(&mut self.cfg.mode, SplitMode::Delimiter, "Delimiter");
                    ui.radio_value(&mut self.cfg.mode, SplitMode::BlankLines, "Blank lines");
                    ui.separator();
                    ui.checkbox(&mut self.cfg.include_tables, "Include tables");
                    ui.checkbox(&mut self.show_tab_escape, "Show \\t for tabs");
                });

                // Row 3: delimiter settings
                ui.horizontal_wrapped(|ui| match self.cfg.mode {
                    SplitMode::Delimiter => {
                        ui.radio_value(&mut self.custom_delims, false, "Default delimiters");
                        ui.radio_value(&mut self.custom_delims, true, "Custom delimiters");
                        ui.separator();
                        if !self.custom_delims {
                            let d = SplitConfig::default();
                            self.delimiter_edit = d.delimiter;
                            self.fields_edit = format_field_list(&d.fields, &d.tag_prefix);
                        }
                        ui.label("Delimiter:");
                        ui.add_enabled(self.custom_delims, egui::TextEdit::singleline(&mut self.delimiter_edit).desired_width(160.0));
                        ui.label("Fields:");
                        ui.add_enabled(self.custom_delims, egui::TextEdit::singleline(&mut self.fields_edit).desired_width(420.0));
                        ui.separator();
                        ui.checkbox(&mut self.cfg.keep_preamble, "Keep preamble");
                        ui.checkbox(&mut self.cfg.accept_unprefixed, "Accept untagged fields");
                    }
                    SplitMode::BlankLines => {
                        ui.label("Blank lines between articles:");
                        ui.add(egui::DragValue::new(&mut self.cfg.blank.min_blank_lines).clamp_range(1..=20).speed(1));
                        ui.label("between title and body:");
                        ui.add(egui::DragValue::new(&mut self.cfg.blank.title_blank_lines).clamp_range(1..=20).speed(1));
                    }
                });

                if let Some(status) = &self.status {
                    ui.label(status);
                }
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                }
            });
        });

        egui::SidePanel::left("left").resizable(true).show(ctx, |ui| {
            ui.heading("Document");
            if self.info_json.is_empty() {
                ui.label("No file loaded.");
            } else {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(&self.info_json);
                });
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::relative(0.5)) // records table
                .size(Size::remainder())   // selected article
                .clip(true)
                .vertical(|mut strip| {
                    strip.cell(|ui| {
                        ui.heading(format!("Articles ({}):", self.articles.len()));
                        ui.separator();
                        self.records_table(ui);
                    });
                    strip.cell(|ui| {
                        egui::Frame::default().show(ui, |ui| {
                            ui.heading("Selected Article");
                            ui.separator();
                            self.article_detail(ui);
                        });
                    });
                });
        });
    }
}

impl AppState {
    fn records_table(&mut self, ui: &mut egui::Ui) {
        let Some(cfg) = &self.used_cfg else {
            ui.label("Process a document to list its articles.");
            return;
        };
        let columns = cfg.columns();
        let mut clicked = None;
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .auto_shrink([false, false])
            .column(Column::auto())
            .columns(Column::initial(120.0).at_least(40.0).clip(true), columns.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for c in &columns {
                    header.col(|ui| {
                        ui.strong(c);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, self.articles.len(), |mut row| {
                    let i = row.index();
                    let rec = &self.articles[i];
                    row.col(|ui| {
                        if ui.selectable_label(self.selected == Some(i), format!("{}", i + 1)).clicked() {
                            clicked = Some(i);
                        }
                    });
                    for cell in rec.row(&cfg.fields) {
                        row.col(|ui| {
                            ui.label(truncate_chars(&first_line(cell), 60));
                        });
                    }
                });
            });
        if clicked.is_some() {
            self.selected = clicked;
        }
    }

    fn article_detail(&self, ui: &mut egui::Ui) {
        let (Some(i), Some(cfg)) = (self.selected, &self.used_cfg) else {
            return;
        };
        let Some(rec) = self.articles.get(i) else {
            return;
        };
        let view = |s: &str| if self.show_tab_escape { escape_text_for_view(s) } else { s.to_string() };
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let title = cfg.fields.first().map(|f| rec.field(f)).unwrap_or_default();
            if !title.is_empty() {
                ui.heading(title);
            }
            egui::Grid::new("article_fields").striped(true).show(ui, |ui| {
                for f in cfg.fields.iter().skip(1) {
                    let v = rec.field(f);
                    if !v.is_empty() {
                        ui.strong(f);
                        ui.label(v);
                        ui.end_row();
                    }
                }
            });
            ui.separator();
            ui.strong(&cfg.body_column);
            ui.monospace(view(&rec.body));
            if rec.has_footer() {
                ui.separator();
                ui.strong(&cfg.footer_column);
                ui.monospace(view(rec.footer_text()));
            }
        });
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or_default().to_string()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if max_chars == 0 { return String::new(); }
    let mut it = s.chars();
    let truncated: String = it.by_ref().take(max_chars).collect();
    if it.next().is_some() { format!("{}…", truncated) } else { truncated }
}

fn escape_text_for_view(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\t' => out.push_str("\\t"),
            '\r' => { /* skip */ }
            _ => out.push(ch),
        }
    }
    out
}
