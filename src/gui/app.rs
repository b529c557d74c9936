use eframe::egui;
use std::path::PathBuf;

use crate::analysis::parse_target_words;
use crate::config::{save_config, AppConfig};
use crate::core::AnalyzerCore;
use crate::transcription::model::{model_info_for_filename, SUPPORTED_MODELS};
use crate::transcription::default_model_path;

const LANGUAGES: &[&str] = &["auto", "en", "pl", "de", "es", "fr", "it", "ja"];

/// Validated form values handed to the analyzer.
#[derive(Debug)]
struct AnalysisRequest {
    audio_path: PathBuf,
    targets: Vec<String>,
    threshold: Option<u8>,
}

#[derive(Debug, PartialEq)]
enum InputError {
    MissingFile,
    MissingWords,
    InvalidThreshold,
}

impl InputError {
    fn title(&self) -> &'static str {
        match self {
            InputError::MissingFile => "No file",
            InputError::MissingWords => "No words",
            InputError::InvalidThreshold => "Invalid threshold",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            InputError::MissingFile => "Please select an audio file!",
            InputError::MissingWords => "Enter at least one target word!",
            InputError::InvalidThreshold => "Threshold must be a number between 0 and 100",
        }
    }
}

fn validate_inputs(
    file_path: &str,
    words_input: &str,
    threshold_input: &str,
) -> Result<AnalysisRequest, InputError> {
    let file_path = file_path.trim();
    if file_path.is_empty() {
        return Err(InputError::MissingFile);
    }

    let targets = parse_target_words(words_input);
    if targets.is_empty() {
        return Err(InputError::MissingWords);
    }

    let threshold_input = threshold_input.trim();
    let threshold = if threshold_input.is_empty() {
        None
    } else {
        match threshold_input.parse::<i64>() {
            Ok(t) if (0..=100).contains(&t) => Some(t as u8),
            _ => return Err(InputError::InvalidThreshold),
        }
    };

    Ok(AnalysisRequest {
        audio_path: PathBuf::from(file_path),
        targets,
        threshold,
    })
}

pub struct AnalyzerApp {
    core: AnalyzerCore,
    config: AppConfig,
    file_path: String,
    words_input: String,
    threshold_input: String,
    output: String,
    // Deferred one frame so the "Analyzing" notice paints before the
    // blocking transcription call (the analysis runs on the GUI thread).
    pending: Option<AnalysisRequest>,
}

impl AnalyzerApp {
    pub fn new(config: AppConfig) -> Self {
        let mut core = AnalyzerCore::new(default_model_path(&config.model_filename));
        if config.language != "auto" {
            core.set_language(Some(&config.language));
        }
        Self {
            core,
            words_input: config.target_words.clone(),
            threshold_input: config.fuzzy_threshold.clone(),
            config,
            file_path: String::new(),
            output: String::new(),
            pending: None,
        }
    }

    fn persist_form(&mut self) {
        self.config.target_words = self.words_input.clone();
        self.config.fuzzy_threshold = self.threshold_input.clone();
        save_config(&self.config);
    }

    fn on_analyze_clicked(&mut self, ctx: &egui::Context) {
        self.persist_form();
        match validate_inputs(&self.file_path, &self.words_input, &self.threshold_input) {
            Ok(request) => {
                self.output = String::from("Analyzing, please wait...\n");
                self.pending = Some(request);
                ctx.request_repaint();
            }
            Err(err) => {
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Warning)
                    .set_title(err.title())
                    .set_description(err.message())
                    .set_buttons(rfd::MessageButtons::Ok)
                    .show();
            }
        }
    }

    fn run_pending(&mut self) {
        let Some(request) = self.pending.take() else {
            return;
        };
        match self
            .core
            .run(&request.audio_path, &request.targets, request.threshold)
        {
            Ok(report) => {
                self.output = report;
            }
            Err(e) => {
                tracing::error!("Analysis failed: {:#}", e);
                self.output = format!("Error: {:#}", e);
            }
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        let mut settings_changed = false;

        egui::Grid::new("input_form")
            .num_columns(3)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Audio file:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.file_path).desired_width(340.0),
                );
                if ui.button("Browse").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Audio files", &["mp3", "m4a", "wav"])
                        .pick_file()
                    {
                        self.file_path = path.display().to_string();
                    }
                }
                ui.end_row();

                ui.label("Target words (comma-separated):");
                ui.add(
                    egui::TextEdit::singleline(&mut self.words_input).desired_width(340.0),
                );
                ui.end_row();

                ui.label("Fuzzy threshold (0-100, optional):");
                ui.add(
                    egui::TextEdit::singleline(&mut self.threshold_input).desired_width(60.0),
                );
                ui.end_row();

                ui.label("Model:");
                let selected_label = model_info_for_filename(&self.config.model_filename)
                    .map(|m| m.label)
                    .unwrap_or(self.config.model_filename.as_str());
                egui::ComboBox::from_id_salt("model_select")
                    .selected_text(selected_label)
                    .width(260.0)
                    .show_ui(ui, |ui| {
                        for m in SUPPORTED_MODELS {
                            if ui
                                .selectable_value(
                                    &mut self.config.model_filename,
                                    m.filename.to_string(),
                                    m.label,
                                )
                                .changed()
                            {
                                settings_changed = true;
                            }
                        }
                    });
                ui.end_row();

                ui.label("Language:");
                egui::ComboBox::from_id_salt("language_select")
                    .selected_text(self.config.language.clone())
                    .width(100.0)
                    .show_ui(ui, |ui| {
                        for lang in LANGUAGES {
                            if ui
                                .selectable_value(
                                    &mut self.config.language,
                                    lang.to_string(),
                                    *lang,
                                )
                                .changed()
                            {
                                settings_changed = true;
                            }
                        }
                    });
                ui.end_row();
            });

        if settings_changed {
            self.core
                .set_model_path(default_model_path(&self.config.model_filename));
            let lang = if self.config.language == "auto" {
                None
            } else {
                Some(self.config.language.as_str())
            };
            self.core.set_language(lang);
            save_config(&self.config);
        }
    }
}

impl eframe::App for AnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Runs at most one deferred analysis; blocks this frame until done
        self.run_pending();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().button_padding = egui::vec2(8.0, 5.0);
            ui.heading("WordsCounter");
            ui.add_space(6.0);
            ui.separator();
            ui.add_space(6.0);

            self.form_ui(ui);

            ui.add_space(10.0);
            if ui
                .add_sized([120.0, 30.0], egui::Button::new("Analyze"))
                .clicked()
            {
                self.on_analyze_clicked(ctx);
            }

            ui.add_space(8.0);
            ui.separator();

            let available_height = ui.available_height();
            egui::ScrollArea::vertical()
                .max_height(available_height)
                .auto_shrink([false; 2])
                .id_salt("report_pane")
                .show(ui, |ui| {
                    ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
                    ui.label(self.output.as_str());
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_inputs, InputError};

    #[test]
    fn empty_file_path_is_rejected() {
        let err = validate_inputs("  ", "hello", "").unwrap_err();
        assert_eq!(err, InputError::MissingFile);
        assert_eq!(err.message(), "Please select an audio file!");
    }

    #[test]
    fn empty_word_list_is_rejected() {
        let err = validate_inputs("a.wav", " , ,", "").unwrap_err();
        assert_eq!(err, InputError::MissingWords);
    }

    #[test]
    fn threshold_must_be_an_integer_in_range() {
        for bad in ["abc", "101", "-1", "8.5"] {
            let err = validate_inputs("a.wav", "hello", bad).unwrap_err();
            assert_eq!(err, InputError::InvalidThreshold, "input: {bad}");
        }
    }

    #[test]
    fn empty_threshold_means_exact_matching() {
        let req = validate_inputs("a.wav", "Hello, World", "  ").unwrap();
        assert_eq!(req.threshold, None);
        assert_eq!(req.targets, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn boundary_thresholds_are_accepted() {
        assert_eq!(validate_inputs("a.wav", "x", "0").unwrap().threshold, Some(0));
        assert_eq!(
            validate_inputs("a.wav", "x", "100").unwrap().threshold,
            Some(100)
        );
    }
}
