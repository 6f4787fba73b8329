//! Side panel UI for a lab session
//!
//! Shows the lab equations, parameter fields, the answer check and the
//! measurement table using egui. The panel only reports what was clicked;
//! the app applies it to the session.

use egui::{Color32, Context, RichText};
use lab_core::{Lab, LabError, LabSession, Verdict};

/// Something the learner asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Apply,
    Check,
    Randomize,
    Reveal,
    Reset,
    ToggleClock,
    Lab(&'static str),
}

impl PanelAction {
    /// Whether the parameter fields reach the experiment before this runs.
    /// Randomize, reveal and reset rewrite the fields themselves.
    pub fn applies_inputs(self) -> bool {
        matches!(self, Self::Apply | Self::Check | Self::Lab(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Correct,
    Incorrect,
    Info,
    Error,
}

/// Inline message under the answer field
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn from_verdict(verdict: &Verdict) -> Self {
        let (kind, title) = if verdict.is_correct {
            (NoticeKind::Correct, "Correct")
        } else {
            (NoticeKind::Incorrect, "Incorrect")
        };
        Self {
            kind,
            title: title.to_string(),
            text: verdict.message.clone(),
        }
    }

    pub fn from_error(err: &LabError) -> Self {
        let kind = match err {
            LabError::EmptyState(_) => NoticeKind::Info,
            _ => NoticeKind::Error,
        };
        Self {
            kind,
            title: err.title().to_string(),
            text: err.to_string(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: "Info".to_string(),
            text: text.into(),
        }
    }

    fn color(&self) -> Color32 {
        match self.kind {
            NoticeKind::Correct => Color32::GREEN,
            NoticeKind::Incorrect => Color32::LIGHT_RED,
            NoticeKind::Info => Color32::LIGHT_BLUE,
            NoticeKind::Error => Color32::YELLOW,
        }
    }
}

/// Text the learner is editing
#[derive(Debug, Clone, Default)]
pub struct PanelModel {
    /// One entry per lab parameter, in declaration order
    pub fields: Vec<String>,
    pub answer: String,
    pub notice: Option<Notice>,
}

impl PanelModel {
    pub fn new<L: Lab>(session: &LabSession<L>) -> Self {
        let mut model = Self::default();
        model.sync_fields(session);
        model
    }

    /// Pull parameter text back from the session after it rewrote the fields.
    pub fn sync_fields<L: Lab>(&mut self, session: &LabSession<L>) {
        self.fields = session
            .lab()
            .parameters()
            .iter()
            .map(|spec| session.input(spec.name).unwrap_or_default().to_string())
            .collect();
    }
}

/// Draw the panel and collect the clicked actions.
pub fn draw_lab_panel<L: Lab>(
    ctx: &Context,
    session: &LabSession<L>,
    model: &mut PanelModel,
) -> Vec<PanelAction> {
    let mut actions = Vec::new();
    let lab = session.lab();
    let live = lab.params_of(session.experiment());

    egui::SidePanel::right("lab_panel")
        .resizable(true)
        .default_width(340.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(lab.name()).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in lab.equations() {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);
                ui.label(RichText::new("Parameters").strong());
                egui::Grid::new("parameter_grid")
                    .num_columns(2)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        for (spec, text) in lab.parameters().iter().zip(model.fields.iter_mut()) {
                            ui.label(format!("{} {} ({})", spec.label, spec.name, spec.unit));
                            let hint = live
                                .value(spec.name)
                                .map(|v| format!("{v}"))
                                .unwrap_or_default();
                            ui.add(
                                egui::TextEdit::singleline(text)
                                    .hint_text(hint)
                                    .desired_width(90.0),
                            );
                            ui.end_row();
                        }
                    });
                if ui.button("Apply").clicked() {
                    actions.push(PanelAction::Apply);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(format!("{} ({}):", lab.answer_label(), lab.answer_unit()));
                    ui.add(egui::TextEdit::singleline(&mut model.answer).desired_width(90.0));
                });
                ui.label(
                    RichText::new(format!("Tolerance {}", lab.tolerance().describe()))
                        .small()
                        .italics(),
                );

                ui.horizontal_wrapped(|ui| {
                    if ui.button("Check").clicked() {
                        actions.push(PanelAction::Check);
                    }
                    for action in lab.actions() {
                        if ui.button(*action).clicked() {
                            actions.push(PanelAction::Lab(*action));
                        }
                    }
                    if ui.button("Randomize").clicked() {
                        actions.push(PanelAction::Randomize);
                    }
                    if ui.button("Reveal").clicked() {
                        actions.push(PanelAction::Reveal);
                    }
                    if ui.button("Reset").clicked() {
                        actions.push(PanelAction::Reset);
                    }
                });

                if let Some(notice) = &model.notice {
                    ui.add_space(4.0);
                    ui.group(|ui| {
                        ui.label(RichText::new(&notice.title).strong().color(notice.color()));
                        ui.label(notice.text.as_str());
                    });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    let clock = session.visualization().clock();
                    let label = if clock.is_running() { "⏸ Pause" } else { "▶ Animate" };
                    if ui.button(label).clicked() {
                        actions.push(PanelAction::ToggleClock);
                    }
                    ui.label(format!("t = {:.2}", clock.sim_time()));
                });

                let stats = session.stats();
                let accuracy = stats
                    .accuracy()
                    .map(|a| format!(" ({:.0}%)", a * 100.0))
                    .unwrap_or_default();
                ui.label(format!(
                    "Attempts: {}  Correct: {}{accuracy}",
                    stats.attempts, stats.correct
                ));

                ui.collapsing(RichText::new("📋 Measurements").strong(), |ui| {
                    egui::Grid::new("measurement_grid")
                        .num_columns(5)
                        .striped(true)
                        .show(ui, |ui| {
                            for header in ["Time", "Parameters", "Answer", "True", ""] {
                                ui.label(RichText::new(header).strong());
                            }
                            ui.end_row();

                            for row in session.rows() {
                                ui.label(RichText::new(row.time).small());
                                ui.label(RichText::new(row.params).monospace().small());
                                ui.label(row.answer);
                                ui.label(row.computed);
                                ui.label(row.verdict);
                                ui.end_row();
                            }
                        });
                });
            });
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::labs::LeverLab;
    use lab_core::LabConfig;

    #[test]
    fn test_notice_kinds() {
        let hit = Verdict {
            is_correct: true,
            true_value: 0.0,
            message: "Correct!".to_string(),
        };
        assert_eq!(Notice::from_verdict(&hit).kind, NoticeKind::Correct);

        let not_ready = Notice::from_error(&LabError::empty_state("mix first"));
        assert_eq!(not_ready.kind, NoticeKind::Info);
        assert_eq!(not_ready.title, "Not ready");

        let bad = Notice::from_error(&LabError::parse("x"));
        assert_eq!(bad.kind, NoticeKind::Error);
    }

    #[test]
    fn test_fields_follow_session_after_reveal() {
        let config = LabConfig::default().with_seed(1);
        let mut session = LabSession::new(LeverLab::default(), &config);
        let mut model = PanelModel::new(&session);
        assert_eq!(model.fields, vec![String::new(); 4]);

        let revealed = session.reveal_answer().unwrap();
        model.sync_fields(&session);
        assert_eq!(model.fields[0], format!("{}", revealed.get("F1").unwrap()));
    }

    #[test]
    fn test_only_field_driven_actions_apply_inputs() {
        assert!(PanelAction::Apply.applies_inputs());
        assert!(PanelAction::Check.applies_inputs());
        assert!(PanelAction::Lab("Mix").applies_inputs());
        for action in [
            PanelAction::Randomize,
            PanelAction::Reveal,
            PanelAction::Reset,
            PanelAction::ToggleClock,
        ] {
            assert!(!action.applies_inputs(), "{action:?}");
        }
    }
}
