use std::time::{Duration, Instant};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use crate::session::AnalysisSession;
use crate::utils::formatting::{format_elapsed_secs, format_percentage};
use super::renderer::{render_step, render_update};
use super::steps::{current_message, project};

/// Terminal progress for one streaming analysis: an overall bar, one line per
/// step and a spinner carrying the latest message.
pub struct AnalysisProgress {
    multi: MultiProgress,
    overall: ProgressBar,
    steps: Vec<ProgressBar>,
    status_bar: ProgressBar,
    printed_updates: usize,
    start_time: Instant,
}

impl AnalysisProgress {
    pub fn new(target: &str) -> Self {
        Self::with_draw_target(target, ProgressDrawTarget::stderr())
    }

    /// Progress that draws nothing, for `--quiet` and `--json` output.
    pub fn hidden(target: &str) -> Self {
        Self::with_draw_target(target, ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: &str, draw_target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(draw_target);

        let overall = multi.add(ProgressBar::new(100));
        overall.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/dark_gray} {pos:>3}% | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        overall.set_message(format!("Analyzing {}", target));

        let status_bar = multi.add(ProgressBar::new_spinner());
        status_bar.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        status_bar.set_message(super::steps::PREPARING_MESSAGE);
        status_bar.enable_steady_tick(Duration::from_millis(120));

        Self {
            multi,
            overall,
            steps: Vec::new(),
            status_bar,
            printed_updates: 0,
            start_time: Instant::now(),
        }
    }

    /// Redraw from a session snapshot. Updates not yet shown are printed
    /// above the bars.
    pub fn update(&mut self, session: &AnalysisSession) {
        for event in session.progress_updates.iter().skip(self.printed_updates) {
            self.println(&render_update(event));
        }
        self.printed_updates = session.progress_updates.len();

        self.overall.set_position(session.progress.clamp(0.0, 100.0).round() as u64);
        self.sync_steps(session);
        self.status_bar.set_message(format!(
            "{} | {}",
            current_message(session),
            format_elapsed_secs(self.start_time.elapsed()),
        ));
    }

    fn sync_steps(&mut self, session: &AnalysisSession) {
        let views = project(session);
        while self.steps.len() < views.len() {
            let bar = self.multi.insert_before(&self.status_bar, ProgressBar::new_spinner());
            bar.set_style(
                ProgressStyle::with_template("    {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            self.steps.push(bar);
        }
        for (bar, view) in self.steps.iter().zip(&views) {
            bar.set_message(render_step(view));
        }
    }

    /// Settle the bars on the final state of the session.
    pub fn finish(&mut self, session: &AnalysisSession) {
        self.update(session);
        let elapsed = format_elapsed_secs(self.start_time.elapsed());

        match (&session.results, &session.error) {
            (Some(_), _) => {
                self.overall.finish_with_message("Analysis complete");
                self.status_bar.finish_with_message(format!("Done in {}", elapsed));
            }
            (None, Some(error)) => {
                self.overall.abandon_with_message(format!(
                    "Failed at {}",
                    format_percentage(session.progress),
                ));
                self.status_bar.abandon_with_message(format!("{} ({})", error, elapsed));
            }
            (None, None) => {
                self.overall.finish_and_clear();
                self.status_bar.finish_and_clear();
            }
        }
        for bar in &self.steps {
            bar.finish();
        }
    }

    pub fn printed_updates(&self) -> usize {
        self.printed_updates
    }

    /// Print a line through the multi-progress (won't interfere with bars).
    pub fn println(&self, msg: &str) {
        let _ = self.multi.println(msg);
    }
}
