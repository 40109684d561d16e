use boltzkit::engine::progress::{Progress, ProgressCallback};
use indicatif::{HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

const SPINNER_TICK_MS: u64 = 120;

struct PhaseState {
    pb: ProgressBar,
    current: Option<(&'static str, Instant)>,
}

/// Renders workflow phases on stderr. A predictor run can take many minutes,
/// so the spinner shows elapsed time and each finished phase leaves a single
/// `✓ name (duration)` line behind once the spinner is cleared.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(None, target).with_style(phase_style());
        pb.finish_and_clear();
        Self {
            state: Arc::new(Mutex::new(PhaseState {
                pb,
                current: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned; dropping update.");
                return;
            };
            state.apply(progress);
        })
    }
}

impl PhaseState {
    fn apply(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.pb.reset();
                self.pb.set_length(0);
                self.pb.set_style(phase_style());
                self.pb.set_message(name);
                self.pb
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.current = Some((name, Instant::now()));
            }
            Progress::PhaseFinish => {
                self.pb.disable_steady_tick();
                self.pb.finish_and_clear();
                if let Some((name, started)) = self.current.take() {
                    let line = phase_summary(name, started.elapsed());
                    self.pb.suspend(|| eprintln!("{}", line));
                }
            }
            Progress::TaskStart { total_steps } => {
                self.pb.disable_steady_tick();
                self.pb.reset();
                self.pb.set_length(total_steps);
                self.pb.set_style(chain_bar_style());
            }
            Progress::TaskIncrement => self.pb.inc(1),
            Progress::TaskFinish => {
                if let Some(len) = self.pb.length() {
                    self.pb.set_position(len);
                }
                self.pb.finish();
            }
            Progress::Message(msg) => self.pb.println(format!("  ! {}", msg)),
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn phase_summary(name: &str, elapsed: Duration) -> String {
    format!("✓ {} ({})", name, HumanDuration(elapsed))
}

fn phase_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
        .expect("static phase template")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✓")
}

fn chain_bar_style() -> ProgressStyle {
    ProgressStyle::with_template("  chains [{bar:30.cyan/blue}] {pos}/{len}")
        .expect("static chain bar template")
        .progress_chars("=> ")
}
