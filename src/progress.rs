use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use std::borrow::Cow;
use std::time::Duration;

/// How often should progress bars be redrawn?
pub const PROGRESS_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

lazy_static! {
    static ref DEFINITE_UNITLESS_STYLE: ProgressStyle =
        ProgressStyle::with_template("{msg}  {bar} {percent:>3}%  {pos}/{len}  [{elapsed_precise}]")
            .expect("progress bar style template should compile");

    static ref FINISH_STYLE: ProgressStyle =
        ProgressStyle::with_template("{msg} [{elapsed_precise}]")
            .expect("progress bar style template should compile");
}

/// Wraps an `indicatif::ProgressBar` that counts discrete items, such as repositories or
/// identities. A disabled `Progress` draws nothing.
pub struct Progress {
    inner: ProgressBar,
}

impl Progress {
    pub fn new_bar<T: Into<Cow<'static, str>>>(total: u64, message: T, enabled: bool) -> Self {
        let inner = if enabled {
            let inner = ProgressBar::new(total)
                .with_style(DEFINITE_UNITLESS_STYLE.clone())
                .with_message(message);

            inner.enable_steady_tick(PROGRESS_UPDATE_INTERVAL);

            inner
        } else {
            ProgressBar::hidden()
        };

        Progress { inner }
    }

    /// A progress bar that is never drawn.
    pub fn disabled() -> Self {
        Progress {
            inner: ProgressBar::hidden(),
        }
    }

    /// Run `f` with the progress bar hidden, so it can write to the terminal.
    #[inline]
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.inner.suspend(f)
    }

    #[inline]
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn finish_with_message<T: Into<Cow<'static, str>>>(&self, message: T) {
        self.inner.set_style(FINISH_STYLE.clone());
        self.inner.finish_with_message(message);
    }
}
