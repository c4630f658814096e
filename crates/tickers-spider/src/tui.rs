use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A progress bar of `len` steps, or a hidden one when `tui` is off.
pub(crate) fn progress_bar(len: usize, msg: &'static str, tui: bool) -> ProgressBar {
    if !tui {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template(
            "{msg} {spinner:.magenta}\n\
            [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} \
            [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    let pb = ProgressBar::new(len as u64).with_style(style);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
