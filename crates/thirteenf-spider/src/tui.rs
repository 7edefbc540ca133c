use crate::funds::FundSpec;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Total / successes / failures bars for the fetch loop; hidden unless `tui`.
pub(crate) struct Progress {
    _multi: Option<MultiProgress>,
    total: ProgressBar,
    success: ProgressBar,
    fails: ProgressBar,
}

impl Progress {
    pub(crate) fn new(len: usize, tui: bool) -> Self {
        if !tui {
            return Self {
                _multi: None,
                total: ProgressBar::hidden(),
                success: ProgressBar::hidden(),
                fails: ProgressBar::hidden(),
            };
        }

        match multi_progress(len) {
            Ok((multi, total, success, fails)) => Self {
                _multi: Some(multi),
                total,
                success,
                fails,
            },
            Err(err) => {
                tracing::warn!("failed to build progress bars, error({err})");
                Self::new(len, false)
            }
        }
    }

    pub(crate) fn fetching(&self, fund: &FundSpec) {
        self.total
            .set_message(format!("{} {}", fund.emoji, fund.name));
    }

    pub(crate) fn done(&self, retrieved: bool) {
        self.total.inc(1);
        if retrieved {
            self.success.inc(1);
        } else {
            self.fails.inc(1);
        }
    }

    pub(crate) fn finish(&self) {
        self.total.finish_with_message("done");
        self.success.finish();
        self.fails.finish();
    }
}

fn multi_progress(
    len: usize,
) -> anyhow::Result<(MultiProgress, ProgressBar, ProgressBar, ProgressBar)> {
    // overall multi progress bar
    let multi = MultiProgress::new();

    // total number of funds to collect
    let total = multi.add(
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.magenta} {msg}\n \
                        {prefix:>9.white} |{bar:40.white/grey}| {pos:<2} / {human_len} \
                        [Time: {elapsed}, ETA: {eta}]",
                )?
                .progress_chars("## "),
        ),
    );
    total.set_prefix("total");
    total.enable_steady_tick(Duration::from_millis(100));

    // funds retrieved, including those with no 13F on file
    let success = multi.insert_after(
        &total,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.green} |{bar:40.green}| {pos:<2.green}")?
                .progress_chars("## "),
        ),
    );
    success.set_message("successes");

    // funds that failed
    let fails = multi.insert_after(
        &success,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.red} |{bar:40.red}| {pos:<2.red}")?
                .progress_chars("## "),
        ),
    );
    fails.set_message("failures");

    Ok((multi, total, success, fails))
}
