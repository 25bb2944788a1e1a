use std::io::{self, BufRead, Write};

use araharu_core::AppUpdate;
use log::{debug, info};

use crate::error::AppError;

/// Hands a URL to whatever the host uses to open resources.
pub trait UrlOpener {
    fn open_url(&self, url: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> io::Result<()> {
        open::that(url)
    }
}

/// Receives the positive outcome of an update check.
pub trait UpdatePresenter {
    fn on_update_available(&mut self, update: &AppUpdate) -> Result<(), AppError>;
}

/// Confirmation dialog rendered on a line-based terminal.
pub struct TerminalPresenter<R, W, O> {
    input: R,
    output: W,
    opener: O,
}

impl<R, W, O> TerminalPresenter<R, W, O>
where
    R: BufRead,
    W: Write,
    O: UrlOpener,
{
    pub fn new(input: R, output: W, opener: O) -> Self {
        Self {
            input,
            output,
            opener,
        }
    }

    fn ask(&mut self, update: &AppUpdate) -> io::Result<bool> {
        writeln!(
            self.output,
            "New version available (v{})",
            update.latest_version
        )?;
        if !update.notes.trim().is_empty() {
            writeln!(self.output)?;
            writeln!(self.output, "{}", update.notes.trim_end())?;
        }
        if let Some(release_url) = &update.release_url {
            writeln!(self.output)?;
            writeln!(self.output, "Release page: {release_url}")?;
        }
        write!(self.output, "Update now? [y/N] ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_accepted(&answer))
    }
}

impl<R, W, O> UpdatePresenter for TerminalPresenter<R, W, O>
where
    R: BufRead,
    W: Write,
    O: UrlOpener,
{
    fn on_update_available(&mut self, update: &AppUpdate) -> Result<(), AppError> {
        if !self.ask(update).map_err(AppError::prompt_failed)? {
            debug!("Update to {} postponed", update.latest_version);
            return Ok(());
        }

        info!("Opening update package {}", update.asset_url);
        self.opener
            .open_url(&update.asset_url)
            .map_err(|error| AppError::open_url_failed("update package", &update.asset_url, error))
    }
}

fn is_accepted(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::{self, Cursor};

    use araharu_core::AppUpdate;

    use super::{TerminalPresenter, UpdatePresenter, UrlOpener, is_accepted};
    use crate::error::AppError;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl UrlOpener for &RecordingOpener {
        fn open_url(&self, url: &str) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no handler"));
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn update() -> AppUpdate {
        AppUpdate {
            current_version: "1.0.0".to_string(),
            latest_version: "1.1.0".to_string(),
            notes: "- Writing prompts\n- Faster daily sets\n".to_string(),
            asset_url: "http://x/app.apk".to_string(),
            release_url: Some("https://github.com/insushim/iwdaystudy/releases/tag/v1.1.0".to_string()),
        }
    }

    #[test]
    fn accepting_opens_asset_url() {
        let opener = RecordingOpener::default();
        let mut output = Vec::new();
        let mut presenter = TerminalPresenter::new(Cursor::new("y\n"), &mut output, &opener);

        presenter
            .on_update_available(&update())
            .expect("accepting should succeed");

        assert_eq!(*opener.opened.borrow(), vec!["http://x/app.apk".to_string()]);
        let rendered = String::from_utf8(output).expect("prompt output is utf-8");
        assert!(rendered.starts_with("New version available (v1.1.0)\n"));
        assert!(rendered.contains("- Faster daily sets\n"));
        assert!(rendered.contains("Release page: https://github.com/insushim/iwdaystudy/releases/tag/v1.1.0"));
        assert!(rendered.ends_with("Update now? [y/N] "));
    }

    #[test]
    fn declining_or_eof_does_nothing() {
        for input in ["n\n", "\n", "", "later\n"] {
            let opener = RecordingOpener::default();
            let mut presenter = TerminalPresenter::new(Cursor::new(input), io::sink(), &opener);

            presenter
                .on_update_available(&update())
                .expect("declining should succeed");

            assert!(opener.opened.borrow().is_empty(), "{input:?} should decline");
        }
    }

    #[test]
    fn open_failure_is_reported() {
        let opener = RecordingOpener {
            fail: true,
            ..RecordingOpener::default()
        };
        let mut presenter = TerminalPresenter::new(Cursor::new("yes\n"), io::sink(), &opener);

        let error = presenter
            .on_update_available(&update())
            .expect_err("open failure should surface");

        assert!(matches!(
            error,
            AppError::OpenUrlFailed {
                target: "update package",
                ..
            }
        ));
    }

    #[test]
    fn answers_are_case_insensitive() {
        assert!(is_accepted("Y\n"));
        assert!(is_accepted("  YES \r\n"));
        assert!(!is_accepted("no"));
        assert!(!is_accepted("yep"));
    }
}
