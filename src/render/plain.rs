use super::{Card, DisplaySurface, EmptyReason};
use std::io::{self, Write};

/// Line-oriented text surface used by `--print`.
///
/// `DisplaySurface` methods cannot fail, so the first write error is kept
/// and returned from [`PlainSurface::finish`]; later writes are skipped.
pub struct PlainSurface<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> PlainSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush and hand back the writer, or the first error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_fmt(args) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> DisplaySurface for PlainSurface<W> {
    fn show_loading(&mut self) {
        self.emit(format_args!("Loading...\n"));
    }

    fn show_error(&mut self, message: &str) {
        self.emit(format_args!("error: {message}\n"));
    }

    fn show_empty(&mut self, reason: EmptyReason) {
        self.emit(format_args!("{}\n", reason.message()));
    }

    fn show_list(&mut self, cards: &[Card]) {
        for card in cards {
            self.emit(format_args!(
                "{}\t{}\t{}\t{}\n",
                card.name,
                card.company,
                card.category_label,
                card.updated.as_deref().unwrap_or("-"),
            ));
        }
    }

    fn update_counts(&mut self, total: usize, filtered: Option<usize>) {
        match filtered {
            Some(shown) => self.emit(format_args!("# {shown} of {total} apps\n")),
            None => self.emit(format_args!("# {total} apps\n")),
        }
    }
}
