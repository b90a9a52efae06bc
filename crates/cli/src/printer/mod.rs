use std::io::{self, Write};

use ditto_fs::{FileRecord, Snapshot};
use ditto_runtime::HASH_PREFIX_LEN;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn parse(s: &str) -> Self {
        match s {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Whether to print the totals line after the records.
    pub show_summary: bool,
}

/// Static context about one rendered snapshot.
#[derive(Debug)]
pub struct SnapshotPrintContext<'a> {
    /// "directory" or "archive"
    pub kind: &'a str,
    /// Path the snapshot was taken from.
    pub source: &'a str,
}

/// Renders a snapshot record by record. Presentation only.
pub trait SnapshotPrinter {
    fn print_record(&mut self, rec: &FileRecord, ctx: &SnapshotPrintContext) -> io::Result<()>;

    fn finish(&mut self, snap: &Snapshot, ctx: &SnapshotPrintContext) -> io::Result<()>;

    fn print_snapshot(&mut self, snap: &Snapshot, ctx: &SnapshotPrintContext) -> io::Result<()> {
        for rec in snap {
            self.print_record(rec, ctx)?;
        }
        self.finish(snap, ctx)
    }
}

/// Abbreviated content hash, empty for directories.
pub fn short_hash(rec: &FileRecord) -> &str {
    match rec.content_hash.as_deref() {
        Some(h) => &h[..h.len().min(HASH_PREFIX_LEN)],
        None => "",
    }
}

pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// Auto color resolves to no color here, since a generic writer cannot be
    /// checked for a TTY. Use [`HumanPrinter::stdout`] for detection.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;
        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_path(&self, rec: &FileRecord) -> String {
        match (rec.is_dir, self.use_color) {
            (true, true) => format!("\x1b[34m{}/\x1b[0m", rec.relative_path),
            (true, false) => format!("{}/", rec.relative_path),
            (false, _) => rec.relative_path.clone(),
        }
    }
}

impl<W: Write, E: Write> SnapshotPrinter for HumanPrinter<W, E> {
    fn print_record(&mut self, rec: &FileRecord, _ctx: &SnapshotPrintContext) -> io::Result<()> {
        let path = self.format_path(rec);
        if rec.is_dir {
            writeln!(self.out, "{:>12}  {:<w$}  {}", "-", "", path, w = HASH_PREFIX_LEN)
        } else {
            writeln!(
                self.out,
                "{:>12}  {:<w$}  {}",
                rec.size,
                short_hash(rec),
                path,
                w = HASH_PREFIX_LEN
            )
        }
    }

    fn finish(&mut self, snap: &Snapshot, ctx: &SnapshotPrintContext) -> io::Result<()> {
        if !self.cfg.show_summary {
            return Ok(());
        }

        let dirs = snap.iter().filter(|r| r.is_dir).count();
        writeln!(
            self.err,
            "\n[{}] {}: {} files, {} dirs, {} bytes",
            ctx.kind,
            ctx.source,
            snap.len() - dirs,
            dirs,
            snap.total_size()
        )
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

impl<W: Write, E: Write> SnapshotPrinter for JsonPrinter<W, E> {
    fn print_record(&mut self, rec: &FileRecord, _ctx: &SnapshotPrintContext) -> io::Result<()> {
        let line = serde_json::to_string(rec).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")
    }

    fn finish(&mut self, snap: &Snapshot, ctx: &SnapshotPrintContext) -> io::Result<()> {
        if !self.cfg.show_summary {
            return Ok(());
        }

        let dirs = snap.iter().filter(|r| r.is_dir).count();
        let obj = serde_json::json!({
            "type": "summary",
            "kind": ctx.kind,
            "source": ctx.source,
            "files": snap.len() - dirs,
            "dirs": dirs,
            "bytes": snap.total_size(),
        });
        writeln!(self.err, "{obj}")
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
