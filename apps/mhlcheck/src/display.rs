//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use mhlcheck_errors::{SequenceError, UserFacingError};
use mhlcheck_hashspec::HashSpecList;
use mhlcheck_oracle::{Report, Verdict};
use mhlcheck_sequence::{expected_exit_code, SequenceSpec};
use mhlcheck_types::{ColorChoice, OutputFormat};
use std::io::{self, BufWriter, Write};

/// What a command produced
pub enum CommandOutput {
    Report(Report),
    Listing(HashSpecList),
    /// Accepted sequence; names are rendered from `pattern` while printing
    Sequence {
        spec: SequenceSpec,
        pattern: Option<String>,
    },
    SequenceRejected(SequenceError),
}

impl CommandOutput {
    /// Process exit status for this output
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandOutput::Report(report) => i32::from(!report.passed()),
            CommandOutput::Listing(_) | CommandOutput::Sequence { .. } => 0,
            CommandOutput::SequenceRejected(e) => expected_exit_code(e).code(),
        }
    }
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    format: OutputFormat,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render command output
    pub fn render(&self, output: &CommandOutput) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.render_json(output);
        }
        match output {
            CommandOutput::Report(report) => self.render_report(report),
            CommandOutput::Listing(list) => {
                print!("{list}");
                Ok(())
            }
            CommandOutput::Sequence { spec, pattern } => {
                self.render_sequence(spec, pattern.as_deref())
            }
            CommandOutput::SequenceRejected(e) => self.render_rejected(e),
        }
    }

    /// Render as JSON
    fn render_json(&self, output: &CommandOutput) -> io::Result<()> {
        let value = match output {
            CommandOutput::Report(report) => serde_json::json!({
                "passed": report.passed(),
                "checked": report.len(),
                "mismatched": report.mismatch_count(),
                "verdicts": report.verdicts(),
            }),
            CommandOutput::Listing(list) => serde_json::json!({ "entries": list.entries() }),
            CommandOutput::Sequence { spec, pattern } => {
                return sequence_json(spec, pattern.as_deref());
            }
            CommandOutput::SequenceRejected(e) => serde_json::json!({
                "valid": false,
                "code": e.user_code(),
                "message": e.to_string(),
                "exit_code": expected_exit_code(e).code(),
            }),
        };
        let json = serde_json::to_string_pretty(&value).map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_report(&self, report: &Report) -> io::Result<()> {
        if self.format == OutputFormat::Plain {
            for verdict in report.verdicts() {
                println!("{verdict}");
            }
        } else if !report.is_empty() {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec![
                Cell::new("Status").add_attribute(Attribute::Bold),
                Cell::new("Fact").add_attribute(Attribute::Bold),
                Cell::new("Path").add_attribute(Attribute::Bold),
                Cell::new("Expected").add_attribute(Attribute::Bold),
                Cell::new("Actual").add_attribute(Attribute::Bold),
            ]);

            for verdict in report.verdicts() {
                table.add_row(self.verdict_row(verdict));
            }
            println!("{table}");
        }

        let summary = report.to_string();
        if self.supports_color() {
            let style = if report.passed() {
                Style::new().green().bold()
            } else {
                Style::new().red().bold()
            };
            println!("{}", style.apply_to(summary));
        } else {
            println!("{summary}");
        }
        Ok(())
    }

    fn verdict_row(&self, verdict: &Verdict) -> Vec<Cell> {
        let path = Cell::new(verdict.path().unwrap_or("-"));
        let fact = Cell::new(verdict.fact().to_string());
        match verdict {
            Verdict::Match { .. } => vec![
                self.status_cell("OK", Color::Green),
                fact,
                path,
                Cell::new("-"),
                Cell::new("-"),
            ],
            Verdict::Mismatch {
                kind,
                expected,
                actual,
                ..
            } => vec![
                self.status_cell(&kind.to_string(), Color::Red),
                fact,
                path,
                Cell::new(expected),
                Cell::new(actual),
            ],
        }
    }

    fn status_cell(&self, text: &str, color: Color) -> Cell {
        if self.supports_color() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn render_sequence(&self, spec: &SequenceSpec, pattern: Option<&str>) -> io::Result<()> {
        let (first, last) = (spec.first().unwrap_or(0), spec.last().unwrap_or(0));
        let header = format!("{spec}: {} files, {first}-{last}", spec.len());
        let mut out = BufWriter::new(io::stdout().lock());
        if self.supports_color() {
            writeln!(out, "{}", Style::new().bold().apply_to(header))?;
        } else {
            writeln!(out, "{header}")?;
        }
        if let Some(pattern) = pattern {
            for name in spec.render(pattern) {
                writeln!(out, "  {name}")?;
            }
        }
        out.flush()
    }

    fn render_rejected(&self, e: &SequenceError) -> io::Result<()> {
        let code = expected_exit_code(e);
        let text = format!("[ERROR] {e} (tool exit code {code})");
        if self.supports_color() {
            self.term
                .write_line(&Style::new().red().apply_to(text).to_string())
        } else {
            self.term.write_line(&text)
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

/// Sequence summary as JSON, membership given as merged `[first, last]` runs
///
/// With a pattern the `names` array is written one name at a time, so a
/// sequence is never held in memory as a list.
fn sequence_json(spec: &SequenceSpec, pattern: Option<&str>) -> io::Result<()> {
    let runs: Vec<[u32; 2]> = spec.runs().iter().map(|r| [*r.start(), *r.end()]).collect();
    let summary = serde_json::json!({
        "valid": true,
        "spec": spec.to_string(),
        "len": spec.len(),
        "runs": runs,
    });

    let mut out = BufWriter::new(io::stdout().lock());
    let Some(pattern) = pattern else {
        let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
        writeln!(out, "{json}")?;
        return out.flush();
    };

    let json = serde_json::to_string(&summary).map_err(io::Error::other)?;
    let open = json
        .strip_suffix('}')
        .ok_or_else(|| io::Error::other("sequence summary is not a JSON object"))?;
    write!(out, "{open},\"names\":[")?;
    for (i, name) in spec.render(pattern).enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        serde_json::to_writer(&mut out, &name).map_err(io::Error::other)?;
    }
    writeln!(out, "]}}")?;
    out.flush()
}
