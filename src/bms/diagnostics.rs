//! Fancy diagnostics support using `ariadne`.
//!
//! Lex and parse problems carry the byte range of the line which caused them, so they are
//! reported with a label pointing into the chart text. Problems found by the timing engine have
//! no source range and are reported with the message only.
//!
//! # Usage Example
//!
//! ```rust
//! use bms_timeline::{
//!     bms::{convert_bms, diagnostics::emit_bms_warnings},
//!     chart_process::ConvertOptions,
//! };
//!
//! let source = "#TITLE Test\n#0010Z:01\n#00111:01\n";
//! let output = convert_bms(source, &ConvertOptions::default()).expect("chart must convert");
//! emit_bms_warnings("test.bms", source, &output.warnings);
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{
    bms::{
        BmsError, BmsWarning, command::mixin::SourceRangeMixin, lex::LexWarningWithRange,
        parse::{ParseErrorWithRange, ParseWarningWithRange},
    },
    chart_process::{ConvertError, ConvertWarning},
};

/// Simple source container that holds the filename and source text.
/// Ariadne will automatically handle row/column calculations from byte offsets.
///
/// ```rust
/// use bms_timeline::bms::diagnostics::SimpleSource;
///
/// let source_text = "#TITLE test\n#ARTIST composer\n";
/// let source = SimpleSource::new("test.bms", source_text);
/// assert_eq!(source.text(), source_text);
/// assert_eq!(source.name(), "test.bms");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting problems to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert the problem to ariadne Report.
    ///
    /// `src` supplies the filename, ariadne handles row/column calculation.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

const WARNING: (ReportKind<'static>, Color) = (ReportKind::Warning, Color::Cyan);
const ERROR: (ReportKind<'static>, Color) = (ReportKind::Error, Color::Red);

fn ranged_report<'a, T: std::fmt::Display>(
    (kind, color): (ReportKind<'a>, Color),
    phase: &str,
    src: &SimpleSource<'a>,
    mixin: &SourceRangeMixin<T>,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    let range = mixin.range();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(format!("{phase}: {}", mixin.content()))
        .with_label(
            Label::new((filename, range))
                .with_message(mixin.content().to_string())
                .with_color(color),
        )
        .finish()
}

fn unranged_report<'a>(
    kind: ReportKind<'a>,
    src: &SimpleSource<'a>,
    message: String,
) -> Report<'a, (String, Range<usize>)> {
    Report::build(kind, (src.name().to_string(), 0..0))
        .with_message(format!("convert: {message}"))
        .finish()
}

impl ToAriadne for LexWarningWithRange {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        ranged_report(WARNING, "lex", src, self)
    }
}

impl ToAriadne for ParseWarningWithRange {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        ranged_report(WARNING, "parse", src, self)
    }
}

impl ToAriadne for ParseErrorWithRange {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        ranged_report(ERROR, "parse", src, self)
    }
}

impl ToAriadne for ConvertWarning {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        unranged_report(ReportKind::Warning, src, self.to_string())
    }
}

impl ToAriadne for ConvertError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        unranged_report(ReportKind::Error, src, self.to_string())
    }
}

impl ToAriadne for BmsWarning {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        match self {
            Self::Lex(warning) => warning.to_report(src),
            Self::Parse(warning) => warning.to_report(src),
            Self::Convert(warning) => warning.to_report(src),
        }
    }
}

impl ToAriadne for BmsError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        match self {
            Self::Parse(error) => error.to_report(src),
            Self::Convert(error) => error.to_report(src),
        }
    }
}

/// Convenience method: batch render `BmsWarning` list to the standard error.
pub fn emit_bms_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a BmsWarning>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Renders a fatal error to the standard error.
pub fn emit_bms_error(name: &str, source: &str, error: &BmsError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}
