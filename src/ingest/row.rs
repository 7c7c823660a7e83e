//! Positional row model and permissive cell coercion

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Raw cell content as delivered by the workbook reader
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text rendering of the cell; whole numbers are written without decimals
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => format!("{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One ledger sheet row with its columns resolved to named fields.
///
/// Column positions are fixed by the export format:
/// A date, B text, D counter-entry, E origin code, F document,
/// G debit, H credit, I stated balance. Column C and anything past I is ignored.
/// A field is `None` when the cell is blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    pub date: Option<String>,
    pub text: Option<String>,
    pub counter_entry: Option<String>,
    pub code: Option<String>,
    pub document: Option<String>,
    pub debit: Option<CellValue>,
    pub credit: Option<CellValue>,
    pub balance: Option<CellValue>,
}

impl SheetRow {
    /// Store a cell by its zero-based column index (0 = A).
    ///
    /// This is the only place where column positions are interpreted.
    pub fn set_column(&mut self, column: usize, value: CellValue) {
        if matches!(&value, CellValue::Text(s) if s.is_empty()) {
            return;
        }
        match column {
            0 => self.date = Some(value.as_text()),
            1 => self.text = Some(value.as_text()),
            3 => self.counter_entry = Some(value.as_text()),
            4 => self.code = Some(value.as_text()),
            5 => self.document = Some(value.as_text()),
            6 => self.debit = Some(value),
            7 => self.credit = Some(value),
            8 => self.balance = Some(value),
            _ => {}
        }
    }

    /// Column A text, empty when blank
    pub fn date_text(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    /// Column B text, empty when blank
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn counter_entry(&self) -> &str {
        self.counter_entry.as_deref().unwrap_or("")
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }

    pub fn document(&self) -> &str {
        self.document.as_deref().unwrap_or("")
    }

    /// Posting date if column A starts with a valid `dd.mm.yyyy` date
    pub fn leading_date(&self) -> Option<NaiveDate> {
        parse_ledger_date(self.date_text())
    }

    /// Whether any of the debit, credit or balance cells is filled
    pub fn has_amount(&self) -> bool {
        self.debit.is_some() || self.credit.is_some() || self.balance.is_some()
    }
}

fn leading_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}").expect("leading date regex"))
}

fn embedded_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{2}\.[0-9]{2}\.[0-9]{4}").expect("embedded date regex"))
}

fn numeric_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Exponent capped at three digits to stay within f64 magnitudes.
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]{1,3})?")
            .expect("numeric prefix regex")
    })
}

/// Parse a date at the very start of `text` (`dd.mm.yyyy`, trailing content allowed).
///
/// Text that looks like a date but is not a calendar date (e.g. `31.02.2023`) yields `None`.
pub fn parse_ledger_date(text: &str) -> Option<NaiveDate> {
    let found = leading_date_re().find(text)?;
    NaiveDate::parse_from_str(found.as_str(), "%d.%m.%Y").ok()
}

/// Find the first valid `dd.mm.yyyy` date anywhere in `text`
pub fn find_ledger_date(text: &str) -> Option<NaiveDate> {
    embedded_date_re()
        .find_iter(text)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%d.%m.%Y").ok())
}

/// Format a date the way ledger exports write it
pub fn format_ledger_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Coerce a cell into an amount. Never fails: blank or unparseable input is zero.
///
/// Text is read in the Swiss style: apostrophes are thousands separators and
/// commas are decimal separators. Like a lenient float parser, the longest
/// numeric prefix is used, so `"12.50 CHF"` reads as 12.50.
pub fn parse_amount(raw: Option<&CellValue>) -> BigDecimal {
    match raw {
        Some(CellValue::Number(n)) => decimal_from_f64(*n),
        Some(CellValue::Text(s)) => {
            let cleaned = s.replace('\'', "").replace(',', ".");
            numeric_prefix_re()
                .find(cleaned.trim_start())
                .and_then(|m| decimal_from_numeric_text(m.as_str()))
                .unwrap_or_else(|| BigDecimal::from(0))
        }
        None => BigDecimal::from(0),
    }
}

/// Convert a float through its shortest round-trip decimal text, so 0.1 stays 0.1
fn decimal_from_f64(n: f64) -> BigDecimal {
    if !n.is_finite() {
        return BigDecimal::from(0);
    }
    BigDecimal::from_str(&n.to_string()).unwrap_or_else(|_| BigDecimal::from(0))
}

fn decimal_from_numeric_text(text: &str) -> Option<BigDecimal> {
    let (sign, unsigned) = match text.as_bytes().first() {
        Some(b'-') => ("-", &text[1..]),
        Some(b'+') => ("", &text[1..]),
        _ => ("", text),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => unsigned.split_at(pos),
        None => (unsigned, ""),
    };
    let mantissa = mantissa.trim_end_matches('.');
    let lead = if mantissa.starts_with('.') { "0" } else { "" };
    BigDecimal::from_str(&format!("{sign}{lead}{mantissa}{exponent}")).ok()
}
