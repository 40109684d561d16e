use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// A scalar read from a `key = value` parameter file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "boolean",
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{:?}", x),
            ParamValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Parameter file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Infers the type of a raw parameter value.
///
/// Priority order: boolean literal (any case), double-quoted string (quotes
/// stripped once), number (float when a decimal point is present, otherwise
/// integer), and finally the trimmed raw text.
pub fn parse_value(raw: &str) -> ParamValue {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        return ParamValue::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return ParamValue::Bool(false);
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return ParamValue::Str(value[1..value.len() - 1].to_string());
    }
    if value.contains('.') {
        if let Ok(x) = value.parse::<f64>() {
            return ParamValue::Float(x);
        }
    } else if let Ok(i) = value.parse::<i64>() {
        return ParamValue::Int(i);
    }
    ParamValue::Str(value.to_string())
}

/// The typed contents of a run-parameter file.
///
/// Lines are split on the first `=`; lines without one, and `#` comments, are
/// skipped. A key that appears twice keeps its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsFile {
    entries: BTreeMap<String, ParamValue>,
}

impl ParamsFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, ParamsError> {
        let mut params = Self::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                if !trimmed.is_empty() {
                    trace!("Skipping parameter line {} without '='", line_num + 1);
                }
                continue;
            };
            params.insert(key.trim(), parse_value(value));
        }
        Ok(params)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ParamsError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ParamsError::Io(e),
        })?;
        Self::read_from(&mut BufReader::new(file))
    }

    pub fn insert(&mut self, key: &str, value: ParamValue) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
