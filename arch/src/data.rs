use color_print::cformat;
use std::fmt;

/// Entry of the `.data` section.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// `label: .string "text"`
    String(String, String),
    /// `label: .float value`
    Float(String, f64),
    /// `label: .word value`
    Word(String, i64),
    /// `label: .space size`
    Space(String, usize),
}

impl Data {
    pub fn label(&self) -> &str {
        match self {
            Data::String(label, _)
            | Data::Float(label, _)
            | Data::Word(label, _)
            | Data::Space(label, _) => label,
        }
    }

    fn directive(&self) -> (&'static str, String) {
        match self {
            Data::String(_, text) => (".string", format!("\"{}\"", escape(text))),
            Data::Float(_, value) => (".float", float_literal(*value)),
            Data::Word(_, value) => (".word", value.to_string()),
            Data::Space(_, size) => (".space", size.to_string()),
        }
    }

    pub fn cformat(&self) -> String {
        let (directive, value) = self.directive();
        cformat!("<g>{}:</> <c>{}</> <y>{}</>", self.label(), directive, value)
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (directive, value) = self.directive();
        write!(f, "{}: {} {}", self.label(), directive, value)
    }
}

/// Render a float so the assembler always sees a decimal point.
pub fn float_literal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ch => out.push(ch),
        }
    }
    out
}
