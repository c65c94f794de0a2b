use arch::data::Data;
use arch::inst::Inst;
use arch::reg::Reg;
use arch::syscall::Syscall;
use color_print::{cformat, cprintln};
use itertools::chain;
use std::fmt;

/// One line of the text section.
#[derive(Debug, Clone, PartialEq)]
pub enum AsmLine {
    Directive(String),
    Label(String),
    Inst(Inst),
    Comment(String),
}

impl AsmLine {
    pub fn cformat(&self) -> String {
        match self {
            AsmLine::Directive(dir) => cformat!("<c>{}</>", dir),
            AsmLine::Label(label) => cformat!("<m>{}</>:", label),
            AsmLine::Inst(inst) => format!("    {}", inst.cformat()),
            AsmLine::Comment(text) => cformat!("    <dim># {}</>", text),
        }
    }
}

impl fmt::Display for AsmLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmLine::Directive(dir) => write!(f, "{dir}"),
            AsmLine::Label(label) => write!(f, "{label}:"),
            AsmLine::Inst(inst) => write!(f, "    {inst}"),
            AsmLine::Comment(text) => write!(f, "    # {text}"),
        }
    }
}

/// Generated program: the body of `main` and the data section.
/// Header and footer are added when rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub text: Vec<AsmLine>,
    pub data: Vec<Data>,
}

impl Program {
    fn header() -> Vec<AsmLine> {
        vec![
            AsmLine::Directive(".text".to_string()),
            AsmLine::Directive(".globl main".to_string()),
            AsmLine::Label("main".to_string()),
            AsmLine::Inst(Inst::ADDI(Reg::SP, Reg::SP, -4)),
            AsmLine::Inst(Inst::SW(Reg::RA, 0, Reg::SP)),
        ]
    }

    fn footer() -> Vec<AsmLine> {
        vec![
            AsmLine::Inst(Inst::LW(Reg::RA, 0, Reg::SP)),
            AsmLine::Inst(Inst::ADDI(Reg::SP, Reg::SP, 4)),
            AsmLine::Inst(Inst::LI(Reg::A7, Syscall::Exit.code())),
            AsmLine::Inst(Inst::ECALL),
        ]
    }

    /// Every text line, header and footer included.
    pub fn lines(&self) -> impl Iterator<Item = AsmLine> + '_ {
        chain!(Self::header(), self.text.iter().cloned(), Self::footer())
    }

    pub fn insts(&self) -> impl Iterator<Item = &Inst> {
        self.text.iter().filter_map(|line| match line {
            AsmLine::Inst(inst) => Some(inst),
            _ => None,
        })
    }

    pub fn dump(&self) {
        for line in self.lines() {
            cprintln!("{}", line.cformat());
        }
        if !self.data.is_empty() {
            println!();
            cprintln!("<c>.data</>");
            for data in &self.data {
                cprintln!("{}", data.cformat());
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        if !self.data.is_empty() {
            writeln!(f)?;
            writeln!(f, ".data")?;
            for data in &self.data {
                writeln!(f, "{data}")?;
            }
        }
        Ok(())
    }
}
