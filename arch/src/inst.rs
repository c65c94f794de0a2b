use crate::reg::{FReg, Reg};
use color_print::cformat;
use std::fmt;

/// RV32IMF instructions and assembler pseudo instructions emitted by the compiler.
///
/// Memory operands are written `(reg, offset, base)` in the order they appear in
/// assembly text: `lw rd, offset(base)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    // Integer
    LI(Reg, i64),
    LA(Reg, String),
    MV(Reg, Reg),
    ADD(Reg, Reg, Reg),
    ADDI(Reg, Reg, i64),
    SUB(Reg, Reg, Reg),
    MUL(Reg, Reg, Reg),
    DIV(Reg, Reg, Reg),
    LW(Reg, i64, Reg),
    SW(Reg, i64, Reg),

    // Floating point
    FLW(FReg, i64, Reg),
    FSW(FReg, i64, Reg),
    FADD(FReg, FReg, FReg),
    FSUB(FReg, FReg, FReg),
    FMUL(FReg, FReg, FReg),
    FDIV(FReg, FReg, FReg),
    FMV(FReg, FReg),
    FMVX(FReg, Reg),
    FCVTSW(FReg, Reg),
    FCVTWS(Reg, FReg),
    FLE(Reg, FReg, FReg),

    // Control
    BGT(Reg, Reg, String),
    BEQZ(Reg, String),
    J(String),
    CALL(String),
    ECALL,
}

impl Inst {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Inst::LI(..) => "li",
            Inst::LA(..) => "la",
            Inst::MV(..) => "mv",
            Inst::ADD(..) => "add",
            Inst::ADDI(..) => "addi",
            Inst::SUB(..) => "sub",
            Inst::MUL(..) => "mul",
            Inst::DIV(..) => "div",
            Inst::LW(..) => "lw",
            Inst::SW(..) => "sw",
            Inst::FLW(..) => "flw",
            Inst::FSW(..) => "fsw",
            Inst::FADD(..) => "fadd.s",
            Inst::FSUB(..) => "fsub.s",
            Inst::FMUL(..) => "fmul.s",
            Inst::FDIV(..) => "fdiv.s",
            Inst::FMV(..) => "fmv.s",
            Inst::FMVX(..) => "fmv.s.x",
            Inst::FCVTSW(..) => "fcvt.s.w",
            Inst::FCVTWS(..) => "fcvt.w.s",
            Inst::FLE(..) => "fle.s",
            Inst::BGT(..) => "bgt",
            Inst::BEQZ(..) => "beqz",
            Inst::J(..) => "j",
            Inst::CALL(..) => "call",
            Inst::ECALL => "ecall",
        }
    }

    /// Operand list as it appears after the mnemonic.
    pub fn operands(&self) -> Vec<String> {
        fn mem(offset: &i64, base: &Reg) -> String {
            format!("{offset}({base})")
        }
        match self {
            Inst::LI(rd, imm) => vec![rd.to_string(), imm.to_string()],
            Inst::LA(rd, label) => vec![rd.to_string(), label.clone()],
            Inst::MV(rd, rs) => vec![rd.to_string(), rs.to_string()],
            Inst::ADD(rd, rs1, rs2)
            | Inst::SUB(rd, rs1, rs2)
            | Inst::MUL(rd, rs1, rs2)
            | Inst::DIV(rd, rs1, rs2) => vec![rd.to_string(), rs1.to_string(), rs2.to_string()],
            Inst::ADDI(rd, rs, imm) => vec![rd.to_string(), rs.to_string(), imm.to_string()],
            Inst::LW(rd, offset, base) | Inst::SW(rd, offset, base) => {
                vec![rd.to_string(), mem(offset, base)]
            }
            Inst::FLW(fd, offset, base) | Inst::FSW(fd, offset, base) => {
                vec![fd.to_string(), mem(offset, base)]
            }
            Inst::FADD(fd, fs1, fs2)
            | Inst::FSUB(fd, fs1, fs2)
            | Inst::FMUL(fd, fs1, fs2)
            | Inst::FDIV(fd, fs1, fs2) => vec![fd.to_string(), fs1.to_string(), fs2.to_string()],
            Inst::FMV(fd, fs) => vec![fd.to_string(), fs.to_string()],
            Inst::FMVX(fd, rs) | Inst::FCVTSW(fd, rs) => vec![fd.to_string(), rs.to_string()],
            Inst::FCVTWS(rd, fs) => vec![rd.to_string(), fs.to_string(), "rtz".to_string()],
            Inst::FLE(rd, fs1, fs2) => vec![rd.to_string(), fs1.to_string(), fs2.to_string()],
            Inst::BGT(rs1, rs2, label) => vec![rs1.to_string(), rs2.to_string(), label.clone()],
            Inst::BEQZ(rs, label) => vec![rs.to_string(), label.clone()],
            Inst::J(label) | Inst::CALL(label) => vec![label.clone()],
            Inst::ECALL => vec![],
        }
    }

    pub fn cformat(&self) -> String {
        let operands = self.operands();
        if operands.is_empty() {
            cformat!("<r>{}</>", self.mnemonic())
        } else {
            cformat!("<r>{:<9}</><b>{}</>", self.mnemonic(), operands.join(", "))
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            write!(f, "{}", self.mnemonic())
        } else {
            write!(f, "{} {}", self.mnemonic(), operands.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_inst {
        ($($name:ident: $inst:expr => $text:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($inst.to_string(), $text);
                }
            )*
        }
    }

    test_inst! {
        test_li: Inst::LI(Reg::T0, -3) => "li t0, -3",
        test_la: Inst::LA(Reg::S1, "float_0".to_string()) => "la s1, float_0",
        test_mv: Inst::MV(Reg::A0, Reg::T2) => "mv a0, t2",
        test_add: Inst::ADD(Reg::T2, Reg::T0, Reg::T1) => "add t2, t0, t1",
        test_addi: Inst::ADDI(Reg::SP, Reg::SP, -4) => "addi sp, sp, -4",
        test_mul: Inst::MUL(Reg::A0, Reg::T5, Reg::T6) => "mul a0, t5, t6",
        test_lw: Inst::LW(Reg::RA, 0, Reg::SP) => "lw ra, 0(sp)",
        test_sw: Inst::SW(Reg::A7, 8, Reg::SP) => "sw a7, 8(sp)",
        test_flw: Inst::FLW(FReg::FT3, 0, Reg::S1) => "flw ft3, 0(s1)",
        test_fsw: Inst::FSW(FReg::FA0, 4, Reg::SP) => "fsw fa0, 4(sp)",
        test_fadd: Inst::FADD(FReg::FT2, FReg::FT0, FReg::FT1) => "fadd.s ft2, ft0, ft1",
        test_fdiv: Inst::FDIV(FReg::FT2, FReg::FT0, FReg::FT1) => "fdiv.s ft2, ft0, ft1",
        test_fmv: Inst::FMV(FReg::FA0, FReg::FT1) => "fmv.s fa0, ft1",
        test_fmvx: Inst::FMVX(FReg::FT0, Reg::ZERO) => "fmv.s.x ft0, zero",
        test_fcvtsw: Inst::FCVTSW(FReg::FT0, Reg::T1) => "fcvt.s.w ft0, t1",
        test_fcvtws: Inst::FCVTWS(Reg::T1, FReg::FT0) => "fcvt.w.s t1, ft0, rtz",
        test_fle: Inst::FLE(Reg::S1, FReg::FT0, FReg::FT1) => "fle.s s1, ft0, ft1",
        test_bgt: Inst::BGT(Reg::T0, Reg::T1, "for_end_1".to_string()) => "bgt t0, t1, for_end_1",
        test_beqz: Inst::BEQZ(Reg::S1, "for_end_1".to_string()) => "beqz s1, for_end_1",
        test_j: Inst::J("for_start_0".to_string()) => "j for_start_0",
        test_call: Inst::CALL("sin".to_string()) => "call sin",
        test_ecall: Inst::ECALL => "ecall",
    }
}
