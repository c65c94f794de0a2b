use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Integer register file of RV32, named by ABI alias.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Reg {
    #[default]
    ZERO,
    RA,
    SP,
    GP,
    TP,
    T0,
    T1,
    T2,
    S0,
    S1,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
    S11,
    T3,
    T4,
    T5,
    T6,
}

impl Reg {
    /// Registers handed out to variables, in allocation order: `t0..t6` then `a0..a7`.
    pub const BANK: [Reg; 15] = [
        Reg::T0,
        Reg::T1,
        Reg::T2,
        Reg::T3,
        Reg::T4,
        Reg::T5,
        Reg::T6,
        Reg::A0,
        Reg::A1,
        Reg::A2,
        Reg::A3,
        Reg::A4,
        Reg::A5,
        Reg::A6,
        Reg::A7,
    ];

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    /// Index in the `x0..x31` register file.
    pub fn index(self) -> u8 {
        self.into()
    }

    pub fn is_caller_saved(self) -> bool {
        use Reg::*;
        matches!(
            self,
            RA | T0 | T1 | T2 | T3 | T4 | T5 | T6 | A0 | A1 | A2 | A3 | A4 | A5 | A6 | A7
        )
    }
}

/// Floating point register file of the F extension, named by ABI alias.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FReg {
    #[default]
    FT0,
    FT1,
    FT2,
    FT3,
    FT4,
    FT5,
    FT6,
    FT7,
    FS0,
    FS1,
    FA0,
    FA1,
    FA2,
    FA3,
    FA4,
    FA5,
    FA6,
    FA7,
    FS2,
    FS3,
    FS4,
    FS5,
    FS6,
    FS7,
    FS8,
    FS9,
    FS10,
    FS11,
    FT8,
    FT9,
    FT10,
    FT11,
}

impl FReg {
    pub const COUNT: usize = 32;

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown freg name: {s}")),
        }
    }

    /// Register `f{idx}`, or `None` past the end of the file.
    pub fn nth(idx: usize) -> Option<Self> {
        u8::try_from(idx)
            .ok()
            .filter(|&i| (i as usize) < Self::COUNT)
            .map(FReg::from)
    }

    pub fn index(self) -> u8 {
        self.into()
    }

    pub fn is_caller_saved(self) -> bool {
        use FReg::*;
        !matches!(
            self,
            FS0 | FS1 | FS2 | FS3 | FS4 | FS5 | FS6 | FS7 | FS8 | FS9 | FS10 | FS11
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abi_names() {
        assert_eq!(Reg::ZERO.to_string(), "zero");
        assert_eq!(Reg::A7.to_string(), "a7");
        assert_eq!(Reg::S10.to_string(), "s10");
        assert_eq!(FReg::FA0.to_string(), "fa0");
        assert_eq!(FReg::FT11.to_string(), "ft11");
    }

    #[test]
    fn parse() {
        assert_eq!(Reg::parse("t0"), Ok(Reg::T0));
        assert_eq!(Reg::parse("SP"), Ok(Reg::SP));
        assert!(Reg::parse("hoge").is_err());
        assert_eq!(FReg::parse("fs2"), Ok(FReg::FS2));
    }

    #[test]
    fn indices_follow_the_register_file() {
        assert_eq!(Reg::ZERO.index(), 0);
        assert_eq!(Reg::RA.index(), 1);
        assert_eq!(Reg::SP.index(), 2);
        assert_eq!(Reg::A0.index(), 10);
        assert_eq!(Reg::A7.index(), 17);
        assert_eq!(Reg::T6.index(), 31);
        assert_eq!(FReg::nth(10), Some(FReg::FA0));
        assert_eq!(FReg::nth(31), Some(FReg::FT11));
        assert_eq!(FReg::nth(32), None);
    }

    #[test]
    fn bank_is_caller_saved() {
        assert!(Reg::BANK.iter().all(|r| r.is_caller_saved()));
        assert!(!Reg::S1.is_caller_saved());
        assert!(FReg::FA3.is_caller_saved());
        assert!(!FReg::FS4.is_caller_saved());
    }
}
