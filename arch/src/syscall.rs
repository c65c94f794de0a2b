use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Environment call numbers understood by the simulator (passed in `a7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Syscall {
    PrintInt = 1,
    PrintFloat = 2,
    PrintString = 4,
    ReadInt = 5,
    ReadFloat = 6,
    ReadString = 8,
    Exit = 10,
    PrintChar = 11,
    ReadChar = 12,
}

impl Syscall {
    pub fn code(self) -> i64 {
        u8::from(self) as i64
    }
}
