use crate::error::SemanticError;
use arch::reg::{FReg, Reg};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Int,
    Float,
    String,
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RegClass {
    #[strum(serialize = "integer")]
    Int,
    #[strum(serialize = "float")]
    Float,
}

/// Where a symbol lives: an integer register, a float register, or a data label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Storage {
    Int(Reg),
    Float(FReg),
    Label(String),
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Int(reg) => write!(f, "{reg}"),
            Storage::Float(reg) => write!(f, "{reg}"),
            Storage::Label(label) => write!(f, "{label}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: VarType,
    pub storage: Storage,
    pub temporary: bool,
}

/// Declared variables and compiler temporaries, in declaration order.
///
/// Registers are handed out once and never reused: floats take `f0..f31`,
/// ints and chars take `t0..t6` then `a0..a7`, strings get a data label.
/// Running out of a bank is an error, there is no spilling.
#[derive(Debug, Default, Serialize)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
    #[serde(skip)]
    next_float: usize,
    #[serde(skip)]
    next_int: usize,
    #[serde(skip)]
    next_temp: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, ty: VarType) -> Result<&Symbol, SemanticError> {
        if self.symbols.contains_key(name) {
            return Err(SemanticError::AlreadyDeclared(name.to_string()));
        }
        self.insert(name.to_string(), ty, false)
    }

    pub fn lookup(&self, name: &str) -> Result<&Symbol, SemanticError> {
        self.symbols
            .get(name)
            .ok_or_else(|| SemanticError::NotDeclared(name.to_string()))
    }

    /// Declare a fresh temporary. Its name starts with `$`, which no identifier can.
    pub fn new_temporary(&mut self, ty: VarType) -> Result<&Symbol, SemanticError> {
        let name = format!("${}", self.next_temp);
        self.next_temp += 1;
        self.insert(name, ty, true)
    }

    fn insert(&mut self, name: String, ty: VarType, temporary: bool) -> Result<&Symbol, SemanticError> {
        let storage = self.allocate(&name, ty, temporary)?;
        let symbol = Symbol {
            name: name.clone(),
            ty,
            storage,
            temporary,
        };
        let (idx, _) = self.symbols.insert_full(name, symbol);
        Ok(&self.symbols[idx])
    }

    fn allocate(&mut self, name: &str, ty: VarType, temporary: bool) -> Result<Storage, SemanticError> {
        match ty {
            VarType::Float => {
                let reg = FReg::nth(self.next_float)
                    .ok_or(SemanticError::RegistersExhausted(RegClass::Float))?;
                self.next_float += 1;
                Ok(Storage::Float(reg))
            }
            VarType::Int | VarType::Char => {
                let reg = Reg::BANK
                    .get(self.next_int)
                    .copied()
                    .ok_or(SemanticError::RegistersExhausted(RegClass::Int))?;
                self.next_int += 1;
                Ok(Storage::Int(reg))
            }
            VarType::String => Ok(Storage::Label(if temporary {
                format!("tmp_{}", name.trim_start_matches('$'))
            } else {
                format!("var_{name}")
            })),
        }
    }

    /// True when some symbol currently owns `storage`.
    pub fn is_allocated(&self, storage: &Storage) -> bool {
        self.symbols.values().any(|symbol| &symbol.storage == storage)
    }

    /// Registers owned by symbols, in allocation order.
    pub fn registers(&self) -> impl Iterator<Item = &Storage> {
        self.symbols
            .values()
            .map(|symbol| &symbol.storage)
            .filter(|storage| !matches!(storage, Storage::Label(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn print(&self) {
        println!("=== Symbol Table ===");
        println!("{:<20} {:<8} {:<12} {:<5}", "Name", "Type", "Storage", "Temp");
        println!("{:-<48}", "");
        for symbol in self.iter() {
            let temp = if symbol.temporary { "yes" } else { "" };
            println!(
                "{:<20} {:<8} {:<12} {:<5}",
                symbol.name,
                symbol.ty.to_string(),
                symbol.storage.to_string(),
                temp
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_follow_declaration_order() {
        let mut table = SymbolTable::new();
        assert_eq!(table.declare("a", VarType::Int).unwrap().storage, Storage::Int(Reg::T0));
        assert_eq!(table.declare("x", VarType::Float).unwrap().storage, Storage::Float(FReg::FT0));
        assert_eq!(table.declare("c", VarType::Char).unwrap().storage, Storage::Int(Reg::T1));
        assert_eq!(
            table.declare("s", VarType::String).unwrap().storage,
            Storage::Label("var_s".to_string())
        );
        assert_eq!(table.new_temporary(VarType::Float).unwrap().storage, Storage::Float(FReg::FT1));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn redeclaration_fails() {
        let mut table = SymbolTable::new();
        table.declare("a", VarType::Int).unwrap();
        assert_eq!(
            table.declare("a", VarType::Float),
            Err(SemanticError::AlreadyDeclared("a".to_string()))
        );
        // The failed declaration does not consume a register.
        assert_eq!(table.declare("b", VarType::Int).unwrap().storage, Storage::Int(Reg::T1));
    }

    #[test]
    fn lookup_of_unknown_name_fails() {
        let table = SymbolTable::new();
        assert_eq!(
            table.lookup("ghost"),
            Err(SemanticError::NotDeclared("ghost".to_string()))
        );
    }

    #[test]
    fn temporaries_never_collide_with_identifiers() {
        let mut table = SymbolTable::new();
        let t0 = table.new_temporary(VarType::Int).unwrap().name.clone();
        let t1 = table.new_temporary(VarType::Int).unwrap().name.clone();
        assert_eq!(t0, "$0");
        assert_eq!(t1, "$1");
        assert!(table.declare("T0", VarType::Int).is_ok());
        assert!(table.lookup("$0").unwrap().temporary);
        assert!(!table.lookup("T0").unwrap().temporary);
    }

    #[test]
    fn integer_bank_spills_into_argument_registers_then_fails() {
        let mut table = SymbolTable::new();
        let regs: Vec<Storage> = (0..15)
            .map(|i| table.declare(&format!("v{i}"), VarType::Int).unwrap().storage.clone())
            .collect();
        assert_eq!(regs[6], Storage::Int(Reg::T6));
        assert_eq!(regs[7], Storage::Int(Reg::A0));
        assert_eq!(regs[14], Storage::Int(Reg::A7));
        assert_eq!(
            table.new_temporary(VarType::Char),
            Err(SemanticError::RegistersExhausted(RegClass::Int))
        );
    }

    #[test]
    fn float_bank_holds_thirty_two() {
        let mut table = SymbolTable::new();
        for i in 0..32 {
            table.declare(&format!("f{i}"), VarType::Float).unwrap();
        }
        assert_eq!(table.lookup("f31").unwrap().storage, Storage::Float(FReg::FT11));
        assert_eq!(
            table.declare("f32", VarType::Float),
            Err(SemanticError::RegistersExhausted(RegClass::Float))
        );
        // Strings do not use registers.
        assert!(table.declare("s", VarType::String).is_ok());
    }

    #[test]
    fn allocation_queries() {
        let mut table = SymbolTable::new();
        table.declare("s", VarType::String).unwrap();
        table.declare("i", VarType::Int).unwrap();
        assert!(table.is_allocated(&Storage::Int(Reg::T0)));
        assert!(!table.is_allocated(&Storage::Int(Reg::A0)));
        assert_eq!(table.registers().collect::<Vec<_>>(), vec![&Storage::Int(Reg::T0)]);
    }

    #[test]
    fn json_dump() {
        let mut table = SymbolTable::new();
        table.declare("x", VarType::Float).unwrap();
        let json = table.to_json().unwrap();
        assert!(json.contains("\"type\": \"float\""));
        assert!(json.contains("\"storage\": \"ft0\""));
    }
}
