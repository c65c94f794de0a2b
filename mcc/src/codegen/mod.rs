pub mod program;

use crate::error::SemanticError;
use crate::grammer::ast::{BinaryOp, MathFunc};
use crate::grammer::token::Number;
use crate::options::Options;
use crate::symbols::{Storage, Symbol, SymbolTable, VarType};
use arch::data::Data;
use arch::inst::Inst;
use arch::reg::{FReg, Reg};
use arch::syscall::Syscall;
use program::{AsmLine, Program};

/// Scratch register for addresses. Outside both banks, so never allocated.
const ADDR: Reg = Reg::S1;
/// Second scratch register, used when copying string pointers.
const COPY: Reg = Reg::S2;

/// Value produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprResult {
    pub ty: VarType,
    pub storage: Storage,
    /// Compiler temporary rather than a user variable
    pub temporary: bool,
}

/// Argument of `print` / `println`.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintArg {
    Text(String),
    Value(ExprResult),
}

impl From<&Symbol> for ExprResult {
    fn from(symbol: &Symbol) -> Self {
        ExprResult {
            ty: symbol.ty,
            storage: symbol.storage.clone(),
            temporary: symbol.temporary,
        }
    }
}

/// Append-only emitter for the text and data sections.
#[derive(Debug)]
pub struct CodeGenerator {
    text: Vec<AsmLine>,
    data: Vec<Data>,
    labels: usize,
    strings: usize,
    options: Options,
}

impl CodeGenerator {
    pub fn new(options: &Options) -> Self {
        CodeGenerator {
            text: Vec::new(),
            data: Vec::new(),
            labels: 0,
            strings: 0,
            options: options.clone(),
        }
    }

    pub fn finish(self) -> Program {
        Program {
            text: self.text,
            data: self.data,
        }
    }

    pub fn emit(&mut self, inst: Inst) {
        self.text.push(AsmLine::Inst(inst));
    }

    pub fn emit_label(&mut self, label: &str) {
        self.text.push(AsmLine::Label(label.to_string()));
    }

    pub fn emit_comment(&mut self, text: String) {
        if self.options.comments {
            self.text.push(AsmLine::Comment(text));
        }
    }

    pub fn emit_data(&mut self, data: Data) {
        self.data.push(data);
    }

    /// Fresh `<prefix>_<n>` label. The counter is shared by every prefix.
    pub fn new_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}_{}", self.labels);
        self.labels += 1;
        label
    }

    fn new_string(&mut self, text: &str) -> String {
        let label = format!("string_{}", self.strings);
        self.strings += 1;
        self.emit_data(Data::String(label.clone(), text.to_string()));
        label
    }

    fn emit_syscall(&mut self, call: Syscall) {
        self.emit(Inst::LI(Reg::A7, call.code()));
        self.emit(Inst::ECALL);
    }
}

// ----------------------------------------------------------------------------
// Stack
// ----------------------------------------------------------------------------

impl CodeGenerator {
    pub fn emit_push(&mut self, regs: &[Storage]) {
        let regs = registers(regs);
        if regs.is_empty() {
            return;
        }
        self.emit(Inst::ADDI(Reg::SP, Reg::SP, -4 * regs.len() as i64));
        for (offset, reg) in (0..).step_by(4).zip(regs) {
            match reg {
                Storage::Int(reg) => self.emit(Inst::SW(*reg, offset, Reg::SP)),
                Storage::Float(reg) => self.emit(Inst::FSW(*reg, offset, Reg::SP)),
                Storage::Label(_) => {}
            }
        }
    }

    pub fn emit_pop(&mut self, regs: &[Storage]) {
        let regs = registers(regs);
        if regs.is_empty() {
            return;
        }
        for (offset, reg) in (0..).step_by(4).zip(&regs) {
            match reg {
                Storage::Int(reg) => self.emit(Inst::LW(*reg, offset, Reg::SP)),
                Storage::Float(reg) => self.emit(Inst::FLW(*reg, offset, Reg::SP)),
                Storage::Label(_) => {}
            }
        }
        self.emit(Inst::ADDI(Reg::SP, Reg::SP, 4 * regs.len() as i64));
    }

    /// Run `body` with every allocated register in `clobbers` saved around it,
    /// except `keep`, which receives the result.
    fn guarded<F: FnOnce(&mut Self)>(
        &mut self,
        symbols: &SymbolTable,
        clobbers: &[Storage],
        keep: Option<&Storage>,
        body: F,
    ) {
        let saved: Vec<Storage> = clobbers
            .iter()
            .filter(|reg| symbols.is_allocated(reg) && Some(*reg) != keep)
            .cloned()
            .collect();
        self.emit_push(&saved);
        body(self);
        self.emit_pop(&saved);
    }
}

fn registers(regs: &[Storage]) -> Vec<&Storage> {
    regs.iter()
        .filter(|reg| !matches!(reg, Storage::Label(_)))
        .collect()
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl CodeGenerator {
    pub fn emit_declaration(&mut self, symbol: &Symbol) {
        self.emit_comment(format!("var {} {}: {}", symbol.ty, symbol.name, symbol.storage));
        if let Storage::Label(label) = &symbol.storage {
            self.emit_data(Data::Word(label.clone(), 0));
        }
    }

    /// Load a literal into a fresh temporary.
    pub fn emit_load_constant(
        &mut self,
        symbols: &mut SymbolTable,
        number: Number,
    ) -> Result<ExprResult, SemanticError> {
        let ty = match number {
            Number::Int(_) => VarType::Int,
            Number::Float(_) => VarType::Float,
        };
        let result = ExprResult::from(symbols.new_temporary(ty)?);
        match (number, &result.storage) {
            (Number::Int(value), Storage::Int(rd)) => self.emit(Inst::LI(*rd, value.into())),
            (Number::Float(value), Storage::Float(fd)) if value == 0.0 => {
                self.emit(Inst::FMVX(*fd, Reg::ZERO))
            }
            (Number::Float(value), Storage::Float(fd)) => {
                let label = self.new_label("float");
                self.emit_data(Data::Float(label.clone(), value));
                self.emit(Inst::LA(ADDR, label));
                self.emit(Inst::FLW(*fd, 0, ADDR));
            }
            _ => unreachable!("temporary storage does not match its type"),
        }
        Ok(result)
    }

    /// Convert `value` to `ty`, through a new temporary when the types differ.
    pub fn coerce(
        &mut self,
        symbols: &mut SymbolTable,
        value: &ExprResult,
        ty: VarType,
    ) -> Result<ExprResult, SemanticError> {
        if value.ty == ty {
            return Ok(value.clone());
        }
        match (value.ty, &value.storage, ty) {
            (VarType::Int, Storage::Int(rs), VarType::Float) => {
                let result = ExprResult::from(symbols.new_temporary(VarType::Float)?);
                if let Storage::Float(fd) = result.storage {
                    self.emit(Inst::FCVTSW(fd, *rs));
                }
                Ok(result)
            }
            (VarType::Float, Storage::Float(fs), VarType::Int) => {
                let result = ExprResult::from(symbols.new_temporary(VarType::Int)?);
                if let Storage::Int(rd) = result.storage {
                    self.emit(Inst::FCVTWS(rd, *fs));
                }
                Ok(result)
            }
            _ => Err(SemanticError::InvalidConversion { from: value.ty, to: ty }),
        }
    }

    /// `lhs op rhs`. The result is float when either side is float, and always for `/`.
    pub fn emit_binary_op(
        &mut self,
        symbols: &mut SymbolTable,
        op: BinaryOp,
        lhs: &ExprResult,
        rhs: &ExprResult,
    ) -> Result<ExprResult, SemanticError> {
        for operand in [lhs, rhs] {
            if !matches!(operand.ty, VarType::Int | VarType::Float) {
                return Err(SemanticError::UnsupportedOperation { op, ty: operand.ty });
            }
        }
        let ty = if lhs.ty == VarType::Float || rhs.ty == VarType::Float || op == BinaryOp::Div {
            VarType::Float
        } else {
            VarType::Int
        };

        let result = ExprResult::from(symbols.new_temporary(ty)?);
        let lhs = self.coerce(symbols, lhs, ty)?;
        let rhs = self.coerce(symbols, rhs, ty)?;

        let inst = match (&result.storage, &lhs.storage, &rhs.storage) {
            (Storage::Float(fd), Storage::Float(fs1), Storage::Float(fs2)) => {
                let (fd, fs1, fs2) = (*fd, *fs1, *fs2);
                match op {
                    BinaryOp::Add => Inst::FADD(fd, fs1, fs2),
                    BinaryOp::Sub => Inst::FSUB(fd, fs1, fs2),
                    BinaryOp::Mul => Inst::FMUL(fd, fs1, fs2),
                    BinaryOp::Div => Inst::FDIV(fd, fs1, fs2),
                }
            }
            (Storage::Int(rd), Storage::Int(rs1), Storage::Int(rs2)) => {
                let (rd, rs1, rs2) = (*rd, *rs1, *rs2);
                match op {
                    BinaryOp::Add => Inst::ADD(rd, rs1, rs2),
                    BinaryOp::Sub => Inst::SUB(rd, rs1, rs2),
                    BinaryOp::Mul => Inst::MUL(rd, rs1, rs2),
                    BinaryOp::Div => Inst::DIV(rd, rs1, rs2),
                }
            }
            _ => return Err(SemanticError::UnsupportedOperation { op, ty }),
        };
        self.emit(inst);
        Ok(result)
    }

    /// `func(arg)` through the library routine of the same name.
    /// `ra` and every allocated caller-saved register survive the call.
    pub fn emit_math_function(
        &mut self,
        symbols: &mut SymbolTable,
        func: MathFunc,
        arg: &ExprResult,
    ) -> Result<ExprResult, SemanticError> {
        let (VarType::Float, Storage::Float(fs)) = (arg.ty, &arg.storage) else {
            return Err(SemanticError::MathArgument { func, found: arg.ty });
        };

        let saved: Vec<Storage> = std::iter::once(Storage::Int(Reg::RA))
            .chain(symbols.registers().filter(|reg| caller_saved(reg)).cloned())
            .collect();
        let result = ExprResult::from(symbols.new_temporary(VarType::Float)?);
        let Storage::Float(fd) = result.storage else {
            unreachable!("float temporary without a float register");
        };

        self.emit_comment(format!("call {func}"));
        self.emit_push(&saved);
        self.emit(Inst::FMV(FReg::FA0, *fs));
        self.emit(Inst::CALL(func.to_string()));
        self.emit(Inst::FMV(fd, FReg::FA0));
        self.emit_pop(&saved);
        Ok(result)
    }
}

fn caller_saved(reg: &Storage) -> bool {
    match reg {
        Storage::Int(reg) => reg.is_caller_saved(),
        Storage::Float(reg) => reg.is_caller_saved(),
        Storage::Label(_) => false,
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl CodeGenerator {
    /// `target = value`, converting between int and float.
    pub fn emit_assignment(
        &mut self,
        target: &Symbol,
        value: &ExprResult,
    ) -> Result<(), SemanticError> {
        let invalid = SemanticError::InvalidConversion {
            from: value.ty,
            to: target.ty,
        };
        let same = target.ty == value.ty;
        match (&target.storage, &value.storage) {
            (Storage::Float(fd), Storage::Float(fs)) if same => self.emit(Inst::FMV(*fd, *fs)),
            (Storage::Int(rd), Storage::Int(rs)) if same => self.emit(Inst::MV(*rd, *rs)),
            (Storage::Label(dst), Storage::Label(src)) if same => {
                self.emit(Inst::LA(ADDR, src.clone()));
                self.emit(Inst::LW(ADDR, 0, ADDR));
                self.emit(Inst::LA(COPY, dst.clone()));
                self.emit(Inst::SW(ADDR, 0, COPY));
            }
            (Storage::Float(fd), Storage::Int(rs))
                if target.ty == VarType::Float && value.ty == VarType::Int =>
            {
                self.emit(Inst::FCVTSW(*fd, *rs))
            }
            (Storage::Int(rd), Storage::Float(fs))
                if target.ty == VarType::Int && value.ty == VarType::Float =>
            {
                self.emit(Inst::FCVTWS(*rd, *fs))
            }
            _ => return Err(invalid),
        }
        Ok(())
    }

    /// `read(target)`
    pub fn emit_read(&mut self, symbols: &SymbolTable, target: &Symbol) {
        let a0 = Storage::Int(Reg::A0);
        let a1 = Storage::Int(Reg::A1);
        let a7 = Storage::Int(Reg::A7);
        let fa0 = Storage::Float(FReg::FA0);

        self.emit_comment(format!("read {} {}", target.ty, target.name));
        let keep = Some(&target.storage);
        match (&target.storage, target.ty) {
            (Storage::Int(rd), ty) => {
                let call = if ty == VarType::Char {
                    Syscall::ReadChar
                } else {
                    Syscall::ReadInt
                };
                self.guarded(symbols, &[a0, a7], keep, |gen| {
                    gen.emit_syscall(call);
                    gen.emit(Inst::MV(*rd, Reg::A0));
                });
            }
            (Storage::Float(fd), _) => {
                self.guarded(symbols, &[fa0, a7], keep, |gen| {
                    gen.emit_syscall(Syscall::ReadFloat);
                    gen.emit(Inst::FMV(*fd, FReg::FA0));
                });
            }
            (Storage::Label(var), _) => {
                let buffer = format!("buffer_{}", target.name);
                if !self.data.iter().any(|data| data.label() == buffer) {
                    self.emit_data(Data::Space(buffer.clone(), self.options.read_buffer));
                }
                let len = self.options.read_buffer as i64;
                self.guarded(symbols, &[a0, a1, a7], None, |gen| {
                    gen.emit(Inst::LA(Reg::A0, buffer.clone()));
                    gen.emit(Inst::LI(Reg::A1, len));
                    gen.emit_syscall(Syscall::ReadString);
                });
                self.emit(Inst::LA(ADDR, buffer));
                self.emit(Inst::LA(COPY, var.clone()));
                self.emit(Inst::SW(ADDR, 0, COPY));
            }
        }
    }

    /// `print(args)`, or `println(args)` when `newline` is set.
    pub fn emit_print(&mut self, symbols: &SymbolTable, args: &[PrintArg], newline: bool) {
        let a0 = Storage::Int(Reg::A0);
        let a7 = Storage::Int(Reg::A7);
        let fa0 = Storage::Float(FReg::FA0);

        for arg in args {
            match arg {
                PrintArg::Text(text) => {
                    let label = self.new_string(text);
                    self.emit_comment("print string".to_string());
                    self.guarded(symbols, &[a0.clone(), a7.clone()], None, |gen| {
                        gen.emit(Inst::LA(Reg::A0, label));
                        gen.emit_syscall(Syscall::PrintString);
                    });
                }
                PrintArg::Value(value) => {
                    self.emit_comment(format!("print {}", value.ty));
                    match (&value.storage, value.ty) {
                        (Storage::Label(var), _) => {
                            self.guarded(symbols, &[a0.clone(), a7.clone()], None, |gen| {
                                gen.emit(Inst::LA(ADDR, var.clone()));
                                gen.emit(Inst::LW(Reg::A0, 0, ADDR));
                                gen.emit_syscall(Syscall::PrintString);
                            });
                        }
                        (Storage::Int(rs), ty) => {
                            let call = if ty == VarType::Char {
                                Syscall::PrintChar
                            } else {
                                Syscall::PrintInt
                            };
                            self.guarded(symbols, &[a0.clone(), a7.clone()], None, |gen| {
                                gen.emit(Inst::MV(Reg::A0, *rs));
                                gen.emit_syscall(call);
                            });
                        }
                        (Storage::Float(fs), _) => {
                            self.guarded(symbols, &[fa0.clone(), a7.clone()], None, |gen| {
                                gen.emit(Inst::FMV(FReg::FA0, *fs));
                                gen.emit_syscall(Syscall::PrintFloat);
                            });
                        }
                    }
                }
            }
        }

        if newline {
            self.emit_comment("newline".to_string());
            self.guarded(symbols, &[a0, a7], None, |gen| {
                gen.emit(Inst::LI(Reg::A0, '\n' as i64));
                gen.emit_syscall(Syscall::PrintChar);
            });
        }
    }

    pub fn check_loop_variable(&self, control: &Symbol) -> Result<(), SemanticError> {
        match control.ty {
            VarType::Int | VarType::Float => Ok(()),
            ty => Err(SemanticError::LoopVariable {
                name: control.name.clone(),
                ty,
            }),
        }
    }

    /// Fix the loop bound: convert it to the control type and copy user
    /// variables into a temporary, so the body cannot move it.
    pub fn emit_loop_bound(
        &mut self,
        symbols: &mut SymbolTable,
        control: &Symbol,
        bound: &ExprResult,
    ) -> Result<ExprResult, SemanticError> {
        let bound = self.coerce(symbols, bound, control.ty)?;
        if bound.temporary {
            return Ok(bound);
        }
        let copy = ExprResult::from(symbols.new_temporary(control.ty)?);
        match (&copy.storage, &bound.storage) {
            (Storage::Int(rd), Storage::Int(rs)) => self.emit(Inst::MV(*rd, *rs)),
            (Storage::Float(fd), Storage::Float(fs)) => self.emit(Inst::FMV(*fd, *fs)),
            _ => {
                return Err(SemanticError::InvalidConversion {
                    from: bound.ty,
                    to: control.ty,
                })
            }
        }
        Ok(copy)
    }

    /// Loop head: start label and the `control <= bound` test.
    /// Returns the start and end labels.
    pub fn emit_for_start(&mut self, control: &Symbol, bound: &ExprResult) -> (String, String) {
        let start = self.new_label("for_start");
        let end = self.new_label("for_end");
        self.emit_comment(format!("for {} <= {}", control.name, bound.storage));
        self.emit_label(&start);
        match (&control.storage, &bound.storage) {
            (Storage::Int(ctl), Storage::Int(bnd)) => {
                self.emit(Inst::BGT(*ctl, *bnd, end.clone()));
            }
            (Storage::Float(ctl), Storage::Float(bnd)) => {
                self.emit(Inst::FLE(ADDR, *ctl, *bnd));
                self.emit(Inst::BEQZ(ADDR, end.clone()));
            }
            _ => unreachable!("loop bound does not match the control type"),
        }
        (start, end)
    }

    /// Loop tail: increment the control variable, jump back, end label.
    pub fn emit_for_end(
        &mut self,
        symbols: &mut SymbolTable,
        control: &Symbol,
        start: &str,
        end: &str,
    ) -> Result<(), SemanticError> {
        self.emit_comment(format!("{} += 1", control.name));
        match &control.storage {
            Storage::Int(reg) => self.emit(Inst::ADDI(*reg, *reg, 1)),
            Storage::Float(reg) => {
                let one = self.emit_load_constant(symbols, Number::Float(1.0))?;
                if let Storage::Float(one) = one.storage {
                    self.emit(Inst::FADD(*reg, *reg, one));
                }
            }
            Storage::Label(_) => unreachable!("string loop variable"),
        }
        self.emit(Inst::J(start.to_string()));
        self.emit_label(end);
        Ok(())
    }
}
