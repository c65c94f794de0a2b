use super::ast::{BinaryOp, MathFunc};
use super::parsercore::Parser;
use super::token::{Token, TokenKind::*, TokenTag};
use crate::codegen::{ExprResult, PrintArg};
use crate::error::Error;
use crate::symbols::VarType;
use crate::{check, expect, repeat, Unit};

impl<I: Iterator<Item = Token>> Parser<I> {
    /// program = { declaration | statement } "end" "." EOF
    pub fn parse(mut self) -> Result<Unit, Error> {
        while !check!(self, KwEnd) {
            self.parse_stmt()?;
        }
        expect!(self, KwEnd)?;
        expect!(self, Period)?;
        expect!(self, Eof)?;
        Ok(Unit {
            program: self.gen.finish(),
            symbols: self.symbols,
        })
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// stmt = declaration | assignment | read | print | for
    fn parse_stmt(&mut self) -> Result<(), Error> {
        match TokenTag::from(&self.peek()?.kind) {
            TokenTag::KwVar => self.parse_declaration(),
            TokenTag::Ident => self.parse_assignment(),
            TokenTag::KwRead => self.parse_read(),
            TokenTag::KwPrint | TokenTag::KwPrintln => self.parse_print(),
            TokenTag::KwFor => self.parse_for(),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// declaration = "var" type ident ";"
    fn parse_declaration(&mut self) -> Result<(), Error> {
        expect!(self, KwVar)?;
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        let line = self.line();
        expect!(self, Semicolon)?;
        let symbol = self
            .symbols
            .declare(&name, ty)
            .map_err(|e| e.at(line))?
            .clone();
        self.gen.emit_declaration(&symbol);
        Ok(())
    }

    /// assignment = ident "=" expr ";"
    fn parse_assignment(&mut self) -> Result<(), Error> {
        let name = self.parse_ident()?;
        let line = self.line();
        let target = self.symbols.lookup(&name).map_err(|e| e.at(line))?.clone();
        expect!(self, Equal)?;
        let value = self.parse_expr()?;
        expect!(self, Semicolon)?;
        self.gen
            .emit_assignment(&target, &value)
            .map_err(|e| e.at(line))
    }

    /// read = "read" "(" ident ")" ";"
    fn parse_read(&mut self) -> Result<(), Error> {
        expect!(self, KwRead)?;
        expect!(self, LParen)?;
        let name = self.parse_ident()?;
        let line = self.line();
        let target = self.symbols.lookup(&name).map_err(|e| e.at(line))?.clone();
        expect!(self, RParen)?;
        expect!(self, Semicolon)?;
        self.gen.emit_read(&self.symbols, &target);
        Ok(())
    }

    /// print = ( "print" | "println" ) "(" print-arg { "," print-arg } ")" ";"
    fn parse_print(&mut self) -> Result<(), Error> {
        let newline = expect!(self, KwPrint | KwPrintln)?.kind == KwPrintln;
        expect!(self, LParen)?;
        let mut args = vec![self.parse_print_arg()?];
        while check!(self, Comma) {
            expect!(self, Comma)?;
            args.push(self.parse_print_arg()?);
        }
        expect!(self, RParen)?;
        expect!(self, Semicolon)?;
        self.gen.emit_print(&self.symbols, &args, newline);
        Ok(())
    }

    /// print-arg = text | expr
    fn parse_print_arg(&mut self) -> Result<PrintArg, Error> {
        if let Text(text) = &self.peek()?.kind {
            let text = text.clone();
            self.advance();
            return Ok(PrintArg::Text(text));
        }
        Ok(PrintArg::Value(self.parse_expr()?))
    }

    /// for = "for" "(" ident "=" expr ";" expr ")" "{" { stmt } "}"
    fn parse_for(&mut self) -> Result<(), Error> {
        expect!(self, KwFor)?;
        expect!(self, LParen)?;
        let name = self.parse_ident()?;
        let line = self.line();
        let control = self.symbols.lookup(&name).map_err(|e| e.at(line))?.clone();
        self.gen
            .check_loop_variable(&control)
            .map_err(|e| e.at(line))?;

        // Initial value
        expect!(self, Equal)?;
        let init = self.parse_expr()?;
        self.gen
            .emit_assignment(&control, &init)
            .map_err(|e| e.at(line))?;
        expect!(self, Semicolon)?;

        // Bound, evaluated once before the loop
        let bound = self.parse_expr()?;
        let line = self.line();
        let bound = self
            .gen
            .emit_loop_bound(&mut self.symbols, &control, &bound)
            .map_err(|e| e.at(line))?;
        expect!(self, RParen)?;

        let (start, end) = self.gen.emit_for_start(&control, &bound);

        // Body
        expect!(self, LCurly)?;
        repeat!(self, self.parse_stmt(), RCurly);
        expect!(self, RCurly)?;
        let line = self.line();
        self.gen
            .emit_for_end(&mut self.symbols, &control, &start, &end)
            .map_err(|e| e.at(line))
    }

    /// expr = term { ( "+" | "-" ) term }
    fn parse_expr(&mut self) -> Result<ExprResult, Error> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek()?.kind {
                Plus => BinaryOp::Add,
                Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let line = self.line();
            let rhs = self.parse_term()?;
            lhs = self
                .gen
                .emit_binary_op(&mut self.symbols, op, &lhs, &rhs)
                .map_err(|e| e.at(line))?;
        }
        Ok(lhs)
    }

    /// term = factor { ( "*" | "/" ) factor }
    fn parse_term(&mut self) -> Result<ExprResult, Error> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek()?.kind {
                Star => BinaryOp::Mul,
                Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let line = self.line();
            let rhs = self.parse_factor()?;
            lhs = self
                .gen
                .emit_binary_op(&mut self.symbols, op, &lhs, &rhs)
                .map_err(|e| e.at(line))?;
        }
        Ok(lhs)
    }

    /// factor = number | ident | "(" expr ")" | ( "sin" | "cos" | "tan" ) "(" expr ")"
    fn parse_factor(&mut self) -> Result<ExprResult, Error> {
        let token = self.peek()?.clone();
        let line = token.line;
        match token.kind {
            // Literal: load into a fresh temporary
            Number(number) => {
                self.advance();
                self.gen
                    .emit_load_constant(&mut self.symbols, number)
                    .map_err(|e| e.at(line))
            }

            // Variable: use its register directly
            Ident(name) => {
                self.advance();
                let symbol = self.symbols.lookup(&name).map_err(|e| e.at(line))?;
                Ok(ExprResult::from(symbol))
            }

            // Parenthesized: "(" expr ")"
            LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                expect!(self, RParen)?;
                Ok(expr)
            }

            // Math call: func "(" expr ")"
            kind @ (KwSin | KwCos | KwTan) => {
                let func = match kind {
                    KwSin => MathFunc::Sin,
                    KwCos => MathFunc::Cos,
                    _ => MathFunc::Tan,
                };
                self.advance();
                expect!(self, LParen)?;
                let arg = self.parse_expr()?;
                expect!(self, RParen)?;
                self.gen
                    .emit_math_function(&mut self.symbols, func, &arg)
                    .map_err(|e| e.at(line))
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    /// type = "int" | "float" | "string" | "char"
    fn parse_type(&mut self) -> Result<VarType, Error> {
        match self.peek()?.kind {
            KwType(ty) => {
                self.advance();
                Ok(ty)
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn parse_ident(&mut self) -> Result<String, Error> {
        if let Ident(name) = &self.peek()?.kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        Err(self.unexpected("identifier"))
    }
}
