//! Declaration parsing.
//!
//! `parse_decl` is the single entry point: it parses the attribute list and
//! an optional `static`, dispatches on the leading keyword, and applies the
//! post-conditions (trailing semicolon, unhandled `static`, code-completion
//! delay).
//!
//! \verbatim
//!   decl:
//!     decl-typealias
//!     decl-extension
//!     decl-var
//!     decl-func
//!     decl-enum
//!     decl-struct
//!     decl-class
//!     decl-protocol
//!     decl-import
//!     decl-operator
//! \endverbatim

mod ctor;
mod extension;
mod func;
mod generics;
mod import;
mod nominal;
mod oper;
mod subscript;
mod typealias;
mod var;

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::DeclKind;
use vela_ir::attr::DeclAttributes;
use vela_ir::{DeclId, Span, TokenKind, TypeReprId};

use crate::{DeclParseFlags, Parser, ParserStatus};

impl Parser<'_> {
    /// Parse a single syntactic declaration, appending the produced decls to
    /// `entries`. Var declarations can produce several entries (one binding
    /// plus its variables and accessors).
    pub(crate) fn parse_decl(
        &mut self,
        entries: &mut Vec<DeclId>,
        flags: DeclParseFlags,
    ) -> ParserStatus {
        // Record the position in case the declaration must be delayed.
        let begin_position = self.cursor.save_position();
        let scope_depth = self.scope_depth();
        let context_depth = self.context_depth();

        let mut attrs = DeclAttributes::default();
        self.parse_decl_attribute_list(&mut attrs);

        // If we see the 'static' keyword, consume it now; it stays
        // "unhandled" until a sub-parser that accepts it claims it.
        let mut static_span: Option<Span> = None;
        let mut unhandled_static = false;
        if self.cursor.check(TokenKind::KwStatic) {
            static_span = Some(self.cursor.advance());
            unhandled_static = true;
        }

        let entries_before = entries.len();
        let status = match self.cursor.current_kind() {
            TokenKind::KwImport => {
                let result = self.parse_decl_import(flags, &mut attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwExtension => {
                let result = self.parse_decl_extension(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwVar => {
                if let Some(span) = static_span {
                    self.diagnose_unimplemented_static_var(span);
                    unhandled_static = false;
                }
                self.parse_decl_var(flags, &attrs, entries, static_span)
            }
            TokenKind::KwTypealias => {
                let result = self.parse_decl_typealias(
                    !flags.has(DeclParseFlags::DISALLOW_TYPEALIAS_DEF),
                    flags.has(DeclParseFlags::IN_PROTOCOL),
                    &attrs,
                );
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwEnum => {
                let result = self.parse_decl_enum(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwCase => self.parse_decl_enum_case(flags, &attrs, entries),
            TokenKind::KwStruct => {
                let result = self.parse_decl_struct(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwClass => {
                let result = self.parse_decl_class(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwInit => {
                let result = self.parse_decl_constructor(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwDestructor => {
                let result = self.parse_decl_destructor(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwProtocol => {
                let result = self.parse_decl_protocol(flags, &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwFunc => {
                let result = self.parse_decl_func(static_span, flags, &attrs);
                unhandled_static = false;
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            TokenKind::KwSubscript => {
                if let Some(span) = static_span {
                    self.emit(
                        Diagnostic::error(ErrorCode::E1080)
                            .with_message("subscripts cannot be marked 'static'")
                            .with_label(self.cursor.current_span(), "here")
                            .with_fixit_remove(span),
                    );
                    unhandled_static = false;
                }
                self.parse_decl_subscript(
                    flags.has(DeclParseFlags::HAS_CONTAINER_TYPE),
                    !flags.has(DeclParseFlags::DISALLOW_FUNC_DEF),
                    &attrs,
                    entries,
                )
            }
            TokenKind::Ident(_) if self.is_start_of_operator_decl() => {
                let result =
                    self.parse_decl_operator(flags.has(DeclParseFlags::ALLOW_TOP_LEVEL), &attrs);
                let status = result.status();
                if let Some(decl) = result.get() {
                    entries.push(decl);
                }
                status
            }
            _ => {
                self.error_at(
                    ErrorCode::E1001,
                    self.cursor.current_span(),
                    "expected declaration",
                );
                ParserStatus::error()
            }
        };

        debug_assert_eq!(self.scope_depth(), scope_depth, "scope stack not restored");
        debug_assert_eq!(
            self.context_depth(),
            context_depth,
            "context stack not restored"
        );

        // A code-completion token inside a non-module context: delay the
        // whole declaration and pretend there was no error.
        if status.has_code_completion()
            && self.options.completion_first_pass
            && !self.arena.is_module_scope(self.current_context())
        {
            self.consume_decl(begin_position, flags, false);
            entries.truncate(entries_before);
            return ParserStatus::success();
        }

        // Optional trailing ';' hangs off the last declaration produced.
        if status.is_success()
            && entries.len() > entries_before
            && self.cursor.check(TokenKind::Semi)
        {
            let semi = self.cursor.advance();
            if let Some(&last) = entries.last() {
                self.arena.decl_mut(last).trailing_semi = Some(semi);
            }
        }

        // If we parsed 'static' but no sub-parser claimed it, complain.
        if status.is_success() && unhandled_static {
            if let (Some(&last), Some(span)) = (entries.last(), static_span) {
                let loc = self.arena.decl(last).span;
                self.emit(
                    Diagnostic::error(ErrorCode::E1041)
                        .with_message("declaration cannot be marked 'static'")
                        .with_label(loc, "here")
                        .with_fixit_remove(span),
                );
            }
        }

        status
    }

    /// Static stored properties are only implemented for non-generic value
    /// types; report the closest applicable restriction.
    fn diagnose_unimplemented_static_var(&mut self, static_span: Span) {
        let context = self.arena.context(self.current_context());
        let subject = match context.decl.map(|d| &self.arena.decl(d).kind) {
            Some(DeclKind::Struct { generics, .. }) | Some(DeclKind::Enum { generics, .. }) => {
                if generics.is_some() {
                    "generic types"
                } else {
                    // Non-generic value types support static properties.
                    return;
                }
            }
            Some(DeclKind::Class { .. }) => "classes",
            Some(DeclKind::Protocol { .. }) => "protocols",
            _ => "this context",
        };
        self.emit(
            Diagnostic::error(ErrorCode::E1040)
                .with_message(format!("static properties are not yet supported in {subject}"))
                .with_label(self.cursor.current_span(), "here")
                .with_highlight(static_span),
        );
    }

    /// Parse an inheritance clause.
    ///
    /// \verbatim
    ///   inheritance:
    ///     ':' type-identifier (',' type-identifier)*
    /// \endverbatim
    pub(crate) fn parse_inheritance(&mut self, inherited: &mut Vec<TypeReprId>) -> ParserStatus {
        self.cursor.advance(); // ':'

        let mut status = ParserStatus::success();
        loop {
            let ty = self.parse_type_identifier();
            status |= ty.status();
            if let Some(id) = ty.get() {
                inherited.push(id);
            }
            if self.cursor.consume_if(TokenKind::Comma).is_none() {
                break;
            }
        }
        status
    }

    /// Parse the members of a struct/class/enum/protocol/extension body.
    ///
    /// Between two consecutive members, require either a `;` after the first
    /// or that the second begin on a new line. Returns the closing brace
    /// span and whether the list failed to close.
    pub(crate) fn parse_nominal_members(
        &mut self,
        members: &mut Vec<DeclId>,
        flags: DeclParseFlags,
        lbrace: Span,
        what: &str,
    ) -> (Span, bool) {
        let mut previous_had_semi = true;

        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            if !previous_had_semi && !self.cursor.at_start_of_line() {
                let end_of_previous = self.cursor.previous_end();
                self.emit(
                    Diagnostic::error(ErrorCode::E1047)
                        .with_message(
                            "consecutive declarations on a line must be separated by ';'",
                        )
                        .with_label(Span::point(end_of_previous), "here")
                        .with_fixit_insert(end_of_previous, ";"),
                );
            }
            previous_had_semi = false;

            let start = self.cursor.position();
            let status = self.parse_decl(members, flags);
            if status.is_error() {
                self.skip_until_decl_rbrace();
                self.cursor.consume_if(TokenKind::Semi);
            }
            if self.cursor.position() == start {
                self.cursor.advance();
            }

            if let Some(&last) = members.last() {
                previous_had_semi = self.arena.decl(last).trailing_semi.is_some();
            }
        }

        match self.parse_matching(TokenKind::RBrace, ErrorCode::E1046, lbrace) {
            Some(rbrace) => (rbrace, false),
            None => {
                self.emit(
                    Diagnostic::note(ErrorCode::E1046)
                        .with_message(format!("unterminated {what} body"))
                        .with_label(lbrace, "body begins here"),
                );
                (self.cursor.previous_span(), true)
            }
        }
    }
}
