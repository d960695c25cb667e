//! Var declaration parsing, including accessor blocks.
//!
//! A `var` introduces one or more pattern bindings. The second production —
//! a single annotated name followed by `{` — enters accessor-block mode and
//! turns the variable into a computed property.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{
    AccessorBlock, BraceItem, Decl, DeclContextKind, DeclKind, FuncBody, Pattern, PatternKind,
};
use vela_ir::attr::DeclAttributes;
use vela_ir::{DeclId, Name, PatternId, Span, TokenKind, TypeReprId};

use crate::{DeclParseFlags, Parser, ParserStatus, ScopeKind};

/// Result of parsing the clauses of an accessor block.
pub(crate) struct AccessorClauses {
    pub get: Option<DeclId>,
    pub set: Option<DeclId>,
    /// End of the last successfully parsed clause, for recovery.
    pub last_valid: u32,
    pub invalid: bool,
}

impl Parser<'_> {
    /// Parse a `var` declaration, doing no token skipping on error.
    ///
    /// \verbatim
    ///   decl-var:
    ///     'var' attribute-list pattern initializer?
    ///         (',' pattern initializer?)*
    ///     'var' attribute-list identifier ':' type-annotation '{' get-set '}'
    /// \endverbatim
    pub(crate) fn parse_decl_var(
        &mut self,
        flags: DeclParseFlags,
        attrs: &DeclAttributes,
        entries: &mut Vec<DeclId>,
        static_span: Option<Span>,
    ) -> ParserStatus {
        let var_span = self.cursor.advance(); // 'var'

        let mut status = ParserStatus::success();
        let mut bindings: Vec<DeclId> = Vec::new();
        let mut has_get_set = false;
        let first_decl = entries.len();

        loop {
            let pattern_result = self.parse_pattern();
            if pattern_result.has_code_completion() {
                return ParserStatus::code_completion();
            }
            let Some(pattern) = pattern_result.get() else {
                return ParserStatus::error();
            };

            // Second production: an accessor block follows the pattern.
            if self.cursor.check(TokenKind::LBrace) {
                self.parse_decl_var_get_set(
                    pattern,
                    flags.has(DeclParseFlags::HAS_CONTAINER_TYPE),
                    static_span,
                );
                has_get_set = true;
            }

            let mut init = None;
            if self.cursor.check(TokenKind::Equal) {
                let equal_span = self.cursor.advance();
                let init_result = self.parse_expr(ErrorCode::E1111);
                if init_result.has_code_completion() {
                    return ParserStatus::code_completion();
                }
                match init_result.get() {
                    Some(expr) => init = Some(expr),
                    None => {
                        status.set_is_parse_error();
                        break;
                    }
                }
                if has_get_set {
                    let init_span = init.map_or(equal_span, |e| self.arena.expr(e).span);
                    self.emit(
                        Diagnostic::error(ErrorCode::E1057)
                            .with_message("variable with accessors cannot have an initializer")
                            .with_label(self.arena.pattern(pattern).span, "here")
                            .with_highlight(init_span),
                    );
                    init = None;
                }
                if flags.has(DeclParseFlags::DISALLOW_INIT) {
                    self.error_at(ErrorCode::E1058, equal_span, "initializer is not allowed here");
                    status.set_is_parse_error();
                }
            }

            let binding_end = self.cursor.previous_span();
            let binding = self.arena.alloc_decl(Decl::new(
                DeclKind::PatternBinding {
                    static_span,
                    pattern,
                    init,
                },
                var_span.merge(binding_end),
                self.current_context(),
            ));
            entries.push(binding);

            self.finish_vars(pattern, static_span.is_some(), attrs, entries);

            // Propagate back types for simple patterns: `var a, b: T`.
            self.propagate_binding_annotation(
                pattern,
                init.is_some(),
                &bindings,
                has_get_set,
                &mut status,
            );

            bindings.push(binding);

            if self.cursor.consume_if(TokenKind::Comma).is_none() {
                break;
            }
        }

        if has_get_set {
            if bindings.len() > 1 {
                self.error_at(
                    ErrorCode::E1059,
                    var_span,
                    "only one variable binding may have accessors",
                );
                status.set_is_parse_error();
            }
            if flags.has(DeclParseFlags::DISALLOW_COMPUTED_VAR) {
                self.error_at(
                    ErrorCode::E1060,
                    var_span,
                    "computed variables are not allowed here",
                );
                status.set_is_parse_error();
            }
        } else if static_span.is_none() && flags.has(DeclParseFlags::DISALLOW_STORED_INSTANCE_VAR) {
            self.error_at(
                ErrorCode::E1061,
                var_span,
                "stored instance variables are not allowed here",
            );
            status.set_is_parse_error();
            return status;
        }

        // At the top level of a script file, bindings are executable code:
        // wrap each one in a top-level-code declaration.
        if self.options.allow_top_level_code
            && self.arena.is_module_scope(self.current_context())
        {
            for index in first_decl..entries.len() {
                let decl_id = entries[index];
                if !matches!(self.arena.decl(decl_id).kind, DeclKind::PatternBinding { .. }) {
                    continue;
                }
                let span = self.arena.decl(decl_id).span;
                let wrapped = self.wrap_in_top_level_code(BraceItem::Decl(decl_id), span);
                entries[index] = wrapped;
            }
        }

        status
    }

    /// Rewrite earlier bare, uninitialized bindings of the same `var` to
    /// share the first following type annotation.
    fn propagate_binding_annotation(
        &mut self,
        pattern: PatternId,
        has_init: bool,
        earlier: &[DeclId],
        has_get_set: bool,
        status: &mut ParserStatus,
    ) {
        if has_init {
            return;
        }
        let (sub, ty): (PatternId, TypeReprId) = match &self.arena.pattern(pattern).kind {
            PatternKind::Typed { sub, ty } => (*sub, *ty),
            _ => return,
        };
        if !matches!(self.arena.pattern(sub).kind, PatternKind::Named { .. }) {
            return;
        }

        for &previous in earlier.iter().rev() {
            let (prev_pattern, prev_init) = match &self.arena.decl(previous).kind {
                DeclKind::PatternBinding { pattern, init, .. } => (*pattern, *init),
                _ => break,
            };
            if prev_init.is_some() {
                break;
            }
            if !matches!(self.arena.pattern(prev_pattern).kind, PatternKind::Named { .. }) {
                break;
            }

            if has_get_set {
                self.emit(
                    Diagnostic::error(ErrorCode::E1062)
                        .with_message(
                            "type annotation cannot be shared with an accessor variable",
                        )
                        .with_label(self.arena.pattern(prev_pattern).span, "here"),
                );
                status.set_is_parse_error();
            }

            let span = self.arena.pattern(prev_pattern).span;
            let mut typed = Pattern::new(
                PatternKind::Typed {
                    sub: prev_pattern,
                    ty,
                },
                span,
            );
            typed.implicit = true;
            let new_pattern = self.arena.alloc_pattern(typed);
            if let DeclKind::PatternBinding { pattern: slot, .. } =
                &mut self.arena.decl_mut(previous).kind
            {
                *slot = new_pattern;
            }
        }
    }

    /// Finish the variables bound by a pattern: context, staticness,
    /// attributes, discriminators, and entry-list registration. Accessors
    /// are appended in source order before their variable.
    fn finish_vars(
        &mut self,
        pattern: PatternId,
        is_static: bool,
        attrs: &DeclAttributes,
        entries: &mut Vec<DeclId>,
    ) {
        let context = self.current_context();
        let vars = vela_ir::ast::collect_bound_vars(&self.arena, pattern);
        for var_id in vars {
            let accessors = {
                let decl = self.arena.decl_mut(var_id);
                decl.context = context;
                if attrs.is_valid() {
                    decl.attrs = attrs.clone();
                }
                match &mut decl.kind {
                    DeclKind::Var {
                        is_static: static_slot,
                        accessors,
                        ..
                    } => {
                        *static_slot = is_static;
                        *accessors
                    }
                    _ => None,
                }
            };

            if let Some(block) = accessors {
                // Getter and setter go in source order.
                let mut accessor_ids: Vec<DeclId> =
                    block.get.into_iter().chain(block.set).collect();
                accessor_ids.sort_by_key(|&id| self.arena.decl(id).span.start);
                for accessor in accessor_ids {
                    self.arena.decl_mut(accessor).context = context;
                    entries.push(accessor);
                }
            }

            if self.arena.decl(var_id).discriminator.is_none() {
                self.set_local_discriminator(var_id);
            }
            entries.push(var_id);
        }
    }

    /// Parse the brace-enclosed getter and setter of a computed variable.
    ///
    /// \verbatim
    ///   decl-var (computed):
    ///     'var' identifier ':' type-annotation '{' get-set '}'
    /// \endverbatim
    pub(crate) fn parse_decl_var_get_set(
        &mut self,
        pattern: PatternId,
        has_container_type: bool,
        static_span: Option<Span>,
    ) {
        let mut invalid = false;
        let pattern_span = self.arena.pattern(pattern).span;

        // The grammar requires a simple identifier for the variable name.
        let primary_var = self.arena.pattern(pattern).single_var(&self.arena);
        if primary_var.is_none() {
            self.error_at(
                ErrorCode::E1051,
                pattern_span,
                "computed property requires a simple name",
            );
        }

        // The grammar also requires a type annotation. Without one the
        // accessor block still gets parsed for recovery, then discarded.
        let annotation = self.arena.pattern(pattern).type_annotation();
        let element_ty = match annotation {
            Some(ty) => ty,
            None => {
                if primary_var.is_some() {
                    self.error_at(
                        ErrorCode::E1050,
                        pattern_span,
                        "computed property requires a type annotation",
                    );
                }
                self.error_type(pattern_span)
            }
        };

        if let Some((_, var_id)) = primary_var {
            self.set_local_discriminator(var_id);
        }

        let lbrace = self.cursor.advance(); // '{'

        let clauses = self.parse_get_set(has_container_type, None, element_ty, static_span);
        if clauses.invalid {
            invalid = true;
        }

        if invalid {
            self.skip_until_decl_rbrace();
        }
        let rbrace = match self.parse_matching(TokenKind::RBrace, ErrorCode::E1046, lbrace) {
            Some(span) => span,
            None => Span::point(clauses.last_valid),
        };

        let mut set = clauses.set;

        if set.is_some() && clauses.get.is_none() {
            if !invalid {
                let set_span = set.map_or(lbrace, |id| self.arena.decl(id).span);
                self.error_at(
                    ErrorCode::E1056,
                    set_span,
                    "variable with a setter must also have a getter",
                );
            }
            // The setter is discarded; whether its body should still be
            // checked elsewhere is an open question upstream.
            set = None;
            invalid = true;
        }

        // If things went well, turn this into a computed variable.
        if !invalid && annotation.is_some() {
            if let Some((_, var_id)) = primary_var {
                if clauses.get.is_some() || set.is_some() {
                    if let DeclKind::Var { accessors, .. } = &mut self.arena.decl_mut(var_id).kind {
                        *accessors = Some(AccessorBlock {
                            lbrace,
                            get: clauses.get,
                            set,
                            rbrace,
                        });
                    }
                }
            }
        }
    }

    /// Parse a get-set clause list, containing a getter and (optionally) a
    /// setter in either order. A clause led by neither keyword is an
    /// implicit getter.
    ///
    /// \verbatim
    ///   get-set:
    ///     get set?
    ///     set get
    ///   get:
    ///     'get'? attribute-list ':' stmt-brace-item*
    ///   set:
    ///     'set' attribute-list set-name? ':' stmt-brace-item*
    ///   set-name:
    ///     '(' identifier ')'
    /// \endverbatim
    pub(crate) fn parse_get_set(
        &mut self,
        has_container_type: bool,
        indices: Option<PatternId>,
        element_ty: TypeReprId,
        static_span: Option<Span>,
    ) -> AccessorClauses {
        let mut clauses = AccessorClauses {
            get: None,
            set: None,
            last_valid: self.cursor.previous_end(),
            invalid: false,
        };

        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                clauses.invalid = true;
                break;
            }

            let mut attrs = DeclAttributes::default();
            self.parse_decl_attribute_list(&mut attrs);

            if self.cursor.ident_text_is("get") || !self.cursor.ident_text_is("set") {
                // A get clause, explicit or implicit.
                if let Some(previous) = clauses.get {
                    let previous_span = self.arena.decl(previous).span;
                    self.emit(
                        Diagnostic::error(ErrorCode::E1052)
                            .with_message("duplicate 'get' clause")
                            .with_label(self.cursor.current_span(), "here"),
                    );
                    self.emit(
                        Diagnostic::note(ErrorCode::E1052)
                            .with_message("previous 'get' clause is here")
                            .with_label(previous_span, "here"),
                    );
                    // Forget the previous version.
                    clauses.get = None;
                }

                let mut get_span = self.cursor.current_span();
                let mut colon = get_span;
                if self.cursor.ident_text_is("get") {
                    get_span = self.cursor.advance();
                    if !self.cursor.check(TokenKind::Colon) {
                        self.error_at(
                            ErrorCode::E1053,
                            self.cursor.current_span(),
                            "expected ':' after 'get'",
                        );
                        clauses.invalid = true;
                        break;
                    }
                    colon = self.cursor.advance();
                }

                let accessor = self.parse_accessor_func(
                    get_span,
                    colon,
                    has_container_type,
                    indices,
                    None,
                    element_ty,
                    static_span,
                    &attrs,
                );
                clauses.last_valid = self.arena.decl(accessor).span.end;
                clauses.get = Some(accessor);
                continue;
            }

            // A set clause.
            if let Some(previous) = clauses.set {
                let previous_span = self.arena.decl(previous).span;
                self.emit(
                    Diagnostic::error(ErrorCode::E1052)
                        .with_message("duplicate 'set' clause")
                        .with_label(self.cursor.current_span(), "here"),
                );
                self.emit(
                    Diagnostic::note(ErrorCode::E1052)
                        .with_message("previous 'set' clause is here")
                        .with_label(previous_span, "here"),
                );
                clauses.set = None;
            }

            let set_span = self.cursor.advance(); // 'set'

            // set-name ::= '(' identifier ')'
            let mut set_name: Option<(Name, Span)> = None;
            let mut name_parens: Option<(Span, Span)> = None;
            if self.cursor.check(TokenKind::LParen) {
                let lparen = self.cursor.advance();
                if let TokenKind::Ident(name) = self.cursor.current_kind() {
                    let name_span = self.cursor.advance();
                    set_name = Some((name, name_span));
                    let rparen = self
                        .parse_matching(TokenKind::RParen, ErrorCode::E1055, lparen)
                        .unwrap_or(name_span);
                    name_parens = Some((lparen, rparen));
                } else {
                    self.error_at(
                        ErrorCode::E1054,
                        self.cursor.current_span(),
                        "expected setter parameter name",
                    );
                    crate::recovery::skip_until(
                        &mut self.cursor,
                        crate::TokenSet::new()
                            .with(vela_ir::TokenTag::RParen)
                            .with(vela_ir::TokenTag::LBrace),
                    );
                    self.cursor.consume_if(TokenKind::RParen);
                }
            }

            if !self.cursor.check(TokenKind::Colon) {
                self.error_at(
                    ErrorCode::E1053,
                    self.cursor.current_span(),
                    "expected ':' after 'set'",
                );
                clauses.invalid = true;
                break;
            }
            let colon = self.cursor.advance();

            // The parameter name defaults to 'value' and is implicit.
            let (value_name, value_span, name_implicit) = match set_name {
                Some((name, span)) => (name, span, false),
                None => (self.interner().intern("value"), set_span, true),
            };

            let accessor = self.parse_accessor_func(
                set_span,
                colon,
                has_container_type,
                indices,
                Some((value_name, value_span, name_implicit, name_parens)),
                element_ty,
                static_span,
                &attrs,
            );
            clauses.last_valid = self.arena.decl(accessor).span.end;
            clauses.set = Some(accessor);
        }

        clauses
    }

    /// Build one accessor function declaration and parse its body items.
    ///
    /// `setter_value` carries the setter's parameter name; the implicit
    /// parameter uses the element type. Getters return the element type,
    /// setters return nothing.
    #[allow(clippy::too_many_arguments)]
    fn parse_accessor_func(
        &mut self,
        keyword_span: Span,
        colon: Span,
        has_container_type: bool,
        indices: Option<PatternId>,
        setter_value: Option<(Name, Span, bool, Option<(Span, Span)>)>,
        element_ty: TypeReprId,
        static_span: Option<Span>,
        attrs: &DeclAttributes,
    ) -> DeclId {
        let is_getter = setter_value.is_none();
        let mut params: Vec<PatternId> = Vec::new();

        // Implicit 'self', if inside a container.
        if has_container_type {
            params.push(self.build_implicit_self_parameter(keyword_span));
        }

        // The index clause, for subscripts.
        if let Some(index_pattern) = indices {
            params.push(index_pattern);
        }

        match setter_value {
            None => {
                // Getters take a no-parameters clause.
                params.push(self.empty_tuple_pattern(Span::point(keyword_span.start)));
            }
            Some((name, span, implicit, parens)) => {
                let named = self.alloc_named_pattern(name, span, implicit);
                // The typed pattern is always implicit: the element type is
                // not spelled inside the parameter list.
                let mut typed = Pattern::new(
                    PatternKind::Typed {
                        sub: named,
                        ty: element_ty,
                    },
                    span,
                );
                typed.implicit = true;
                let typed_id = self.arena.alloc_pattern(typed);

                let (lparen, rparen) =
                    parens.unwrap_or((Span::point(span.start), Span::point(span.end)));
                let mut tuple = Pattern::new(
                    PatternKind::Tuple {
                        elements: vec![typed_id],
                        lparen,
                        rparen,
                    },
                    lparen.merge(rparen),
                );
                tuple.implicit = implicit;
                params.push(self.arena.alloc_pattern(tuple));
            }
        }

        let ret = is_getter.then_some(element_ty);

        self.with_scope(ScopeKind::FunctionBody, |p| {
            let mut decl = Decl::new(
                DeclKind::Func {
                    static_span,
                    name: Name::EMPTY,
                    name_span: keyword_span,
                    generics: None,
                    arg_params: params.clone(),
                    body_params: params,
                    ret,
                    selector_style: false,
                    body: FuncBody::None,
                },
                keyword_span,
                p.current_context(),
            );
            if attrs.is_valid() {
                decl.attrs = attrs.clone();
            }
            let decl_id = p.arena.alloc_decl(decl);

            let (body, _status) = p.with_new_context(DeclContextKind::FunctionBody, decl_id, |p| {
                p.parse_accessor_items(colon)
            });

            let end = p.arena.brace_list(body).rbrace;
            {
                let decl = p.arena.decl_mut(decl_id);
                decl.span = keyword_span.merge(end);
                if let DeclKind::Func { body: slot, .. } = &mut decl.kind {
                    *slot = FuncBody::Parsed(body);
                }
            }
            decl_id
        })
    }
}
