//! Nominal type declaration parsing: enum, struct, class, protocol, and
//! enum `case` lists.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Decl, DeclContextKind, DeclKind, GenericParams};
use vela_ir::{DeclId, Name, Span, TokenKind, TokenTag, TypeReprId};

use crate::recovery::TokenSet;
use crate::{DeclParseFlags, Parser, ParserResult, ParserStatus, ScopeKind};

/// The parts shared by enum/struct/class declarations.
struct NominalHead {
    keyword_span: Span,
    name: Name,
    name_span: Span,
    generics: Option<GenericParams>,
    status: ParserStatus,
}

impl Parser<'_> {
    /// Parse the common head of an enum/struct/class declaration: keyword,
    /// name (with keyword recovery), and optional generic parameters.
    fn parse_nominal_head(&mut self, what: &'static str) -> Option<NominalHead> {
        let keyword_span = self.cursor.advance();

        let name_result = self.parse_identifier_decl_name(
            TokenSet::new().with(TokenTag::Colon).with(TokenTag::LBrace),
            true,
            Some((ErrorCode::E1002, what)),
        );
        let (name, name_span) = name_result.get()?;
        let mut status = name_result.status();

        let generics = self.with_scope(ScopeKind::Generics, |p| {
            let (generics, generics_status) = p.maybe_parse_generic_params();
            status |= generics_status;
            generics
        });

        Some(NominalHead {
            keyword_span,
            name,
            name_span,
            generics,
            status,
        })
    }

    /// Parse the shared tail: inheritance, `{ member* }`, registration.
    #[allow(clippy::too_many_arguments)]
    fn finish_nominal_decl(
        &mut self,
        head: NominalHead,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
        member_flags: DeclParseFlags,
        scope: ScopeKind,
        what: &'static str,
        make: impl FnOnce(Name, Span, Option<GenericParams>, Vec<TypeReprId>, Vec<DeclId>, (Span, Span)) -> DeclKind,
    ) -> ParserResult<DeclId> {
        let NominalHead {
            keyword_span,
            name,
            name_span,
            generics,
            mut status,
        } = head;

        // Allocate the declaration up front so the inheritance clause and
        // member list parse within its context.
        let placeholder = make(
            name,
            name_span,
            generics,
            Vec::new(),
            Vec::new(),
            (keyword_span, keyword_span),
        );
        let mut decl = Decl::new(placeholder, keyword_span, self.current_context());
        if attrs.is_valid() {
            decl.attrs = attrs.clone();
        }
        let decl_id = self.arena.alloc_decl(decl);
        self.set_local_discriminator(decl_id);

        // Inheritance clause, in the context of the new type.
        let mut inherited = Vec::new();
        if self.cursor.check(TokenKind::Colon) {
            let inherit_status = self.with_new_context(DeclContextKind::NominalType, decl_id, |p| {
                p.parse_inheritance(&mut inherited)
            });
            status |= inherit_status;
        }

        let mut members = Vec::new();
        let braces;
        match self.consume_expected(TokenKind::LBrace, ErrorCode::E1045) {
            None => {
                let here = self.cursor.current_span();
                braces = (here, here);
                status.set_is_parse_error();
            }
            Some(lbrace) => {
                let (rbrace, body_error) =
                    self.with_new_context(DeclContextKind::NominalType, decl_id, |p| {
                        p.with_scope(scope, |p| {
                            p.parse_nominal_members(&mut members, member_flags, lbrace, what)
                        })
                    });
                braces = (lbrace, rbrace);
                if body_error {
                    status.set_is_parse_error();
                }
            }
        }

        {
            let decl = self.arena.decl_mut(decl_id);
            match &mut decl.kind {
                DeclKind::Enum {
                    inherited: inh,
                    members: mem,
                    braces: br,
                    ..
                }
                | DeclKind::Struct {
                    inherited: inh,
                    members: mem,
                    braces: br,
                    ..
                }
                | DeclKind::Class {
                    inherited: inh,
                    members: mem,
                    braces: br,
                    ..
                } => {
                    *inh = inherited;
                    *mem = members;
                    *br = braces;
                }
                _ => {}
            }
            decl.span = keyword_span.merge(braces.1);
        }

        if flags.has(DeclParseFlags::DISALLOW_NOMINAL_TYPES) {
            self.error_at(
                ErrorCode::E1070,
                keyword_span,
                "type declaration is not allowed here",
            );
            status.set_is_parse_error();
        }

        ParserResult::with_status(status, Some(decl_id))
    }

    /// Parse an `enum` declaration.
    ///
    /// \verbatim
    ///   decl-enum:
    ///     'enum' attribute-list identifier generic-params? inheritance?
    ///         '{' decl-enum-body '}'
    /// \endverbatim
    pub(crate) fn parse_decl_enum(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let Some(head) = self.parse_nominal_head("enum") else {
            return ParserResult::error();
        };
        self.finish_nominal_decl(
            head,
            flags,
            attrs,
            DeclParseFlags::HAS_CONTAINER_TYPE
                .with(DeclParseFlags::ALLOW_ENUM_ELEMENT)
                .with(DeclParseFlags::DISALLOW_STORED_INSTANCE_VAR),
            ScopeKind::EnumBody,
            "enum",
            |name, name_span, generics, inherited, members, braces| DeclKind::Enum {
                name,
                name_span,
                generics,
                inherited,
                members,
                braces,
            },
        )
    }

    /// Parse a `struct` declaration.
    pub(crate) fn parse_decl_struct(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let Some(head) = self.parse_nominal_head("struct") else {
            return ParserResult::error();
        };
        self.finish_nominal_decl(
            head,
            flags,
            attrs,
            DeclParseFlags::HAS_CONTAINER_TYPE,
            ScopeKind::StructBody,
            "struct",
            |name, name_span, generics, inherited, members, braces| DeclKind::Struct {
                name,
                name_span,
                generics,
                inherited,
                members,
                braces,
            },
        )
    }

    /// Parse a `class` declaration. Class bodies permit destructors.
    pub(crate) fn parse_decl_class(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let Some(head) = self.parse_nominal_head("class") else {
            return ParserResult::error();
        };
        self.finish_nominal_decl(
            head,
            flags,
            attrs,
            DeclParseFlags::HAS_CONTAINER_TYPE.with(DeclParseFlags::ALLOW_DESTRUCTOR),
            ScopeKind::ClassBody,
            "class",
            |name, name_span, generics, inherited, members, braces| DeclKind::Class {
                name,
                name_span,
                generics,
                inherited,
                members,
                braces,
            },
        )
    }

    /// Parse a `protocol` declaration.
    ///
    /// \verbatim
    ///   decl-protocol:
    ///     'protocol' attribute-list identifier inheritance?
    ///         '{' protocol-member* '}'
    /// \endverbatim
    pub(crate) fn parse_decl_protocol(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
    ) -> ParserResult<DeclId> {
        let protocol_span = self.cursor.advance(); // 'protocol'

        let name_result = self.parse_identifier_decl_name(
            TokenSet::new().with(TokenTag::Colon).with(TokenTag::LBrace),
            false,
            Some((ErrorCode::E1002, "protocol")),
        );
        let Some((name, name_span)) = name_result.get() else {
            return ParserResult::error();
        };
        let mut status = name_result.status();

        let mut inherited = Vec::new();
        if self.cursor.check(TokenKind::Colon) {
            status |= self.parse_inheritance(&mut inherited);
        }

        let mut decl = Decl::new(
            DeclKind::Protocol {
                name,
                name_span,
                inherited,
                members: Vec::new(),
                braces: (protocol_span, protocol_span),
            },
            protocol_span,
            self.current_context(),
        );
        if attrs.is_valid() {
            decl.attrs = attrs.clone();
        }
        let decl_id = self.arena.alloc_decl(decl);
        // No discriminator: protocols cannot appear in local contexts.

        let mut members = Vec::new();
        let braces;
        match self.consume_expected(TokenKind::LBrace, ErrorCode::E1045) {
            None => {
                let here = self.cursor.current_span();
                braces = (here, here);
                status.set_is_parse_error();
            }
            Some(lbrace) => {
                let member_flags = DeclParseFlags::HAS_CONTAINER_TYPE
                    .with(DeclParseFlags::DISALLOW_COMPUTED_VAR)
                    .with(DeclParseFlags::DISALLOW_FUNC_DEF)
                    .with(DeclParseFlags::DISALLOW_NOMINAL_TYPES)
                    .with(DeclParseFlags::DISALLOW_INIT)
                    .with(DeclParseFlags::DISALLOW_TYPEALIAS_DEF)
                    .with(DeclParseFlags::IN_PROTOCOL)
                    .with(DeclParseFlags::DISALLOW_STORED_INSTANCE_VAR);
                let (rbrace, body_error) =
                    self.with_new_context(DeclContextKind::NominalType, decl_id, |p| {
                        p.with_scope(ScopeKind::ProtocolBody, |p| {
                            p.parse_nominal_members(&mut members, member_flags, lbrace, "protocol")
                        })
                    });
                braces = (lbrace, rbrace);
                if body_error {
                    status.set_is_parse_error();
                }
            }
        }

        {
            let decl = self.arena.decl_mut(decl_id);
            if let DeclKind::Protocol {
                members: mem,
                braces: br,
                ..
            } = &mut decl.kind
            {
                *mem = members;
                *br = braces;
            }
            decl.span = protocol_span.merge(braces.1);
        }

        if flags.has(DeclParseFlags::DISALLOW_NOMINAL_TYPES) {
            self.error_at(
                ErrorCode::E1070,
                protocol_span,
                "type declaration is not allowed here",
            );
            status.set_is_parse_error();
        } else if !flags.has(DeclParseFlags::ALLOW_TOP_LEVEL) {
            self.error_at(
                ErrorCode::E1005,
                protocol_span,
                "declaration is only valid at file scope",
            );
            status.set_is_parse_error();
        }

        ParserResult::with_status(status, Some(decl_id))
    }

    /// Parse a `case` of an enum.
    ///
    /// \verbatim
    ///   enum-case:
    ///     identifier type-tuple? ('=' expr)?
    ///   decl-enum-element:
    ///     'case' attribute-list enum-case (',' enum-case)*
    /// \endverbatim
    pub(crate) fn parse_decl_enum_case(
        &mut self,
        flags: DeclParseFlags,
        attrs: &vela_ir::attr::DeclAttributes,
        entries: &mut Vec<DeclId>,
    ) -> ParserStatus {
        let mut status = ParserStatus::success();
        let case_span = self.cursor.advance(); // 'case'

        let mut elements: Vec<DeclId> = Vec::new();
        let mut comma_span: Option<Span> = None;

        loop {
            let name_is_not_identifier =
                !matches!(self.cursor.current_kind(), TokenKind::Ident(_));

            let name_result = self.parse_identifier_decl_name(
                TokenSet::new()
                    .with(TokenTag::LParen)
                    .with(TokenTag::KwCase)
                    .with(TokenTag::Colon)
                    .with(TokenTag::RBrace),
                false,
                None,
            );
            let (name, name_span) = match name_result.get() {
                Some(pair) => pair,
                None => {
                    // Handle the likely case someone typed 'case X, case Y'.
                    if self.cursor.check(TokenKind::KwCase) && comma_span.is_some() {
                        self.error_at(
                            ErrorCode::E1067,
                            self.cursor.current_span(),
                            "expected identifier after comma in 'case' declaration",
                        );
                        return status;
                    }
                    // For recovery, see if the user spelled a switch-style
                    // 'case' label pattern.
                    let _ = self.parse_pattern();
                    (Name::EMPTY, case_span)
                }
            };

            if name_is_not_identifier {
                if self.cursor.consume_if(TokenKind::Colon).is_some() {
                    self.error_at(
                        ErrorCode::E1066,
                        case_span,
                        "'case' label is only valid inside a switch",
                    );
                    status.set_is_parse_error();
                    return status;
                }
                if comma_span.is_some() {
                    self.error_at(
                        ErrorCode::E1067,
                        self.cursor.current_span(),
                        "expected identifier after comma in 'case' declaration",
                    );
                    return status;
                }
                self.error_at(
                    ErrorCode::E1002,
                    self.cursor.current_span(),
                    "expected identifier in enum case declaration",
                );
            }

            // Associated value tuple.
            let mut arg_type = None;
            if self.cursor.check(TokenKind::LParen) {
                let tuple = self.parse_type_tuple_body();
                if tuple.has_code_completion() {
                    status.set_has_code_completion();
                    return status;
                }
                match tuple.get() {
                    Some(ty) => arg_type = Some(ty),
                    None => {
                        status.set_is_parse_error();
                        return status;
                    }
                }
            }

            // Raw value expression.
            let mut equals = None;
            let mut raw_value = None;
            if self.cursor.check(TokenKind::Equal) {
                equals = Some(self.cursor.advance());
                let value = self.parse_expr(ErrorCode::E1111);
                if value.has_code_completion() {
                    status.set_has_code_completion();
                    return status;
                }
                let Some(expr) = value.get() else {
                    status.set_is_parse_error();
                    return status;
                };
                // The raw value must be syntactically a simple literal.
                let node = self.arena.expr(expr);
                let is_simple_literal = node.is_literal() && !node.is_interpolated_string();
                let node_span = node.span;
                if is_simple_literal {
                    raw_value = Some(expr);
                } else {
                    self.error_at(
                        ErrorCode::E1068,
                        node_span,
                        "enum case raw value must be a literal",
                    );
                }
            }

            // Again reject switch-style labels: 'case X:' or 'case X where'.
            if self.cursor.check(TokenKind::Colon) || self.cursor.ident_text_is("where") {
                self.error_at(
                    ErrorCode::E1066,
                    case_span,
                    "'case' label is only valid inside a switch",
                );
                self.skip_until_decl_rbrace();
                status.set_is_parse_error();
                return status;
            }

            let end = self.cursor.previous_span();
            let mut decl = Decl::new(
                DeclKind::EnumElement {
                    name,
                    name_span,
                    arg_type,
                    equals,
                    raw_value,
                },
                name_span.merge(end),
                self.current_context(),
            );
            if attrs.is_valid() {
                decl.attrs = attrs.clone();
            }
            let element = self.arena.alloc_decl(decl);
            elements.push(element);

            match self.cursor.consume_if(TokenKind::Comma) {
                Some(span) => comma_span = Some(span),
                None => break,
            }
        }

        if !flags.has(DeclParseFlags::ALLOW_ENUM_ELEMENT) {
            self.error_at(
                ErrorCode::E1065,
                case_span,
                "enum 'case' is not allowed outside an enum",
            );
            // Don't register the elements in a context that cannot hold them.
            status.set_is_parse_error();
            return status;
        }

        let end = self.cursor.previous_span();
        let case_decl = self.arena.alloc_decl(Decl::new(
            DeclKind::EnumCase {
                case_span,
                elements: elements.clone(),
            },
            case_span.merge(end),
            self.current_context(),
        ));
        entries.push(case_decl);
        entries.extend_from_slice(&elements);

        status
    }
}
