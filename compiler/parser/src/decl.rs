//! The declaration grammar: namespaces, usings, attributes, types, members.

use crate::base::{Expectation, Parser, Result, SyntaxError};
use ast::{
    Attribute, AttributeArgument, AttributeTarget, BareArgument, Event, Field, Identifier, Method,
    MethodKind, Modifier, Namespace, Parameter, ParameterDirection, Primitive, Property,
    QualifiedName, SourceFile, TypeDeclaration, TypeKind, TypeRef, Using, UsingTarget,
};
use diagnostics::{Code, Diagnostic};
use lexer::token::{TokenKind, TokenValue};
use span::Span;
use utility::obtain;

impl Parser<'_> {
    /// Parse one buffer into a source file.
    ///
    /// # Grammar
    ///
    /// ```grammar
    /// Source-File ::= Namespace-Body #End-Of-File
    /// ```
    pub(crate) fn parse_source_file(&mut self) -> SourceFile {
        let start = self.span();
        let mut root = Namespace::new(start, None);
        self.parse_namespace_body(true, &mut root);
        root.span = self.span_from(start);

        SourceFile { file: self.file, span: root.span, root }
    }

    /// Parse the inside of a namespace (the whole buffer when `root`).
    ///
    /// # Grammar
    ///
    /// ```grammar
    /// Namespace-Body ::=
    ///     ("extern" "alias" #Identifier ";")*
    ///     Using-Decl*
    ///     (Attributes | Namespace-Decl | Type-Decl)*
    /// ```
    fn parse_namespace_body(&mut self, root: bool, namespace: &mut Namespace) {
        // a leading `extern` only opens an alias directive when the word
        // `alias` follows; otherwise it is a declaration modifier
        while self.token() == TokenKind::Extern
            && self.peek(1).kind == TokenKind::Identifier
            && matches!(&self.peek(1).value, TokenValue::String(name) if name == "alias")
        {
            self.parse_extern_alias(namespace);
        }

        while self.token() == TokenKind::Using {
            self.parse_using(namespace);
        }

        let mut pending_attributes = Vec::new();

        loop {
            match self.token() {
                TokenKind::EndOfFile | TokenKind::EndOfDocument => {
                    if !root {
                        let _ = self.expect(TokenKind::RightBrace);
                    }
                    break;
                }
                TokenKind::RightBrace if !root => break,
                TokenKind::LeftBracket => {
                    let sections = match self.parse_attribute_sections() {
                        Ok(sections) => sections,
                        Err(SyntaxError) => {
                            self.recover_from_bad_declaration();
                            continue;
                        }
                    };
                    for attribute in sections {
                        // assembly-targeted sections are global, the rest
                        // belong to the next declaration
                        if attribute.target == Some(AttributeTarget::Assembly) {
                            namespace.global_attributes.push(attribute);
                        } else {
                            pending_attributes.push(attribute);
                        }
                    }
                }
                TokenKind::Namespace => self.parse_namespace_decl(namespace),
                TokenKind::Using => self.parse_using(namespace),
                kind if kind.is_declaration_keyword()
                    || kind.is_modifier_keyword()
                    || self.at_contextual("partial") =>
                {
                    let attributes = std::mem::take(&mut pending_attributes);
                    match self.parse_type_declaration(attributes) {
                        Ok(declaration) => namespace.types.push(declaration),
                        Err(SyntaxError) => self.recover_from_bad_declaration(),
                    }
                }
                _ => {
                    self.report(Diagnostic::new(Code::CS1022), self.span());
                    self.recover_from_bad_declaration();
                }
            }
        }
    }

    /// ```grammar
    /// Extern-Alias ::= "extern" "alias" #Identifier ";"
    /// ```
    fn parse_extern_alias(&mut self, namespace: &mut Namespace) {
        self.advance(); // `extern`
        self.advance(); // `alias`, guaranteed by the caller

        let result = (|| -> Result<Identifier> {
            let alias = self.parse_identifier()?;
            self.expect(TokenKind::Semicolon)?;
            Ok(alias)
        })();

        match result {
            Ok(alias) => namespace.extern_aliases.push(alias),
            Err(SyntaxError) => self.recover_past_semicolon(),
        }
    }

    /// ```grammar
    /// Using-Decl ::= "using" (#Identifier "=" Type | Qualified-Name) ";"
    /// ```
    fn parse_using(&mut self, namespace: &mut Namespace) {
        let start = self.span();
        self.advance();

        let result = (|| -> Result<UsingTarget> {
            if self.token() == TokenKind::Identifier && self.peek_bare_assign(1) {
                let alias = self.parse_identifier()?;
                self.advance(); // the `=`
                let ty = self.parse_type()?;
                Ok(UsingTarget::Alias { alias, ty })
            } else {
                Ok(UsingTarget::Namespace(self.parse_qualified_name()?))
            }
        })();

        match result {
            Ok(target) => {
                if self.expect(TokenKind::Semicolon).is_err() {
                    self.recover_past_semicolon();
                }
                namespace.usings.push(Using { span: self.span_from(start), target });
            }
            Err(SyntaxError) => self.recover_past_semicolon(),
        }
    }

    /// ```grammar
    /// Namespace-Decl ::= "namespace" Dotted-Identifier "{" Namespace-Body "}"
    /// ```
    fn parse_namespace_decl(&mut self, parent: &mut Namespace) {
        let start = self.span();
        self.advance();

        let name = match self.parse_dotted_identifier() {
            Ok(name) => name,
            Err(SyntaxError) => {
                self.recover_to(&[TokenKind::LeftBrace, TokenKind::RightBrace]);
                if self.token() != TokenKind::LeftBrace {
                    return;
                }
                Identifier::new("", start)
            }
        };

        if self.expect(TokenKind::LeftBrace).is_err() {
            self.recover_from_bad_declaration();
            return;
        }

        let mut namespace = Namespace::new(start, Some(name));
        self.parse_namespace_body(false, &mut namespace);
        if self.token() == TokenKind::RightBrace {
            self.advance();
        }
        namespace.span = self.span_from(start);
        parent.namespaces.push(namespace);
    }

    //
    // Attributes
    //

    /// ```grammar
    /// Attributes ::= ("[" (Attribute-Target ":")? Attribute ("," Attribute)* "]")*
    /// Attribute-Target ::=
    ///     "assembly" | "event" | "field" | "method" | "param"
    ///     | "property" | "return" | "type" | "typevar"
    /// ```
    fn parse_attribute_sections(&mut self) -> Result<Vec<Attribute>> {
        let mut attributes = Vec::new();

        while self.token() == TokenKind::LeftBracket {
            self.advance();

            let mut target = None;
            let mut discard = false;

            if self.peek(1).kind == TokenKind::Colon {
                let word = match self.token() {
                    TokenKind::Identifier => {
                        obtain!(&self.current().value, TokenValue::String(name) => name.clone())
                    }
                    // these target words lex as keywords
                    TokenKind::Event => Some("event".into()),
                    TokenKind::Return => Some("return".into()),
                    _ => None,
                };

                if let Some(word) = word {
                    match AttributeTarget::parse(&word) {
                        Some(known) => target = Some(known),
                        None => {
                            self.report(Diagnostic::new(Code::CS0658).arg(&word), self.span());
                            discard = true;
                        }
                    }
                    self.advance(); // the target word
                    self.advance(); // the colon
                }
            }

            loop {
                let attribute = self.parse_attribute(target)?;
                if !discard {
                    attributes.push(attribute);
                }
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }

            self.expect(TokenKind::RightBracket)?;
        }

        Ok(attributes)
    }

    /// ```grammar
    /// Attribute ::= Type-Name Ctor-Call?
    /// Ctor-Call ::= "(" (Argument ("," Argument)*)? ")"
    /// Argument ::= (#Identifier "=")? Attribute-Argument
    /// ```
    fn parse_attribute(&mut self, target: Option<AttributeTarget>) -> Result<Attribute> {
        let start = self.span();
        let ty = self.parse_type_name()?;

        let mut positional = Vec::new();
        let mut named = Vec::new();

        if self.token() == TokenKind::LeftParen {
            self.advance();

            if self.token() != TokenKind::RightParen {
                loop {
                    if self.token() == TokenKind::Identifier && self.peek_bare_assign(1) {
                        let name = self.parse_identifier()?;
                        self.advance(); // the `=`
                        named.push((name, self.parse_attribute_argument()?));
                    } else {
                        // positional arguments may not follow named ones
                        if !named.is_empty() {
                            self.report(Diagnostic::new(Code::CS1016), self.span());
                        }
                        positional.push(self.parse_attribute_argument()?);
                    }

                    if !self.consume(TokenKind::Comma) {
                        break;
                    }
                }
            }

            self.expect(TokenKind::RightParen)?;
        }

        Ok(Attribute { span: self.span_from(start), target, ty, positional, named })
    }

    /// The constant subset of expressions usable as attribute arguments.
    fn parse_attribute_argument(&mut self) -> Result<AttributeArgument> {
        let start = self.span();

        let bare = match self.token() {
            TokenKind::Literal => {
                let value = self.current().value.clone();
                self.advance();
                BareArgument::Constant(value)
            }
            TokenKind::Minus => {
                self.advance();
                BareArgument::Negative(Box::new(self.parse_attribute_argument()?))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_attribute_argument()?;
                self.expect(TokenKind::RightParen)?;
                inner.bare
            }
            TokenKind::Identifier => BareArgument::Name(self.parse_qualified_name()?),
            _ => {
                self.expected(Expectation::AttributeArgument);
                return self.error();
            }
        };

        Ok(AttributeArgument { span: self.span_from(start), bare })
    }

    /// Keep the attributes whose target fits the declaration at hand,
    /// dropping and reporting the rest.
    fn filter_attributes(
        &mut self,
        attributes: Vec<Attribute>,
        allowed: &[AttributeTarget],
    ) -> Vec<Attribute> {
        attributes
            .into_iter()
            .filter(|attribute| match attribute.target {
                None => true,
                Some(target) if allowed.contains(&target) => true,
                Some(target) => {
                    self.report(Diagnostic::new(Code::CS0657).arg(target), attribute.span);
                    false
                }
            })
            .collect()
    }

    //
    // Type declarations
    //

    /// ```grammar
    /// Type-Decl ::= Modifiers (Class-Decl | Enum-Decl | Delegate-Decl)
    /// Modifiers ::= (Modifier-Keyword | "partial")*
    /// ```
    fn parse_type_declaration(&mut self, attributes: Vec<Attribute>) -> Result<TypeDeclaration> {
        let start = self.span();
        let modifiers = self.parse_modifiers();
        self.parse_type_declaration_body(start, attributes, modifiers)
    }

    fn parse_type_declaration_body(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDeclaration> {
        match self.token() {
            TokenKind::Class | TokenKind::Struct | TokenKind::Interface => {
                self.parse_class_like(start, attributes, modifiers)
            }
            TokenKind::Enum => self.parse_enum(start, attributes, modifiers),
            TokenKind::Delegate => self.parse_delegate(start, attributes, modifiers),
            _ => {
                self.report(Diagnostic::new(Code::CS1518), self.span());
                Err(SyntaxError)
            }
        }
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();

        loop {
            let modifier = match self.token() {
                kind if kind.is_modifier_keyword() => modifier(kind),
                _ if self.at_contextual("partial") => Modifier::Partial,
                _ => break,
            };

            if modifiers.contains(&modifier) {
                self.report(Diagnostic::new(Code::CS1004).arg(modifier), self.span());
            } else {
                modifiers.push(modifier);
            }
            self.advance();
        }

        modifiers
    }

    /// ```grammar
    /// Class-Decl ::=
    ///     ("class" | "struct" | "interface") #Identifier
    ///     (":" Type ("," Type)*)?
    ///     "{" Member* "}"
    /// ```
    fn parse_class_like(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDeclaration> {
        let kind = match self.token() {
            TokenKind::Class => TypeKind::Class,
            TokenKind::Struct => TypeKind::Struct,
            _ => TypeKind::Interface,
        };
        self.advance();

        let name = self.parse_identifier()?;
        let mut declaration = TypeDeclaration::new(start, name, kind);
        declaration.attributes = self.filter_attributes(attributes, &[AttributeTarget::Type]);
        declaration.modifiers = modifiers;

        // generic parameter lists are not part of this grammar
        if self.token() == TokenKind::Less {
            self.report(Diagnostic::new(Code::CS1519).arg(TokenKind::Less), self.span());
            self.recover_to(&[TokenKind::Colon, TokenKind::LeftBrace]);
        }

        if self.consume(TokenKind::Colon) {
            loop {
                declaration.bases.push(self.parse_type()?);
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }

        // constraint clauses are recognized and skipped
        if self.at_contextual("where") {
            self.recover_to(&[TokenKind::LeftBrace]);
        }

        self.expect(TokenKind::LeftBrace)?;

        loop {
            match self.token() {
                TokenKind::RightBrace => {
                    self.advance();
                    break;
                }
                TokenKind::EndOfFile | TokenKind::EndOfDocument => {
                    let _ = self.expect(TokenKind::RightBrace);
                    break;
                }
                _ => self.parse_member(&mut declaration),
            }
        }

        declaration.span = self.span_from(start);
        Ok(declaration)
    }

    /// ```grammar
    /// Enum-Decl ::=
    ///     "enum" #Identifier (":" Type)?
    ///     "{" (Enum-Member ("," Enum-Member)* ","?)? "}"
    /// Enum-Member ::= #Identifier ("=" ⟪unparsed⟫)?
    /// ```
    fn parse_enum(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDeclaration> {
        self.advance();

        let name = self.parse_identifier()?;
        let mut declaration = TypeDeclaration::new(start, name, TypeKind::Enum);
        declaration.attributes = self.filter_attributes(attributes, &[AttributeTarget::Type]);
        declaration.modifiers = modifiers;

        if self.consume(TokenKind::Colon) {
            let base_span = self.span();
            let base = self.parse_type()?;
            match base {
                TypeRef::Primitive(primitive) if primitive.is_integral() => {
                    declaration.bases.push(TypeRef::Primitive(primitive));
                }
                _ => self.report(Diagnostic::new(Code::CS1008), base_span),
            }
        }

        self.expect(TokenKind::LeftBrace)?;

        loop {
            match self.token() {
                TokenKind::RightBrace => {
                    self.advance();
                    break;
                }
                TokenKind::EndOfFile | TokenKind::EndOfDocument => {
                    let _ = self.expect(TokenKind::RightBrace);
                    break;
                }
                _ => {
                    match self.parse_identifier() {
                        Ok(member) => declaration.enum_members.push(member),
                        Err(SyntaxError) => {
                            self.recover_to(&[TokenKind::Comma, TokenKind::RightBrace]);
                        }
                    }
                    if self.at_bare_assign() {
                        // constant initializers are expressions, which this
                        // front end does not parse
                        self.advance();
                        self.recover_to(&[TokenKind::Comma, TokenKind::RightBrace]);
                    }
                    if self.token() == TokenKind::Comma {
                        self.advance();
                    }
                }
            }
        }

        declaration.span = self.span_from(start);
        Ok(declaration)
    }

    /// ```grammar
    /// Delegate-Decl ::= "delegate" Type #Identifier "(" Params ")" ";"
    /// ```
    fn parse_delegate(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDeclaration> {
        self.advance();

        let return_type = self.parse_type()?;
        let name = self.parse_identifier()?;
        let mut declaration = TypeDeclaration::new(start, name, TypeKind::Delegate);
        declaration.attributes = self.filter_attributes(attributes, &[AttributeTarget::Type]);
        declaration.modifiers = modifiers;
        declaration.return_type = Some(return_type);

        if self.parse_parameters().is_err() || self.expect(TokenKind::Semicolon).is_err() {
            self.recover_past_semicolon();
        }

        declaration.span = self.span_from(start);
        Ok(declaration)
    }

    //
    // Members
    //

    /// Parse one member of a class, struct, or interface, disambiguating on
    /// the tokens following the modifiers: `~` opens a destructor, a bare
    /// name followed by `(` a constructor, everything else starts with a
    /// type.
    fn parse_member(&mut self, declaration: &mut TypeDeclaration) {
        let start = self.span();
        let attributes = match self.parse_attribute_sections() {
            Ok(attributes) => attributes,
            Err(SyntaxError) => {
                self.recover_from_bad_declaration();
                return;
            }
        };
        let modifiers = self.parse_modifiers();
        let in_interface = declaration.kind == TypeKind::Interface;

        match self.token() {
            kind if kind.is_declaration_keyword() => {
                match self.parse_type_declaration_body(start, attributes, modifiers) {
                    Ok(nested) => {
                        if in_interface {
                            self.report(
                                Diagnostic::new(Code::CS0524).arg(&nested.name.name),
                                nested.name.span,
                            );
                        }
                        declaration.nested_types.push(nested);
                    }
                    Err(SyntaxError) => self.recover_from_bad_declaration(),
                }
            }
            TokenKind::Event => {
                let result = (|| -> Result<Event> {
                    self.advance();
                    let ty = self.parse_type()?;
                    let name = self.parse_identifier()?;
                    if self.token() == TokenKind::LeftBrace {
                        // accessor blocks are skipped like method bodies
                        self.skip_balanced_block();
                    } else if self.expect(TokenKind::Semicolon).is_err() {
                        self.recover_past_semicolon();
                    }
                    Ok(Event {
                        span: self.span_from(start),
                        attributes: Vec::new(),
                        modifiers: Vec::new(),
                        ty,
                        name,
                    })
                })();

                match result {
                    Ok(mut event) => {
                        event.attributes = self.filter_attributes(
                            attributes,
                            &[AttributeTarget::Event, AttributeTarget::Field, AttributeTarget::Method],
                        );
                        event.modifiers = modifiers;
                        declaration.events.push(event);
                    }
                    Err(SyntaxError) => self.recover_from_bad_declaration(),
                }
            }
            TokenKind::Tilde => {
                let tilde = self.span();
                self.advance();
                if declaration.kind != TypeKind::Class {
                    self.report(Diagnostic::new(Code::CS0575), tilde);
                }

                let result = (|| -> Result<Method> {
                    let name = self.parse_identifier()?;
                    self.expect(TokenKind::LeftParen)?;
                    self.expect(TokenKind::RightParen)?;
                    self.finish_body()?;
                    Ok(Method {
                        span: self.span_from(start),
                        attributes: Vec::new(),
                        modifiers: Vec::new(),
                        kind: MethodKind::Destructor,
                        return_type: None,
                        name,
                        parameters: Vec::new(),
                    })
                })();

                match result {
                    Ok(mut method) => {
                        method.attributes =
                            self.filter_attributes(attributes, &[AttributeTarget::Method]);
                        method.modifiers = modifiers;
                        declaration.methods.push(method);
                    }
                    Err(SyntaxError) => self.recover_from_bad_declaration(),
                }
            }
            TokenKind::Identifier if self.peek(1).kind == TokenKind::LeftParen => {
                if in_interface {
                    self.report(Diagnostic::new(Code::CS0526), self.span());
                }

                let result = (|| -> Result<Method> {
                    let name = self.parse_identifier()?;
                    let parameters = self.parse_parameters()?;
                    self.finish_body()?;
                    Ok(Method {
                        span: self.span_from(start),
                        attributes: Vec::new(),
                        modifiers: Vec::new(),
                        kind: MethodKind::Constructor,
                        return_type: None,
                        name,
                        parameters,
                    })
                })();

                match result {
                    Ok(mut method) => {
                        method.attributes =
                            self.filter_attributes(attributes, &[AttributeTarget::Method]);
                        method.modifiers = modifiers;
                        declaration.methods.push(method);
                    }
                    Err(SyntaxError) => self.recover_from_bad_declaration(),
                }
            }
            _ => {
                let ty = match self.parse_type() {
                    Ok(ty) => ty,
                    Err(SyntaxError) => {
                        self.recover_from_bad_declaration();
                        return;
                    }
                };

                self.parse_typed_member(declaration, start, attributes, modifiers, ty);
            }
        }
    }

    /// Everything after `Attributes Modifiers Type`: a field, a property or
    /// indexer, or a method.
    fn parse_typed_member(
        &mut self,
        declaration: &mut TypeDeclaration,
        start: Span,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        ty: TypeRef,
    ) {
        let in_interface = declaration.kind == TypeKind::Interface;

        // `Type Name ;` or `Type Name = …` is a field
        if self.token() == TokenKind::Identifier
            && (self.peek(1).kind == TokenKind::Semicolon || self.peek_bare_assign(1))
        {
            if in_interface {
                self.report(Diagnostic::new(Code::CS0525), self.span());
            }

            let name = self.parse_identifier().expect("guarded by the lookahead");
            if self.at_bare_assign() {
                // field initializers are expressions, which this front end
                // does not parse
                self.advance();
                self.recover_to(&[TokenKind::Semicolon, TokenKind::RightBrace]);
            }
            if self.token() == TokenKind::Semicolon {
                self.advance();
            }

            declaration.fields.push(Field {
                span: self.span_from(start),
                attributes: self.filter_attributes(attributes, &[AttributeTarget::Field]),
                modifiers,
                ty,
                name,
            });
            return;
        }

        // indexers are named `this`
        if self.token() == TokenKind::This {
            let name = Identifier::new("this", self.span());
            self.advance();
            if self.expect(TokenKind::LeftBracket).is_ok() {
                self.recover_to(&[
                    TokenKind::RightBracket,
                    TokenKind::LeftBrace,
                    TokenKind::RightBrace,
                ]);
                if self.token() == TokenKind::RightBracket {
                    self.advance();
                }
            }
            if self.token() == TokenKind::LeftBrace {
                self.skip_balanced_block();
            }

            declaration.properties.push(Property {
                span: self.span_from(start),
                attributes: self.filter_attributes(attributes, &[AttributeTarget::Property]),
                modifiers,
                ty,
                name,
                is_indexer: true,
            });
            return;
        }

        let name = match self.parse_dotted_identifier() {
            Ok(name) => name,
            Err(SyntaxError) => {
                self.recover_from_bad_declaration();
                return;
            }
        };

        match self.token() {
            TokenKind::LeftParen => {
                let result = (|| -> Result<Vec<Parameter>> {
                    let parameters = self.parse_parameters()?;
                    self.finish_body()?;
                    Ok(parameters)
                })();

                match result {
                    Ok(parameters) => declaration.methods.push(Method {
                        span: self.span_from(start),
                        attributes: self.filter_attributes(
                            attributes,
                            &[AttributeTarget::Method, AttributeTarget::Return],
                        ),
                        modifiers,
                        kind: MethodKind::Ordinary,
                        return_type: Some(ty),
                        name,
                        parameters,
                    }),
                    Err(SyntaxError) => self.recover_from_bad_declaration(),
                }
            }
            TokenKind::LeftBrace => {
                self.skip_balanced_block();
                declaration.properties.push(Property {
                    span: self.span_from(start),
                    attributes: self.filter_attributes(attributes, &[AttributeTarget::Property]),
                    modifiers,
                    ty,
                    name,
                    is_indexer: false,
                });
            }
            kind => {
                self.report(Diagnostic::new(Code::CS1519).arg(kind), self.span());
                self.recover_from_bad_declaration();
            }
        }
    }

    /// A member body: a balanced block or a plain `;`.
    fn finish_body(&mut self) -> Result<()> {
        if self.token() == TokenKind::LeftBrace {
            self.skip_balanced_block();
            Ok(())
        } else {
            self.expect(TokenKind::Semicolon).map(drop)
        }
    }

    /// ```grammar
    /// Params ::= "(" (Param ("," Param)*)? ")"
    /// Param ::= ("ref" | "out" | "params")? Type #Identifier
    /// ```
    fn parse_parameters(&mut self) -> Result<Vec<Parameter>> {
        self.expect(TokenKind::LeftParen)?;
        let mut parameters = Vec::new();

        if self.token() != TokenKind::RightParen {
            loop {
                let start = self.span();
                let direction = match self.token() {
                    TokenKind::Ref => {
                        self.advance();
                        ParameterDirection::Ref
                    }
                    TokenKind::Out => {
                        self.advance();
                        ParameterDirection::Out
                    }
                    TokenKind::Params => {
                        self.advance();
                        ParameterDirection::Params
                    }
                    _ => ParameterDirection::Value,
                };

                let mut ty = self.parse_type()?;
                if matches!(direction, ParameterDirection::Ref | ParameterDirection::Out) {
                    ty = TypeRef::reference(ty);
                }
                let name = self.parse_identifier()?;

                parameters.push(Parameter { span: self.span_from(start), direction, ty, name });

                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen)?;
        Ok(parameters)
    }

    //
    // Types and names
    //

    /// ```grammar
    /// Type ::= Type-Name "?"? "*"* ("[" ","* "]")?
    /// ```
    pub(crate) fn parse_type(&mut self) -> Result<TypeRef> {
        let mut ty = self.parse_type_name()?;

        if self.consume(TokenKind::Question) {
            ty = TypeRef::nullable(ty);
        }
        while self.consume(TokenKind::Star) {
            ty = TypeRef::pointer(ty);
        }
        if self.token() == TokenKind::LeftBracket {
            self.advance();
            let mut rank = 1;
            while self.consume(TokenKind::Comma) {
                rank += 1;
            }
            self.expect(TokenKind::RightBracket)?;
            ty = TypeRef::array(ty, rank);
        }

        Ok(ty)
    }

    /// ```grammar
    /// Type-Name ::= Type-Keyword | (#Identifier "::")? #Identifier ("." #Identifier)*
    /// ```
    fn parse_type_name(&mut self) -> Result<TypeRef> {
        if self.token().is_type_keyword() {
            let primitive = primitive(self.token());
            self.advance();
            return Ok(TypeRef::Primitive(primitive));
        }

        if self.token() != TokenKind::Identifier {
            self.expected(Expectation::Type);
            return self.error();
        }

        let name = self.parse_qualified_name()?;

        // trailing segments read as nested type references
        let mut segments = name.segments.into_iter();
        let first = segments.next().expect("qualified names are never empty");
        let mut ty = TypeRef::Unresolved(QualifiedName {
            qualifier: name.qualifier,
            segments: vec![first],
        });
        for segment in segments {
            ty = TypeRef::nested(ty, segment);
        }

        Ok(ty)
    }

    /// ```grammar
    /// Qualified-Name ::= (#Identifier "::")? #Identifier ("." #Identifier)*
    /// ```
    fn parse_qualified_name(&mut self) -> Result<QualifiedName> {
        let mut qualifier = None;
        let mut first = self.parse_identifier()?;

        if self.token() == TokenKind::ColonColon {
            self.advance();
            qualifier = Some(first);
            first = self.parse_identifier()?;
        }

        let mut segments = vec![first];
        while self.token() == TokenKind::Period && self.peek(1).kind == TokenKind::Identifier {
            self.advance();
            segments.push(self.parse_identifier()?);
        }

        Ok(QualifiedName { qualifier, segments })
    }

    /// A dotted name collapsed into a single (compound) identifier.
    fn parse_dotted_identifier(&mut self) -> Result<Identifier> {
        let mut identifier = self.parse_identifier()?;

        while self.token() == TokenKind::Period && self.peek(1).kind == TokenKind::Identifier {
            self.advance();
            let segment = self.parse_identifier()?;
            identifier.name.push('.');
            identifier.name.push_str(&segment.name);
            identifier.span = identifier.span.merge(segment.span);
        }

        Ok(identifier)
    }

    fn parse_identifier(&mut self) -> Result<Identifier> {
        match self.token() {
            TokenKind::Identifier => {
                let name = obtain!(&self.current().value, TokenValue::String(name) => name.clone())
                    .expect("identifier tokens carry their text");
                let span = self.span();
                self.advance();
                Ok(Identifier::new(name, span))
            }
            keyword if keyword.is_keyword() => {
                // recover by using the keyword as the identifier
                self.report(Diagnostic::new(Code::CS1041).arg(keyword), self.span());
                let span = self.span();
                let name = keyword.to_string();
                self.advance();
                Ok(Identifier::new(name, span))
            }
            _ => {
                self.expected(TokenKind::Identifier);
                self.error()
            }
        }
    }

    /// Whether the current token is the given contextual (non-reserved)
    /// word.
    fn at_contextual(&self, word: &str) -> bool {
        self.token() == TokenKind::Identifier
            && matches!(&self.current().value, TokenValue::String(name) if name == word)
    }

    /// Whether the token `amount` ahead is the bare `=`.
    fn peek_bare_assign(&self, amount: usize) -> bool {
        let token = self.peek(amount);
        token.kind == TokenKind::OpAssign
            && token.value == TokenValue::Operator(TokenKind::Equals)
    }

    /// Skip to and past the next `;`, stopping short of `}` and the end of
    /// the buffer.
    fn recover_past_semicolon(&mut self) {
        self.recover_to(&[TokenKind::Semicolon, TokenKind::RightBrace]);
        if self.token() == TokenKind::Semicolon {
            self.advance();
        }
    }
}

fn modifier(kind: TokenKind) -> Modifier {
    match kind {
        TokenKind::Abstract => Modifier::Abstract,
        TokenKind::Const => Modifier::Const,
        TokenKind::Extern => Modifier::Extern,
        TokenKind::Internal => Modifier::Internal,
        TokenKind::New => Modifier::New,
        TokenKind::Override => Modifier::Override,
        TokenKind::Private => Modifier::Private,
        TokenKind::Protected => Modifier::Protected,
        TokenKind::Public => Modifier::Public,
        TokenKind::Readonly => Modifier::Readonly,
        TokenKind::Sealed => Modifier::Sealed,
        TokenKind::Static => Modifier::Static,
        TokenKind::Unsafe => Modifier::Unsafe,
        TokenKind::Virtual => Modifier::Virtual,
        TokenKind::Volatile => Modifier::Volatile,
        _ => unreachable!("not a modifier keyword"),
    }
}

fn primitive(kind: TokenKind) -> Primitive {
    match kind {
        TokenKind::Bool => Primitive::Bool,
        TokenKind::Byte => Primitive::Byte,
        TokenKind::Char => Primitive::Char,
        TokenKind::Decimal => Primitive::Decimal,
        TokenKind::Double => Primitive::Double,
        TokenKind::Float => Primitive::Float,
        TokenKind::Int => Primitive::Int,
        TokenKind::Long => Primitive::Long,
        TokenKind::Object => Primitive::Object,
        TokenKind::Sbyte => Primitive::Sbyte,
        TokenKind::Short => Primitive::Short,
        TokenKind::String => Primitive::String,
        TokenKind::Uint => Primitive::Uint,
        TokenKind::Ulong => Primitive::Ulong,
        TokenKind::Ushort => Primitive::Ushort,
        TokenKind::Void => Primitive::Void,
        _ => unreachable!("not a type keyword"),
    }
}
