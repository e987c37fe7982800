use crate::{parse_expression, parse_program, ExpressionsUnsupported};
use ast::{
    BareArgument, MethodKind, Modifier, ParameterDirection, Primitive, SourceFile, TypeKind,
    TypeRef, UsingTarget,
};
use diagnostics::Code;
use session::Compiler;
use span::SourceMap;

fn parse(source: &str) -> (Vec<SourceFile>, Vec<Code>) {
    let mut map = SourceMap::default();
    map.add("test.cs", source);
    let compiler = Compiler::default();
    let files = parse_program(&map, &compiler);
    let codes = compiler.messages().messages().iter().map(|message| message.code).collect();
    (files, codes)
}

#[track_caller]
fn parse_clean(source: &str) -> SourceFile {
    let (mut files, codes) = parse(source);
    assert_eq!(codes, [], "expected a clean parse");
    assert_eq!(files.len(), 1);
    files.remove(0)
}

#[test]
fn empty_buffer_yields_an_anonymous_root() {
    let file = parse_clean("");
    assert_eq!(file.root.name, None);
    assert!(file.root.usings.is_empty());
    assert!(file.root.types.is_empty());
}

#[test]
fn using_directives() {
    let file = parse_clean("using System;\nusing IO = System.IO;\nusing Sys = int;");
    assert_eq!(file.root.usings.len(), 3);

    match &file.root.usings[0].target {
        UsingTarget::Namespace(name) => assert_eq!(name.to_string(), "System"),
        target => panic!("not a namespace using: {target:?}"),
    }
    match &file.root.usings[1].target {
        UsingTarget::Alias { alias, ty } => {
            assert_eq!(alias.name, "IO");
            assert_eq!(ty.to_string(), "System.IO");
        }
        target => panic!("not an alias using: {target:?}"),
    }
    match &file.root.usings[2].target {
        UsingTarget::Alias { ty, .. } => assert_eq!(ty, &TypeRef::Primitive(Primitive::Int)),
        target => panic!("not an alias using: {target:?}"),
    }
}

#[test]
fn extern_aliases_come_first() {
    let file = parse_clean("extern alias corlib;\nclass C { }");
    assert_eq!(file.root.extern_aliases.len(), 1);
    assert_eq!(file.root.extern_aliases[0].name, "corlib");
    assert_eq!(file.root.types.len(), 1);
}

#[test]
fn nested_namespaces_with_dotted_names() {
    let file = parse_clean("namespace A.B {\n    namespace C { class D { } }\n}");
    let outer = &file.root.namespaces[0];
    assert_eq!(outer.name.as_ref().unwrap().name, "A.B");
    let inner = &outer.namespaces[0];
    assert_eq!(inner.name.as_ref().unwrap().name, "C");
    assert_eq!(inner.types[0].name.name, "D");
}

#[test]
fn class_header() {
    let file = parse_clean("public sealed partial class C : Base, IFace { }");
    let class = &file.root.types[0];
    assert_eq!(class.kind, TypeKind::Class);
    assert_eq!(class.name.name, "C");
    assert_eq!(class.modifiers, [Modifier::Public, Modifier::Sealed, Modifier::Partial]);
    assert_eq!(
        class.bases.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["Base", "IFace"],
    );
}

#[test]
fn duplicate_modifiers_are_reported_once_each() {
    let (files, codes) = parse("public public class C { }");
    assert_eq!(codes, [Code::CS1004]);
    // the declaration itself survives
    assert_eq!(files[0].root.types[0].modifiers, [Modifier::Public]);
}

#[test]
fn members_of_a_class() {
    let file = parse_clean(
        "class C {
            int x;
            string Name { get { return null; } }
            C() { }
            ~C() { }
            void M(int a, ref bool b, out char c, params object[] rest) { }
            event Handler Changed;
            int this[int i] { get { } }
            class Nested { }
        }",
    );

    let class = &file.root.types[0];
    assert_eq!(class.fields.len(), 1);
    assert_eq!(class.fields[0].name.name, "x");
    assert_eq!(class.fields[0].ty, TypeRef::Primitive(Primitive::Int));

    assert_eq!(class.properties.len(), 2);
    assert_eq!(class.properties[0].name.name, "Name");
    assert!(!class.properties[0].is_indexer);
    assert_eq!(class.properties[1].name.name, "this");
    assert!(class.properties[1].is_indexer);

    assert_eq!(class.methods.len(), 3);
    assert_eq!(class.methods[0].kind, MethodKind::Constructor);
    assert_eq!(class.methods[1].kind, MethodKind::Destructor);
    let method = &class.methods[2];
    assert_eq!(method.kind, MethodKind::Ordinary);
    assert_eq!(method.return_type, Some(TypeRef::Primitive(Primitive::Void)));
    assert_eq!(method.parameters.len(), 4);
    assert_eq!(method.parameters[0].direction, ParameterDirection::Value);
    assert_eq!(method.parameters[1].direction, ParameterDirection::Ref);
    assert_eq!(method.parameters[1].ty.to_string(), "bool&");
    assert_eq!(method.parameters[2].direction, ParameterDirection::Out);
    assert_eq!(method.parameters[3].direction, ParameterDirection::Params);

    assert_eq!(class.events.len(), 1);
    assert_eq!(class.events[0].name.name, "Changed");
    assert_eq!(class.nested_types.len(), 1);
}

#[test]
fn field_initializers_are_skipped() {
    let (files, codes) = parse("class C { int x = 1 + 2; }");
    assert_eq!(codes, []);
    assert_eq!(files[0].root.types[0].fields[0].name.name, "x");
}

#[test]
fn interface_restrictions() {
    let (_, codes) = parse(
        "interface I {
            int F();
            int x;
            I();
            class N { }
        }",
    );
    assert_eq!(codes, [Code::CS0525, Code::CS0526, Code::CS0524]);
}

#[test]
fn destructors_only_in_classes() {
    let (_, codes) = parse("struct S { ~S() { } }");
    assert_eq!(codes, [Code::CS0575]);
}

#[test]
fn explicit_interface_member_names_are_dotted() {
    let file = parse_clean("class C { void IFace.M() { } }");
    assert_eq!(file.root.types[0].methods[0].name.name, "IFace.M");
}

#[test]
fn enum_declaration() {
    let file = parse_clean("enum E : byte { A, B = 3, C, }");
    let declaration = &file.root.types[0];
    assert_eq!(declaration.kind, TypeKind::Enum);
    assert_eq!(declaration.bases, [TypeRef::Primitive(Primitive::Byte)]);
    assert_eq!(
        declaration.enum_members.iter().map(|member| member.name.as_str()).collect::<Vec<_>>(),
        ["A", "B", "C"],
    );
}

#[test]
fn enum_base_must_be_integral() {
    let (_, codes) = parse("enum E : string { A }");
    assert_eq!(codes, [Code::CS1008]);
}

#[test]
fn delegate_declaration() {
    let file = parse_clean("delegate int Op(int left, int right);");
    let declaration = &file.root.types[0];
    assert_eq!(declaration.kind, TypeKind::Delegate);
    assert_eq!(declaration.return_type, Some(TypeRef::Primitive(Primitive::Int)));
}

#[test]
fn type_shapes() {
    let file = parse_clean(
        "class C {
            int[] a;
            uint[,,] b;
            char* p;
            byte? n;
            A.B.C d;
            corlib::T e;
        }",
    );

    let types: Vec<_> =
        file.root.types[0].fields.iter().map(|field| field.ty.to_string()).collect();
    assert_eq!(types, ["int[]", "uint[,,]", "char*", "byte?", "A.B.C", "corlib::T"]);
}

#[test]
fn attributes_global_and_local() {
    let file = parse_clean("[assembly: Corp.Meta(\"info\")]\n[Serializable]\nclass C { }");
    assert_eq!(file.root.global_attributes.len(), 1);
    assert_eq!(file.root.global_attributes[0].ty.to_string(), "Corp.Meta");

    let class = &file.root.types[0];
    assert_eq!(class.attributes.len(), 1);
    assert_eq!(class.attributes[0].ty.to_string(), "Serializable");
}

#[test]
fn attribute_arguments() {
    let file = parse_clean("[Meta(1, -2, Names.Deep, Label = \"x\")]\nclass C { }");
    let attribute = &file.root.types[0].attributes[0];
    assert_eq!(attribute.positional.len(), 3);
    assert!(matches!(attribute.positional[1].bare, BareArgument::Negative(_)));
    assert_eq!(attribute.named.len(), 1);
    assert_eq!(attribute.named[0].0.name, "Label");
}

#[test]
fn positional_after_named_argument() {
    let (_, codes) = parse("[Meta(Label = 1, 2)]\nclass C { }");
    assert_eq!(codes, [Code::CS1016]);
}

#[test]
fn unknown_attribute_target_discards_the_section() {
    let (files, codes) = parse("[frob: Meta]\nclass C { }");
    assert_eq!(codes, [Code::CS0658]);
    assert!(files[0].root.types[0].attributes.is_empty());
}

#[test]
fn invalid_attribute_target_drops_the_attribute() {
    let (files, codes) = parse("[param: Meta]\nclass C { }");
    assert_eq!(codes, [Code::CS0657]);
    assert!(files[0].root.types[0].attributes.is_empty());
}

#[test]
fn missing_semicolon_after_using() {
    let (_, codes) = parse("using System\nclass C { }");
    assert!(codes.contains(&Code::CS1002));
}

#[test]
fn stray_token_at_namespace_level() {
    let (_, codes) = parse("42 class C { }");
    assert!(codes.contains(&Code::CS1022));
}

#[test]
fn bad_member_recovers_and_continues() {
    let (files, codes) = parse("class C { int ; void M() { } }");
    assert_eq!(codes, [Code::CS1001]);
    assert_eq!(files[0].root.types[0].methods.len(), 1);
}

#[test]
fn keyword_where_an_identifier_belongs() {
    let (files, codes) = parse("class class { }");
    assert_eq!(codes, [Code::CS1041]);
    assert_eq!(files[0].root.types[0].name.name, "class");
}

#[test]
fn doc_comments_attach_silently_to_declarations() {
    let (_, codes) = parse("/// <summary>good</summary>\nclass C { }");
    assert_eq!(codes, []);
}

#[test]
fn dangling_doc_comment_is_misplaced() {
    let (_, codes) = parse("class C { }\n/// dangling");
    assert_eq!(codes, [Code::CS1587]);
}

#[test]
fn preprocessor_state_flows_into_parsing() {
    let (files, codes) = parse("#if NEVER\nclass Hidden { }\n#endif\nclass Shown { }");
    assert_eq!(codes, []);
    let names: Vec<_> =
        files[0].root.types.iter().map(|declaration| declaration.name.name.as_str()).collect();
    assert_eq!(names, ["Shown"]);
}

#[test]
fn program_with_multiple_buffers() {
    let mut map = SourceMap::default();
    let one = map.add("one.cs", "class A { }");
    let two = map.add("two.cs", "class B { }");
    let compiler = Compiler::default();

    let files = parse_program(&map, &compiler);
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file, one);
    assert_eq!(files[1].file, two);
    assert_eq!(files[0].root.types[0].name.name, "A");
    assert_eq!(files[1].root.types[0].name.name, "B");
    assert!(!compiler.has_errors());
}

#[test]
fn expression_parsing_is_a_documented_sentinel() {
    assert_eq!(parse_expression(&[]), Err(ExpressionsUnsupported));
}
