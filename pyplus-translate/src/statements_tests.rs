// Tests for statement translation and scoping

#[cfg(test)]
mod tests {
    use crate::classifier::{Category, Classifier, ReasonCode};
    use crate::config::{DefaultParamPolicy, TranslatorConfig};
    use crate::errors::SkipRecord;
    use crate::passthrough::PassthroughAnnotator;
    use crate::statements::{translate_function, StatementTranslator};
    use crate::target::{CppBinaryOp, CppComment, CppExpr, CppFunction, CppStmt, ParamType};
    use crate::type_env::{Globals, TypeEnvironment};
    use pretty_assertions::assert_eq;
    use pyplus_common::StaticType;
    use pyplus_frontend::builder::*;
    use pyplus_frontend::{BinaryOp, CompareOp, Statement};

    /// Translate module-level statements one by one against `env`
    fn run(env: &mut TypeEnvironment, stmts: &[Statement]) -> (Vec<CppStmt>, Vec<SkipRecord>) {
        let config = TranslatorConfig::default();
        let mut annotator = PassthroughAnnotator::new();
        let mut lowered = Vec::new();
        for stmt in stmts {
            let mut translator =
                StatementTranslator::new(env, &config, &mut annotator).at_module_level(true);
            lowered.extend(translator.translate(stmt));
        }
        (lowered, annotator.into_records())
    }

    fn skipped(reason: ReasonCode, original: &str) -> CppStmt {
        CppStmt::Comment(CppComment::Skipped {
            reason,
            original: original.to_string(),
        })
    }

    fn print(args: Vec<CppExpr>) -> CppStmt {
        CppStmt::Print(args)
    }

    fn function(def: &Statement, config: &TranslatorConfig) -> (CppFunction, Vec<SkipRecord>) {
        let env = TypeEnvironment::new();
        let signature = Classifier::new(&env, config).check_function_header(def).unwrap();
        let pyplus_frontend::StatementKind::FunctionDef { body, .. } = &def.kind else {
            panic!("Expected function definition");
        };
        let mut annotator = PassthroughAnnotator::new();
        let lowered =
            translate_function(&signature, body, &Globals::default(), config, &mut annotator);
        (lowered, annotator.into_records())
    }

    #[test]
    fn test_type_conflict_keeps_first_binding() {
        let mut env = TypeEnvironment::new();
        let (lowered, records) = run(&mut env, &[assign("x", int(5)), assign("x", float(5.1))]);

        assert_eq!(
            lowered,
            vec![
                CppStmt::Declaration {
                    name: "x".to_string(),
                    decl_type: StaticType::Integer,
                    initializer: CppExpr::int(5),
                },
                skipped(ReasonCode::TypeNarrowing, "x = 5.1"),
            ]
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::TypeNarrowing);
        assert_eq!(records[0].original_text, "x = 5.1");
        assert_eq!(env.resolve("x"), StaticType::Integer);
    }

    #[test]
    fn test_reassignment_of_same_type() {
        let mut env = TypeEnvironment::new();
        let (lowered, records) = run(&mut env, &[assign("v", int(1)), assign("v", int(8))]);
        assert!(records.is_empty());
        assert_eq!(
            lowered[1],
            CppStmt::Assignment {
                name: "v".to_string(),
                value: CppExpr::int(8),
            }
        );
    }

    #[test]
    fn test_chained_assignment_emits_only_a_comment() {
        let mut env = TypeEnvironment::new();
        let stmt = chained_assign(vec![name("x"), name("b")], int(3));
        let (lowered, records) = run(&mut env, &[stmt]);

        assert_eq!(lowered, vec![skipped(ReasonCode::ChainedAssignment, "x = b = 3")]);
        assert_eq!(records.len(), 1);
        assert_eq!(env.lookup("x"), None);
        assert_eq!(env.lookup("b"), None);
    }

    #[test]
    fn test_unused_literal_is_not_emitted() {
        let mut env = TypeEnvironment::new();
        let (lowered, _) = run(&mut env, &[expr_stmt(string("Hi"))]);
        assert_eq!(lowered, vec![skipped(ReasonCode::ValueUnused, "\"Hi\"")]);
    }

    #[test]
    fn test_doc_strings_become_structural_comments() {
        let mut env = TypeEnvironment::new();
        let (lowered, records) = run(&mut env, &[doc_string("\nString\n")]);
        assert_eq!(lowered, vec![CppStmt::Comment(CppComment::Doc(vec!["String".to_string()]))]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_bindings_do_not_escape_blocks() {
        let mut env = TypeEnvironment::new();
        env.bind("x", StaticType::Integer);

        let stmts = vec![
            if_stmt(boolean(true), vec![assign("y", int(1))], vec![]),
            for_stmt("i", call_named("range", vec![int(3)]), vec![assign("inner", string("s"))]),
            assign("z", name("y")),
        ];
        let (lowered, records) = run(&mut env, &stmts);

        assert_eq!(lowered[2], skipped(ReasonCode::NotDirectlyTranslatable, "z = y"));
        assert_eq!(records.len(), 1);
        assert_eq!(env.lookup("y"), None);
        assert_eq!(env.lookup("inner"), None);
        assert_eq!(env.lookup("i"), None);
        assert_eq!(env.resolve("x"), StaticType::Integer);
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn test_inner_assignment_to_outer_variable() {
        let mut env = TypeEnvironment::new();
        env.bind("x", StaticType::Integer);

        let stmt = while_stmt(
            compare(name("x"), vec![(CompareOp::Lt, int(10))]),
            vec![assign("x", int(4)), assign("x", string("s"))],
        );
        let (lowered, records) = run(&mut env, &[stmt]);

        let CppStmt::While { body, .. } = &lowered[0] else {
            panic!("Expected while loop, got {:?}", lowered[0]);
        };
        assert!(matches!(body[0], CppStmt::Assignment { .. }));
        assert_eq!(body[1], skipped(ReasonCode::TypeNarrowing, "x = \"s\""));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_elif_chain_is_preserved() {
        let mut env = TypeEnvironment::new();
        env.bind("x", StaticType::Integer);

        let stmt = if_stmt(
            compare(name("x"), vec![(CompareOp::Lt, int(3))]),
            vec![expr_stmt(call_named("print", vec![string("low")]))],
            vec![if_stmt(
                compare(name("x"), vec![(CompareOp::Gt, int(8))]),
                vec![expr_stmt(call_named("print", vec![string("high")]))],
                vec![expr_stmt(call_named("print", vec![string("mid")]))],
            )],
        );
        let (lowered, _) = run(&mut env, &[stmt]);

        let x = CppExpr::variable("x", StaticType::Integer);
        assert_eq!(
            lowered,
            vec![CppStmt::If {
                branches: vec![
                    (
                        CppExpr::binary(
                            CppBinaryOp::Lt,
                            x.clone(),
                            CppExpr::int(3),
                            StaticType::Boolean,
                        ),
                        vec![print(vec![CppExpr::string("low")])],
                    ),
                    (
                        CppExpr::binary(CppBinaryOp::Gt, x, CppExpr::int(8), StaticType::Boolean),
                        vec![print(vec![CppExpr::string("high")])],
                    ),
                ],
                else_body: Some(vec![print(vec![CppExpr::string("mid")])]),
            }]
        );
    }

    #[test]
    fn test_untranslatable_elif_becomes_else_block() {
        let mut env = TypeEnvironment::new();
        env.bind("x", StaticType::Integer);

        let elif = if_stmt(name("undefined"), vec![pass_stmt()], vec![]);
        let elif_text = elif.text.clone();
        let stmt = if_stmt(name("x"), vec![pass_stmt()], vec![elif]);
        let (lowered, records) = run(&mut env, &[stmt]);

        let CppStmt::If { branches, else_body } = &lowered[0] else {
            panic!("Expected if statement, got {:?}", lowered[0]);
        };
        assert_eq!(branches.len(), 1);
        assert_eq!(
            else_body.as_deref(),
            Some(&[skipped(ReasonCode::NotDirectlyTranslatable, &elif_text)][..])
        );
        assert_eq!(records[0].original_text, elif_text);
    }

    #[test]
    fn test_counted_loops() {
        let mut env = TypeEnvironment::new();
        let stmts = vec![
            for_stmt(
                "i",
                call_named("range", vec![int(10)]),
                vec![expr_stmt(call_named("print", vec![name("i")]))],
            ),
            for_stmt("j", call_named("range", vec![int(10), int(0), int(-2)]), vec![break_stmt()]),
        ];
        let (lowered, records) = run(&mut env, &stmts);
        assert!(records.is_empty());

        assert_eq!(
            lowered[0],
            CppStmt::For {
                variable: "i".to_string(),
                start: CppExpr::int(0),
                end: CppExpr::int(10),
                step: 1,
                body: vec![print(vec![CppExpr::variable("i", StaticType::Integer)])],
            }
        );
        match &lowered[1] {
            CppStmt::For { step, body, .. } => {
                assert_eq!(*step, -2);
                assert_eq!(body, &vec![CppStmt::Break]);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
        // The loop variable lives only as long as the loop
        assert_eq!(env.lookup("i"), None);
    }

    #[test]
    fn test_loop_variable_stored_by_body_is_skipped() {
        let mut env = TypeEnvironment::new();
        let reassigning = for_stmt(
            "i",
            call_named("range", vec![int(3)]),
            vec![
                assign("i", binary(name("i"), BinaryOp::Add, int(10))),
                expr_stmt(call_named("print", vec![name("i")])),
            ],
        );
        let (lowered, records) = run(&mut env, &[reassigning.clone()]);

        assert_eq!(lowered, vec![skipped(ReasonCode::NotDirectlyTranslatable, &reassigning.text)]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_bound_loop_variable_is_skipped() {
        let mut env = TypeEnvironment::new();
        let stmts = vec![
            assign("i", int(0)),
            for_stmt("i", call_named("range", vec![int(3)]), vec![pass_stmt()]),
            expr_stmt(call_named("print", vec![name("i")])),
        ];
        let (lowered, records) = run(&mut env, &stmts);

        assert_eq!(
            lowered,
            vec![
                CppStmt::Declaration {
                    name: "i".to_string(),
                    decl_type: StaticType::Integer,
                    initializer: CppExpr::int(0),
                },
                skipped(ReasonCode::NotDirectlyTranslatable, &stmts[1].text),
                print(vec![CppExpr::variable("i", StaticType::Integer)]),
            ]
        );
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_loop_end_with_call_is_skipped() {
        let mut env = TypeEnvironment::new();
        env.bind("n", StaticType::Integer);
        let loop_stmt = for_stmt(
            "i",
            call_named("range", vec![call_named("abs", vec![name("n")])]),
            vec![pass_stmt()],
        );
        let (lowered, _) = run(&mut env, &[loop_stmt.clone()]);
        assert_eq!(lowered, vec![skipped(ReasonCode::NotDirectlyTranslatable, &loop_stmt.text)]);
    }

    #[test]
    fn test_printing_floats_is_skipped() {
        let mut env = TypeEnvironment::new();
        env.bind("f", StaticType::FloatingPoint);
        env.bind("done", StaticType::Boolean);
        let stmts = vec![
            expr_stmt(call_named("print", vec![string("f is"), name("f")])),
            expr_stmt(call_named("print", vec![name("done")])),
        ];
        let (lowered, records) = run(&mut env, &stmts);

        assert_eq!(
            lowered,
            vec![
                skipped(ReasonCode::TypeNarrowing, &stmts[0].text),
                print(vec![CppExpr::variable("done", StaticType::Boolean)]),
            ]
        );
        assert_eq!(records[0].reason, ReasonCode::TypeNarrowing);
    }

    #[test]
    fn test_repeated_parameter_keeps_first_binding() {
        let def = function_def(
            "first",
            vec![param_annotated("a", "int"), param_annotated("a", "str")],
            None,
            vec![ret(Some(name("a")))],
        );
        let (lowered, records) = function(&def, &TranslatorConfig::default());

        assert!(records.is_empty());
        assert_eq!(lowered.return_type, StaticType::Integer);
        assert_eq!(
            lowered.body,
            vec![CppStmt::Return(Some(CppExpr::variable("a", StaticType::Integer)))]
        );
    }

    #[test]
    fn test_augmented_assignment_reassigns() {
        let mut env = TypeEnvironment::new();
        env.bind("i", StaticType::Integer);
        let (lowered, _) = run(&mut env, &[aug_assign("i", BinaryOp::Add, int(1))]);

        assert_eq!(
            lowered,
            vec![CppStmt::Assignment {
                name: "i".to_string(),
                value: CppExpr::binary(
                    CppBinaryOp::Add,
                    CppExpr::variable("i", StaticType::Integer),
                    CppExpr::int(1),
                    StaticType::Integer,
                ),
            }]
        );
    }

    #[test]
    fn test_imports_register_and_emit_nothing() {
        let mut env = TypeEnvironment::new();
        let stmts = vec![
            import(&["math"]),
            pass_stmt(),
            assign("r", call(attribute(name("math"), "sqrt"), vec![float(2.0)])),
        ];
        let (lowered, records) = run(&mut env, &stmts);

        assert!(records.is_empty());
        assert_eq!(lowered.len(), 1);
        assert!(env.has_math_module());
        assert_eq!(env.resolve("r"), StaticType::FloatingPoint);
    }

    #[test]
    fn test_print_statement() {
        let mut env = TypeEnvironment::new();
        env.bind("x", StaticType::Integer);
        let stmt = expr_stmt(call_named("print", vec![string("x is"), name("x")]));
        let (lowered, _) = run(&mut env, &[stmt]);
        assert_eq!(
            lowered,
            vec![print(vec![
                CppExpr::string("x is"),
                CppExpr::variable("x", StaticType::Integer),
            ])]
        );
    }

    #[test]
    fn test_return_outside_function_is_skipped() {
        let mut env = TypeEnvironment::new();
        let (lowered, _) = run(&mut env, &[ret(None)]);
        assert_eq!(lowered, vec![skipped(ReasonCode::NotDirectlyTranslatable, "return")]);
    }

    #[test]
    fn test_function_return_type_is_inferred() {
        let def = function_def(
            "add",
            vec![param_annotated("a", "int"), param_annotated("b", "int")],
            None,
            vec![ret(Some(binary(name("a"), BinaryOp::Add, name("b"))))],
        );
        let (lowered, records) = function(&def, &TranslatorConfig::default());

        assert!(records.is_empty());
        assert_eq!(lowered.return_type, StaticType::Integer);
        assert_eq!(lowered.params[0].param_type, ParamType::Concrete(StaticType::Integer));
        assert_eq!(
            lowered.body,
            vec![CppStmt::Return(Some(CppExpr::binary(
                CppBinaryOp::Add,
                CppExpr::variable("a", StaticType::Integer),
                CppExpr::variable("b", StaticType::Integer),
                StaticType::Integer,
            )))]
        );
    }

    #[test]
    fn test_function_without_return_value_is_void() {
        let def = function_def(
            "print_test",
            vec![],
            None,
            vec![expr_stmt(call_named("print", vec![string("hi")])), ret(Some(none()))],
        );
        let (lowered, _) = function(&def, &TranslatorConfig::default());
        assert_eq!(lowered.return_type, StaticType::Void);
        assert_eq!(lowered.body[1], CppStmt::Return(None));
    }

    #[test]
    fn test_function_cannot_see_module_variables() {
        let def = function_def("f", vec![], None, vec![ret(Some(name("x")))]);
        let (lowered, records) = function(&def, &TranslatorConfig::default());
        assert_eq!(lowered.body, vec![skipped(ReasonCode::NotDirectlyTranslatable, "return x")]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_conflicting_returns() {
        let def = function_def(
            "f",
            vec![param_annotated("flag", "bool")],
            None,
            vec![
                if_stmt(name("flag"), vec![ret(Some(string("yes")))], vec![]),
                ret(Some(int(0))),
            ],
        );
        let (lowered, records) = function(&def, &TranslatorConfig::default());
        assert_eq!(lowered.return_type, StaticType::String);
        assert_eq!(lowered.body[1], skipped(ReasonCode::TypeNarrowing, "return 0"));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_nested_function_definitions_are_skipped() {
        let inner = function_def("inner", vec![], None, vec![pass_stmt()]);
        let def = function_def("outer", vec![], None, vec![inner]);
        let (lowered, records) = function(&def, &TranslatorConfig::default());
        assert_eq!(lowered.body.len(), 1);
        assert_eq!(records[0].category, Category::Unsupported);
    }

    #[test]
    fn test_default_policies() {
        let def = function_def(
            "abc",
            vec![param("a"), param_default("b", int(3))],
            None,
            vec![pass_stmt()],
        );

        let (kept, _) = function(&def, &TranslatorConfig::default());
        assert_eq!(kept.params[1].default, Some(CppExpr::int(3)));
        assert_eq!(kept.template_params(), vec!["T0"]);

        let config = TranslatorConfig::default().with_default_params(DefaultParamPolicy::Skip);
        let (dropped, _) = function(&def, &config);
        assert_eq!(dropped.params[1].default, None);
    }
}
