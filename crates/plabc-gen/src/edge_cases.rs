//! Edge-case tests for emission: frame isolation, truthiness fallbacks,
//! expression-position assignments and the register ceiling.

use plabc_ast::deserialize;

use crate::emit::emit_program;
use crate::error::BackendError;

fn emit(tree: &str) -> crate::error::Result<String> {
    let loaded = deserialize(tree).expect("test tree must load");
    emit_program(&loaded.arena, &loaded.symbols, loaded.root)
}

#[test]
fn test_each_function_gets_a_fresh_frame() {
    // both functions bind their parameter to RAX independently
    let tree = "( ; \
        ( COMA \
          ( LITERAL 0 \"first\" ( LITERAL 1 \"a\" nil nil ) \
            ( RETURN ( LITERAL 1 \"a\" nil nil ) nil ) ) \
          ( LITERAL 2 \"second\" ( LITERAL 3 \"b\" nil nil ) \
            ( RETURN ( LITERAL 3 \"b\" nil nil ) nil ) ) ) \
        ( OUT ( 1 nil nil ) nil ) )";
    let asm = emit(tree).unwrap();
    assert!(asm.contains(":first\nPOPR RAX\n"));
    assert!(asm.contains(":second\nPOPR RAX\n"));
}

#[test]
fn test_main_frame_does_not_leak_into_functions() {
    // main binds x to RAX; the function's own name binds to RAX again
    let tree = "( ; \
        ( LITERAL 0 \"g\" ( LITERAL 1 \"v\" nil nil ) \
          ( RETURN ( LITERAL 1 \"v\" nil nil ) nil ) ) \
        ( ; ( VAR_DECLARATION ( LITERAL 2 \"x\" nil nil ) nil ) \
            ( = ( LITERAL 2 \"x\" nil nil ) ( 5 nil nil ) ) ) )";
    let asm = emit(tree).unwrap();
    assert!(asm.contains("PUSH 5\nPOPR RAX\nHLT\n"));
    assert!(asm.contains(":g\nPOPR RAX\n"));
}

#[test]
fn test_truthy_number_condition() {
    // a non-comparison condition materializes as PUSH 0 / JNE
    let tree = "( ; nil \
        ( IF ( 1 nil nil ) ( THEN ( OUT ( 2 nil nil ) nil ) nil ) ) )";
    let asm = emit(tree).unwrap();
    assert!(asm.contains("PUSH 1\nPUSH 0\nJNE :if_1_then\nJMP :if_1_end\n"));
}

#[test]
fn test_assignment_in_condition_keeps_value() {
    // (x = 3) as a condition: POPR then PUSHR to keep the value on the stack
    let tree = "( ; nil ( ; \
        ( VAR_DECLARATION ( LITERAL 0 \"x\" nil nil ) nil ) \
        ( IF ( = ( LITERAL 0 \"x\" nil nil ) ( 3 nil nil ) ) \
             ( THEN ( OUT ( 1 nil nil ) nil ) nil ) ) ) )";
    let asm = emit(tree).unwrap();
    assert!(asm.contains("PUSH 3\nPOPR RAX\nPUSHR RAX\nPUSH 0\nJNE :if_1_then\n"));
}

#[test]
fn test_not_swaps_jump_targets() {
    let tree = "( ; nil ( ; \
        ( VAR_DECLARATION ( LITERAL 0 \"x\" nil nil ) nil ) \
        ( IF ( ! ( > ( LITERAL 0 \"x\" nil nil ) ( 1 nil nil ) ) nil ) \
             ( THEN ( OUT ( 1 nil nil ) nil ) nil ) ) ) )";
    let asm = emit(tree).unwrap();
    // negation: the comparison's true edge goes to the end label
    assert!(asm.contains("JA :if_1_end\nJMP :if_1_then\n"));
}

#[test]
fn test_or_chains_through_mid_label() {
    let tree = "( ; nil ( ; \
        ( VAR_DECLARATION ( LITERAL 0 \"x\" nil nil ) nil ) \
        ( IF ( OR ( < ( LITERAL 0 \"x\" nil nil ) ( 0 nil nil ) ) \
                  ( > ( LITERAL 0 \"x\" nil nil ) ( 9 nil nil ) ) ) \
             ( THEN ( OUT ( 1 nil nil ) nil ) nil ) ) ) )";
    let asm = emit(tree).unwrap();
    // left comparison: true straight to then, false to the mid label
    assert!(asm.contains("JB :if_1_then\nJMP :if_or_1\n:if_or_1\n"));
    assert!(asm.contains("JA :if_1_then\nJMP :if_1_end\n"));
}

#[test]
fn test_do_while_with_empty_body() {
    let tree = "( ; nil ( ; \
        ( VAR_DECLARATION ( LITERAL 0 \"x\" nil nil ) nil ) \
        ( DO-WHILE ( < ( LITERAL 0 \"x\" nil nil ) ( 1 nil nil ) ) nil ) ) )";
    let asm = emit(tree).unwrap();
    assert!(asm.contains(":do-while_1\nPUSHR RAX\nPUSH 1\nJB :do-while_1\n"));
}

#[test]
fn test_eighth_variable_still_fits() {
    let mut body = String::from("( VAR_DECLARATION ( LITERAL 0 \"v0\" nil nil ) nil )");
    for i in 1..8 {
        body = format!(
            "( ; {body} ( VAR_DECLARATION ( LITERAL {i} \"v{i}\" nil nil ) nil ) )"
        );
    }
    let tree = format!(
        "( ; nil ( ; {body} \
           ( = ( LITERAL 7 \"v7\" nil nil ) ( 1 nil nil ) ) ) )"
    );
    let asm = emit(&tree).unwrap();
    assert!(asm.contains("POPR CURVA"));
}

#[test]
fn test_too_many_locals_names_the_function() {
    let mut body = String::from("( VAR_DECLARATION ( LITERAL 1 \"v0\" nil nil ) nil )");
    for i in 2..10 {
        body = format!(
            "( ; {body} ( VAR_DECLARATION ( LITERAL {i} \"v{}\" nil nil ) nil ) )",
            i - 1
        );
    }
    let tree = format!("( ; ( LITERAL 0 \"crowded\" nil {body} ) ( OUT ( 1 nil nil ) nil ) )");
    match emit(&tree).unwrap_err() {
        BackendError::TooManyLocals { func, required } => {
            assert_eq!(func, "crowded");
            assert_eq!(required, 9);
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn test_set_pixel_needs_a_free_register() {
    // all eight registers bound; the scratch register scan comes up empty
    let mut body = String::from("( VAR_DECLARATION ( LITERAL 0 \"v0\" nil nil ) nil )");
    for i in 1..8 {
        body = format!(
            "( ; {body} ( VAR_DECLARATION ( LITERAL {i} \"v{i}\" nil nil ) nil ) )"
        );
    }
    let tree = format!(
        "( ; nil ( ; {body} \
           ( FUNC_CALL ( LITERAL 8 \"set_pixel\" nil nil ) \
                       ( COMA ( 1 nil nil ) ( 2 nil nil ) ) ) ) )"
    );
    assert!(matches!(
        emit(&tree).unwrap_err(),
        BackendError::TooManyLocals { .. }
    ));
}

#[test]
fn test_user_call_named_like_intrinsic_prefix() {
    // "drawing" is not "draw": falls through to the user-call path
    let tree = "( ; nil ( FUNC_CALL ( LITERAL 0 \"drawing\" nil nil ) ( 1 nil nil ) ) )";
    let asm = emit(tree).unwrap();
    assert!(asm.contains("CALL :drawing"));
}

#[test]
fn test_nested_calls_push_reverse_per_call() {
    // h(f(1), 2): outer pushes 2 first, then evaluates f(1)
    let tree = "( ; nil \
        ( OUT ( FUNC_CALL ( LITERAL 0 \"h\" nil nil ) \
                 ( COMA ( FUNC_CALL ( LITERAL 1 \"f\" nil nil ) ( 1 nil nil ) ) \
                        ( 2 nil nil ) ) ) nil ) )";
    let asm = emit(tree).unwrap();
    assert_eq!(
        asm,
        "PUSH 2\nPUSH 1\nCALL :f\nCALL :h\nOUT\nHLT\n"
    );
}

#[test]
fn test_connector_root_with_no_functions() {
    let tree = "( ; nil ( OUT ( 42 nil nil ) nil ) )";
    assert_eq!(emit(tree).unwrap(), "PUSH 42\nOUT\nHLT\n");
}

#[test]
fn test_bare_statement_root() {
    // a root that is not a connector is treated as the whole body
    let tree = "( OUT ( 7 nil nil ) nil )";
    assert_eq!(emit(tree).unwrap(), "PUSH 7\nOUT\nHLT\n");
}
