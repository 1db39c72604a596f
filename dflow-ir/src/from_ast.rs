use crate::{Function, Instruction, Literal, Opcode, Operation, Program};
use dflow_frontend::ast;
use dflow_utils::{DflowResult, Error, Id};
use std::collections::HashSet;

/// Construct an IR representation using a parsed AST. Every instruction is
/// validated; the first malformed instruction aborts the conversion.
pub fn ast_to_ir(prog: ast::ProgramDef) -> DflowResult<Program> {
    let mut seen = HashSet::new();
    let functions = prog
        .functions
        .into_iter()
        .map(|func| {
            if !seen.insert(func.name.clone()) {
                return Err(Error::malformed_input(format!(
                    "function `{}' is defined more than once",
                    func.name
                )));
            }
            build_function(func)
        })
        .collect::<DflowResult<Vec<_>>>()?;
    Ok(Program { functions })
}

fn build_function(func: ast::FunctionDef) -> DflowResult<Function> {
    let name = Id::from(func.name);
    let instrs = func
        .instrs
        .into_iter()
        .enumerate()
        .map(|(idx, instr)| {
            build_instruction(instr).map_err(|err| match err {
                Error::MalformedInput(msg) => Error::malformed_input(format!(
                    "{msg} (function `{name}', instruction {idx})"
                )),
                err => err,
            })
        })
        .collect::<DflowResult<Vec<_>>>()?;
    log::debug!("Function `{name}': {} instructions", instrs.len());
    Ok(Function { name, instrs })
}

fn ids(names: Option<Vec<String>>) -> Vec<Id> {
    names.unwrap_or_default().into_iter().map(Id::from).collect()
}

fn build_literal(value: serde_json::Value) -> DflowResult<Literal> {
    match value {
        serde_json::Value::Bool(b) => Ok(Literal::Bool(b)),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(v), _) => Ok(Literal::Int(v)),
            (None, Some(v)) if n.is_f64() => Ok(Literal::Float(v)),
            _ => Err(Error::malformed_input(format!(
                "integer literal {n} does not fit in 64 bits"
            ))),
        },
        v => Err(Error::malformed_input(format!("unsupported literal {v}"))),
    }
}

fn build_instruction(instr: ast::InstrDef) -> DflowResult<Instruction> {
    let ast::InstrDef {
        op,
        label,
        dest,
        args,
        labels,
        funcs,
        value,
    } = instr;

    let op = match (op, label) {
        (Some(_), Some(label)) => {
            return Err(Error::malformed_input(format!(
                "label `{label}' also has an `op' field"
            )));
        }
        (None, Some(label)) => return Ok(Instruction::Label(label.into())),
        (None, None) => {
            return Err(Error::malformed_input(
                "instruction has neither `op' nor `label'",
            ));
        }
        (Some(op), None) => Opcode::from(op.as_str()),
    };

    let operation = Operation {
        op,
        dest: dest.map(Id::from),
        args: ids(args),
        labels: ids(labels),
        funcs: ids(funcs),
        value: value.map(build_literal).transpose()?,
    };
    validate(&operation)?;
    Ok(Instruction::Operation(operation))
}

/// Checks the fields that the block partitioner and the analyses rely on.
fn validate(operation: &Operation) -> DflowResult<()> {
    let Operation {
        op,
        dest,
        args,
        labels,
        value,
        ..
    } = operation;
    match op {
        Opcode::Const if dest.is_none() => {
            Err(Error::malformed_input("`const' without `dest'"))
        }
        Opcode::Const if value.is_none() => {
            Err(Error::malformed_input("`const' without `value'"))
        }
        Opcode::Jmp if labels.len() != 1 => Err(Error::malformed_input(
            format!("`jmp' expects 1 label, found {}", labels.len()),
        )),
        Opcode::Br if labels.len() != 2 || args.len() != 1 => {
            Err(Error::malformed_input(format!(
                "`br' expects 1 argument and 2 labels, found {} and {}",
                args.len(),
                labels.len()
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::ast_to_ir;
    use crate::{Instruction, Literal, Opcode};
    use dflow_frontend::ProgramDef;
    use dflow_utils::Error;

    fn convert(json: &str) -> Result<crate::Program, Error> {
        ast_to_ir(ProgramDef::construct_from_str(json).unwrap())
    }

    #[test]
    fn converts_operations_and_labels() {
        let prog = convert(
            r#"{"functions": [{"name": "main", "args": [{"name": "n", "type": "int"}], "instrs": [
                {"op": "const", "dest": "one", "type": "int", "value": 1},
                {"op": "const", "dest": "t", "type": "bool", "value": true},
                {"op": "br", "args": ["t"], "labels": ["l", "r"]},
                {"label": "l"},
                {"op": "fadd", "dest": "f", "args": ["a", "b"]},
                {"label": "r"},
                {"op": "ret"}
            ]}]}"#,
        )
        .unwrap();
        let main = &prog.functions[0];
        assert_eq!(main.name, "main");
        assert_eq!(main.instrs.len(), 7);
        let first = main.instrs[0].as_operation().unwrap();
        assert_eq!(first.value, Some(Literal::Int(1)));
        let second = main.instrs[1].as_operation().unwrap();
        assert_eq!(second.value, Some(Literal::Bool(true)));
        assert_eq!(main.instrs[3], Instruction::label("l"));
        let fadd = main.instrs[4].as_operation().unwrap();
        assert_eq!(fadd.op, Opcode::Other("fadd".into()));
    }

    #[test]
    fn float_literals_are_kept() {
        let prog = convert(
            r#"{"functions": [{"name": "main", "instrs": [
                {"op": "const", "dest": "pi", "type": "float", "value": 3.5}
            ]}]}"#,
        )
        .unwrap();
        let op = prog.functions[0].instrs[0].as_operation().unwrap();
        assert_eq!(op.value, Some(Literal::Float(3.5)));
    }

    #[test]
    fn rejects_integers_out_of_range() {
        let err = convert(
            r#"{"functions": [{"name": "main", "instrs": [
                {"op": "const", "dest": "big", "type": "int", "value": 9223372036854775808}
            ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("9223372036854775808"));
    }

    #[test]
    fn rejects_records_without_op_or_label() {
        let err = convert(
            r#"{"functions": [{"name": "main", "instrs": [{"dest": "x"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("instruction 0"));
    }

    #[test]
    fn rejects_const_without_value() {
        let err = convert(
            r#"{"functions": [{"name": "main", "instrs": [
                {"op": "const", "dest": "x"}
            ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn rejects_branch_with_one_label() {
        let err = convert(
            r#"{"functions": [{"name": "main", "instrs": [
                {"op": "br", "args": ["c"], "labels": ["only"]}
            ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn rejects_duplicate_functions() {
        let err = convert(
            r#"{"functions": [
                {"name": "main", "instrs": []},
                {"name": "main", "instrs": []}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
