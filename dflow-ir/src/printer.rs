//! Implements a formatter for the in-memory representation of functions and
//! their control-flow graphs.
use crate::{BlockMap, Cfg, Operation};
use dflow_utils::Id;
use itertools::Itertools;
use std::io;

/// Printer for the IR.
pub struct Printer;

impl Printer {
    /// Format an operation in the textual style of the IR:
    /// `dest = op args .labels @funcs value`.
    pub fn operation_to_str(op: &Operation) -> String {
        let mut parts = Vec::new();
        if let Some(dest) = op.dest {
            parts.push(format!("{dest} ="));
        }
        parts.push(op.op.to_string());
        if let Some(value) = op.value {
            parts.push(value.to_string());
        }
        parts.extend(op.funcs.iter().map(|f| format!("@{f}")));
        parts.extend(op.args.iter().map(|a| a.to_string()));
        parts.extend(op.labels.iter().map(|l| format!(".{l}")));
        format!("{};", parts.join(" "))
    }

    /// Write the graph description of one function: one line per block
    /// name, then one line per directed edge.
    ///
    /// ```text
    /// digraph main {
    ///    b0
    ///    exit
    ///    b0 -> exit
    /// }
    /// ```
    pub fn write_cfg<F: io::Write>(
        name: &Id,
        blocks: &BlockMap,
        cfg: &Cfg,
        f: &mut F,
    ) -> io::Result<()> {
        writeln!(f, "digraph {name} {{")?;
        for block in blocks.names() {
            writeln!(f, "   {block}")?;
        }
        for (src, dst) in cfg.edges() {
            writeln!(f, "   {src} -> {dst}")?;
        }
        writeln!(f, "}}")
    }

    /// Format a list of names as a comma separated list.
    pub fn names_to_str<'a, I>(names: I) -> String
    where
        I: IntoIterator<Item = &'a Id>,
    {
        names.into_iter().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::Printer;
    use crate::{BlockMap, Cfg, Instruction, Literal, Opcode, Operation};

    #[test]
    fn formats_operations() {
        let add = Operation::compute(Opcode::Add, "z", ["x", "y"]);
        assert_eq!(Printer::operation_to_str(&add), "z = add x y;");
        let c = Operation::constant("x", Literal::Int(4));
        assert_eq!(Printer::operation_to_str(&c), "x = const 4;");
        let br = Operation::branch("c", "t", "f");
        assert_eq!(Printer::operation_to_str(&br), "br c .t .f;");
    }

    #[test]
    fn writes_graph_description() {
        let blocks = BlockMap::from_instrs(vec![
            Operation::jump("exit").into(),
            Instruction::label("exit"),
            Operation::ret().into(),
        ])
        .unwrap();
        let cfg = Cfg::from(&blocks);
        let mut out = Vec::new();
        Printer::write_cfg(&"main".into(), &blocks, &cfg, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "digraph main {\n   b0\n   exit\n   b0 -> exit\n}\n"
        );
    }
}
