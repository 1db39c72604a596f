use super::ast::ProgramDef;
use dflow_utils::{DflowResult, Error};
use std::{fs, io::Read, path::Path};

/// Reads programs in the JSON encoding.
pub struct JsonParser;

impl JsonParser {
    /// Parse a program from a file on disk.
    pub fn parse_file(path: &Path) -> DflowResult<ProgramDef> {
        let file = fs::File::open(path).map_err(|err| {
            Error::misc(format!(
                "Failed to open {}: {err}",
                path.to_string_lossy()
            ))
        })?;
        log::debug!("Parsing program from {}", path.display());
        Self::parse(file)
    }

    /// Parse a program from any reader.
    pub fn parse<R: Read>(reader: R) -> DflowResult<ProgramDef> {
        let prog: ProgramDef = serde_json::from_reader(reader)?;
        log::debug!("Parsed {} function(s)", prog.functions.len());
        Ok(prog)
    }
}

#[cfg(test)]
mod tests {
    use crate::ProgramDef;

    #[test]
    fn parses_operations_and_labels() {
        let prog = ProgramDef::construct_from_str(
            r#"{"functions": [{"name": "main", "instrs": [
                {"op": "const", "dest": "x", "type": "int", "value": 1},
                {"label": "done"},
                {"op": "print", "args": ["x"]}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(prog.functions.len(), 1);
        let instrs = &prog.functions[0].instrs;
        assert_eq!(instrs.len(), 3);
        assert_eq!(instrs[0].op.as_deref(), Some("const"));
        assert_eq!(instrs[1].label.as_deref(), Some("done"));
        assert_eq!(instrs[2].args, Some(vec!["x".to_string()]));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(ProgramDef::construct_from_str("{\"functions\": [").is_err());
    }
}
