//! `@import` resolution: loads named rules transitively from referenced
//! grammar files, memoized by canonical path, with cycle and
//! missing-rule detection across langpeg's file-path-addressed imports.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use langpeg_core::{Grammar, Interner};

use crate::error::ImportError;
use crate::parser::parse as parse_grammar;

/// Resolve every `@import` reachable from `grammar`, inserting imported
/// rules under their original names. Local definitions that already
/// exist in `grammar` are left untouched — later local definitions
/// override same-named imports.
pub fn resolve_imports(grammar: &mut Grammar, grammar_path: &Path, strings: &mut Interner) -> Result<(), ImportError> {
    let mut cache: HashMap<PathBuf, Grammar> = HashMap::new();
    let canonical = grammar_path.canonicalize().unwrap_or_else(|_| grammar_path.to_path_buf());
    let mut stack = vec![canonical];
    resolve(grammar, grammar_path, strings, &mut cache, &mut stack)
}

fn resolve(
    grammar: &mut Grammar,
    grammar_path: &Path,
    strings: &mut Interner,
    cache: &mut HashMap<PathBuf, Grammar>,
    stack: &mut Vec<PathBuf>,
) -> Result<(), ImportError> {
    let base_dir = grammar_path.parent().unwrap_or_else(|| Path::new("."));
    let imports = std::mem::take(&mut grammar.imports);

    for import in &imports {
        let full_path = base_dir.join(&import.path);
        let canonical = full_path.canonicalize().unwrap_or_else(|_| full_path.clone());

        if stack.contains(&canonical) {
            return Err(ImportError::ImportCycle { path: import.path.clone() });
        }

        if !cache.contains_key(&canonical) {
            let source = std::fs::read_to_string(&full_path).map_err(|e| ImportError::LoadFailed {
                path: import.path.clone(),
                reason: e.to_string(),
            })?;
            let mut imported = parse_grammar(&source, strings).map_err(|e| ImportError::LoadFailed {
                path: import.path.clone(),
                reason: e.to_string(),
            })?;

            stack.push(canonical.clone());
            resolve(&mut imported, &full_path, strings, cache, stack)?;
            stack.pop();

            cache.insert(canonical.clone(), imported);
        }

        let imported_grammar = cache.get(&canonical).expect("just inserted above");
        for &name in &import.names {
            let rule = imported_grammar.get(name).ok_or_else(|| ImportError::UnresolvedImport {
                name: strings.resolve(name).to_owned(),
                path: import.path.clone(),
            })?;
            grammar.rules.entry(name).or_insert_with(|| rule.clone());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn imports_named_rules_from_another_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "shared.peg", "Digit <- [0-9]\nLetter <- [a-z]");
        let main_path = write_file(dir.path(), "main.peg", "@import Digit from \"shared.peg\"\nS <- Digit");

        let source = std::fs::read_to_string(&main_path).unwrap();
        let mut strings = Interner::new();
        let mut grammar = parse_grammar(&source, &mut strings).unwrap();
        resolve_imports(&mut grammar, &main_path, &mut strings).unwrap();

        let digit = strings.intern("Digit");
        assert!(grammar.get(digit).is_some());
        let letter = strings.intern("Letter");
        assert!(grammar.get(letter).is_none());
    }

    #[test]
    fn local_definition_overrides_import() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "shared.peg", "Digit <- [0-9]");
        let main_path = write_file(
            dir.path(),
            "main.peg",
            "@import Digit from \"shared.peg\"\nDigit <- [a-z]\nS <- Digit",
        );

        let source = std::fs::read_to_string(&main_path).unwrap();
        let mut strings = Interner::new();
        let mut grammar = parse_grammar(&source, &mut strings).unwrap();
        resolve_imports(&mut grammar, &main_path, &mut strings).unwrap();

        let digit = strings.intern("Digit");
        let rule = grammar.get(digit).unwrap();
        assert!(matches!(rule.expr.kind, langpeg_core::ExprKind::Class(_)));
        match &rule.expr.kind {
            langpeg_core::ExprKind::Class(cs) => assert!(cs.contains(b'a' as u32)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_rule_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "shared.peg", "Digit <- [0-9]");
        let main_path = write_file(dir.path(), "main.peg", "@import Nope from \"shared.peg\"\nS <- Nope");

        let source = std::fs::read_to_string(&main_path).unwrap();
        let mut strings = Interner::new();
        let mut grammar = parse_grammar(&source, &mut strings).unwrap();
        assert!(resolve_imports(&mut grammar, &main_path, &mut strings).is_err());
    }

    #[test]
    fn import_cycle_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.peg", "@import B from \"b.peg\"\nA <- B");
        let b_path = write_file(dir.path(), "b.peg", "@import A from \"a.peg\"\nB <- A");

        let source = std::fs::read_to_string(&b_path).unwrap();
        let mut strings = Interner::new();
        let mut grammar = parse_grammar(&source, &mut strings).unwrap();
        let err = resolve_imports(&mut grammar, &b_path, &mut strings).unwrap_err();
        assert!(matches!(err, ImportError::ImportCycle { .. }));
    }
}
