//! Shared helpers: exit codes, color choice, input loading, and diagnostic
//! rendering via an `annotate-snippets` `Renderer` that picks styled vs.
//! plain output and renders langpeg-compiler's `thiserror` spans.

use std::io::Read;
use std::path::{Path, PathBuf};

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use clap::ArgMatches;
use langpeg_compiler::{CompileError, ImportError, ParseError, SemanticError};
use langpeg_core::Span;

/// Exit codes: success, argument/validation error, grammar
/// error.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1;
pub const EXIT_GRAMMAR_ERROR: i32 = 2;

#[derive(Clone, Copy, Debug, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn from_matches(m: &ArgMatches) -> Self {
        match m.get_one::<String>("color").map(String::as_str) {
            Some("always") => ColorChoice::Always,
            Some("never") => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }

    fn renderer(self) -> Renderer {
        if self.should_colorize() {
            Renderer::styled()
        } else {
            Renderer::plain()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read `{path}`: {reason}")]
    Grammar { path: PathBuf, reason: String },
    #[error("failed to read input `{path}`: {reason}")]
    Input { path: PathBuf, reason: String },
    #[error("failed to read input from stdin: {reason}")]
    Stdin { reason: String },
    #[error("exactly one of --input or --input-file is required")]
    MissingInput,
}

pub fn read_grammar(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::Grammar {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Resolve `--input`/`--input-file` into bytes; `-` reads stdin, matching
/// the pack's convention for file-or-stdin flags.
pub fn read_input(text: Option<&str>, file: Option<&Path>) -> Result<Vec<u8>, LoadError> {
    if let Some(text) = text {
        return Ok(text.as_bytes().to_vec());
    }
    if let Some(path) = file {
        if path == Path::new("-") {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| LoadError::Stdin {
                    reason: e.to_string(),
                })?;
            return Ok(buf);
        }
        return std::fs::read(path).map_err(|e| LoadError::Input {
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }
    Err(LoadError::MissingInput)
}

/// Pull a source span out of a `CompileError`, where the failing stage
/// attached one. Import errors and a few semantic errors (left recursion,
/// missing recovery) name a rule or path rather than a grammar-text
/// position, so they render without a snippet.
fn diagnostic_span(err: &CompileError) -> Option<Span> {
    match err {
        CompileError::Parse(p) => match p {
            ParseError::MalformedCharClass { span, .. }
            | ParseError::UnterminatedLiteral { span }
            | ParseError::MissingArrow { span }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::TrailingGarbage { span } => Some(*span),
            ParseError::UnexpectedEof { .. } => None,
        },
        CompileError::Semantic(SemanticError::UndefinedRule { span, .. }) => Some(*span),
        CompileError::Semantic(_) | CompileError::Import(_) | CompileError::UnknownConfigOption { .. } => None,
    }
}

/// Render a compile error, with an `annotate-snippets` source excerpt when
/// the error carries a span into `source`, plain text otherwise (import
/// errors name an external path, not a position in this grammar's text).
pub fn render_compile_error(
    err: &CompileError,
    source: &str,
    path: &Path,
    color: ColorChoice,
) -> String {
    let message = err.to_string();
    let Some(span) = diagnostic_span(err) else {
        return format!("error: {message}");
    };

    let start = span.start as usize;
    let end = (span.end as usize).max(start + 1).min(source.len().max(start + 1));
    let end = end.min(source.len());
    let start = start.min(end);

    let snippet = Snippet::source(source)
        .line_start(1)
        .path(path.display().to_string())
        .annotation(AnnotationKind::Primary.span(start..end).label(&message));
    let report = [Level::ERROR.primary_title(&message).element(snippet)];
    color.renderer().render(&report).to_string()
}

/// Look up a named rule's entry symbol by resolving each interned entry
/// symbol back to a string — `Program`'s interner has no reverse lookup
/// by string, only `Symbol -> &str`, so a linear scan over the (small)
/// entry table is the straightforward way to turn a `--entry NAME` flag
/// into the `Symbol` `Matcher::exec_entry` wants.
pub fn find_entry(program: &langpeg_bytecode::Program, name: &str) -> Option<langpeg_core::Symbol> {
    program
        .entries()
        .keys()
        .find(|sym| program.strings().resolve(**sym) == name)
        .copied()
}

pub fn import_error_note(err: &CompileError) -> Option<String> {
    match err {
        CompileError::Import(ImportError::ImportCycle { path }) => {
            Some(format!("import cycle through `{path}`"))
        }
        CompileError::Import(ImportError::UnresolvedImport { name, path }) => {
            Some(format!("`{name}` is not defined in `{path}`"))
        }
        CompileError::Import(ImportError::LoadFailed { path, reason }) => {
            Some(format!("could not load `{path}`: {reason}"))
        }
        _ => None,
    }
}
